/// Cosine similarity of two equal-length vectors.
///
/// Sums are accumulated in `f64`, so finite `f32` inputs of any magnitude
/// cannot overflow. Returns 0.0 when either vector has zero magnitude, so a
/// degenerate chunk sorts below anything with a positive score. The result
/// is clamped to `[-1, 1]`. Only the common prefix is compared if the lengths
/// differ; callers check dimensions up front.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(-1.0, 1.0) as f32
}
