use syllabus_core::types::{RetrievalResult, ScoredChunk, CONTEXT_SEPARATOR};

/// Join ranked chunk texts into the prompt context.
///
/// With `max_chars` set, trailing chunks that would push the context past the
/// budget are dropped whole, from `top_chunks` as well, so the context is
/// always exactly the join of the returned texts. The first chunk is kept
/// even if it alone exceeds the budget.
pub fn assemble(
    question: &str,
    ranked: Vec<ScoredChunk>,
    max_chars: Option<usize>,
) -> RetrievalResult {
    let mut top_chunks = ranked;
    if let Some(budget) = max_chars {
        let sep = CONTEXT_SEPARATOR.chars().count();
        let mut used = 0usize;
        let mut keep = 0usize;
        for (i, c) in top_chunks.iter().enumerate() {
            let cost = c.text.chars().count() + if i == 0 { 0 } else { sep };
            if i > 0 && used + cost > budget {
                break;
            }
            used += cost;
            keep = i + 1;
        }
        if keep < top_chunks.len() {
            tracing::debug!(
                budget,
                kept = keep,
                dropped = top_chunks.len() - keep,
                "context budget reached"
            );
            top_chunks.truncate(keep);
        }
    }

    let context = top_chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);
    RetrievalResult {
        top_chunks,
        context,
        question: question.to_string(),
    }
}
