use syllabus_core::config::{EmbeddingProvider, EmbeddingSettings};
use syllabus_core::traits::Embedder;
use syllabus_embed::{get_default_embedder, FakeEmbedder};

#[tokio::test]
async fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::new(256);
    let v1 = embedder.embed("What is the late policy?").await.expect("embed");
    let v2 = embedder.embed("What is the late policy?").await.expect("embed");

    assert_eq!(v1.len(), 256, "embedding dim is 256");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[tokio::test]
async fn fake_embedder_is_case_insensitive_per_token() {
    let embedder = FakeEmbedder::new(128);
    assert_eq!(
        embedder.embed("Office Hours").await.unwrap(),
        embedder.embed("office hours").await.unwrap()
    );
}

#[test]
fn provider_fake_selects_fake_embedder_without_credentials() {
    let settings = EmbeddingSettings {
        provider: EmbeddingProvider::Fake,
        api_key_env: "SYLLABUS_EMBED_TEST_UNSET".into(),
        ..Default::default()
    };
    let embedder = get_default_embedder(&settings).expect("fake embedder needs no key");
    assert!(embedder.model_id().starts_with("fake:"));
}
