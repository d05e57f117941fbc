//! syllabus-vector
//!
//! The in-memory side of retrieval: loading the precomputed chunk corpus,
//! scoring it against a query vector and assembling the prompt context.
//! Everything here is brute force over a small static file; there is no
//! index structure to maintain.

pub mod context;
pub mod corpus;
pub mod rank;
pub mod similarity;
pub mod store;

pub use context::assemble;
pub use corpus::{load_corpus, parse_corpus, Corpus};
pub use rank::rank;
pub use similarity::cosine_similarity;
pub use store::CorpusStore;
