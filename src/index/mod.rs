//! Statement Index Module
//!
//! Hashed bag-of-words embeddings, cosine similarity with lexical
//! opposition heuristics, and a multi-key statement store with
//! nearest-neighbour search.

pub mod embedder;
pub mod similarity;
pub mod statement_index;

pub use embedder::HashedEmbedder;
pub use similarity::{cosine, lexical_opposition, statements_contradict, Similarity};
pub use statement_index::StatementIndex;

/// Maps text to a fixed-width vector. Implementations must be
/// deterministic: the same text always yields the same vector.
pub trait Embedder: Send + Sync {
    /// Width of every vector this embedder returns
    fn dimensions(&self) -> usize;

    /// Embed a single text
    fn embed(&self, text: &str) -> Vec<f32>;
}
