//! Core data types that flow through the retrieval pipeline.

use serde_json::Value;

/// A single result returned by a vector store search.
///
/// Hits come in two shapes: a scored point with a JSON payload (the normal
/// case) or an opaque pre-rendered string from a degraded backend. Prompt
/// assembly treats both uniformly through [`RetrievalHit::payload_text`].
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalHit {
    /// A scored point: similarity score plus the payload stored with the vector.
    Scored {
        /// Similarity under the collection's distance metric (cosine).
        score: f32,
        /// Arbitrary metadata stored alongside the vector, e.g. source text.
        payload: Value,
    },
    /// An already-rendered hit with no structure to inspect.
    Opaque(String),
}

impl RetrievalHit {
    /// The hit's payload rendered as text for prompt assembly.
    pub fn payload_text(&self) -> String {
        match self {
            RetrievalHit::Scored { payload, .. } => payload.to_string(),
            RetrievalHit::Opaque(text) => text.clone(),
        }
    }

    /// The relevance score, when the backend reported one.
    pub fn score(&self) -> Option<f32> {
        match self {
            RetrievalHit::Scored { score, .. } => Some(*score),
            RetrievalHit::Opaque(_) => None,
        }
    }
}
