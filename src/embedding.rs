//! Embedding generation.
//!
//! [`EmbeddingProvider::embed`] turns text into a fixed-length vector. When
//! an LLM endpoint is configured it calls `POST {endpoint}/api/embeddings`;
//! on missing configuration, a non-2xx response, a network failure, or a
//! malformed response it derives a deterministic pseudo-embedding instead.
//! The operation never fails — every error path resolves to the fallback.
//!
//! The fallback seeds a PRNG from a SHA-256 hash of the input, so the same
//! text always maps to the same vector and distinct texts diverge with
//! overwhelming probability. That keeps searches reproducible in test and
//! air-gapped environments where no embedding service exists.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Settings;

/// Dimensionality of every embedding this crate produces. Must match the
/// vector size the store's collections are created with.
pub const EMBEDDING_DIMS: usize = 128;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Client for the embedding side of the LLM service, with a deterministic
/// local fallback.
pub struct EmbeddingProvider {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl EmbeddingProvider {
    /// Build a provider from resolved settings.
    pub fn new(settings: &Settings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: settings.llm_endpoint.clone(),
            api_key: settings.llm_api_key.clone(),
        }
    }

    /// Embed `text` into an [`EMBEDDING_DIMS`]-length vector.
    ///
    /// Remote failures are absorbed: the deterministic pseudo-embedding is
    /// returned in their place, so callers never see an error.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        if let Some(endpoint) = &self.endpoint {
            match self.embed_remote(endpoint, text).await {
                Ok(vector) => return vector,
                Err(err) => {
                    tracing::warn!(error = %err, "remote embedding failed, using deterministic fallback");
                }
            }
        } else {
            tracing::debug!("no LLM endpoint configured, using deterministic fallback");
        }

        pseudo_embedding(text)
    }

    /// One attempt against `POST {endpoint}/api/embeddings`. No retries;
    /// a transient failure falls straight through to the fallback.
    async fn embed_remote(&self, endpoint: &str, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", endpoint.trim_end_matches('/'));

        let mut request = self.client.post(&url).json(&EmbeddingRequest { input: text });
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.context("embedding request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("embedding service returned {}", status);
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("malformed embedding response")?;

        if parsed.embedding.len() != EMBEDDING_DIMS {
            bail!(
                "embedding service returned {} dims, expected {}",
                parsed.embedding.len(),
                EMBEDDING_DIMS
            );
        }

        Ok(parsed.embedding)
    }
}

/// Deterministic pseudo-embedding: seed a PRNG with a hash of the text and
/// draw [`EMBEDDING_DIMS`] standard-normal values.
pub fn pseudo_embedding(text: &str) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);

    let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed_bytes));
    (0..EMBEDDING_DIMS)
        .map(|_| rng.sample::<f32, _>(StandardNormal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_embedding_deterministic() {
        let a = pseudo_embedding("Hello world");
        let b = pseudo_embedding("Hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIMS);
    }

    #[test]
    fn test_pseudo_embedding_distinct_texts() {
        let a = pseudo_embedding("text one");
        let b = pseudo_embedding("text two");
        assert_ne!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIMS);
        assert_eq!(b.len(), EMBEDDING_DIMS);
    }

    #[test]
    fn test_pseudo_embedding_empty_text() {
        let vec = pseudo_embedding("");
        assert_eq!(vec.len(), EMBEDDING_DIMS);
        assert!(vec.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_pseudo_embedding_unicode_text() {
        let vec = pseudo_embedding("Hello 世界 🌍");
        assert_eq!(vec.len(), EMBEDDING_DIMS);
        assert!(vec.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_pseudo_embedding_long_text() {
        let text = "word ".repeat(10_000);
        let vec = pseudo_embedding(&text);
        assert_eq!(vec.len(), EMBEDDING_DIMS);
        assert!(vec.iter().all(|v| v.is_finite()));
    }

    #[tokio::test]
    async fn test_embed_without_endpoint_uses_fallback() {
        let provider = EmbeddingProvider::new(&Settings::default());
        let vec = provider.embed("some query").await;
        assert_eq!(vec, pseudo_embedding("some query"));
    }
}
