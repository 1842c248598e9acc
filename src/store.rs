//! Vector store client.
//!
//! A thin facade over the Qdrant REST API: collection creation, point
//! upsert, and nearest-neighbor search. Availability is decided once at
//! construction and carried as an explicit [`StoreCapability`]: when the
//! store is unreachable, writes become benign no-ops and searches return
//! empty results instead of erroring, so the query path stays alive.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Settings;
use crate::embedding::EMBEDDING_DIMS;
use crate::models::RetrievalHit;

/// Default vector size for new collections.
pub const DEFAULT_VECTOR_SIZE: usize = EMBEDDING_DIMS;

/// Whether the backing vector store can be reached. Resolved once at
/// startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCapability {
    Available,
    Unavailable,
}

impl StoreCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, StoreCapability::Available)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Value,
}

/// Client for a Qdrant-style vector store.
pub struct VectorStore {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    capability: StoreCapability,
}

impl VectorStore {
    /// Connect to the store configured in `settings`, probing it once to
    /// decide availability. An unreachable store yields a degraded client,
    /// not an error.
    pub async fn connect(settings: &Settings) -> Self {
        let mut store = Self::with_capability(settings, StoreCapability::Unavailable);
        store.capability = store.probe().await;
        store
    }

    /// Build a client with a pre-decided capability, skipping the probe.
    pub fn with_capability(settings: &Settings, capability: StoreCapability) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: settings.store_url.trim_end_matches('/').to_string(),
            api_key: settings.store_api_key.clone(),
            capability,
        }
    }

    pub fn capability(&self) -> StoreCapability {
        self.capability
    }

    /// One-shot availability check against `GET /collections`.
    async fn probe(&self) -> StoreCapability {
        let request = self.authorized(self.client.get(format!("{}/collections", self.url)));
        match request.send().await {
            Ok(response) if response.status().is_success() => StoreCapability::Available,
            Ok(response) => {
                tracing::warn!(status = %response.status(), url = %self.url, "vector store probe rejected");
                StoreCapability::Unavailable
            }
            Err(err) => {
                tracing::debug!(error = %err, url = %self.url, "vector store unreachable");
                StoreCapability::Unavailable
            }
        }
    }

    /// Recreate `name` sized for cosine-similarity search. Idempotent: an
    /// existing collection is dropped first. No-op when unavailable.
    pub async fn create_collection(&self, name: &str, vector_size: usize) -> Result<()> {
        if !self.capability.is_available() {
            return Ok(());
        }

        let collection_url = format!("{}/collections/{}", self.url, name);

        // Drop any existing collection; a 404 here is fine.
        let _ = self
            .authorized(self.client.delete(&collection_url))
            .send()
            .await;

        let body = json!({
            "vectors": { "size": vector_size, "distance": "Cosine" }
        });

        let response = self
            .authorized(self.client.put(&collection_url).json(&body))
            .send()
            .await
            .context("create_collection request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("create_collection for '{}' returned {}", name, status);
        }

        Ok(())
    }

    /// Insert or overwrite points keyed by `ids`, pairing each with its
    /// vector and payload. The three slices must be equal length. No-op
    /// when unavailable.
    pub async fn upsert(
        &self,
        collection: &str,
        ids: &[String],
        vectors: &[Vec<f32>],
        payloads: &[Value],
    ) -> Result<()> {
        if ids.len() != vectors.len() || ids.len() != payloads.len() {
            bail!(
                "upsert length mismatch: {} ids, {} vectors, {} payloads",
                ids.len(),
                vectors.len(),
                payloads.len()
            );
        }

        if !self.capability.is_available() {
            return Ok(());
        }

        let points: Vec<Value> = ids
            .iter()
            .zip(vectors)
            .zip(payloads)
            .map(|((id, vector), payload)| {
                json!({ "id": id, "vector": vector, "payload": payload })
            })
            .collect();

        let response = self
            .authorized(
                self.client
                    .put(format!("{}/collections/{}/points", self.url, collection))
                    .json(&json!({ "points": points })),
            )
            .send()
            .await
            .context("upsert request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("upsert into '{}' returned {}", collection, status);
        }

        Ok(())
    }

    /// Nearest neighbors of `vector` in `collection`, best first, up to
    /// `top_k`. Returns an empty vec when the store is unavailable or the
    /// search fails; retrieval quality degrades, the query path does not.
    pub async fn search(&self, collection: &str, vector: &[f32], top_k: usize) -> Vec<RetrievalHit> {
        if !self.capability.is_available() {
            return Vec::new();
        }

        match self.search_points(collection, vector, top_k).await {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!(error = %err, collection, "vector search failed, returning no hits");
                Vec::new()
            }
        }
    }

    async fn search_points(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalHit>> {
        let body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/collections/{}/points/search", self.url, collection))
                    .json(&body),
            )
            .send()
            .await
            .context("search request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("search in '{}' returned {}", collection, status);
        }

        let parsed: SearchResponse = response.json().await.context("malformed search response")?;

        Ok(parsed
            .result
            .into_iter()
            .map(|point| RetrievalHit::Scored {
                score: point.score,
                payload: point.payload,
            })
            .collect())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unavailable_store() -> VectorStore {
        VectorStore::with_capability(&Settings::default(), StoreCapability::Unavailable)
    }

    #[tokio::test]
    async fn test_create_collection_unavailable_is_noop() {
        let store = unavailable_store();
        store.create_collection("logs", DEFAULT_VECTOR_SIZE).await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_unavailable_is_noop() {
        let store = unavailable_store();
        store
            .upsert(
                "logs",
                &["a".to_string()],
                &[vec![0.0; EMBEDDING_DIMS]],
                &[json!({"text": "entry"})],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_unavailable_is_empty() {
        let store = unavailable_store();
        let hits = store.search("logs", &[0.0; EMBEDDING_DIMS], 5).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_length_mismatch_rejected() {
        let store = unavailable_store();
        let err = store
            .upsert(
                "logs",
                &["a".to_string(), "b".to_string()],
                &[vec![0.0; EMBEDDING_DIMS]],
                &[json!({}), json!({})],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn test_url_trailing_slash_trimmed() {
        let settings = Settings {
            store_url: "http://localhost:6333/".to_string(),
            ..Settings::default()
        };
        let store = VectorStore::with_capability(&settings, StoreCapability::Unavailable);
        assert_eq!(store.url, "http://localhost:6333");
    }
}
