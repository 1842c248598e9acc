//! Query orchestration: retrieve context, assemble a prompt, generate an
//! answer.
//!
//! The pipeline runs one step at a time (embed, then search, then generate)
//! with one attempt per network call and no retries. Every collaborator failure is
//! absorbed into a deterministic fallback, so [`Orchestrator::answer`]
//! always returns a non-empty string and never an error: backends going
//! away degrades answer quality, not availability.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::embedding::EmbeddingProvider;
use crate::models::RetrievalHit;
use crate::store::{StoreCapability, VectorStore};

/// Collection searched when none is chosen explicitly.
pub const DEFAULT_COLLECTION: &str = "log_entries";

/// Context documents retrieved per query when none is chosen explicitly.
pub const DEFAULT_TOP_K: usize = 3;

/// Separator between stringified hit payloads in the assembled prompt.
const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Prefix of the fallback answer produced when no generation endpoint
/// responds.
const PLACEHOLDER_PREFIX: &str = "[LLM placeholder] Based on retrieved context: ";

/// How much of the prompt the fallback answer echoes back.
const PLACEHOLDER_PROMPT_CHARS: usize = 200;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Composes the embedding provider and the vector store into the full
/// retrieval-augmented answer path. Read-only after construction; safe to
/// reuse across sequential queries.
pub struct Orchestrator {
    embedder: EmbeddingProvider,
    store: VectorStore,
    collection: String,
    top_k: usize,
    client: reqwest::Client,
    llm_endpoint: Option<String>,
    llm_api_key: Option<String>,
}

impl Orchestrator {
    /// Build an orchestrator around an existing store client.
    pub fn new(settings: &Settings, store: VectorStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            embedder: EmbeddingProvider::new(settings),
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            top_k: DEFAULT_TOP_K,
            client,
            llm_endpoint: settings.llm_endpoint.clone(),
            llm_api_key: settings.llm_api_key.clone(),
        }
    }

    /// Build an orchestrator, probing the configured store for availability.
    pub async fn connect(settings: &Settings) -> Self {
        let store = VectorStore::connect(settings).await;
        Self::new(settings, store)
    }

    /// Target a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Retrieve a different number of context documents per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn store_capability(&self) -> StoreCapability {
        self.store.capability()
    }

    /// Embed `query` and return its nearest neighbors from the configured
    /// collection, best first. Zero hits is a valid outcome, not an error.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievalHit> {
        let vector = self.embedder.embed(query).await;
        self.store.search(&self.collection, &vector, top_k).await
    }

    /// Send `prompt` to the generation endpoint and return its `text`
    /// reply. On missing configuration or any request failure the
    /// deterministic placeholder is returned instead; this never fails.
    pub async fn call_llm(&self, prompt: &str) -> String {
        if let Some(endpoint) = &self.llm_endpoint {
            match self.generate_remote(endpoint, prompt).await {
                Ok(text) => return text,
                Err(err) => {
                    tracing::warn!(error = %err, "generation failed, using placeholder answer");
                }
            }
        } else {
            tracing::debug!("no LLM endpoint configured, using placeholder answer");
        }

        placeholder_answer(prompt)
    }

    /// Answer `query`: retrieve context, assemble the prompt, generate.
    pub async fn answer(&self, query: &str) -> String {
        let hits = self.retrieve(query, self.top_k).await;
        tracing::debug!(hits = hits.len(), collection = %self.collection, "retrieved context");

        let prompt = assemble_prompt(query, &hits);
        self.call_llm(&prompt).await
    }

    /// One attempt against `POST {endpoint}/api/generate`.
    async fn generate_remote(&self, endpoint: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", endpoint.trim_end_matches('/'));

        let mut request = self.client.post(&url).json(&GenerateRequest { prompt });
        if let Some(key) = &self.llm_api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.context("generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("generation service returned {}", status);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("malformed generation response")?;

        Ok(parsed.text)
    }
}

/// Concatenate the literal query and the stringified payload of every hit.
fn assemble_prompt(query: &str, hits: &[RetrievalHit]) -> String {
    let contexts: Vec<String> = hits.iter().map(|hit| hit.payload_text()).collect();

    format!(
        "User query:\n{}\n\nRetrieved context:\n{}",
        query,
        contexts.join(CONTEXT_SEPARATOR)
    )
}

/// The deterministic answer used when no generation endpoint responds:
/// a fixed prefix plus the first [`PLACEHOLDER_PROMPT_CHARS`] characters
/// of the prompt. Counts chars, not bytes, so multi-byte text never splits.
fn placeholder_answer(prompt: &str) -> String {
    let truncated: String = prompt.chars().take(PLACEHOLDER_PROMPT_CHARS).collect();
    format!("{}{}", PLACEHOLDER_PREFIX, truncated)
}
