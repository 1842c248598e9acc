//! # Ragline
//!
//! A minimal retrieval-augmented generation layer over a Qdrant vector store.
//!
//! Given a natural-language query, ragline embeds it, searches a vector
//! store for similar documents, assembles a prompt from the retrieved
//! context, and forwards it to a text-generation endpoint. Every external
//! dependency is optional at runtime: a missing or failing embedding
//! service, vector store, or generation endpoint degrades to a
//! deterministic fallback instead of an error, so a query always yields an
//! answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌───────────┐   ┌──────────────┐   ┌────────────┐
//! │  query  │──▶│ Embedding │──▶│ VectorStore  │──▶│ Orchestr.  │──▶ answer
//! │  (CLI)  │   │ Provider  │   │ (Qdrant API) │   │ + LLM call │
//! └─────────┘   └───────────┘   └──────────────┘   └────────────┘
//!                     │                │                  │
//!                  fallback:        fallback:          fallback:
//!                  seeded normal    empty hits         placeholder
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Environment-resolved settings |
//! | [`models`] | Retrieval hit data type |
//! | [`embedding`] | Remote embeddings with a deterministic fallback |
//! | [`store`] | Qdrant REST client with degraded no-op mode |
//! | [`orchestrator`] | retrieve → assemble → generate pipeline |

pub mod config;
pub mod embedding;
pub mod models;
pub mod orchestrator;
pub mod store;
