//! # Steam MCP Core
//!
//! Runtime-agnostic logic for Steam MCP: the guide data model, the
//! embedding provider trait, the vector index abstraction, and the
//! section retrieval orchestrator used for long community guides.
//!
//! This crate contains no tokio, HTTP, or filesystem dependencies.
//! Concrete embedding providers and the Steam clients live in the
//! `steam-mcp` app crate.
//!
//! ## Retrieval at a glance
//!
//! ```text
//! Document ──▶ size check ──▶ Full(text)
//!                  │
//!                  └──▶ embed sections ──▶ build index ──▶ embed query ──▶ k-NN ──▶ Ranked
//! ```

pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod retrieval;

pub use error::RetrievalError;
pub use models::{Document, RankedSection, Retrieval, Section};
pub use retrieval::{RetrievalParams, Retriever};
