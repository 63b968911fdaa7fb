//! # Steam MCP
//!
//! An MCP tool server for a Steam user's library, achievements, and
//! Steam Community guides.
//!
//! Guides can be very long. `fetch_steam_guide` returns a short guide whole,
//! and answers a long one with only the sections nearest to the caller's
//! query, found by embedding every section and searching an in-memory index
//! (see [`steam_mcp_core::Retriever`]).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Steam Web API│   │  Community   │──▶│ guide extraction │
//! │  (api)       │   │  (community) │   │  → Document      │
//! └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘
//!        │                  │                    ▼
//!        │                  │           ┌──────────────────┐
//!        │                  │           │ Retriever (core) │
//!        │                  │           │ embed + flat L2  │
//!        ▼                  ▼           └────────┬─────────┘
//!      ┌──────────────────────────────────────────┴──┐
//!      │                ToolRegistry                 │
//!      └──────┬───────────────────┬──────────────────┘
//!             ▼                   ▼
//!      ┌─────────────┐     ┌──────────────┐
//!      │ MCP (stdio) │     │ HTTP (/mcp,  │
//!      │             │     │ /tools/...)  │
//!      └─────────────┘     └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`embedding`] | Embedding providers (local, Ollama, OpenAI) |
//! | [`steam`] | Steam Web API and Community clients, guide extraction |
//! | [`tools`] | Tool trait, built-in tools, registry |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | stdio and HTTP transports |

pub mod config;
pub mod embedding;
pub mod mcp;
pub mod server;
pub mod steam;
pub mod tools;
