//! TOML configuration parsing and validation.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below. Steam credentials can also come from the environment
//! (`API_KEY`, `STEAM_ID`), which takes precedence over the file.
//!
//! ```toml
//! [steam]
//! api_key = "..."
//! steam_id = "76561198000000000"
//!
//! [retrieval]
//! size_threshold = 20000
//! top_k = 5
//! index_backend = "flat"
//!
//! [embedding]
//! provider = "local"
//! model = "all-minilm-l6-v2"
//!
//! [server]
//! transport = "stdio"
//! bind = "127.0.0.1:8099"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use steam_mcp_core::retrieval::{RetrievalParams, DEFAULT_SIZE_THRESHOLD, DEFAULT_TOP_K};

/// Environment variable holding the Steam Web API key.
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable holding the 64-bit Steam ID of the user.
pub const STEAM_ID_ENV: &str = "STEAM_ID";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub steam: SteamConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SteamConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub steam_id: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_community_base")]
    pub community_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_guide_search_limit")]
    pub guide_search_limit: usize,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            steam_id: None,
            api_base: default_api_base(),
            community_base: default_community_base(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            guide_search_limit: default_guide_search_limit(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.steampowered.com".to_string()
}
fn default_community_base() -> String {
    "https://steamcommunity.com".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}
fn default_guide_search_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_size_threshold")]
    pub size_threshold: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_index_backend")]
    pub index_backend: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            size_threshold: default_size_threshold(),
            top_k: default_top_k(),
            index_backend: default_index_backend(),
        }
    }
}

fn default_size_threshold() -> usize {
    DEFAULT_SIZE_THRESHOLD
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_index_backend() -> String {
    "flat".to_string()
}

impl RetrievalConfig {
    pub fn params(&self) -> RetrievalParams {
        RetrievalParams {
            size_threshold: self.size_threshold,
            top_k: self.top_k,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_remote(&self) -> bool {
        matches!(self.provider.as_str(), "openai" | "ollama")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_transport")]
    pub transport: String,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            bind: default_bind(),
        }
    }
}

fn default_transport() -> String {
    "stdio".to_string()
}
fn default_bind() -> String {
    "127.0.0.1:8099".to_string()
}

impl Config {
    /// Overlay credentials from the environment.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.steam.api_key = Some(key);
        }
        if let Some(id) = lookup(STEAM_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.steam.steam_id = Some(id);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.size_threshold == 0 {
            bail!("retrieval.size_threshold must be > 0");
        }
        if self.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be > 0");
        }
        match self.retrieval.index_backend.as_str() {
            "flat" | "none" => {}
            other => bail!(
                "Unknown retrieval.index_backend: '{}'. Must be flat or none.",
                other
            ),
        }

        if self.steam.guide_search_limit == 0 {
            bail!("steam.guide_search_limit must be > 0");
        }

        match self.embedding.provider.as_str() {
            "disabled" | "local" | "openai" | "ollama" => {}
            other => bail!(
                "Unknown embedding provider: '{}'. Must be disabled, local, openai, or ollama.",
                other
            ),
        }
        if self.embedding.is_remote() {
            if self.embedding.dims.is_none() || self.embedding.dims == Some(0) {
                bail!(
                    "embedding.dims must be > 0 when provider is '{}'",
                    self.embedding.provider
                );
            }
            if self.embedding.model.is_none() {
                bail!(
                    "embedding.model must be specified when provider is '{}'",
                    self.embedding.provider
                );
            }
        }
        if self.embedding.batch_size == 0 {
            bail!("embedding.batch_size must be > 0");
        }

        match self.server.transport.as_str() {
            "stdio" | "http" => {}
            other => bail!(
                "Unknown server.transport: '{}'. Must be stdio or http.",
                other
            ),
        }

        Ok(())
    }
}

/// Parse a TOML config file without consulting the environment.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path` (or defaults when `None`), then overlay
/// `API_KEY` / `STEAM_ID` from the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            parse_config(&content)?
        }
        None => Config::default(),
    };
    config.apply_env(|name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}
