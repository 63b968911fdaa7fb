//! Steam collaborators: the Web API, Community pages, and guide extraction.
//!
//! A single [`SteamClient`] owns the HTTP client used for both hosts. Its
//! cookie jar is seeded so Community pages skip the mature-content
//! interstitial.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`api`] | Owned games, recent games, achievements (Web API, needs a key) |
//! | [`community`] | Guide listing search and guide page download |
//! | [`guide`] | Turns a guide page into a `Document` of sections |

pub mod api;
pub mod community;
pub mod guide;

use anyhow::{Context, Result};
use reqwest::cookie::Jar;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SteamConfig;

/// Cookies that make the Community site treat the session as age-verified.
pub const AGE_GATE_COOKIES: [(&str, &str); 3] = [
    ("wants_mature_content", "1"),
    ("lastagecheckage", "1"),
    ("birthtime", "1"),
];

/// HTTP client for the Steam Web API and Community site.
#[derive(Clone)]
pub struct SteamClient {
    config: SteamConfig,
    http: reqwest::Client,
}

impl SteamClient {
    pub fn new(config: SteamConfig) -> Result<Self> {
        let community = Url::parse(&config.community_base)
            .with_context(|| format!("Invalid steam.community_base: {}", config.community_base))?;

        let jar = Jar::default();
        for (name, value) in AGE_GATE_COOKIES {
            jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &community);
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_provider(Arc::new(jar))
            .build()
            .context("Failed to build Steam HTTP client")?;

        Ok(Self { config, http })
    }

    /// `(api_key, steam_id)` when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.config.api_key, &self.config.steam_id) {
            (Some(key), Some(id)) => Some((key.as_str(), id.as_str())),
            _ => None,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn community_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.community_base.trim_end_matches('/'),
            path
        )
    }
}
