//! The tool surface: the [`Tool`] trait, its shared [`ToolContext`], and
//! the built-in Steam tools.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ToolRegistry                  │
//! │  get_owned_games    get_recently_played_games│
//! │  get_game_achievements                       │
//! │  search_steam_guides   fetch_steam_guide     │
//! └──────────────┬───────────────────────────────┘
//!                ▼
//!     MCP (stdio / streamable HTTP) · HTTP API · CLI
//! ```
//!
//! Every tool answers with text. Steam and retrieval failures become
//! human-readable messages here, so a transport only ever sees `Err` for
//! malformed parameters.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use steam_mcp_core::index::FlatL2Backend;
use steam_mcp_core::Retriever;

use crate::config::Config;
use crate::embedding::create_provider;
use crate::steam::{guide, SteamClient};

/// A named operation exposed to MCP clients.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used in `tools/call` and `POST /tools/{name}`.
    fn name(&self) -> &str;

    /// One-paragraph description shown to agents.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. `params` has already passed [`validate_params`].
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String>;
}

/// Shared collaborators handed to every tool call.
///
/// Built once per process. The retriever holds the single embedding
/// provider, so the model is loaded at most once however many calls run.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<Config>,
    pub steam: SteamClient,
    pub retriever: Retriever,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, steam: SteamClient, retriever: Retriever) -> Self {
        Self {
            config,
            steam,
            retriever,
        }
    }

    /// Wire the Steam client, embedding provider, and index backend from
    /// configuration. Does not load any model.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let steam = SteamClient::new(config.steam.clone())?;
        let provider = create_provider(&config.embedding)?;
        let mut retriever = Retriever::new(provider, config.retrieval.params());
        if config.retrieval.index_backend != "none" {
            retriever = retriever.with_index_backend(Arc::new(FlatL2Backend));
        }
        tracing::debug!(
            provider = %config.embedding.provider,
            backend = %config.retrieval.index_backend,
            "tool context ready"
        );
        Ok(Self::new(config, steam, retriever))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter handling
// ═══════════════════════════════════════════════════════════════════════

/// Check `params` against a tool's schema: required fields present and
/// primitive types matching. Returns the parameters as an object.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => bail!("parameters must be an object, got {}", json_type_name(other)),
    };

    let required = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>())
        .unwrap_or_default();
    for field in required {
        if !params_obj.contains_key(field) {
            bail!("missing required parameter: {}", field);
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, prop_schema) in properties {
            let (Some(value), Some(expected)) = (
                params_obj.get(name),
                prop_schema.get("type").and_then(|t| t.as_str()),
            ) else {
                continue;
            };
            let type_ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                _ => true,
            };
            if !type_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    name,
                    expected,
                    json_type_name(value)
                );
            }
        }
    }

    Ok(Value::Object(params_obj))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build a parameter object from `key=value` strings.
///
/// Values for `string` properties are kept verbatim; anything else is
/// parsed as JSON first and falls back to a string.
pub fn params_from_pairs(schema: &Value, pairs: &[(String, String)]) -> Value {
    let mut map = serde_json::Map::new();
    for (key, raw) in pairs {
        let is_string = schema
            .get("properties")
            .and_then(|p| p.get(key))
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str())
            == Some("string");
        let value = if is_string {
            Value::String(raw.clone())
        } else {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        };
        map.insert(key.clone(), value);
    }
    Value::Object(map)
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .with_context(|| format!("missing required parameter: {}", name))
}

fn u64_param(params: &Value, name: &str) -> Result<u64> {
    params
        .get(name)
        .and_then(|v| v.as_u64())
        .with_context(|| format!("parameter '{}' must be a non-negative integer", name))
}

fn optional_usize(params: &Value, name: &str) -> Result<Option<usize>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .with_context(|| format!("parameter '{}' must be a non-negative integer", name)),
    }
}

/// Turn a Steam failure into the tool's answer.
fn failure_text(tool: &str, prefix: String, err: anyhow::Error) -> String {
    tracing::warn!(tool, error = %format!("{:#}", err), "tool call failed");
    format!("{}: {:#}", prefix, err)
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in tools
// ═══════════════════════════════════════════════════════════════════════

pub struct OwnedGamesTool;

#[async_trait]
impl Tool for OwnedGamesTool {
    fn name(&self) -> &str {
        "get_owned_games"
    }

    fn description(&self) -> &str {
        "Retrieve a formatted list of all games owned by the configured Steam user, with AppIDs and playtimes."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<String> {
        Ok(match ctx.steam.owned_games().await {
            Ok(text) => text,
            Err(e) => failure_text(self.name(), "Error fetching owned games".into(), e),
        })
    }
}

pub struct RecentGamesTool;

#[async_trait]
impl Tool for RecentGamesTool {
    fn name(&self) -> &str {
        "get_recently_played_games"
    }

    fn description(&self) -> &str {
        "Fetch the games the configured Steam user has played in the past two weeks."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<String> {
        Ok(match ctx.steam.recently_played_games().await {
            Ok(text) => text,
            Err(e) => failure_text(self.name(), "Error fetching recent games".into(), e),
        })
    }
}

pub struct AchievementsTool;

#[async_trait]
impl Tool for AchievementsTool {
    fn name(&self) -> &str {
        "get_game_achievements"
    }

    fn description(&self) -> &str {
        "Retrieve achievements for a Steam game, including the user's unlock status and global unlock rates."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "app_id": { "type": "integer", "description": "The AppID of the game" }
            },
            "required": ["app_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let app_id = u64_param(&params, "app_id")?;
        Ok(match ctx.steam.game_achievements(app_id).await {
            Ok(text) => text,
            Err(e) => failure_text(
                self.name(),
                format!("Error fetching achievements for AppID {}", app_id),
                e,
            ),
        })
    }
}

pub struct SearchGuidesTool;

#[async_trait]
impl Tool for SearchGuidesTool {
    fn name(&self) -> &str {
        "search_steam_guides"
    }

    fn description(&self) -> &str {
        "Search top-rated Steam Community guides for a game. Each result carries the guide ID used by fetch_steam_guide."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "app_id": { "type": "integer", "description": "The game's AppID" },
                "query": { "type": "string", "description": "Keywords to filter guides" }
            },
            "required": ["app_id", "query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let app_id = u64_param(&params, "app_id")?;
        let query = str_param(&params, "query")?;
        Ok(match ctx.steam.search_guides(app_id, query).await {
            Ok(text) => text,
            Err(e) => failure_text(
                self.name(),
                format!("Error searching guides for '{}' (AppID {})", query, app_id),
                e,
            ),
        })
    }
}

pub struct FetchGuideTool;

#[async_trait]
impl Tool for FetchGuideTool {
    fn name(&self) -> &str {
        "fetch_steam_guide"
    }

    fn description(&self) -> &str {
        "Fetch a Steam Community guide. Short guides are returned whole; long guides return only the sections most relevant to the query, each with its distance score."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "guide_id": { "type": "string", "description": "The Steam guide ID" },
                "query": { "type": "string", "description": "What to look for in a long guide" },
                "top_k": { "type": "integer", "description": "Sections to return for long guides" },
                "size_threshold": { "type": "integer", "description": "Characters above which the guide is searched instead of returned whole" }
            },
            "required": ["guide_id", "query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let guide_id = str_param(&params, "guide_id")?;
        let query = str_param(&params, "query")?;
        let retrieval_params = ctx.retriever.params().with_overrides(
            optional_usize(&params, "size_threshold")?,
            optional_usize(&params, "top_k")?,
        );

        let html = match ctx.steam.fetch_guide_page(guide_id).await {
            Ok(html) => html,
            Err(e) => return Ok(failure_text(self.name(), "Error fetching guide".into(), e)),
        };
        let Some(document) = guide::extract_document(&html) else {
            return Ok(format!("Info: No subsections found for guide ID {}.", guide_id));
        };

        match ctx
            .retriever
            .retrieve_with(&document, query, retrieval_params)
            .await
        {
            Ok(result) => {
                tracing::debug!(
                    guide_id,
                    sections = document.len(),
                    full = result.is_full(),
                    "guide retrieved"
                );
                Ok(result.render())
            }
            Err(e) => {
                tracing::warn!(tool = self.name(), guide_id, error = %e, "guide retrieval failed");
                Ok(e.user_message())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered collection of tools, looked up by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// A registry holding the five Steam tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(OwnedGamesTool));
        registry.register(Box::new(RecentGamesTool));
        registry.register(Box::new(AchievementsTool));
        registry.register(Box::new(SearchGuidesTool));
        registry.register(Box::new(FetchGuideTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Validate `params` against the named tool's schema and run it.
    pub async fn call(&self, name: &str, params: Value, ctx: &ToolContext) -> Result<String> {
        let tool = self
            .find(name)
            .with_context(|| format!("unknown tool: {}", name))?;
        let params = validate_params(&tool.parameters_schema(), &params)?;
        tool.execute(params, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
