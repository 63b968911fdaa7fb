//! Server transports.
//!
//! The MCP bridge is served either over stdio (the default, for clients
//! that spawn the process) or over HTTP, where it is mounted at `/mcp`
//! next to a small JSON API.
//!
//! # HTTP endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `*`    | `/mcp` | MCP Streamable HTTP endpoint |
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call a tool; returns `{ "result": "<text>" }` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing required parameter: query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//! Steam and retrieval failures are not HTTP errors: the tool answers with
//! a message and the call returns 200.
//!
//! # Client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "steam": {
//!       "command": "steam-mcp",
//!       "args": ["--config", "/path/to/steam-mcp.toml", "serve"]
//!     }
//!   }
//! }
//! ```

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::mcp::McpBridge;
use crate::tools::{validate_params, ToolContext, ToolRegistry};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    ctx: Arc<ToolContext>,
    tools: Arc<ToolRegistry>,
}

/// Build the shared tool context and registry from configuration.
pub fn build_state(config: &Config) -> anyhow::Result<(Arc<ToolContext>, Arc<ToolRegistry>)> {
    let ctx = ToolContext::from_config(Arc::new(config.clone()))?;
    Ok((Arc::new(ctx), Arc::new(ToolRegistry::with_builtins())))
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn run_stdio(config: &Config) -> anyhow::Result<()> {
    let (ctx, tools) = build_state(config)?;
    tracing::info!(tools = tools.len(), "serving MCP over stdio");

    let service = McpBridge::new(ctx, tools)
        .serve(rmcp::transport::stdio())
        .await
        .context("MCP stdio handshake failed")?;
    service.waiting().await?;
    Ok(())
}

/// Build the HTTP router: MCP at `/mcp` plus the JSON API.
pub fn router(ctx: Arc<ToolContext>, tools: Arc<ToolRegistry>) -> Router {
    let bridge = McpBridge::new(ctx.clone(), tools.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .with_state(AppState { ctx, tools })
        .nest_service("/mcp", mcp_service)
        .layer(cors)
}

/// Serve MCP (Streamable HTTP) and the JSON API on `bind_addr`.
pub async fn run_http(config: &Config, bind_addr: &str) -> anyhow::Result<()> {
    let (ctx, tools) = build_state(config)?;
    let app = router(ctx, tools);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("MCP server listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /tools/list ============

/// One entry of `GET /tools/list`.
#[derive(Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters_schema(),
        })
        .collect();
    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Returns `404` for an unknown tool and `400` for parameter errors,
/// including values the schema cannot express (a negative `app_id`).
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let params = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| bad_request(e.to_string()))?;

    tracing::info!(tool = %name, "http tool call");
    let result = tool
        .execute(params, &state.ctx)
        .await
        .map_err(|e| bad_request(format!("{}: {}", name, e)))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
