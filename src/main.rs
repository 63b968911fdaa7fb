//! # Steam MCP CLI (`steam-mcp`)
//!
//! Runs the MCP tool server and lets you call its tools from a shell.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `steam-mcp serve` | Serve MCP over stdio (or HTTP with `--transport http`) |
//! | `steam-mcp tools` | List the available tools |
//! | `steam-mcp call <tool> --param k=v` | Run one tool and print its answer |
//! | `steam-mcp guide <id> --query Q` | Fetch a guide through the retrieval path |
//!
//! ## Examples
//!
//! ```bash
//! # MCP over stdio, credentials from the environment
//! API_KEY=... STEAM_ID=... steam-mcp serve
//!
//! # HTTP transport on a custom port
//! steam-mcp --config ./steam-mcp.toml serve --transport http --bind 0.0.0.0:8099
//!
//! # One-off tool call
//! steam-mcp call search_steam_guides --param app_id=620 --param query="portal gun"
//!
//! # Long guide, three best sections
//! steam-mcp guide 123456789 --query "final boss" --top-k 3
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to adjust (default `steam_mcp=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use steam_mcp::{config, server, tools};

#[derive(Parser)]
#[command(
    name = "steam-mcp",
    about = "Steam MCP: games, achievements, and community guides as MCP tools",
    version,
    long_about = "Steam MCP exposes a Steam user's library and achievements, plus Steam Community \
    guide search and retrieval, as tools over the Model Context Protocol. Long guides are \
    searched section by section with local embeddings instead of being returned whole."
)]
struct Cli {
    /// Path to a configuration file (TOML).
    ///
    /// Optional. Without it, defaults are used and Steam credentials come
    /// from `API_KEY` / `STEAM_ID`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server.
    Serve {
        /// Transport override: `stdio` or `http`.
        #[arg(long)]
        transport: Option<String>,

        /// Bind address override for the HTTP transport.
        #[arg(long)]
        bind: Option<String>,
    },

    /// List the available tools and their parameters.
    Tools,

    /// Call a tool once and print its answer.
    Call {
        /// Tool name, as listed by `steam-mcp tools`.
        tool: String,

        /// Tool parameters as `key=value` pairs.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Fetch a Steam guide, searching it when it is long.
    Guide {
        /// The Steam guide ID.
        guide_id: String,

        /// What to look for in a long guide.
        #[arg(long, default_value = "")]
        query: String,

        /// Number of sections to return for long guides.
        #[arg(long)]
        top_k: Option<usize>,

        /// Character count above which the guide is searched.
        #[arg(long)]
        size_threshold: Option<usize>,
    },
}

/// Parse a `key=value` pair for `--param` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "steam_mcp=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { transport, bind } => {
            if let Some(transport) = transport {
                cfg.server.transport = transport;
            }
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            cfg.validate()?;

            match cfg.server.transport.as_str() {
                "http" => {
                    let bind = cfg.server.bind.clone();
                    server::run_http(&cfg, &bind).await?;
                }
                _ => server::run_stdio(&cfg).await?,
            }
        }
        Commands::Tools => {
            let registry = tools::ToolRegistry::with_builtins();
            for tool in registry.tools() {
                println!("{}", tool.name());
                println!("  {}", tool.description());
                println!(
                    "  parameters: {}",
                    serde_json::to_string(&tool.parameters_schema())?
                );
            }
        }
        Commands::Call { tool, params } => {
            let ctx = tools::ToolContext::from_config(Arc::new(cfg))?;
            let registry = tools::ToolRegistry::with_builtins();
            let schema = registry
                .find(&tool)
                .map(|t| t.parameters_schema())
                .unwrap_or_else(|| serde_json::json!({}));
            let params = tools::params_from_pairs(&schema, &params);
            println!("{}", registry.call(&tool, params, &ctx).await?);
        }
        Commands::Guide {
            guide_id,
            query,
            top_k,
            size_threshold,
        } => {
            let ctx = tools::ToolContext::from_config(Arc::new(cfg))?;
            let registry = tools::ToolRegistry::with_builtins();
            let mut params = serde_json::json!({ "guide_id": guide_id, "query": query });
            if let Some(k) = top_k {
                params["top_k"] = k.into();
            }
            if let Some(threshold) = size_threshold {
                params["size_threshold"] = threshold.into();
            }
            println!("{}", registry.call("fetch_steam_guide", params, &ctx).await?);
        }
    }

    Ok(())
}
