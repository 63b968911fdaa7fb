//! Embedding provider implementations.
//!
//! Implements the core [`EmbeddingProvider`] trait for:
//! - **[`DisabledProvider`]**: always reports the model as unavailable.
//! - **[`LocalProvider`]**: runs a sentence-embedding model in-process via
//!   fastembed (primary) or tract (musl/Intel Mac). The default, and what the
//!   guide search uses out of the box (`all-minilm-l6-v2`).
//! - **[`OllamaProvider`]**: calls a local Ollama instance's `/api/embed` endpoint.
//! - **[`OpenAIProvider`]**: calls the OpenAI embeddings API.
//!
//! # Model lifecycle
//!
//! The server creates exactly one provider at startup with
//! [`create_provider`] and hands the same `Arc` to every tool call. The
//! local provider loads its weights lazily on the first `embed` call through
//! a [`LazyModel`]. Concurrent first calls wait on a single load, and the
//! loaded model is reused read-only until process exit. A failed load leaves
//! the holder empty and is reported as [`RetrievalError::ModelUnavailable`].
//! The next call tries again.
//!
//! # Retry Strategy
//!
//! The OpenAI and Ollama providers use exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

#[cfg(feature = "local-embeddings-tract")]
mod local_tract;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use steam_mcp_core::embedding::EmbeddingProvider;
use steam_mcp_core::error::{Result as RetrievalResult, RetrievalError};

use crate::config::EmbeddingConfig;

/// Model used when `embedding.model` is not set.
pub const DEFAULT_LOCAL_MODEL: &str = "all-minilm-l6-v2";

fn unavailable(err: impl std::fmt::Display) -> RetrievalError {
    RetrievalError::ModelUnavailable(err.to_string())
}

// ============ Disabled Provider ============

/// A provider that refuses to embed.
///
/// Used when `embedding.provider = "disabled"`. Short guides are still
/// returned whole; long guides report that search could not run.
pub struct DisabledProvider;

#[async_trait]
impl EmbeddingProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }
    fn dims(&self) -> usize {
        0
    }
    async fn embed(&self, _texts: &[String]) -> RetrievalResult<Vec<Vec<f32>>> {
        Err(RetrievalError::ModelUnavailable(
            "embedding provider is disabled".to_string(),
        ))
    }
}

// ============ Remote providers (shared HTTP plumbing) ============

/// POST `body` to `url`, retrying rate limits, server errors, and network
/// failures with exponential backoff.
async fn post_with_retry(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    max_retries: u32,
    label: &str,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tracing::debug!(attempt, ?delay, "{} embedding retry", label);
            tokio::time::sleep(delay).await;
        }

        let mut req = client.post(url).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        match req.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response.json().await?);
                }

                let body_text = response.text().await.unwrap_or_default();
                if status.as_u16() == 429 || status.is_server_error() {
                    last_err = Some(anyhow!("{} API error {}: {}", label, status, body_text));
                    continue;
                }
                bail!("{} API error {}: {}", label, status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow!("{} connection error ({}): {}", label, url, e));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{} embedding failed after retries", label)))
}

/// Read an array of float arrays from `json[key]`, optionally descending
/// into `inner` for each element (OpenAI wraps vectors in objects).
fn parse_vectors(
    json: &serde_json::Value,
    key: &str,
    inner: Option<&str>,
) -> Result<Vec<Vec<f32>>> {
    let items = json
        .get(key)
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow!("Invalid embedding response: missing '{}' array", key))?;

    items
        .iter()
        .map(|item| {
            let values = match inner {
                Some(field) => item.get(field),
                None => Some(item),
            }
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow!("Invalid embedding response: embedding is not an array"))?;
            values
                .iter()
                .map(|v| {
                    v.as_f64().map(|x| x as f32).ok_or_else(|| {
                        anyhow!("Invalid embedding response: non-numeric value {}", v)
                    })
                })
                .collect()
        })
        .collect()
}

/// Reject a response whose vectors do not match the configured `embedding.dims`.
fn check_dims(vectors: Vec<Vec<f32>>, dims: usize) -> RetrievalResult<Vec<Vec<f32>>> {
    if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
        return Err(RetrievalError::DimensionMismatch {
            expected: dims,
            found: bad.len(),
        });
    }
    Ok(vectors)
}

fn http_client(config: &EmbeddingConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

// ============ OpenAI Provider ============

/// Embedding provider using the OpenAI API.
///
/// Requires the `OPENAI_API_KEY` environment variable.
pub struct OpenAIProvider {
    model: String,
    dims: usize,
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for OpenAI provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow!("embedding.dims required for OpenAI provider"))?;
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            model,
            dims,
            api_key,
            max_retries: config.max_retries,
            client: http_client(config)?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
    async fn embed(&self, texts: &[String]) -> RetrievalResult<Vec<Vec<f32>>> {
        let body = serde_json::json!({ "model": self.model, "input": texts });
        let json = post_with_retry(
            &self.client,
            "https://api.openai.com/v1/embeddings",
            Some(&self.api_key),
            &body,
            self.max_retries,
            "OpenAI",
        )
        .await
        .map_err(unavailable)?;
        let vectors = parse_vectors(&json, "data", Some("embedding")).map_err(unavailable)?;
        check_dims(vectors, self.dims)
    }
}

// ============ Ollama Provider ============

/// Embedding provider using a local Ollama instance.
///
/// Calls `POST /api/embed` on the configured URL (default `http://localhost:11434`).
pub struct OllamaProvider {
    model: String,
    dims: usize,
    url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for Ollama provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow!("embedding.dims required for Ollama provider"))?;
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(Self {
            model,
            dims,
            url,
            max_retries: config.max_retries,
            client: http_client(config)?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
    async fn embed(&self, texts: &[String]) -> RetrievalResult<Vec<Vec<f32>>> {
        let body = serde_json::json!({ "model": self.model, "input": texts });
        let json = post_with_retry(
            &self.client,
            &format!("{}/api/embed", self.url.trim_end_matches('/')),
            None,
            &body,
            self.max_retries,
            "Ollama",
        )
        .await
        .map_err(unavailable)?;
        let vectors = parse_vectors(&json, "embeddings", None).map_err(unavailable)?;
        check_dims(vectors, self.dims)
    }
}

// ============ Lazy model holder ============

type Loader<M> = Arc<dyn Fn() -> Result<M> + Send + Sync>;

/// A model loaded at most once per process, on first use.
///
/// The loader runs on the blocking pool. Concurrent first callers wait on
/// the same load; a failed load leaves the holder empty so the next caller
/// runs the loader again.
#[cfg_attr(
    not(any(
        feature = "local-embeddings-fastembed",
        feature = "local-embeddings-tract"
    )),
    allow(dead_code)
)]
pub struct LazyModel<M> {
    cell: tokio::sync::OnceCell<Arc<M>>,
    loader: Loader<M>,
}

#[cfg_attr(
    not(any(
        feature = "local-embeddings-fastembed",
        feature = "local-embeddings-tract"
    )),
    allow(dead_code)
)]
impl<M: Send + Sync + 'static> LazyModel<M> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<M> + Send + Sync + 'static,
    {
        Self {
            cell: tokio::sync::OnceCell::new(),
            loader: Arc::new(loader),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// The loaded model, loading it first if no call has succeeded yet.
    pub async fn get(&self) -> RetrievalResult<Arc<M>> {
        let model = self
            .cell
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let loaded = tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(unavailable)?
                    .map_err(unavailable)?;
                Ok::<_, RetrievalError>(Arc::new(loaded))
            })
            .await?;
        Ok(Arc::clone(model))
    }
}

// ============ Local Provider (fastembed or tract) ============

#[cfg(feature = "local-embeddings-fastembed")]
type LoadedModel = std::sync::Mutex<fastembed::TextEmbedding>;

#[cfg(all(
    feature = "local-embeddings-tract",
    not(feature = "local-embeddings-fastembed")
))]
type LoadedModel = local_tract::TractModel;

/// In-process sentence-embedding provider.
///
/// Weights are downloaded from Hugging Face on first load and cached; after
/// that, embedding runs offline. Inference happens on the blocking pool.
#[cfg(any(
    feature = "local-embeddings-fastembed",
    feature = "local-embeddings-tract"
))]
pub struct LocalProvider {
    model_name: String,
    dims: usize,
    batch_size: usize,
    model: LazyModel<LoadedModel>,
}

#[cfg(any(
    feature = "local-embeddings-fastembed",
    feature = "local-embeddings-tract"
))]
impl LocalProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let (model_name, dims) = resolve_local_model(config)?;
        let name = model_name.clone();
        Ok(Self {
            model_name,
            dims,
            batch_size: config.batch_size,
            model: LazyModel::new(move || {
                tracing::info!(model = %name, "loading local embedding model");
                load_local_model(&name)
            }),
        })
    }

    /// Whether the model has been loaded in this process.
    pub fn is_loaded(&self) -> bool {
        self.model.is_loaded()
    }
}

#[cfg(any(
    feature = "local-embeddings-fastembed",
    feature = "local-embeddings-tract"
))]
#[async_trait]
impl EmbeddingProvider for LocalProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }
    fn dims(&self) -> usize {
        self.dims
    }
    async fn embed(&self, texts: &[String]) -> RetrievalResult<Vec<Vec<f32>>> {
        let model = self.model.get().await?;
        let texts = texts.to_vec();
        let batch_size = self.batch_size;
        tokio::task::spawn_blocking(move || run_local_model(&model, texts, batch_size))
            .await
            .map_err(unavailable)?
            .map_err(unavailable)
    }
}

#[cfg(any(
    feature = "local-embeddings-fastembed",
    feature = "local-embeddings-tract"
))]
fn resolve_local_model(config: &EmbeddingConfig) -> Result<(String, usize)> {
    let model_name = config
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string());

    let dims = config.dims.unwrap_or(match model_name.as_str() {
        "all-minilm-l6-v2" => 384,
        "bge-small-en-v1.5" => 384,
        "bge-base-en-v1.5" => 768,
        "bge-large-en-v1.5" => 1024,
        "nomic-embed-text-v1" | "nomic-embed-text-v1.5" => 768,
        "multilingual-e5-small" => 384,
        "multilingual-e5-base" => 768,
        "multilingual-e5-large" => 1024,
        _ => 384,
    });

    Ok((model_name, dims))
}

#[cfg(feature = "local-embeddings-fastembed")]
fn config_to_fastembed_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        "nomic-embed-text-v1" => Ok(fastembed::EmbeddingModel::NomicEmbedTextV1),
        "nomic-embed-text-v1.5" => Ok(fastembed::EmbeddingModel::NomicEmbedTextV15),
        "multilingual-e5-small" => Ok(fastembed::EmbeddingModel::MultilingualE5Small),
        "multilingual-e5-base" => Ok(fastembed::EmbeddingModel::MultilingualE5Base),
        "multilingual-e5-large" => Ok(fastembed::EmbeddingModel::MultilingualE5Large),
        other => bail!(
            "Unknown local embedding model: '{}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5, \
             nomic-embed-text-v1, nomic-embed-text-v1.5, \
             multilingual-e5-small, multilingual-e5-base, multilingual-e5-large",
            other
        ),
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
fn load_local_model(name: &str) -> Result<LoadedModel> {
    let model = config_to_fastembed_model(name)?;
    let embedding = fastembed::TextEmbedding::try_new(
        fastembed::InitOptions::new(model).with_show_download_progress(false),
    )
    .map_err(|e| anyhow!("Failed to initialize local embedding model: {}", e))?;
    Ok(std::sync::Mutex::new(embedding))
}

#[cfg(feature = "local-embeddings-fastembed")]
fn run_local_model(
    model: &LoadedModel,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut guard = model
        .lock()
        .map_err(|_| anyhow!("local embedding model lock poisoned"))?;
    guard
        .embed(texts, Some(batch_size))
        .map_err(|e| anyhow!("Local embedding failed: {}", e))
}

#[cfg(all(
    feature = "local-embeddings-tract",
    not(feature = "local-embeddings-fastembed")
))]
fn load_local_model(name: &str) -> Result<LoadedModel> {
    local_tract::TractModel::load(name)
}

#[cfg(all(
    feature = "local-embeddings-tract",
    not(feature = "local-embeddings-fastembed")
))]
fn run_local_model(
    model: &LoadedModel,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    model.embed(&texts, batch_size)
}

/// Create the configured [`EmbeddingProvider`].
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"local"` | `LocalProvider` (fastembed or tract, see features) |
/// | `"ollama"` | [`OllamaProvider`] |
/// | `"openai"` | [`OpenAIProvider`] |
///
/// Local models are not loaded here; see the module docs.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledProvider)),
        "openai" => Ok(Arc::new(OpenAIProvider::new(config)?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config)?)),
        #[cfg(any(feature = "local-embeddings-fastembed", feature = "local-embeddings-tract"))]
        "local" => Ok(Arc::new(LocalProvider::new(config)?)),
        #[cfg(not(any(feature = "local-embeddings-fastembed", feature = "local-embeddings-tract")))]
        "local" => bail!(
            "Local embedding provider requires one of: --features local-embeddings-fastembed, --features local-embeddings-tract"
        ),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stands in for a local model; the loaded value is the vector width.
    struct LazyWidthProvider {
        model: LazyModel<usize>,
    }

    #[async_trait]
    impl EmbeddingProvider for LazyWidthProvider {
        fn model_name(&self) -> &str {
            "lazy-width"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed(&self, texts: &[String]) -> RetrievalResult<Vec<Vec<f32>>> {
            let width = self.model.get().await?;
            Ok(texts.iter().map(|_| vec![0.0; *width]).collect())
        }
    }

    /// Serve `body` from `POST /api/embed` and return the base URL.
    async fn mock_ollama(body: serde_json::Value) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let app = Router::new().route(
            "/api/embed",
            post(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    fn ollama_config(url: String, dims: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: "ollama".to_string(),
            model: Some("nomic-embed-text".to_string()),
            dims: Some(dims),
            url: Some(url),
            max_retries: 0,
            ..EmbeddingConfig::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_first_calls_load_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let provider = Arc::new(LazyWidthProvider {
            model: LazyModel::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                Ok(2)
            }),
        });
        assert!(!provider.model.is_loaded());

        let first = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.embed(&["a".to_string()]).await }
        });
        let second = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.embed(&["b".to_string()]).await }
        });
        assert_eq!(first.await.unwrap().unwrap(), vec![vec![0.0, 0.0]]);
        assert_eq!(second.await.unwrap().unwrap(), vec![vec![0.0, 0.0]]);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(provider.model.is_loaded());

        provider.embed(&["c".to_string()]).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let provider = LazyWidthProvider {
            model: LazyModel::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    bail!("weights not found");
                }
                Ok(3)
            }),
        };

        let err = provider.embed(&["a".to_string()]).await.unwrap_err();
        assert_eq!(
            err,
            RetrievalError::ModelUnavailable("weights not found".to_string())
        );
        assert!(!provider.model.is_loaded());

        let vectors = provider.embed(&["a".to_string()]).await.unwrap();
        assert_eq!(vectors, vec![vec![0.0; 3]]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(provider.model.is_loaded());
    }

    #[tokio::test]
    async fn test_remote_dims_are_checked() {
        let url = mock_ollama(serde_json::json!({ "embeddings": [[1.0, 2.0]] })).await;

        let matching = OllamaProvider::new(&ollama_config(url.clone(), 2)).unwrap();
        let vectors = matching.embed(&["a".to_string()]).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0]]);

        let wrong = OllamaProvider::new(&ollama_config(url, 3)).unwrap();
        let err = wrong.embed(&["a".to_string()]).await.unwrap_err();
        assert_eq!(
            err,
            RetrievalError::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[tokio::test]
    async fn test_non_numeric_response_is_an_error() {
        let url = mock_ollama(serde_json::json!({ "embeddings": [[1.0, "oops"]] })).await;
        let provider = OllamaProvider::new(&ollama_config(url, 2)).unwrap();
        let err = provider.embed(&["a".to_string()]).await.unwrap_err();
        match err {
            RetrievalError::ModelUnavailable(detail) => assert!(detail.contains("non-numeric")),
            other => panic!("expected ModelUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_check_dims() {
        assert!(check_dims(vec![vec![0.0; 4], vec![1.0; 4]], 4).is_ok());
        assert_eq!(
            check_dims(vec![vec![0.0; 4], vec![1.0; 5]], 4).unwrap_err(),
            RetrievalError::DimensionMismatch {
                expected: 4,
                found: 5
            }
        );
    }

    #[tokio::test]
    async fn test_disabled_reports_unavailable() {
        let err = DisabledProvider
            .embed(&["text".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::ModelUnavailable(_)));
    }

    #[test]
    fn test_parse_openai_shape() {
        let json = serde_json::json!({
            "data": [ { "embedding": [0.5, 1.0] }, { "embedding": [2.0, -1.0] } ]
        });
        let vectors = parse_vectors(&json, "data", Some("embedding")).unwrap();
        assert_eq!(vectors, vec![vec![0.5, 1.0], vec![2.0, -1.0]]);
    }

    #[test]
    fn test_parse_ollama_shape() {
        let json = serde_json::json!({ "embeddings": [[1.0, 2.0, 3.0]] });
        let vectors = parse_vectors(&json, "embeddings", None).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_parse_rejects_non_numeric_entries() {
        let json = serde_json::json!({ "embeddings": [[1.0, null, 3.0]] });
        let err = parse_vectors(&json, "embeddings", None).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_parse_missing_array() {
        let json = serde_json::json!({ "error": "bad model" });
        assert!(parse_vectors(&json, "embeddings", None).is_err());
    }

    #[test]
    fn test_create_disabled() {
        let config = EmbeddingConfig {
            provider: "disabled".to_string(),
            ..EmbeddingConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "disabled");
    }

    #[cfg(any(
        feature = "local-embeddings-fastembed",
        feature = "local-embeddings-tract"
    ))]
    #[test]
    fn test_local_provider_is_lazy() {
        let provider = LocalProvider::new(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.model_name(), DEFAULT_LOCAL_MODEL);
        assert_eq!(provider.dims(), 384);
        assert!(!provider.is_loaded());
    }
}
