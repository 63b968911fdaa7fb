//! Tract-based local embedding pipeline (fallback for musl and Intel Mac).
//!
//! Pure-Rust path: loads the ONNX model with tract-onnx and tokenizes with the
//! tokenizers crate. No ONNX Runtime or system deps. [`TractModel::load`]
//! downloads weights into `~/.cache/steam-mcp/models` on first use; the
//! caller keeps the loaded model for the life of the process.
#![cfg_attr(
    all(feature = "local-embeddings-fastembed", feature = "local-embeddings-tract"),
    allow(dead_code)
)]

use anyhow::{anyhow, bail, Result};
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;

use steam_mcp_core::embedding::normalize_l2;

const ALL_MINILM_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";
const ALL_MINILM_DIMS: usize = 384;
const DEFAULT_MAX_LEN: usize = 256;

type Runner = Box<dyn Fn(TVec<TValue>) -> TractResult<TVec<TValue>> + Send + Sync>;

/// Model manifest: name -> (onnx path in repo, tokenizer path in repo, dims).
fn model_manifest(model_name: &str) -> Result<(&'static str, &'static str, usize)> {
    match model_name {
        "all-minilm-l6-v2" => Ok(("onnx/model.onnx", "tokenizer.json", ALL_MINILM_DIMS)),
        _ => bail!(
            "Tract backend supports only all-minilm-l6-v2. Requested: '{}'",
            model_name
        ),
    }
}

fn cache_dir() -> Result<PathBuf> {
    let base = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let dir = PathBuf::from(base)
        .join(".cache")
        .join("steam-mcp")
        .join("models");
    std::fs::create_dir_all(&dir).map_err(|e| anyhow!("Create cache dir: {}", e))?;
    Ok(dir)
}

fn download_to_cache(repo: &str, path: &str, cache_path: &Path) -> Result<()> {
    if cache_path.exists() {
        return Ok(());
    }
    let url = format!(
        "https://huggingface.co/{}/resolve/main/{}",
        repo,
        path.replace(' ', "%20")
    );
    tracing::info!(%url, "downloading embedding model file");
    let bytes = reqwest::blocking::get(&url)
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| anyhow!("Download {}: {}", url, e))?;
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| anyhow!("Create cache parent: {}", e))?;
    }
    std::fs::write(cache_path, &bytes).map_err(|e| anyhow!("Write cache: {}", e))?;
    Ok(())
}

/// A loaded tokenizer and optimized tract plan.
pub struct TractModel {
    dims: usize,
    tokenizer: tokenizers::Tokenizer,
    runner: Runner,
}

impl TractModel {
    /// Blocking: may download files and always parses and optimizes the graph.
    pub fn load(model_name: &str) -> Result<Self> {
        let (onnx_rel, tokenizer_rel, dims) = model_manifest(model_name)?;
        let model_dir = cache_dir()?.join(model_name);
        let onnx_path = model_dir.join(onnx_rel);
        let tokenizer_path = model_dir.join(tokenizer_rel);
        download_to_cache(ALL_MINILM_REPO, onnx_rel, &onnx_path)?;
        download_to_cache(ALL_MINILM_REPO, tokenizer_rel, &tokenizer_path)?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Load tokenizer: {}", e))?;

        let plan = tract_onnx::onnx()
            .model_for_path(&onnx_path)
            .map_err(|e| anyhow!("Load ONNX: {}", e))?
            .into_optimized()
            .map_err(|e| anyhow!("Optimize: {}", e))?
            .into_runnable()
            .map_err(|e| anyhow!("Build tract runnable: {}", e))?;

        Ok(Self {
            dims,
            tokenizer,
            runner: Box::new(move |inputs| plan.run(inputs)),
        })
    }

    /// Blocking: embed `texts` in chunks of `batch_size`, mean-pooled and
    /// L2-normalized.
    pub fn embed(&self, texts: &[String], batch_size: usize) -> Result<Vec<Vec<f32>>> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(batch_size.max(1)) {
            let encodings = chunk
                .iter()
                .map(|s| {
                    self.tokenizer
                        .encode(s.as_str(), true)
                        .map_err(|e| anyhow!("Tokenize: {}", e))
                })
                .collect::<Result<Vec<_>>>()?;

            let max_len = encodings
                .iter()
                .map(|e| e.get_ids().len())
                .max()
                .unwrap_or(1)
                .clamp(1, DEFAULT_MAX_LEN);

            let rows = encodings.len();
            let mut input_ids = vec![0i64; rows * max_len];
            let mut attention_mask = vec![0i64; rows * max_len];
            for (i, enc) in encodings.iter().enumerate() {
                for (j, &id) in enc.get_ids().iter().take(max_len).enumerate() {
                    input_ids[i * max_len + j] = id as i64;
                    attention_mask[i * max_len + j] = 1;
                }
            }

            let input_ids: Tensor = ndarray::Array2::from_shape_vec((rows, max_len), input_ids)
                .map_err(|e| anyhow!("Input ids shape: {}", e))?
                .into();
            let attention_mask: Tensor =
                ndarray::Array2::from_shape_vec((rows, max_len), attention_mask)
                    .map_err(|e| anyhow!("Attention mask shape: {}", e))?
                    .into();

            let result = (self.runner)(tvec!(input_ids.into(), attention_mask.into()))
                .map_err(|e| anyhow!("Tract inference: {}", e))?;
            let output = result
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("No output tensor"))?;
            let view = output
                .to_array_view::<f32>()
                .map_err(|e| anyhow!("Output to array: {}", e))?;

            // Either [batch, dims] sentence embeddings or
            // [batch, seq_len, dims] token states that need mean pooling.
            let shape = view.shape().to_vec();
            match shape.len() {
                2 => {
                    for i in 0..shape[0] {
                        let row: Vec<f32> = view.slice(ndarray::s![i, ..]).iter().copied().collect();
                        all_embeddings.push(normalize_l2(row));
                    }
                }
                3 => {
                    for (i, enc) in encodings.iter().enumerate() {
                        let valid_len = enc.get_ids().len().min(shape[1]).min(max_len);
                        let mut sum = vec![0f32; self.dims];
                        for j in 0..valid_len {
                            for (k, &v) in view.slice(ndarray::s![i, j, ..]).iter().enumerate() {
                                if k < self.dims {
                                    sum[k] += v;
                                }
                            }
                        }
                        if valid_len > 0 {
                            for x in &mut sum {
                                *x /= valid_len as f32;
                            }
                        }
                        all_embeddings.push(normalize_l2(sum));
                    }
                }
                _ => bail!("Unexpected output shape: {:?}", shape),
            }
        }

        Ok(all_embeddings)
    }
}
