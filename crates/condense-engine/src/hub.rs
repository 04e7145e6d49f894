//! Model and tokenizer acquisition from the HuggingFace Hub.
//!
//! Downloads are cached by `hf-hub` under the usual user cache directory;
//! local-path overrides in [`crate::EngineOptions`] bypass this entirely.

use std::path::PathBuf;

use hf_hub::api::sync::Api;

use crate::error::{EngineError, Result};

/// Default repository holding the quantized model weights.
pub const DEFAULT_MODEL_REPO: &str = "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF";
/// Default GGUF file within the model repository.
pub const DEFAULT_MODEL_FILE: &str = "tinyllama-1.1b-chat-v1.0.Q4_K_M.gguf";
/// Default repository holding the matching `tokenizer.json`.
pub const DEFAULT_TOKENIZER_REPO: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";

/// Fetch a single file from a hub model repository, returning its local path.
pub fn fetch(repo_id: &str, filename: &str) -> Result<PathBuf> {
    let api = Api::new().map_err(|e| EngineError::Load(e.to_string()))?;
    tracing::info!("fetching {} from {}", filename, repo_id);
    api.model(repo_id.to_string())
        .get(filename)
        .map_err(|e| EngineError::Load(format!("{}/{}: {}", repo_id, filename, e)))
}
