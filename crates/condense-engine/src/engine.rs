//! The assembled inference engine and the trait seam the service consumes.

use std::path::PathBuf;

use crate::beam::{beam_search, GenerationConfig};
use crate::error::Result;
use crate::hub;
use crate::model::{CausalLm, GgufModel};
use crate::tokenizer::TextTokenizer;

/// The generation capability: text in, generated text out.
///
/// `&mut self` because real backends carry a KV cache; the HTTP layer
/// serializes calls behind a mutex.
pub trait TextGenerator: Send {
    /// Generate a continuation/summary for `text`.
    fn generate(&mut self, text: &str) -> Result<String>;

    /// Human-readable model identifier for health reporting.
    fn model_name(&self) -> &str;
}

/// Where to find the model and tokenizer.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub model_repo: String,
    pub model_file: String,
    pub tokenizer_repo: String,
    /// Local GGUF path; skips the hub when set.
    pub model_path: Option<PathBuf>,
    /// Local `tokenizer.json` path; skips the hub when set.
    pub tokenizer_path: Option<PathBuf>,
    pub generation: GenerationConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            model_repo: hub::DEFAULT_MODEL_REPO.to_string(),
            model_file: hub::DEFAULT_MODEL_FILE.to_string(),
            tokenizer_repo: hub::DEFAULT_TOKENIZER_REPO.to_string(),
            model_path: None,
            tokenizer_path: None,
            generation: GenerationConfig::default(),
        }
    }
}

/// Tokenizer + model + beam-search decoder, loaded once at startup and
/// shared (behind a mutex) for the lifetime of the process.
pub struct InferenceEngine {
    tokenizer: TextTokenizer,
    model: Box<dyn CausalLm>,
    config: GenerationConfig,
    name: String,
}

impl InferenceEngine {
    /// Load the engine per `opts`, fetching from the hub where no local
    /// override is given.
    pub fn load(opts: &EngineOptions) -> Result<Self> {
        let tokenizer_path = match &opts.tokenizer_path {
            Some(p) => p.clone(),
            None => hub::fetch(&opts.tokenizer_repo, "tokenizer.json")?,
        };
        let tokenizer = TextTokenizer::from_file(&tokenizer_path)?;

        let model_path = match &opts.model_path {
            Some(p) => p.clone(),
            None => hub::fetch(&opts.model_repo, &opts.model_file)?,
        };
        let model = GgufModel::from_file(&model_path)?;

        let name = opts
            .model_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| opts.model_repo.clone());

        let mut config = opts.generation.clone();
        if config.eos_token_id.is_none() {
            config.eos_token_id = tokenizer.eos_token_id();
        }
        tracing::info!(
            "engine ready: model={}, vocab={}, max_length={}, num_beams={}",
            name,
            tokenizer.vocab_size(),
            config.max_length,
            config.num_beams
        );

        Ok(Self {
            tokenizer,
            model: Box::new(model),
            config,
            name,
        })
    }

}

impl TextGenerator for InferenceEngine {
    fn generate(&mut self, text: &str) -> Result<String> {
        let prompt = self.tokenizer.encode(text)?;
        tracing::debug!("generating from {} prompt tokens", prompt.len());
        let output = beam_search(self.model.as_mut(), &prompt, &self.config)?;
        self.tokenizer.decode(&output)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
