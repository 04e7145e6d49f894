//! HuggingFace tokenizer integration.
//!
//! Wraps the `tokenizers` crate to provide encode/decode for the engine.
//! Loads `tokenizer.json` from a local path (usually fetched by [`crate::hub`]).

use std::path::Path;

use crate::error::{EngineError, Result};

/// Wrapper around a HuggingFace tokenizer.
pub struct TextTokenizer {
    inner: tokenizers::Tokenizer,
}

impl TextTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| EngineError::Load(format!("failed to load tokenizer: {}", e)))?;
        Ok(Self { inner })
    }

    /// Encode text into token IDs, without adding special tokens.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| EngineError::Inference(format!("tokenizer encode error: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decode token IDs back to text, skipping special/control tokens.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| EngineError::Inference(format!("tokenizer decode error: {}", e)))
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    /// Look up the token ID for a string. Returns None if not found.
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    /// Get the EOS token ID if the tokenizer defines one.
    /// Checks common EOS token strings used by various models.
    pub fn eos_token_id(&self) -> Option<u32> {
        const CANDIDATES: &[&str] = &[
            "</s>",
            "<|endoftext|>",
            "<|end_of_text|>",
            "<|eot_id|>",
            "<|im_end|>",
        ];
        CANDIDATES.iter().find_map(|tok| self.token_to_id(tok))
    }
}
