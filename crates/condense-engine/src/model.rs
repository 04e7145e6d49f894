//! Causal language model backends.
//!
//! [`CausalLm`] is the seam the beam-search decoder scores against; the
//! shipped implementation wraps a quantized GGUF model loaded through
//! candle.

use std::path::Path;

use candle_core::quantized::gguf_file;
use candle_core::{DType, Device, Tensor};
use candle_transformers::models::quantized_llama::ModelWeights;

use crate::error::{EngineError, Result};

/// A fixed, pretrained causal language model.
///
/// `next_token_logits` takes `&mut self` because backends keep an internal
/// KV cache; callers must serialize access.
pub trait CausalLm: Send {
    /// Raw logits over the vocabulary for the token following `tokens`.
    fn next_token_logits(&mut self, tokens: &[u32]) -> Result<Vec<f32>>;
}

/// Quantized llama-family model loaded from a GGUF file.
pub struct GgufModel {
    weights: ModelWeights,
    device: Device,
}

impl GgufModel {
    /// Load model weights from a `.gguf` file onto the CPU.
    pub fn from_file(path: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let mut file = std::fs::File::open(path).map_err(|e| {
            EngineError::Load(format!("failed to open {}: {}", path.display(), e))
        })?;
        let content = gguf_file::Content::read(&mut file).map_err(|e| {
            EngineError::Load(format!("failed to read GGUF {}: {}", path.display(), e))
        })?;

        let total_bytes: usize = content.tensor_infos.values()
            .map(|t| t.shape.elem_count() * t.ggml_dtype.type_size() / t.ggml_dtype.block_size())
            .sum();
        tracing::info!(
            "loading {} tensors ({:.1} MB) from {}",
            content.tensor_infos.len(),
            total_bytes as f64 / 1e6,
            path.display()
        );

        let weights = ModelWeights::from_gguf(content, &mut file, &device)
            .map_err(|e| EngineError::Load(format!("failed to build model: {}", e)))?;
        Ok(Self { weights, device })
    }

    fn forward(&mut self, tokens: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input = Tensor::new(tokens, &self.device)?.unsqueeze(0)?;
        let logits = self.weights.forward(&input, 0)?;
        logits.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()
    }
}

impl CausalLm for GgufModel {
    fn next_token_logits(&mut self, tokens: &[u32]) -> Result<Vec<f32>> {
        if tokens.is_empty() {
            return Err(EngineError::Inference(
                "cannot run the model on an empty token sequence".to_string(),
            ));
        }

        // Full-sequence forward at index_pos 0: candle resets its KV cache
        // on position zero, so each call is independent of the last. Beam
        // search relies on that when scoring sibling candidates.
        self.forward(tokens)
            .map_err(|e| EngineError::Inference(e.to_string()))
    }
}
