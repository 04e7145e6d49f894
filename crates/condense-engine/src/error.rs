//! Error types for the inference engine.

use thiserror::Error;

/// Errors that can occur while loading or running the engine.
///
/// The request path deliberately collapses tokenization, generation, and
/// decoding failures into the single [`Inference`](EngineError::Inference)
/// kind; the HTTP layer reports its display string verbatim.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Startup-only failure: hub fetch, GGUF load, or tokenizer load.
    #[error("failed to load model: {0}")]
    Load(String),

    /// Any failure while handling a generation request.
    #[error("{0}")]
    Inference(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
