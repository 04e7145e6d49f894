//! # condense-engine
//!
//! The generation capability behind the Condense summarization service.
//!
//! Pulls together a HuggingFace tokenizer, a quantized GGUF causal language
//! model (via candle), and a beam-search decoder into a single
//! [`InferenceEngine`]. The HTTP layer only sees the [`TextGenerator`]
//! trait, so it can be tested against a stub without loading any weights:
//!
//! ```rust,no_run
//! use condense_engine::{EngineOptions, InferenceEngine, TextGenerator};
//!
//! let mut engine = InferenceEngine::load(&EngineOptions::default())?;
//! let summary = engine.generate("The quick brown fox")?;
//! # Ok::<(), condense_engine::EngineError>(())
//! ```

pub mod beam;
pub mod engine;
pub mod error;
pub mod hub;
pub mod model;
pub mod tokenizer;

pub use beam::GenerationConfig;
pub use engine::{EngineOptions, InferenceEngine, TextGenerator};
pub use error::{EngineError, Result};
pub use model::CausalLm;
pub use tokenizer::TextTokenizer;
