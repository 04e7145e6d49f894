//! Shared application state holding the loaded generation engine.

use std::sync::Arc;

use condense_engine::TextGenerator;
use parking_lot::Mutex;

/// Shared state for the summarization service.
///
/// The engine takes `&mut self` to generate, so all requests funnel
/// through one mutex; the model weights themselves are loaded once at
/// startup and never replaced.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Mutex<Box<dyn TextGenerator>>>,
    /// Model name for health reporting.
    pub model_name: String,
}

impl AppState {
    /// Wrap a loaded generator for serving.
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        let model_name = generator.model_name().to_string();
        Self {
            generator: Arc::new(Mutex::new(generator)),
            model_name,
        }
    }
}
