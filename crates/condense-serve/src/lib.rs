//! # condense-serve
//!
//! HTTP summarization service. Any generator implementing
//! [`condense_engine::TextGenerator`] can be served:
//! ```rust,no_run
//! use condense_serve::state::AppState;
//! // let engine = InferenceEngine::load(&EngineOptions::default())?;
//! // let state = AppState::new(Box::new(engine));
//! // condense_serve::server::serve("0.0.0.0:8000", state).await;
//! ```
//!
//! Provides:
//! - `POST /summarize` — beam-search summarization of the request text
//! - `GET /health` — health check

pub mod api;
pub mod health;
pub mod server;
pub mod state;

pub use state::AppState;
