//! Summarization API types and handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use condense_engine::EngineError;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wrapper turning any engine failure into a 500 with the error's message
/// as the `detail` field. No finer-grained mapping: tokenization,
/// generation, and decoding failures all land here.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("inference failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// `POST /summarize` — run one beam-search generation over the request text.
///
/// The engine mutex serializes generations; the lock is held for the whole
/// (blocking, CPU-bound) call.
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let summary = state.generator.lock().generate(&req.text)?;
    Ok(Json(SummarizeResponse { summary }))
}
