//! Book cache API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use super::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

/// DELETE /api/v1/cache
///
/// Drop every cached book record.
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.cache().delete_all() {
        Ok(removed) => {
            info!(removed, "Book cache cleared");
            Ok(Json(SuccessResponse {
                message: format!("Removed {} cached books", removed),
            }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
