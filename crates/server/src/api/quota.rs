//! Quota API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use readlog_core::{DailyQuotaTracker, SettingsError};

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub daily_limit: i64,
    pub used: i64,
    pub remaining: i64,
    /// Local date the counts apply to (`YYYY-MM-DD`).
    pub date: String,
}

/// GET /api/v1/quota
///
/// Today's Google Books usage.
pub async fn get_quota(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuotaResponse>, (StatusCode, Json<ErrorResponse>)> {
    let quota = state.quota();
    let date = DailyQuotaTracker::today();

    let internal_error = |e: SettingsError| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    };
    let used = quota.used_on(&date).map_err(internal_error)?;
    let remaining = quota.remaining_on(&date).map_err(internal_error)?;

    Ok(Json(QuotaResponse {
        daily_limit: quota.daily_limit(),
        used,
        remaining,
        date,
    }))
}
