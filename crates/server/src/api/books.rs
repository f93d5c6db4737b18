//! Book search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::debug;

use readlog_core::{is_well_formed, normalize_isbn, BookRecord, SearchOutcome};

use super::handlers::ErrorResponse;
use super::messages::{self, Language};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookSearchResponse {
    /// `SearchOutcome::label()`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookRecord>,
}

fn status_for(outcome: &SearchOutcome) -> StatusCode {
    match outcome {
        SearchOutcome::Success { .. } => StatusCode::OK,
        SearchOutcome::NotFound => StatusCode::NOT_FOUND,
        SearchOutcome::RateLimitExceeded | SearchOutcome::DailyLimitExceeded => {
            StatusCode::TOO_MANY_REQUESTS
        }
        SearchOutcome::NetworkUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        SearchOutcome::ApiError { .. } => StatusCode::BAD_GATEWAY,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/books/isbn/{isbn}
///
/// Resolve an ISBN to book metadata.
pub async fn search_by_isbn(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<BookSearchResponse>), (StatusCode, Json<ErrorResponse>)> {
    let lang = Language::from_headers(&headers);

    if isbn.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: messages::blank_isbn(lang),
            }),
        ));
    }
    // Reject garbage before it can spend quota
    if !is_well_formed(&normalize_isbn(&isbn)) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: messages::malformed_isbn(isbn.trim(), lang),
            }),
        ));
    }

    let outcome = state.search().search_by_isbn(&isbn).await;
    debug!(isbn = %isbn, outcome = outcome.label(), "ISBN search finished");

    let status = status_for(&outcome);
    let message = messages::outcome_message(&outcome, lang);
    let label = outcome.label();
    let book = match outcome {
        SearchOutcome::Success { book } => Some(book),
        _ => None,
    };

    Ok((
        status,
        Json(BookSearchResponse {
            outcome: label,
            message,
            book,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&SearchOutcome::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&SearchOutcome::RateLimitExceeded),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(&SearchOutcome::DailyLimitExceeded),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(&SearchOutcome::NetworkUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&SearchOutcome::ApiError {
                message: "x".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
