use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{books, cache, handlers, middleware::metrics_middleware, quota};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Book search
        .route("/books/isbn/{isbn}", get(books::search_by_isbn))
        // Quota and cache maintenance
        .route("/quota", get(quota::get_quota))
        .route("/cache", delete(cache::clear_cache));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
