//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock providers injected, enabling E2E testing without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use readlog_core::{
    testing::{MockConnectivity, MockDomesticCatalog, MockGlobalCatalog},
    BookSearchService, Config, ConnectivityConfig, DailyQuotaTracker, DatabaseConfig,
    GoogleBooksConfig, ProbeKind, ServerConfig, SettingsStore, SqliteBookCache,
    SqliteSettingsStore,
};
use readlog_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use readlog_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - openBD (MockDomesticCatalog)
/// - Google Books (MockGlobalCatalog)
/// - Network reachability (MockConnectivity)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_lookup() {
///     let fixture = TestFixture::new().await;
///     fixture.global.add_item(fixtures::google_books_item("9780000000002", "T", &[])).await;
///
///     let response = fixture.get("/api/v1/books/isbn/9780000000002").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock openBD - configure domestic records
    pub domestic: Arc<MockDomesticCatalog>,
    /// Mock Google Books - configure volumes and errors
    pub global: Arc<MockGlobalCatalog>,
    /// Mock connectivity probe
    pub connectivity: Arc<MockConnectivity>,
    /// Book cache, for seeding and inspection
    pub cache: Arc<SqliteBookCache>,
    /// Settings store backing the quota counters
    pub settings: Arc<SqliteSettingsStore>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Raw body, for non-JSON endpoints
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        // Create mocks
        let domestic = Arc::new(MockDomesticCatalog::new());
        let global = Arc::new(MockGlobalCatalog::new());
        let connectivity = Arc::new(MockConnectivity::new());

        // Create config
        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            google_books: GoogleBooksConfig {
                api_key: test_config.api_key.clone(),
                daily_limit: test_config.daily_limit,
                // No spacing so tests don't sleep
                min_interval_ms: 0,
                ..Default::default()
            },
            connectivity: ConnectivityConfig {
                probe: ProbeKind::Always,
                ..Default::default()
            },
            ..Default::default()
        };

        // Create stores
        let cache = Arc::new(SqliteBookCache::new(&db_path).expect("Failed to create cache"));
        let settings =
            Arc::new(SqliteSettingsStore::new(&db_path).expect("Failed to create settings"));
        let quota = Arc::new(DailyQuotaTracker::new(
            settings.clone(),
            config.google_books.daily_limit,
        ));

        let search = BookSearchService::standard(
            &config,
            connectivity.clone(),
            cache.clone(),
            Arc::clone(&quota),
            domestic.clone(),
            global.clone(),
        );

        // Create app state with mocks
        let state = Arc::new(AppState::new(
            config,
            search,
            cache.clone(),
            quota,
        ));

        // Create router
        let router = create_router(state);

        Self {
            router,
            domestic,
            global,
            connectivity,
            cache,
            settings,
            temp_dir,
        }
    }

    /// Set today's quota counter directly.
    pub fn set_quota_used(&self, used: i64) {
        self.settings
            .set_int(&DailyQuotaTracker::key_for(&DailyQuotaTracker::today()), used)
            .expect("Failed to set quota counter");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, &[]).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.request("GET", path, headers).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, &[]).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let request = request_builder.body(Body::empty()).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Google Books daily cap
    pub daily_limit: i64,
    /// Google Books API key (only affects the sanitized config)
    pub api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            daily_limit: 900,
            api_key: String::new(),
        }
    }
}

impl TestConfig {
    /// Create config with a small daily cap.
    pub fn with_daily_limit(daily_limit: i64) -> Self {
        Self {
            daily_limit,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
