pub mod cache;
pub mod config;
pub mod connectivity;
pub mod external_catalog;
pub mod metrics;
pub mod quota;
pub mod search;
pub mod settings;
pub mod testing;

pub use cache::{BookCache, CacheEntry, CacheError, SqliteBookCache};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConnectivityConfig,
    DatabaseConfig, GoogleBooksConfig, OpenBdConfig, ProbeKind, SanitizedConfig, SearchConfig,
    ServerConfig,
};
pub use connectivity::{create_probe, AlwaysReachable, ConnectivityProbe, TcpProbe};
pub use external_catalog::{
    DomesticCatalog, GlobalCatalog, GoogleBooksClient, OpenBdClient, ProviderError,
};
pub use quota::{DailyQuotaTracker, QuotaReservation, DEFAULT_DAILY_LIMIT};
pub use search::{
    is_well_formed, normalize_isbn, BookRecord, BookSearchService, LookupStep, ProviderTag,
    RequestSpacer, SearchOutcome, StepResult,
};
pub use settings::{SettingsError, SettingsStore, SqliteSettingsStore};
