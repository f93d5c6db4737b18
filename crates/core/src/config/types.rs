use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub openbd: OpenBdConfig,
    #[serde(default)]
    pub google_books: GoogleBooksConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
///
/// The book cache and the settings table share one SQLite file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("readlog.db")
}

/// Book search policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// How long a cached record stays valid, in days (default: 7)
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: u32,
    /// ISBN prefix routed to the domestic catalog first (default: "9784")
    #[serde(default = "default_domestic_prefix")]
    pub domestic_prefix: String,
    /// Author placeholder used when a provider omits the author
    #[serde(default = "default_unknown_author")]
    pub unknown_author: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_days: default_cache_ttl_days(),
            domestic_prefix: default_domestic_prefix(),
            unknown_author: default_unknown_author(),
        }
    }
}

fn default_cache_ttl_days() -> u32 {
    7
}

fn default_domestic_prefix() -> String {
    "9784".to_string()
}

fn default_unknown_author() -> String {
    "author unknown".to_string()
}

/// openBD (domestic catalog) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenBdConfig {
    /// Whether Japanese ISBNs are tried against openBD first (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL (default: https://api.openbd.jp)
    #[serde(default = "default_openbd_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for OpenBdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_openbd_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_openbd_url() -> String {
    "https://api.openbd.jp".to_string()
}

/// Google Books (global catalog) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleBooksConfig {
    /// Base URL (default: https://www.googleapis.com)
    #[serde(default = "default_google_books_url")]
    pub base_url: String,
    /// API key. Can be empty, in which case the anonymous quota applies.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Minimum spacing between request starts in milliseconds (default: 2000)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Requests allowed per local calendar day (default: 900, real quota is 1000)
    #[serde(default = "default_daily_limit")]
    pub daily_limit: i64,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: default_google_books_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            min_interval_ms: default_min_interval_ms(),
            daily_limit: default_daily_limit(),
        }
    }
}

fn default_google_books_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_min_interval_ms() -> u64 {
    2000
}

fn default_daily_limit() -> i64 {
    900
}

fn default_timeout() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

/// Connectivity probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    #[serde(default)]
    pub probe: ProbeKind,
    /// host:port used by the TCP probe
    #[serde(default = "default_probe_host")]
    pub host: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe: ProbeKind::default(),
            host: default_probe_host(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_probe_host() -> String {
    "www.googleapis.com:443".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

/// How network reachability is determined before each search
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// TCP connect to `connectivity.host`
    #[default]
    Tcp,
    /// Assume the network is always reachable
    Always,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub openbd: OpenBdConfig,
    pub google_books: SanitizedGoogleBooksConfig,
    pub connectivity: ConnectivityConfig,
}

/// Sanitized Google Books config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGoogleBooksConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub min_interval_ms: u64,
    pub daily_limit: i64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            search: config.search.clone(),
            openbd: config.openbd.clone(),
            google_books: SanitizedGoogleBooksConfig {
                base_url: config.google_books.base_url.clone(),
                api_key_configured: !config.google_books.api_key.is_empty(),
                timeout_secs: config.google_books.timeout_secs,
                min_interval_ms: config.google_books.min_interval_ms,
                daily_limit: config.google_books.daily_limit,
            },
            connectivity: config.connectivity.clone(),
        }
    }
}
