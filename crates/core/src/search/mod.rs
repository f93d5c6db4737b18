//! ISBN book search.
//!
//! [`BookSearchService`] checks the connectivity probe, then the local cache,
//! then walks an ordered chain of [`LookupStep`]s (openBD for domestic ISBNs,
//! Google Books for everything) and writes successes back to the cache.

mod isbn;
mod rate_limiter;
mod service;
mod steps;
mod types;

pub use isbn::{has_prefix, is_well_formed, normalize_isbn};
pub use rate_limiter::{RequestSpacer, DEFAULT_MIN_INTERVAL};
pub use service::BookSearchService;
pub use steps::{DomesticStep, GlobalStep, LookupStep, StepResult};
pub use types::*;
