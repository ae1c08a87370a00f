//! Avni Cache - Catchment Address Cache
//!
//! Memoizes catchment address lookups for the search, sync and reporting
//! services. The backing address store lives elsewhere and is reached
//! through [`LocationLookup`].

pub mod cache;

// Re-export cache types for service integration
pub use cache::{
    AddressCacheStats, BoundedTable, CacheStats, CacheTable, CachedAddresses,
    CatchmentAddressCache, CatchmentKey, InsertOutcome, LocationLookup,
};
