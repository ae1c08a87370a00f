//! Cache layer for catchment address lookups.
//!
//! This module provides a bounded, in-memory cache in front of the address
//! hierarchy store with a size-based admission policy.
//!
//! # Retention
//!
//! Nothing is guaranteed to stay cached. An entry can disappear because the
//! table was full when another catchment was inserted, because it was
//! invalidated, or because a table was cleared. Callers treat every miss the
//! same way: the provider is asked again.
//!
//! # Keys
//!
//! [`CatchmentKey`] combines the catchment id with an optional type id
//! filter. The filter is compared as an ordered list, so reordering it is a
//! cache miss.
//!
//! # Example
//!
//! ```ignore
//! let cache = CatchmentAddressCache::new(Arc::new(repository), AddressCacheConfig::from_env())?;
//!
//! // Served from the cache after the first call, unless the catchment is
//! // larger than the admission threshold.
//! let addresses = cache.addresses_for_catchment(&catchment)?;
//! ```

pub mod address_level;
pub mod entry;
pub mod key;
pub mod table;
pub mod traits;

pub use address_level::{AddressCacheStats, CacheTable, CatchmentAddressCache};
pub use entry::CachedAddresses;
pub use key::CatchmentKey;
pub use table::{BoundedTable, InsertOutcome};
pub use traits::{CacheStats, LocationLookup};
