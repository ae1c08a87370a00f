//! Lookup provider trait and cache statistics.
//!
//! The cache's only outbound dependency is a [`LocationLookup`], which reads
//! catchment addresses from the address hierarchy store.

use std::sync::Arc;

use avni_core::{AddressLevelTypeId, CatchmentAddress, CatchmentId, LookupError};

/// Synchronous reads over the address hierarchy store.
///
/// Implementations must be side-effect free and safe to call from many
/// threads at once. Errors are returned to the cache's caller untouched.
pub trait LocationLookup: Send + Sync {
    /// Fetch every address that belongs to a catchment.
    fn fetch_catchment_addresses(
        &self,
        catchment_id: CatchmentId,
    ) -> Result<Vec<CatchmentAddress>, LookupError>;

    /// Fetch the addresses of a catchment whose type is one of `type_ids`.
    ///
    /// `type_ids` is passed through in the caller's order.
    fn fetch_catchment_addresses_by_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> Result<Vec<CatchmentAddress>, LookupError>;
}

impl<L: LocationLookup + ?Sized> LocationLookup for Arc<L> {
    fn fetch_catchment_addresses(
        &self,
        catchment_id: CatchmentId,
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        (**self).fetch_catchment_addresses(catchment_id)
    }

    fn fetch_catchment_addresses_by_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        (**self).fetch_catchment_addresses_by_types(catchment_id, type_ids)
    }
}

impl<L: LocationLookup + ?Sized> LocationLookup for &L {
    fn fetch_catchment_addresses(
        &self,
        catchment_id: CatchmentId,
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        (**self).fetch_catchment_addresses(catchment_id)
    }

    fn fetch_catchment_addresses_by_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        (**self).fetch_catchment_addresses_by_types(catchment_id, type_ids)
    }
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (lookup provider was called).
    pub misses: u64,
    /// Misses whose result was too large to admit.
    pub bypasses: u64,
    /// Number of evictions due to capacity.
    pub evictions: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Sum two sets of counters.
    pub fn combine(&self, other: &CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            bypasses: self.bypasses + other.bypasses,
            evictions: self.evictions + other.evictions,
            entry_count: self.entry_count + other.entry_count,
        }
    }
}
