//! Catchment address cache.
//!
//! Memoizes address hierarchy lookups per catchment, optionally narrowed by
//! an ordered list of address level type ids. Two independent tables are
//! kept, one per lookup shape.
//!
//! Catchment sizes are heavily skewed: most have a handful of addresses, a
//! few have hundreds. Results longer than the configured threshold are
//! returned to the caller but never stored, so every lookup of an oversized
//! catchment goes to the provider.
//!
//! There is no in-flight de-duplication. Two threads missing on the same
//! key both call the provider and the last insert wins.

use std::fmt;
use std::sync::Arc;

use avni_core::{
    AddressCacheConfig, AddressLevelTypeId, AvniResult, Catchment, CatchmentAddress, CatchmentId,
    LookupError,
};

use super::entry::CachedAddresses;
use super::key::CatchmentKey;
use super::table::{BoundedTable, InsertOutcome};
use super::traits::{CacheStats, LocationLookup};

/// The two cache tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTable {
    /// All addresses of a catchment.
    AddressesPerCatchment,
    /// Addresses of a catchment narrowed by an ordered type id list.
    AddressesPerCatchmentAndMatchingAddrLevels,
}

impl CacheTable {
    /// Both tables, in a fixed order.
    pub const ALL: [CacheTable; 2] = [
        CacheTable::AddressesPerCatchment,
        CacheTable::AddressesPerCatchmentAndMatchingAddrLevels,
    ];

    /// Stable table name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CacheTable::AddressesPerCatchment => "addressesPerCatchment",
            CacheTable::AddressesPerCatchmentAndMatchingAddrLevels => {
                "addressesPerCatchmentAndMatchingAddrLevels"
            }
        }
    }
}

impl fmt::Display for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type AddressTable = BoundedTable<CatchmentKey, CachedAddresses>;

/// Counters for both tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressCacheStats {
    pub per_catchment: CacheStats,
    pub per_catchment_and_types: CacheStats,
}

impl AddressCacheStats {
    /// Counters summed over both tables.
    pub fn total(&self) -> CacheStats {
        self.per_catchment.combine(&self.per_catchment_and_types)
    }

    /// Counters for one table.
    pub fn table(&self, table: CacheTable) -> &CacheStats {
        match table {
            CacheTable::AddressesPerCatchment => &self.per_catchment,
            CacheTable::AddressesPerCatchmentAndMatchingAddrLevels => &self.per_catchment_and_types,
        }
    }
}

/// Bounded cache of catchment address lists.
///
/// Cloning is cheap and clones share both tables, so one instance can be
/// handed to every request handler in the process.
///
/// # Example
///
/// ```ignore
/// let cache = CatchmentAddressCache::new(lookup, AddressCacheConfig::from_env())?;
///
/// let all = cache.addresses_for_catchment(&catchment)?;
/// let villages = cache.addresses_for_catchment_and_matching_type_ids(&catchment, &[village])?;
/// ```
pub struct CatchmentAddressCache<L>
where
    L: LocationLookup,
{
    lookup: Arc<L>,
    per_catchment: Arc<AddressTable>,
    per_catchment_and_types: Arc<AddressTable>,
    config: AddressCacheConfig,
}

impl<L> CatchmentAddressCache<L>
where
    L: LocationLookup,
{
    /// Create a new cache in front of `lookup`.
    ///
    /// Fails only if the config is invalid.
    pub fn new(lookup: Arc<L>, config: AddressCacheConfig) -> AvniResult<Self> {
        let capacity = config.non_zero_capacity()?;

        tracing::info!(
            table_capacity = config.table_capacity,
            max_addresses_per_catchment = config.max_addresses_per_catchment,
            "Catchment address cache initialised"
        );

        Ok(Self {
            lookup,
            per_catchment: Arc::new(BoundedTable::new(
                CacheTable::AddressesPerCatchment.name(),
                capacity,
            )),
            per_catchment_and_types: Arc::new(BoundedTable::new(
                CacheTable::AddressesPerCatchmentAndMatchingAddrLevels.name(),
                capacity,
            )),
            config,
        })
    }

    /// Create a new cache with default configuration.
    pub fn with_defaults(lookup: Arc<L>) -> AvniResult<Self> {
        Self::new(lookup, AddressCacheConfig::default())
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &AddressCacheConfig {
        &self.config
    }

    /// Get a reference to the lookup provider.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// All addresses of a catchment.
    ///
    /// Served from the cache when present. On a miss the provider is asked
    /// and the result is stored if it is no longer than the admission
    /// threshold. Provider errors are returned unchanged and nothing is
    /// stored.
    pub fn addresses_for_catchment(
        &self,
        catchment: &Catchment,
    ) -> AvniResult<Arc<[CatchmentAddress]>> {
        let key = CatchmentKey::unfiltered(catchment.id);
        self.get_or_fetch(&self.per_catchment, key, || {
            self.lookup.fetch_catchment_addresses(catchment.id)
        })
    }

    /// Addresses of a catchment whose type is one of `type_ids`.
    ///
    /// Same protocol as [`addresses_for_catchment`](Self::addresses_for_catchment),
    /// in a separate table. The order of `type_ids` is part of the key:
    /// `[1, 2, 3]` and `[2, 1, 3]` are cached independently.
    pub fn addresses_for_catchment_and_matching_type_ids(
        &self,
        catchment: &Catchment,
        type_ids: &[AddressLevelTypeId],
    ) -> AvniResult<Arc<[CatchmentAddress]>> {
        let key = CatchmentKey::with_type_ids(catchment.id, type_ids);
        self.get_or_fetch(&self.per_catchment_and_types, key, || {
            self.lookup
                .fetch_catchment_addresses_by_types(catchment.id, type_ids)
        })
    }

    fn get_or_fetch<F>(
        &self,
        table: &AddressTable,
        key: CatchmentKey,
        fetch: F,
    ) -> AvniResult<Arc<[CatchmentAddress]>>
    where
        F: FnOnce() -> Result<Vec<CatchmentAddress>, LookupError>,
    {
        if let Some(cached) = table.get(&key) {
            tracing::trace!(
                table = table.name(),
                catchment_id = %key.catchment_id(),
                size = cached.len(),
                "Catchment address cache hit"
            );
            return Ok(cached.into_addresses());
        }

        tracing::debug!(
            table = table.name(),
            catchment_id = %key.catchment_id(),
            type_ids = ?key.matching_type_ids(),
            "Catchment address cache miss"
        );

        let addresses: Arc<[CatchmentAddress]> = match fetch() {
            Ok(addresses) => addresses.into(),
            Err(err) => {
                tracing::warn!(
                    table = table.name(),
                    catchment_id = %key.catchment_id(),
                    error = %err,
                    "Catchment address lookup failed"
                );
                return Err(err.into());
            }
        };

        if !self.config.admits(addresses.len()) {
            table.record_bypass();
            tracing::debug!(
                table = table.name(),
                catchment_id = %key.catchment_id(),
                size = addresses.len(),
                threshold = self.config.max_addresses_per_catchment,
                "Catchment too large to cache"
            );
            return Ok(addresses);
        }

        let catchment_id = key.catchment_id();
        match table.insert(key, CachedAddresses::new(Arc::clone(&addresses))) {
            InsertOutcome::Evicted(victim) => {
                tracing::debug!(
                    table = table.name(),
                    catchment_id = %catchment_id,
                    evicted_catchment_id = %victim.catchment_id(),
                    "Evicted catchment addresses to make room"
                );
            }
            InsertOutcome::Inserted | InsertOutcome::Replaced => {}
        }

        Ok(addresses)
    }

    /// Peek at the cached unfiltered entry for a catchment.
    ///
    /// Never calls the provider and never affects eviction order.
    pub fn cached_for_catchment(&self, catchment_id: CatchmentId) -> Option<CachedAddresses> {
        self.per_catchment.peek(&CatchmentKey::unfiltered(catchment_id))
    }

    /// Peek at the cached filtered entry for a catchment and type id list.
    pub fn cached_for_catchment_and_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> Option<CachedAddresses> {
        self.per_catchment_and_types
            .peek(&CatchmentKey::with_type_ids(catchment_id, type_ids))
    }

    /// Drop every cached entry for a catchment, filtered or not, in both
    /// tables. Returns the number of entries removed.
    pub fn invalidate_catchment(&self, catchment_id: CatchmentId) -> usize {
        let unfiltered = usize::from(
            self.per_catchment
                .remove(&CatchmentKey::unfiltered(catchment_id))
                .is_some(),
        );
        let filtered = self
            .per_catchment_and_types
            .remove_where(|key| key.catchment_id() == catchment_id);

        tracing::info!(
            catchment_id = %catchment_id,
            removed = unfiltered + filtered,
            "Invalidated catchment addresses"
        );
        unfiltered + filtered
    }

    /// Drop every entry of one table. Returns the number removed.
    pub fn clear(&self, table: CacheTable) -> usize {
        let removed = self.table(table).clear();
        tracing::info!(table = table.name(), removed, "Cleared catchment address cache");
        removed
    }

    /// Drop every entry of both tables. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        CacheTable::ALL.iter().map(|table| self.clear(*table)).sum()
    }

    /// Number of entries in one table.
    pub fn len(&self, table: CacheTable) -> usize {
        self.table(table).len()
    }

    /// Whether both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.per_catchment.is_empty() && self.per_catchment_and_types.is_empty()
    }

    /// Counters for both tables.
    pub fn stats(&self) -> AddressCacheStats {
        AddressCacheStats {
            per_catchment: self.per_catchment.stats(),
            per_catchment_and_types: self.per_catchment_and_types.stats(),
        }
    }

    fn table(&self, table: CacheTable) -> &AddressTable {
        match table {
            CacheTable::AddressesPerCatchment => &self.per_catchment,
            CacheTable::AddressesPerCatchmentAndMatchingAddrLevels => &self.per_catchment_and_types,
        }
    }
}

impl<L> Clone for CatchmentAddressCache<L>
where
    L: LocationLookup,
{
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            per_catchment: Arc::clone(&self.per_catchment),
            per_catchment_and_types: Arc::clone(&self.per_catchment_and_types),
            config: self.config.clone(),
        }
    }
}
