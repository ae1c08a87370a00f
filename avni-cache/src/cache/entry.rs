//! Cached address lists.

use std::sync::Arc;
use std::time::Duration;

use avni_core::CatchmentAddress;
use chrono::{DateTime, Utc};

/// An immutable address list held by the cache.
///
/// The list is shared: every hit hands out the same `Arc`, and a refresh
/// replaces the whole entry rather than editing it.
#[derive(Debug, Clone)]
pub struct CachedAddresses {
    addresses: Arc<[CatchmentAddress]>,
    cached_at: DateTime<Utc>,
}

impl CachedAddresses {
    /// Wrap a freshly fetched list, stamped with the current time.
    pub fn new(addresses: Arc<[CatchmentAddress]>) -> Self {
        Self {
            addresses,
            cached_at: Utc::now(),
        }
    }

    /// The shared address list.
    pub fn addresses(&self) -> &Arc<[CatchmentAddress]> {
        &self.addresses
    }

    /// Consume the entry and return the shared list.
    pub fn into_addresses(self) -> Arc<[CatchmentAddress]> {
        self.addresses
    }

    /// Number of addresses in the list.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// When this entry was stored.
    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// How long ago this entry was stored.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avni_core::{AddressLevelId, AddressLevelTypeId, CatchmentId};

    #[test]
    fn test_entry_shares_list() {
        let list: Arc<[CatchmentAddress]> = vec![CatchmentAddress::new(
            1,
            AddressLevelId::new(1),
            CatchmentId::new(1),
            AddressLevelTypeId::new(1),
        )]
        .into();
        let entry = CachedAddresses::new(Arc::clone(&list));

        assert_eq!(entry.len(), 1);
        assert!(!entry.is_empty());
        assert!(Arc::ptr_eq(entry.addresses(), &list));
        assert!(entry.cached_at() <= Utc::now());
        assert!(Arc::ptr_eq(&entry.into_addresses(), &list));
    }

    #[test]
    fn test_age_grows_from_cached_at() {
        let entry = CachedAddresses::new(Arc::from(Vec::new()));
        std::thread::sleep(Duration::from_millis(5));

        assert!(entry.is_empty());
        assert!(entry.age() >= Duration::from_millis(5));
        assert!(entry.cached_at() <= Utc::now());
    }
}
