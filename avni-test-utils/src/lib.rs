//! Avni Test Utilities
//!
//! Shared test infrastructure for the address cache:
//! - A mock location lookup with call counting and failure injection
//! - Fixtures for catchments and their addresses
//! - Proptest generators for ids and type filters
//! - Tracing setup for tests

use std::collections::HashMap;
use std::sync::Once;

use parking_lot::Mutex;

// Re-export core types for convenience
pub use avni_core::{
    address_level_type_ids, AddressCacheConfig, AddressLevelId, AddressLevelTypeId, AvniError,
    AvniResult, Catchment, CatchmentAddress, CatchmentId, LookupError,
};
pub use avni_cache::{CacheTable, CatchmentAddressCache, LocationLookup};

/// Address level type used for fixture addresses.
pub const FIXTURE_ADDRESS_LEVEL_TYPE_ID: AddressLevelTypeId = AddressLevelTypeId::new(1);

// ============================================================================
// TRACING
// ============================================================================

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`, defaulting to `avni_cache=debug`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("avni_cache=debug"));
        // Another harness may already have installed one.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A catchment with the given raw id.
pub fn catchment(id: i64) -> Catchment {
    Catchment::new(CatchmentId::new(id))
}

/// `count` addresses for a catchment with consecutive ids starting at
/// `start_id`. Address level ids equal the row ids.
pub fn catchment_addresses(catchment_id: CatchmentId, start_id: i64, count: usize) -> Vec<CatchmentAddress> {
    (start_id..start_id + count as i64)
        .map(|i| {
            CatchmentAddress::new(
                i,
                AddressLevelId::new(i),
                catchment_id,
                FIXTURE_ADDRESS_LEVEL_TYPE_ID,
            )
        })
        .collect()
}

// ============================================================================
// MOCK LOCATION LOOKUP
// ============================================================================

/// One recorded call on [`MockLocationLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    Catchment(CatchmentId),
    CatchmentAndTypes(CatchmentId, Vec<AddressLevelTypeId>),
}

/// Mock location lookup for testing.
///
/// Answers are stubbed per catchment and per (catchment, ordered type id
/// list). Unstubbed lookups return an empty list. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockLocationLookup {
    by_catchment: Mutex<HashMap<CatchmentId, Vec<CatchmentAddress>>>,
    by_catchment_and_types: Mutex<HashMap<(CatchmentId, Vec<AddressLevelTypeId>), Vec<CatchmentAddress>>>,
    failures: Mutex<HashMap<CatchmentId, LookupError>>,
    calls: Mutex<Vec<LookupCall>>,
}

impl MockLocationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub the unfiltered lookup for a catchment.
    pub fn stub_catchment(&self, catchment_id: CatchmentId, addresses: Vec<CatchmentAddress>) {
        self.by_catchment.lock().insert(catchment_id, addresses);
    }

    /// Stub the filtered lookup for a catchment and an exact, ordered filter.
    pub fn stub_catchment_and_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
        addresses: Vec<CatchmentAddress>,
    ) {
        self.by_catchment_and_types
            .lock()
            .insert((catchment_id, type_ids.to_vec()), addresses);
    }

    /// Stub a catchment with `count` fixture addresses for the unfiltered
    /// lookup. Returns the stubbed list.
    pub fn stub_sized_catchment(
        &self,
        catchment_id: CatchmentId,
        start_id: i64,
        count: usize,
    ) -> Vec<CatchmentAddress> {
        let addresses = catchment_addresses(catchment_id, start_id, count);
        self.stub_catchment(catchment_id, addresses.clone());
        addresses
    }

    /// Make every lookup for a catchment fail with `err`.
    pub fn fail_catchment(&self, catchment_id: CatchmentId, err: LookupError) {
        self.failures.lock().insert(catchment_id, err);
    }

    /// Stop failing lookups for a catchment.
    pub fn heal_catchment(&self, catchment_id: CatchmentId) {
        self.failures.lock().remove(&catchment_id);
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().clone()
    }

    /// Total number of calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of unfiltered lookups for a catchment.
    pub fn catchment_calls(&self, catchment_id: CatchmentId) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| **call == LookupCall::Catchment(catchment_id))
            .count()
    }

    /// Number of filtered lookups for a catchment with exactly this ordered
    /// filter.
    pub fn catchment_and_types_calls(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| match call {
                LookupCall::CatchmentAndTypes(id, ids) => *id == catchment_id && ids == type_ids,
                LookupCall::Catchment(_) => false,
            })
            .count()
    }

    /// Forget recorded calls, keeping stubs.
    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    fn failure(&self, catchment_id: CatchmentId) -> Option<LookupError> {
        self.failures.lock().get(&catchment_id).cloned()
    }
}

impl LocationLookup for MockLocationLookup {
    fn fetch_catchment_addresses(
        &self,
        catchment_id: CatchmentId,
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        self.calls.lock().push(LookupCall::Catchment(catchment_id));
        if let Some(err) = self.failure(catchment_id) {
            return Err(err);
        }
        Ok(self
            .by_catchment
            .lock()
            .get(&catchment_id)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_catchment_addresses_by_types(
        &self,
        catchment_id: CatchmentId,
        type_ids: &[AddressLevelTypeId],
    ) -> Result<Vec<CatchmentAddress>, LookupError> {
        self.calls
            .lock()
            .push(LookupCall::CatchmentAndTypes(catchment_id, type_ids.to_vec()));
        if let Some(err) = self.failure(catchment_id) {
            return Err(err);
        }
        Ok(self
            .by_catchment_and_types
            .lock()
            .get(&(catchment_id, type_ids.to_vec()))
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Catchment ids from a small pool so collisions are common.
    pub fn arb_catchment_id() -> impl Strategy<Value = CatchmentId> {
        (1i64..=16).prop_map(CatchmentId::new)
    }

    /// Ordered type id filters, possibly empty, possibly with repeats.
    pub fn arb_type_ids() -> impl Strategy<Value = Vec<AddressLevelTypeId>> {
        prop::collection::vec((1i64..=6).prop_map(AddressLevelTypeId::new), 0..5)
    }

    /// Catchment sizes straddling the default admission threshold.
    pub fn arb_catchment_size() -> impl Strategy<Value = usize> {
        prop_oneof![
            4 => 0usize..=20,
            1 => 290usize..=310,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catchment_addresses_fixture() {
        let addresses = catchment_addresses(CatchmentId::new(3), 10, 4);
        assert_eq!(addresses.len(), 4);
        assert_eq!(addresses[0].id, 10);
        assert_eq!(addresses[3].address_level_id, AddressLevelId::new(13));
        assert!(addresses.iter().all(|a| a.catchment_id == CatchmentId::new(3)));
    }

    #[test]
    fn test_mock_records_calls_and_serves_stubs() {
        let lookup = MockLocationLookup::new();
        let id = CatchmentId::new(1);
        let types = address_level_type_ids(&[1, 2]);
        lookup.stub_sized_catchment(id, 1, 2);
        lookup.stub_catchment_and_types(id, &types, catchment_addresses(id, 1, 1));

        assert_eq!(lookup.fetch_catchment_addresses(id).unwrap().len(), 2);
        assert_eq!(
            lookup.fetch_catchment_addresses_by_types(id, &types).unwrap().len(),
            1
        );
        let reordered = address_level_type_ids(&[2, 1]);
        assert!(lookup
            .fetch_catchment_addresses_by_types(id, &reordered)
            .unwrap()
            .is_empty());

        assert_eq!(lookup.call_count(), 3);
        assert_eq!(lookup.catchment_calls(id), 1);
        assert_eq!(lookup.catchment_and_types_calls(id, &types), 1);
        assert_eq!(lookup.catchment_and_types_calls(id, &reordered), 1);

        lookup.reset_calls();
        assert!(lookup.calls().is_empty());
    }

    #[test]
    fn test_mock_failure_injection() {
        let lookup = MockLocationLookup::new();
        let id = CatchmentId::new(9);
        let err = LookupError::Unavailable {
            reason: "down".to_string(),
        };
        lookup.fail_catchment(id, err.clone());
        assert_eq!(lookup.fetch_catchment_addresses(id).unwrap_err(), err);

        lookup.heal_catchment(id);
        assert!(lookup.fetch_catchment_addresses(id).is_ok());
    }
}
