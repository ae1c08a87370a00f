//! Composite cache keys for catchment address lookups.
//!
//! A key is the catchment id plus an optional, ORDERED list of address
//! level type ids. Equality and hashing follow `Vec` semantics, so
//! `[1, 2, 3]` and `[2, 1, 3]` are different keys even though they name
//! the same set of types.

use avni_core::{AddressLevelTypeId, CatchmentId};

/// A cache key for one catchment, optionally narrowed by type ids.
///
/// `None` is the unfiltered lookup. `Some(vec![])` is a filtered lookup
/// with an empty filter and is a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatchmentKey {
    inner: CatchmentKeyInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CatchmentKeyInner {
    catchment_id: CatchmentId,
    matching_type_ids: Option<Vec<AddressLevelTypeId>>,
}

impl CatchmentKey {
    /// Key for all addresses of a catchment.
    pub fn unfiltered(catchment_id: CatchmentId) -> Self {
        Self {
            inner: CatchmentKeyInner {
                catchment_id,
                matching_type_ids: None,
            },
        }
    }

    /// Key for the addresses of a catchment matching the given types.
    ///
    /// The order of `type_ids` is part of the key.
    pub fn with_type_ids(catchment_id: CatchmentId, type_ids: &[AddressLevelTypeId]) -> Self {
        Self {
            inner: CatchmentKeyInner {
                catchment_id,
                matching_type_ids: Some(type_ids.to_vec()),
            },
        }
    }

    /// Get the catchment this key belongs to.
    pub fn catchment_id(&self) -> CatchmentId {
        self.inner.catchment_id
    }

    /// Get the type id filter, if any, in the order it was given.
    pub fn matching_type_ids(&self) -> Option<&[AddressLevelTypeId]> {
        self.inner.matching_type_ids.as_deref()
    }

    /// Whether this key carries a type filter.
    pub fn is_filtered(&self) -> bool {
        self.inner.matching_type_ids.is_some()
    }
}
