//! Identity types for Avni location entities

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw database id.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a catchment (a named geographic service area).
    CatchmentId
);

define_entity_id!(
    /// Identifier of an address level (a single location in the hierarchy).
    AddressLevelId
);

define_entity_id!(
    /// Identifier of an address level type (village, district, ...).
    AddressLevelTypeId
);

/// Convert raw ids into typed address level type ids, preserving order.
pub fn address_level_type_ids(raw: &[i64]) -> Vec<AddressLevelTypeId> {
    raw.iter().copied().map(AddressLevelTypeId::new).collect()
}
