//! Location entities consumed by the address cache.

use crate::{AddressLevelId, AddressLevelTypeId, CatchmentId};
use serde::{Deserialize, Serialize};

/// A catchment: a named geographic service area grouping address levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catchment {
    pub id: CatchmentId,
    pub name: Option<String>,
}

impl Catchment {
    /// Create a catchment reference with no display name.
    pub fn new(id: CatchmentId) -> Self {
        Self { id, name: None }
    }

    /// Create a catchment with a display name.
    pub fn named(id: CatchmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// One address belonging to a catchment, as returned by the location store.
///
/// The cache treats this as opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchmentAddress {
    /// Row id of the catchment/address mapping.
    pub id: i64,
    pub address_level_id: AddressLevelId,
    pub catchment_id: CatchmentId,
    pub type_id: AddressLevelTypeId,
}

impl CatchmentAddress {
    pub fn new(
        id: i64,
        address_level_id: AddressLevelId,
        catchment_id: CatchmentId,
        type_id: AddressLevelTypeId,
    ) -> Self {
        Self {
            id,
            address_level_id,
            catchment_id,
            type_id,
        }
    }
}
