//! Avni Core - Location Types
//!
//! Plain data structures, errors and configuration shared by the address
//! cache and its callers. No caching logic lives here.

pub mod config;
pub mod entities;
pub mod error;
pub mod identity;

pub use config::{
    AddressCacheConfig, DEFAULT_MAX_ADDRESSES_PER_CATCHMENT, DEFAULT_TABLE_CAPACITY,
    ENV_MAX_ADDRESSES_PER_CATCHMENT, ENV_TABLE_CAPACITY,
};
pub use entities::{Catchment, CatchmentAddress};
pub use error::{AvniError, AvniResult, ConfigError, LookupError};
pub use identity::{address_level_type_ids, AddressLevelId, AddressLevelTypeId, CatchmentId};
