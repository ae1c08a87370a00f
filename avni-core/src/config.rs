//! Address cache configuration.
//!
//! Both tunables are startup configuration loaded from environment
//! variables, with defaults matching the production deployment.

use std::num::NonZeroUsize;

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable for the per-table maximum entry count.
pub const ENV_TABLE_CAPACITY: &str = "AVNI_ADDRESS_CACHE_CAPACITY";

/// Environment variable for the per-catchment admission threshold.
pub const ENV_MAX_ADDRESSES_PER_CATCHMENT: &str = "AVNI_ADDRESS_CACHE_MAX_ADDRESSES_PER_CATCHMENT";

/// Default number of entries each cache table may hold.
pub const DEFAULT_TABLE_CAPACITY: usize = 1000;

/// Catchments with more addresses than this are never cached.
pub const DEFAULT_MAX_ADDRESSES_PER_CATCHMENT: usize = 300;

/// Configuration for the catchment address cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCacheConfig {
    /// Maximum number of entries per cache table. Must be at least 1.
    pub table_capacity: usize,

    /// Largest address list that is admitted into the cache.
    /// Lists longer than this bypass the cache and hit the lookup every time.
    pub max_addresses_per_catchment: usize,
}

impl Default for AddressCacheConfig {
    fn default() -> Self {
        Self {
            table_capacity: DEFAULT_TABLE_CAPACITY,
            max_addresses_per_catchment: DEFAULT_MAX_ADDRESSES_PER_CATCHMENT,
        }
    }
}

impl AddressCacheConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-table capacity.
    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    /// Set the admission threshold.
    pub fn with_max_addresses_per_catchment(mut self, max: usize) -> Self {
        self.max_addresses_per_catchment = max;
        self
    }

    /// Create the config from environment variables.
    ///
    /// Environment variables:
    /// - `AVNI_ADDRESS_CACHE_CAPACITY`: entries per table (default: 1000)
    /// - `AVNI_ADDRESS_CACHE_MAX_ADDRESSES_PER_CATCHMENT`: admission threshold (default: 300)
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    ///
    /// Missing variables take the default; unparseable ones are logged and
    /// also take the default.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_capacity = parse_or_default(&var, ENV_TABLE_CAPACITY, DEFAULT_TABLE_CAPACITY);
        let max_addresses_per_catchment = parse_or_default(
            &var,
            ENV_MAX_ADDRESSES_PER_CATCHMENT,
            DEFAULT_MAX_ADDRESSES_PER_CATCHMENT,
        );

        Self {
            table_capacity,
            max_addresses_per_catchment,
        }
    }

    /// Check the config for values the cache cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.non_zero_capacity().map(|_| ())
    }

    /// The table capacity as a `NonZeroUsize`, or an error if it is 0.
    pub fn non_zero_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.table_capacity).ok_or_else(|| ConfigError::InvalidValue {
            field: "table_capacity".to_string(),
            value: self.table_capacity.to_string(),
            reason: "must be at least 1".to_string(),
        })
    }

    /// Whether a lookup result of `len` addresses may be stored.
    pub fn admits(&self, len: usize) -> bool {
        len <= self.max_addresses_per_catchment
    }
}

fn parse_or_default<F>(var: &F, name: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, default, "Ignoring unparseable cache setting");
                default
            }
        },
    }
}
