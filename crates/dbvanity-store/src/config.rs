//! Store access configuration

use serde::{Deserialize, Serialize};

/// Provider records are spread over this many `group` annotations
pub const DEFAULT_NUMBER_OF_GROUPS: u64 = 10;

/// Orders live for one week of blocks
pub const DEFAULT_REQUEST_BTL: u64 = 1800 * 24 * 7;

/// Store access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Owner address whose provider records are trusted
    pub owner: String,
    /// Number of `group` partitions to query
    pub number_of_groups: u64,
    /// Blocks-to-live for newly submitted orders
    pub request_btl: u64,
    /// Blocks-to-live for published provider records
    pub record_btl: u64,
}

impl StoreConfig {
    /// Configuration scoped to a given owner address
    pub fn for_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..Default::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            number_of_groups: DEFAULT_NUMBER_OF_GROUPS,
            request_btl: DEFAULT_REQUEST_BTL,
            record_btl: DEFAULT_REQUEST_BTL,
        }
    }
}
