//! Tree configuration module.
//!
//! Sizing and duplicate handling for trees built by the command line tools.

use super::{ConfigResult, Validate};
use crate::data_structures::radix_tree::{DuplicatePolicy, RadixTreeConfig, DEFAULT_CAPACITY};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum number of nodes to preallocate, regardless of file size
    pub initial_capacity: usize,

    /// Behaviour when a prefix is inserted twice
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            duplicate_policy: DuplicatePolicy::Overwrite,
        }
    }
}

impl TreeConfig {
    /// Converts to the builder consumed by the radix tree.
    pub fn to_tree_config(&self) -> RadixTreeConfig {
        RadixTreeConfig::new()
            .with_initial_capacity(self.initial_capacity)
            .with_duplicate_policy(self.duplicate_policy)
    }
}

impl Validate for TreeConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "initial_capacity must be greater than 0".to_string(),
            ));
        }

        if self.initial_capacity % 32 != 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "tree.initial_capacity".to_string(),
                message: "must be a multiple of 32 so it suits membership trees".to_string(),
            });
        }

        Ok(())
    }
}
