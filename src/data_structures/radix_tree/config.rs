// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the IPv4 radix tree.

use serde::{Deserialize, Serialize};

/// Default number of nodes preallocated by a new tree.
pub const DEFAULT_CAPACITY: usize = 1024;

/// What `put` does when the prefix already carries a payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the stored payload
    #[default]
    Overwrite,
    /// Fail with `DuplicateKey` and leave the tree untouched
    Reject,
}

/// Configuration for a radix tree.
///
/// Capacity is validated when the tree is built, since the rules depend on
/// the payload variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadixTreeConfig {
    /// Number of nodes to preallocate
    initial_capacity: usize,

    /// Behaviour on re-insertion of an existing prefix
    duplicate_policy: DuplicatePolicy,
}

impl RadixTreeConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - initial_capacity: 1024
    /// - duplicate_policy: Overwrite
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            duplicate_policy: DuplicatePolicy::Overwrite,
        }
    }

    /// Set the number of nodes to preallocate.
    ///
    /// Sizing this to the expected final node count avoids any reallocation
    /// while loading.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the behaviour on re-insertion of an existing prefix.
    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Get the number of nodes to preallocate
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Get the duplicate policy
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }
}

impl Default for RadixTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
