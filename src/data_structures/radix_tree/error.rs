// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the IPv4 radix tree.

/// Errors that can occur in radix tree operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum RadixTreeError {
    /// The requested arena capacity cannot back a tree
    #[error("Invalid capacity {capacity}: {reason}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// A prefix length outside 0..=32
    #[error("Invalid prefix length {0}, must be between 0 and 32")]
    InvalidPrefixLength(u32),

    /// A netmask whose set bits are not contiguous from the top
    #[error("Invalid netmask {0:#010x}: set bits must be contiguous from the most significant bit")]
    InvalidMask(u32),

    /// The value collides with the empty-slot sentinel
    #[error("Value {0} is reserved as the empty-slot marker")]
    ReservedValue(i32),

    /// The prefix already carries a payload and duplicates are rejected
    #[error("Prefix {key:#010x}/{prefix_len} already holds a value")]
    DuplicateKey {
        /// The key that was inserted.
        key: u32,
        /// Its prefix length.
        prefix_len: u8,
    },

    /// Malformed address or CIDR text
    #[error("Failed to parse '{input}': {reason}")]
    Parse {
        /// The offending input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl RadixTreeError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for radix tree operations
pub type RadixTreeResult<T> = std::result::Result<T, RadixTreeError>;
