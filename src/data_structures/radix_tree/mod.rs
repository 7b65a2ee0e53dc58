// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! IPv4 radix tree for longest-prefix-match classification.
//!
//! A binary trie indexed by the 32 bits of an IPv4 address. Each prefix of
//! length `L` is stored at depth `L`, and a lookup walks the address bits from
//! the root, keeping the payload of the deepest non-empty node it passes.
//! That payload belongs to the most specific prefix covering the address.
//!
//! # Features
//!
//! - Nodes are `u32` indices into parallel arrays rather than heap objects,
//!   so a node costs 8 bytes of links plus its payload.
//! - Storage doubles in place when full; indices survive reallocation.
//! - Two payload variants: [`RadixIntTree`] stores an `i32` per prefix,
//!   [`RadixSetTree`] stores a single bit per node.
//! - Configurable handling of duplicate prefixes via [`DuplicatePolicy`].
//!
//! # Example
//!
//! ```
//! use ipv4_radix_lib::data_structures::radix_tree::{
//!     DuplicatePolicy, RadixIntTree, RadixTreeConfig, RadixTreeError,
//! };
//!
//! let config = RadixTreeConfig::new()
//!     .with_initial_capacity(4096)
//!     .with_duplicate_policy(DuplicatePolicy::Reject);
//! let mut tree = RadixIntTree::with_config(config).unwrap();
//!
//! tree.put(0x0a00_0000, 8, 69).unwrap();
//! assert!(matches!(
//!     tree.put(0x0a00_0000, 8, 70),
//!     Err(RadixTreeError::DuplicateKey { .. })
//! ));
//! assert_eq!(tree.get(0x0a01_0203), Some(69));
//! ```
//!
//! # Concurrency
//!
//! Building requires `&mut self`, so loads are single-writer by
//! construction. A finished tree is `Sync` and can be shared through an
//! `Arc` for concurrent lookups.

mod arena;
mod config;
mod error;
mod payload;
mod tree;

pub use config::{DuplicatePolicy, RadixTreeConfig, DEFAULT_CAPACITY};
pub use error::{RadixTreeError, RadixTreeResult};
pub use payload::{BitSlots, IntSlots, PayloadStore, BITS_PER_WORD, NO_VALUE};
pub use tree::{RadixIntTree, RadixSetTree, RadixTree};
