//! Data structures for IPv4 prefix classification.
//!
//! Implementations in this module share these properties:
//! - No unsafe code
//! - Index-based storage instead of pointer graphs
//! - Read-only sharing across threads once built

pub mod radix_tree;

// Re-export common data structures
pub use radix_tree::{
    DuplicatePolicy, RadixIntTree, RadixSetTree, RadixTreeConfig, RadixTreeError, RadixTreeResult,
    NO_VALUE,
};
