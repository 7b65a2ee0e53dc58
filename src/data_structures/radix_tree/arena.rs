// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Index-addressed node arena backing the radix tree.
//!
//! Nodes live in parallel arrays (`lefts`, `rights` and a payload store)
//! and are referred to by `u32` index. Growth doubles every array at once;
//! since nothing outside the arena holds addresses, indices stay valid
//! across reallocation.

use crate::data_structures::radix_tree::error::{RadixTreeError, RadixTreeResult};
use crate::data_structures::radix_tree::payload::PayloadStore;

/// Marker for an absent child link.
pub(crate) const NULL_PTR: u32 = u32::MAX;

/// Index of the root node, which always exists.
pub(crate) const ROOT_PTR: u32 = 0;

/// Largest node count addressable with `u32` indices ([`NULL_PTR`] excluded).
pub(crate) const MAX_NODES: usize = NULL_PTR as usize;

/// Growable pool of trie nodes.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<P> {
    lefts: Vec<u32>,
    rights: Vec<u32>,
    payloads: P,
    size: usize,
    allocated_size: usize,
}

impl<P: PayloadStore> NodeArena<P> {
    /// Creates an arena for `capacity` nodes holding only an empty root.
    pub(crate) fn with_capacity(capacity: usize) -> RadixTreeResult<Self> {
        if capacity > MAX_NODES {
            return Err(RadixTreeError::InvalidCapacity {
                capacity,
                reason: format!("exceeds the addressable maximum of {MAX_NODES} nodes"),
            });
        }
        P::check_capacity(capacity)?;
        Ok(Self::allocate(capacity))
    }

    /// Unchecked constructor for capacities already known to be valid.
    pub(crate) fn allocate(capacity: usize) -> Self {
        let mut arena = Self {
            lefts: vec![NULL_PTR; capacity],
            rights: vec![NULL_PTR; capacity],
            payloads: P::allocate(capacity),
            size: 1,
            allocated_size: capacity,
        };
        arena.payloads.clear(ROOT_PTR as usize);
        arena
    }

    /// Returns the index of a fresh, childless, empty node.
    pub(crate) fn ensure_node(&mut self) -> RadixTreeResult<u32> {
        if self.size == self.allocated_size {
            self.expand_allocated_size()?;
        }

        let index = self.size;
        self.lefts[index] = NULL_PTR;
        self.rights[index] = NULL_PTR;
        self.payloads.clear(index);
        self.size += 1;

        Ok(index as u32)
    }

    fn expand_allocated_size(&mut self) -> RadixTreeResult<()> {
        let old_size = self.allocated_size;
        if old_size >= MAX_NODES {
            return Err(RadixTreeError::InvalidCapacity {
                capacity: old_size,
                reason: "arena is full and cannot grow past the index space".to_string(),
            });
        }
        let new_size = old_size.saturating_mul(2).min(MAX_NODES);

        tracing::debug!(from = old_size, to = new_size, "Growing radix tree arena");

        self.lefts.resize(new_size, NULL_PTR);
        self.rights.resize(new_size, NULL_PTR);
        self.payloads.grow(new_size);
        self.allocated_size = new_size;

        Ok(())
    }

    /// Follows the edge labelled `bit` out of `node`.
    #[inline]
    pub(crate) fn child(&self, node: u32, bit: bool) -> u32 {
        if bit {
            self.rights[node as usize]
        } else {
            self.lefts[node as usize]
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, node: u32, bit: bool, child: u32) {
        if bit {
            self.rights[node as usize] = child;
        } else {
            self.lefts[node as usize] = child;
        }
    }

    #[inline]
    pub(crate) fn payload(&self, node: u32) -> Option<P::Value> {
        self.payloads.get(node as usize)
    }

    #[inline]
    pub(crate) fn set_payload(&mut self, node: u32, value: P::Value) {
        self.payloads.set(node as usize, value);
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn allocated_size(&self) -> usize {
        self.allocated_size
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        (self.lefts.capacity() + self.rights.capacity()) * std::mem::size_of::<u32>()
            + self.payloads.heap_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::radix_tree::payload::{BitSlots, IntSlots};

    #[test]
    fn test_new_arena_has_empty_root() {
        let arena = NodeArena::<IntSlots>::with_capacity(4).unwrap();
        assert_eq!(arena.size(), 1);
        assert_eq!(arena.allocated_size(), 4);
        assert_eq!(arena.child(ROOT_PTR, false), NULL_PTR);
        assert_eq!(arena.child(ROOT_PTR, true), NULL_PTR);
        assert_eq!(arena.payload(ROOT_PTR), None);
    }

    #[test]
    fn test_capacity_validation() {
        assert!(matches!(
            NodeArena::<IntSlots>::with_capacity(0),
            Err(RadixTreeError::InvalidCapacity { capacity: 0, .. })
        ));
        assert!(matches!(
            NodeArena::<BitSlots>::with_capacity(48),
            Err(RadixTreeError::InvalidCapacity { capacity: 48, .. })
        ));
        assert!(NodeArena::<IntSlots>::with_capacity(1).is_ok());
        assert!(NodeArena::<BitSlots>::with_capacity(32).is_ok());
    }

    #[test]
    fn test_ensure_node_hands_out_sequential_indices() {
        let mut arena = NodeArena::<IntSlots>::with_capacity(8).unwrap();
        assert_eq!(arena.ensure_node().unwrap(), 1);
        assert_eq!(arena.ensure_node().unwrap(), 2);
        assert_eq!(arena.ensure_node().unwrap(), 3);
        assert_eq!(arena.size(), 4);
        assert_eq!(arena.allocated_size(), 8);
    }

    #[test]
    fn test_growth_doubles_and_preserves_nodes() {
        let mut arena = NodeArena::<IntSlots>::with_capacity(2).unwrap();
        let a = arena.ensure_node().unwrap();
        arena.set_child(ROOT_PTR, true, a);
        arena.set_payload(a, 7);
        assert_eq!(arena.allocated_size(), 2);

        let b = arena.ensure_node().unwrap();
        assert_eq!(arena.allocated_size(), 4);
        arena.set_child(a, false, b);
        arena.set_payload(b, 9);

        let c = arena.ensure_node().unwrap();
        let d = arena.ensure_node().unwrap();
        assert_eq!((c, d), (3, 4));
        assert_eq!(arena.allocated_size(), 8);

        assert_eq!(arena.child(ROOT_PTR, true), a);
        assert_eq!(arena.child(a, false), b);
        assert_eq!(arena.payload(a), Some(7));
        assert_eq!(arena.payload(b), Some(9));
        assert_eq!(arena.payload(d), None);
    }

    #[test]
    fn test_bit_arena_growth_keeps_presence_bits() {
        let mut arena = NodeArena::<BitSlots>::with_capacity(32).unwrap();
        for _ in 1..32 {
            arena.ensure_node().unwrap();
        }
        arena.set_payload(31, ());
        assert_eq!(arena.allocated_size(), 32);

        let next = arena.ensure_node().unwrap();
        assert_eq!(next, 32);
        assert_eq!(arena.allocated_size(), 64);
        assert_eq!(arena.payload(31), Some(()));
        assert_eq!(arena.payload(next), None);
    }

    #[test]
    fn test_heap_bytes_tracks_growth() {
        let mut arena = NodeArena::<IntSlots>::with_capacity(1).unwrap();
        let before = arena.heap_bytes();
        arena.ensure_node().unwrap();
        assert!(arena.heap_bytes() > before);
    }
}
