// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Insertion and longest-prefix-match lookup over the node arena.

use crate::data_structures::radix_tree::arena::{NodeArena, NULL_PTR, ROOT_PTR};
use crate::data_structures::radix_tree::config::{DuplicatePolicy, RadixTreeConfig, DEFAULT_CAPACITY};
use crate::data_structures::radix_tree::error::{RadixTreeError, RadixTreeResult};
use crate::data_structures::radix_tree::payload::{BitSlots, IntSlots, PayloadStore, NO_VALUE};
use crate::net::{self, MAX_PREFIX_LEN};

/// Binary trie over the 32 bits of an IPv4 address, most significant first.
///
/// Use the [`RadixIntTree`] and [`RadixSetTree`] aliases rather than naming
/// the payload store directly.
///
/// The tree is built through `&mut self` and queried through `&self`. Once
/// loading is finished it can be wrapped in an `Arc` and shared between
/// threads for lock-free lookups.
#[derive(Debug, Clone)]
pub struct RadixTree<P> {
    arena: NodeArena<P>,
    duplicate_policy: DuplicatePolicy,
}

/// Tree mapping prefixes to `i32` values.
///
/// # Examples
///
/// ```
/// use ipv4_radix_lib::data_structures::radix_tree::{RadixIntTree, NO_VALUE};
///
/// let mut tree = RadixIntTree::new();
/// tree.put_cidr("10.0.0.0/24", 42).unwrap();
/// tree.put_cidr("10.0.0.0/8", 69).unwrap();
///
/// assert_eq!(tree.select_value(0x0a20_2020), 69);
/// assert_eq!(tree.select_value(0x0a00_0020), 42);
/// assert_eq!(tree.select_value(0x0b01_0203), NO_VALUE);
/// ```
pub type RadixIntTree = RadixTree<IntSlots>;

/// Tree recording prefix membership only, one bit per node.
///
/// # Examples
///
/// ```
/// use ipv4_radix_lib::data_structures::radix_tree::RadixSetTree;
///
/// let mut tree = RadixSetTree::new();
/// tree.put_cidr("192.168.0.0/16").unwrap();
///
/// assert!(tree.contains_ip("192.168.10.1").unwrap());
/// assert!(!tree.contains_ip("192.169.0.1").unwrap());
/// ```
pub type RadixSetTree = RadixTree<BitSlots>;

/// Returns the address bit consumed at `depth` (0 is the most significant).
#[inline]
fn bit_at(key: u32, depth: u8) -> bool {
    (key >> (31 - depth)) & 1 == 1
}

impl<P: PayloadStore> RadixTree<P> {
    /// Creates an empty tree with room for 1024 nodes.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::allocate(DEFAULT_CAPACITY),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    ///
    /// # Errors
    ///
    /// `InvalidCapacity` if `capacity` is zero, or for [`RadixSetTree`] not a
    /// multiple of 32.
    pub fn with_capacity(capacity: usize) -> RadixTreeResult<Self> {
        Self::with_config(RadixTreeConfig::new().with_initial_capacity(capacity))
    }

    /// Creates an empty tree from a configuration.
    pub fn with_config(config: RadixTreeConfig) -> RadixTreeResult<Self> {
        Ok(Self {
            arena: NodeArena::with_capacity(config.initial_capacity())?,
            duplicate_policy: config.duplicate_policy(),
        })
    }

    /// Writes `value` at the node for the top `prefix_len` bits of `key`,
    /// materializing any missing nodes on the way.
    fn insert(&mut self, key: u32, prefix_len: u8, value: P::Value) -> RadixTreeResult<()> {
        if prefix_len > MAX_PREFIX_LEN {
            return Err(RadixTreeError::InvalidPrefixLength(u32::from(prefix_len)));
        }
        P::check_value(&value)?;

        let mut node = ROOT_PTR;
        let mut depth = 0;

        while depth < prefix_len {
            let next = self.arena.child(node, bit_at(key, depth));
            if next == NULL_PTR {
                break;
            }
            node = next;
            depth += 1;
        }

        // A duplicate is only possible when the whole path already existed.
        if depth == prefix_len
            && self.duplicate_policy == DuplicatePolicy::Reject
            && self.arena.payload(node).is_some()
        {
            return Err(RadixTreeError::DuplicateKey { key, prefix_len });
        }

        while depth < prefix_len {
            let next = self.arena.ensure_node()?;
            self.arena.set_child(node, bit_at(key, depth), next);
            node = next;
            depth += 1;
        }

        self.arena.set_payload(node, value);
        Ok(())
    }

    /// Walks `key` from the root and returns the payload of the deepest
    /// non-empty node on the path.
    fn lookup(&self, key: u32) -> Option<P::Value> {
        let mut best = None;
        let mut node = ROOT_PTR;
        let mut depth = 0;

        loop {
            if let Some(value) = self.arena.payload(node) {
                best = Some(value);
            }
            if depth == MAX_PREFIX_LEN {
                break;
            }
            node = self.arena.child(node, bit_at(key, depth));
            if node == NULL_PTR {
                break;
            }
            depth += 1;
        }

        best
    }

    /// Returns the number of nodes in the tree (not the number of prefixes).
    pub fn size(&self) -> usize {
        self.arena.size()
    }

    /// Returns the number of nodes the arena can hold before growing.
    pub fn allocated_size(&self) -> usize {
        self.arena.allocated_size()
    }

    /// Returns the heap bytes held by the node arrays.
    pub fn memory_usage(&self) -> usize {
        self.arena.heap_bytes()
    }

    /// Returns the policy applied when a prefix is inserted twice.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }
}

impl<P: PayloadStore> Default for RadixTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixTree<IntSlots> {
    /// Associates `value` with the prefix `key/prefix_len`.
    ///
    /// Re-inserting a prefix replaces its value under
    /// [`DuplicatePolicy::Overwrite`] and fails with `DuplicateKey` under
    /// [`DuplicatePolicy::Reject`].
    ///
    /// # Errors
    ///
    /// `InvalidPrefixLength` if `prefix_len > 32`, `ReservedValue` if `value`
    /// is [`NO_VALUE`].
    pub fn put(&mut self, key: u32, prefix_len: u8, value: i32) -> RadixTreeResult<()> {
        self.insert(key, prefix_len, value)
    }

    /// Like [`put`](Self::put), with the prefix given as a netmask word
    /// (`0xffffff00` for a /24).
    pub fn put_masked(&mut self, key: u32, mask: u32, value: i32) -> RadixTreeResult<()> {
        self.insert(key, net::mask_to_prefix_len(mask)?, value)
    }

    /// Like [`put`](Self::put), with the prefix in `a.b.c.d/e` notation.
    pub fn put_cidr(&mut self, cidr: &str, value: i32) -> RadixTreeResult<()> {
        let cidr = net::parse_cidr(cidr)?;
        self.insert(cidr.addr, cidr.prefix_len, value)
    }

    /// Returns the value of the most specific prefix covering `key`, or
    /// [`NO_VALUE`] when none does.
    pub fn select_value(&self, key: u32) -> i32 {
        self.lookup(key).unwrap_or(NO_VALUE)
    }

    /// Returns the value of the most specific prefix covering `key`.
    pub fn get(&self, key: u32) -> Option<i32> {
        self.lookup(key)
    }

    /// Like [`select_value`](Self::select_value), for a dotted-quad address.
    pub fn select_ip(&self, ip: &str) -> RadixTreeResult<i32> {
        Ok(self.select_value(net::parse_ipv4(ip)?))
    }
}

impl RadixTree<BitSlots> {
    /// Adds the prefix `key/prefix_len` to the set.
    ///
    /// # Errors
    ///
    /// `InvalidPrefixLength` if `prefix_len > 32`; `DuplicateKey` if the
    /// prefix is already present under [`DuplicatePolicy::Reject`].
    pub fn put(&mut self, key: u32, prefix_len: u8) -> RadixTreeResult<()> {
        self.insert(key, prefix_len, ())
    }

    /// Like [`put`](Self::put), with the prefix given as a netmask word.
    pub fn put_masked(&mut self, key: u32, mask: u32) -> RadixTreeResult<()> {
        self.insert(key, net::mask_to_prefix_len(mask)?, ())
    }

    /// Like [`put`](Self::put), with the prefix in `a.b.c.d/e` notation.
    pub fn put_cidr(&mut self, cidr: &str) -> RadixTreeResult<()> {
        let cidr = net::parse_cidr(cidr)?;
        self.insert(cidr.addr, cidr.prefix_len, ())
    }

    /// Returns true if any prefix in the set covers `key`.
    pub fn contains_key(&self, key: u32) -> bool {
        self.lookup(key).is_some()
    }

    /// Like [`contains_key`](Self::contains_key), for a dotted-quad address.
    pub fn contains_ip(&self, ip: &str) -> RadixTreeResult<bool> {
        Ok(self.contains_key(net::parse_ipv4(ip)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_cidr_inclusion() {
        let mut tree = RadixIntTree::with_capacity(100).unwrap();
        tree.put_masked(0x0a00_0000, 0xffff_ff00, 42).unwrap();
        tree.put_masked(0x0a00_0000, 0xff00_0000, 69).unwrap();

        assert_eq!(tree.select_value(0x0a20_2020), 69);
        assert_eq!(tree.select_value(0x0a00_0020), 42);
        assert_eq!(tree.select_value(0x0b01_0203), NO_VALUE);
    }

    #[test]
    fn test_contains_key() {
        let mut tree = RadixSetTree::with_capacity(32).unwrap();
        tree.put_masked(0x0a00_0000, 0xffff_ff00).unwrap();
        tree.put_masked(0x0a00_0000, 0xff00_0000).unwrap();

        assert!(tree.contains_key(0x0a20_2020));
        assert!(tree.contains_key(0x0a00_0020));
        assert!(!tree.contains_key(0x0b01_0203));
    }

    #[test]
    fn test_put_creates_one_node_per_bit() {
        let mut tree = RadixIntTree::new();
        assert_eq!(tree.size(), 1);

        tree.put(0x0a00_0000, 8, 1).unwrap();
        assert_eq!(tree.size(), 9);

        // Shares the first eight levels.
        tree.put(0x0a00_0000, 24, 2).unwrap();
        assert_eq!(tree.size(), 25);

        // Shorter prefix on an existing path adds nothing.
        tree.put(0x0a00_0000, 16, 3).unwrap();
        assert_eq!(tree.size(), 25);
        assert_eq!(tree.select_value(0x0a00_ff00), 3);
    }

    #[test]
    fn test_zero_length_prefix_matches_everything() {
        let mut tree = RadixIntTree::new();
        tree.put(0xdead_beef, 0, 7).unwrap();
        assert_eq!(tree.size(), 1);

        assert_eq!(tree.select_value(0), 7);
        assert_eq!(tree.select_value(u32::MAX), 7);

        tree.put_cidr("10.0.0.0/8", 10).unwrap();
        assert_eq!(tree.select_value(0x0a01_0101), 10);
        assert_eq!(tree.select_value(0x0b01_0101), 7);
    }

    #[test]
    fn test_host_prefix() {
        let mut tree = RadixSetTree::new();
        tree.put_cidr("192.0.2.1/32").unwrap();
        assert_eq!(tree.size(), 33);

        assert!(tree.contains_ip("192.0.2.1").unwrap());
        assert!(!tree.contains_ip("192.0.2.0").unwrap());
        assert!(!tree.contains_ip("192.0.2.2").unwrap());
    }

    #[test]
    fn test_all_ones_and_all_zeros_hosts() {
        let mut tree = RadixIntTree::new();
        tree.put(u32::MAX, 32, 1).unwrap();
        tree.put(0, 32, 2).unwrap();

        assert_eq!(tree.get(u32::MAX), Some(1));
        assert_eq!(tree.get(0), Some(2));
        assert_eq!(tree.get(1), None);
        assert_eq!(tree.get(u32::MAX - 1), None);
    }

    #[test]
    fn test_overwrite_keeps_last_value() {
        let mut tree = RadixIntTree::new();
        tree.put_cidr("172.16.0.0/12", 1).unwrap();
        let size = tree.size();
        tree.put_cidr("172.16.0.0/12", 2).unwrap();

        assert_eq!(tree.size(), size);
        assert_eq!(tree.select_ip("172.20.1.1").unwrap(), 2);
    }

    #[test]
    fn test_reject_policy() {
        let config = RadixTreeConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
        let mut tree = RadixIntTree::with_config(config).unwrap();

        tree.put(0xc0a8_0000, 16, 1).unwrap();
        assert_eq!(
            tree.put(0xc0a8_0000, 16, 2),
            Err(RadixTreeError::DuplicateKey {
                key: 0xc0a8_0000,
                prefix_len: 16
            })
        );
        assert_eq!(tree.select_value(0xc0a8_0101), 1);

        // A routing node without a payload is not a duplicate.
        tree.put(0xc0a8_0000, 24, 3).unwrap();
        tree.put(0xc0a8_0000, 20, 4).unwrap();
        assert_eq!(tree.select_value(0xc0a8_0101), 4);

        let mut set = RadixSetTree::with_config(
            RadixTreeConfig::new()
                .with_initial_capacity(64)
                .with_duplicate_policy(DuplicatePolicy::Reject),
        )
        .unwrap();
        set.put(0, 0).unwrap();
        assert!(matches!(set.put(0, 0), Err(RadixTreeError::DuplicateKey { .. })));
    }

    #[test]
    fn test_invalid_inputs_leave_tree_untouched() {
        let mut tree = RadixIntTree::new();
        tree.put_cidr("10.0.0.0/8", 1).unwrap();
        let size = tree.size();

        assert_eq!(tree.put(0, 33, 5), Err(RadixTreeError::InvalidPrefixLength(33)));
        assert_eq!(tree.put(0, 8, NO_VALUE), Err(RadixTreeError::ReservedValue(NO_VALUE)));
        assert_eq!(tree.put_masked(0, 0xff00_ff00, 5), Err(RadixTreeError::InvalidMask(0xff00_ff00)));
        assert!(matches!(tree.put_cidr("10.0.0.0", 5), Err(RadixTreeError::Parse { .. })));
        assert!(matches!(tree.put_cidr("10.0.0/8", 5), Err(RadixTreeError::Parse { .. })));
        assert!(matches!(tree.select_ip("not-an-ip"), Err(RadixTreeError::Parse { .. })));

        assert_eq!(tree.size(), size);
        assert_eq!(tree.select_value(0x0a00_0001), 1);
    }

    #[test]
    fn test_capacity_rules_per_variant() {
        assert!(RadixIntTree::with_capacity(0).is_err());
        assert!(RadixIntTree::with_capacity(100).is_ok());
        assert!(RadixSetTree::with_capacity(100).is_err());
        assert!(RadixSetTree::with_capacity(0).is_err());
        assert!(RadixSetTree::with_capacity(96).is_ok());
    }

    #[test]
    fn test_growth_boundary() {
        let mut tree = RadixSetTree::with_capacity(32).unwrap();

        // Root plus 31 new nodes fills the arena exactly.
        tree.put(0x8000_0000, 31).unwrap();
        assert_eq!(tree.size(), 32);
        assert_eq!(tree.allocated_size(), 32);

        // One more node forces a doubling.
        tree.put(0x0000_0000, 1).unwrap();
        assert_eq!(tree.size(), 33);
        assert_eq!(tree.allocated_size(), 64);

        assert!(tree.contains_key(0x8000_0001));
        assert!(tree.contains_key(0x0000_0001));
        assert!(!tree.contains_key(0xc000_0000));
    }

    #[test]
    fn test_growth_is_transparent() {
        let prefixes: Vec<(u32, u8, i32)> = (0..200u32)
            .map(|i| (i.wrapping_mul(0x9e37_79b9), (i % 33) as u8, i as i32))
            .collect();

        let mut small = RadixIntTree::with_capacity(1).unwrap();
        let mut large = RadixIntTree::with_capacity(1 << 14).unwrap();
        for &(key, len, value) in &prefixes {
            small.put(key, len, value).unwrap();
            large.put(key, len, value).unwrap();
        }

        assert_eq!(small.size(), large.size());
        assert_eq!(large.allocated_size(), 1 << 14);
        for i in 0..5_000u32 {
            let probe = i.wrapping_mul(0x85eb_ca6b);
            assert_eq!(small.select_value(probe), large.select_value(probe));
        }
        for &(key, _, _) in &prefixes {
            assert_eq!(small.select_value(key), large.select_value(key));
        }
    }

    #[test]
    fn test_memory_usage_reflects_variant() {
        let ints = RadixIntTree::with_capacity(1024).unwrap();
        let bits = RadixSetTree::with_capacity(1024).unwrap();
        assert!(ints.memory_usage() >= 1024 * 12);
        assert!(bits.memory_usage() >= 1024 * 8 + 128);
        assert!(bits.memory_usage() < ints.memory_usage());
    }

    /// Loads once, then hammers the frozen tree from several readers.
    #[test]
    fn test_concurrent_readers() {
        const THREAD_COUNT: usize = 8;

        let mut tree = RadixIntTree::new();
        for octet in 0..=255u32 {
            tree.put(octet << 24, 8, octet as i32).unwrap();
        }
        tree.put_cidr("10.1.0.0/16", 1000).unwrap();

        let tree = Arc::new(tree);
        let barrier = Arc::new(Barrier::new(THREAD_COUNT));
        let mut handles = Vec::with_capacity(THREAD_COUNT);

        for t in 0..THREAD_COUNT {
            let tree = Arc::clone(&tree);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                for i in 0..10_000u32 {
                    let key = i.wrapping_mul(2_654_435_761).wrapping_add(t as u32);
                    let expected = if key >> 16 == 0x0a01 { 1000 } else { (key >> 24) as i32 };
                    assert_eq!(tree.select_value(key), expected);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
