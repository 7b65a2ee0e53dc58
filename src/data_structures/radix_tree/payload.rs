// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Payload storage for radix tree nodes.
//!
//! The node arena keeps child links in plain index arrays and delegates the
//! per-node payload to a [`PayloadStore`]. Two stores are provided:
//!
//! - [`IntSlots`] keeps one signed 32-bit slot per node, with [`NO_VALUE`]
//!   marking an empty slot.
//! - [`BitSlots`] keeps a single presence bit per node, packed 32 bits to a
//!   word, for membership-only sets.

use crate::data_structures::radix_tree::error::{RadixTreeError, RadixTreeResult};

/// Value reserved to mark an empty slot in [`IntSlots`]. It can't be stored.
pub const NO_VALUE: i32 = -1;

/// Number of presence bits packed into one [`BitSlots`] word.
pub const BITS_PER_WORD: usize = u32::BITS as usize;

/// Per-node payload storage addressed by node index.
///
/// Every method takes indices below the capacity last passed to
/// [`allocate`](PayloadStore::allocate) or [`grow`](PayloadStore::grow).
pub trait PayloadStore {
    /// What a node carries when it terminates a prefix.
    type Value: Copy;

    /// Checks that `capacity` nodes can be backed by this store.
    fn check_capacity(capacity: usize) -> RadixTreeResult<()>;

    /// Checks that `value` can be stored as real data.
    fn check_value(_value: &Self::Value) -> RadixTreeResult<()> {
        Ok(())
    }

    /// Allocates storage for `capacity` nodes, all empty.
    fn allocate(capacity: usize) -> Self;

    /// Extends storage to `capacity` nodes, preserving existing payloads.
    fn grow(&mut self, capacity: usize);

    /// Marks the node at `index` as empty.
    fn clear(&mut self, index: usize);

    /// Stores `value` at `index`, replacing whatever was there.
    fn set(&mut self, index: usize, value: Self::Value);

    /// Returns the payload at `index`, or `None` if the node is empty.
    fn get(&self, index: usize) -> Option<Self::Value>;

    /// Heap bytes held by the store.
    fn heap_bytes(&self) -> usize;
}

/// One `i32` slot per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntSlots {
    slots: Vec<i32>,
}

impl PayloadStore for IntSlots {
    type Value = i32;

    fn check_capacity(capacity: usize) -> RadixTreeResult<()> {
        if capacity == 0 {
            return Err(RadixTreeError::InvalidCapacity {
                capacity,
                reason: "must be larger than 0".to_string(),
            });
        }
        Ok(())
    }

    fn check_value(value: &i32) -> RadixTreeResult<()> {
        if *value == NO_VALUE {
            return Err(RadixTreeError::ReservedValue(*value));
        }
        Ok(())
    }

    fn allocate(capacity: usize) -> Self {
        Self {
            slots: vec![NO_VALUE; capacity],
        }
    }

    fn grow(&mut self, capacity: usize) {
        self.slots.resize(capacity, NO_VALUE);
    }

    #[inline]
    fn clear(&mut self, index: usize) {
        self.slots[index] = NO_VALUE;
    }

    #[inline]
    fn set(&mut self, index: usize, value: i32) {
        self.slots[index] = value;
    }

    #[inline]
    fn get(&self, index: usize) -> Option<i32> {
        match self.slots[index] {
            NO_VALUE => None,
            value => Some(value),
        }
    }

    fn heap_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<i32>()
    }
}

/// One presence bit per node, packed into `u32` words.
///
/// Capacities must be multiples of [`BITS_PER_WORD`] so that every word is
/// fully addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSlots {
    words: Vec<u32>,
}

impl BitSlots {
    #[inline]
    fn locate(index: usize) -> (usize, u32) {
        (index / BITS_PER_WORD, 1u32 << (index % BITS_PER_WORD))
    }

    fn words_for(capacity: usize) -> usize {
        (capacity + BITS_PER_WORD - 1) / BITS_PER_WORD
    }
}

impl PayloadStore for BitSlots {
    type Value = ();

    fn check_capacity(capacity: usize) -> RadixTreeResult<()> {
        if capacity == 0 || capacity % BITS_PER_WORD != 0 {
            return Err(RadixTreeError::InvalidCapacity {
                capacity,
                reason: format!("must be larger than 0 and divisible by {BITS_PER_WORD}"),
            });
        }
        Ok(())
    }

    fn allocate(capacity: usize) -> Self {
        Self {
            words: vec![0; Self::words_for(capacity)],
        }
    }

    fn grow(&mut self, capacity: usize) {
        self.words.resize(Self::words_for(capacity), 0);
    }

    #[inline]
    fn clear(&mut self, index: usize) {
        let (word, bit) = Self::locate(index);
        self.words[word] &= !bit;
    }

    #[inline]
    fn set(&mut self, index: usize, _value: ()) {
        let (word, bit) = Self::locate(index);
        self.words[word] |= bit;
    }

    #[inline]
    fn get(&self, index: usize) -> Option<()> {
        let (word, bit) = Self::locate(index);
        (self.words[word] & bit != 0).then_some(())
    }

    fn heap_bytes(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<u32>()
    }
}
