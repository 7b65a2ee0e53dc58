// Copyright (c) 2025 IPv4 Radix Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! IPv4 address and CIDR parsing.
//!
//! Converts textual addresses and prefixes into the `u32` keys and prefix
//! lengths consumed by the radix tree. Only literal dotted-quad addresses are
//! accepted; no name resolution takes place.

use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::data_structures::radix_tree::{RadixTreeError, RadixTreeResult};

/// Longest IPv4 prefix, in bits.
pub const MAX_PREFIX_LEN: u8 = 32;

/// An IPv4 network in CIDR form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    /// Network address as a host-order integer
    pub addr: u32,
    /// Number of leading bits that identify the network
    pub prefix_len: u8,
}

impl Cidr {
    /// Returns the netmask word for this prefix.
    pub fn mask(&self) -> u32 {
        prefix_len_to_mask(self.prefix_len)
    }

    /// Returns true if `key` falls inside this network.
    pub fn contains(&self, key: u32) -> bool {
        (key ^ self.addr) & self.mask() == 0
    }
}

impl FromStr for Cidr {
    type Err = RadixTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

impl Display for Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.addr), self.prefix_len)
    }
}

/// Parses a dotted-quad address such as `"10.1.2.3"` into a `u32`.
pub fn parse_ipv4(input: &str) -> RadixTreeResult<u32> {
    input
        .trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|e| RadixTreeError::parse(input, e.to_string()))
}

/// Parses `"a.b.c.d/e"` into a [`Cidr`].
///
/// Host bits below the prefix are kept as given; the tree only reads the
/// leading `e` bits.
pub fn parse_cidr(input: &str) -> RadixTreeResult<Cidr> {
    let (addr, len) = input
        .trim()
        .split_once('/')
        .ok_or_else(|| RadixTreeError::parse(input, "missing '/' before the prefix length"))?;

    let addr = addr
        .parse::<Ipv4Addr>()
        .map_err(|e| RadixTreeError::parse(input, e.to_string()))?;
    let prefix_len = len
        .parse::<u8>()
        .map_err(|e| RadixTreeError::parse(input, format!("bad prefix length: {e}")))?;
    if prefix_len > MAX_PREFIX_LEN {
        return Err(RadixTreeError::parse(
            input,
            format!("prefix length {prefix_len} exceeds {MAX_PREFIX_LEN}"),
        ));
    }

    Ok(Cidr {
        addr: u32::from(addr),
        prefix_len,
    })
}

/// Builds the netmask word with the top `prefix_len` bits set.
///
/// Lengths above 32 saturate to a full mask.
pub fn prefix_len_to_mask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        len if len >= MAX_PREFIX_LEN => u32::MAX,
        len => !(u32::MAX >> len),
    }
}

/// Converts a netmask word back to a prefix length.
///
/// # Errors
///
/// `InvalidMask` if the set bits are not contiguous from the top.
pub fn mask_to_prefix_len(mask: u32) -> RadixTreeResult<u8> {
    let len = mask.leading_ones();
    if mask.checked_shl(len).unwrap_or(0) != 0 {
        return Err(RadixTreeError::InvalidMask(mask));
    }
    Ok(len as u8)
}
