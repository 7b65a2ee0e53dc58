//! IPv4 Radix Library
//!
//! A memory-lean radix tree keyed by IPv4 addresses, resolving each address
//! to the most specific matching CIDR prefix, together with the parsing,
//! bulk loading and configuration layers used by the `ipv4_radix` binary.
//!
//! # Architecture
//!
//! - [`data_structures::radix_tree`]: the index-based trie core
//! - [`net`]: dotted-quad and CIDR parsing
//! - [`loader`]: prefix database loading and test-file verification
//! - [`config`] and [`error`]: configuration and error reporting

pub mod config;
pub mod data_structures;
pub mod error;
pub mod loader;
pub mod net;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the IPv4 radix tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function
pub fn init() -> error::RadixResult<()> {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));

    config::init_default_config()?;

    Ok(())
}
