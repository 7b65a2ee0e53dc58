//! Test modules for the IPv4 radix toolkit.
//!
//! Cross-module tests live here; each data structure keeps its own unit
//! tests next to the code. This module contains:
//! - Configuration loading and validation tests
//! - Error reporting tests
//! - Property-based tests of longest-prefix matching using proptest
//! - Shared fixtures and strategies

pub mod radix_tree_property_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{cidr_strategy, create_test_dir, write_fixture, PrefixFixture};

/// Run a suite of property-based tests using the given configuration, strategy, and test function.
#[macro_export]
macro_rules! run_proptest {
    ($strategy:expr, $test_fn:expr) => {
        proptest::proptest!(
            proptest::test_runner::Config::with_cases(100),
            |(value in $strategy)| {
                $test_fn(value)?;
            }
        )
    };
}
