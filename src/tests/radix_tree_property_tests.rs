//! Property-based tests for longest-prefix matching.
//!
//! Every tree is checked against a brute-force scan of the inserted prefixes.

use proptest::prelude::*;

use super::test_utils::{cidr_strategy, PrefixFixture};
use crate::data_structures::radix_tree::{RadixIntTree, RadixSetTree, NO_VALUE};
use crate::loader::{verify_int_tree, LineFormat, PrefixLoader};
use crate::net::Cidr;

/// Expected value for `key`: the last-inserted value of the longest matching prefix.
fn brute_force(entries: &[(Cidr, i32)], key: u32) -> i32 {
    let mut best: Option<(u8, i32)> = None;
    for (cidr, value) in entries {
        if !cidr.contains(key) {
            continue;
        }
        match best {
            Some((len, _)) if len > cidr.prefix_len => {}
            _ => best = Some((cidr.prefix_len, *value)),
        }
    }
    best.map_or(NO_VALUE, |(_, value)| value)
}

fn entries_strategy() -> impl Strategy<Value = Vec<(Cidr, i32)>> {
    prop::collection::vec((cidr_strategy(), 0i32..=i32::MAX), 0..64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn select_matches_brute_force(
        entries in entries_strategy(),
        keys in prop::collection::vec(any::<u32>(), 1..32),
    ) {
        let mut tree = RadixIntTree::new();
        for (cidr, value) in &entries {
            tree.put(cidr.addr, cidr.prefix_len, *value).unwrap();
        }

        // Probe the inserted networks themselves as well as random keys.
        let probes = keys.iter().copied().chain(entries.iter().map(|(c, _)| c.addr));
        for key in probes {
            prop_assert_eq!(tree.select_value(key), brute_force(&entries, key));
        }
    }

    #[test]
    fn initial_capacity_does_not_change_results(
        entries in entries_strategy(),
        keys in prop::collection::vec(any::<u32>(), 1..32),
    ) {
        let mut small = RadixIntTree::with_capacity(1).unwrap();
        let mut large = RadixIntTree::with_capacity(4096).unwrap();
        for (cidr, value) in &entries {
            small.put(cidr.addr, cidr.prefix_len, *value).unwrap();
            large.put(cidr.addr, cidr.prefix_len, *value).unwrap();
        }

        prop_assert_eq!(small.size(), large.size());
        for key in keys {
            prop_assert_eq!(small.select_value(key), large.select_value(key));
        }
    }

    #[test]
    fn membership_matches_brute_force(
        cidrs in prop::collection::vec(cidr_strategy(), 0..64),
        keys in prop::collection::vec(any::<u32>(), 1..32),
    ) {
        let mut tree = RadixSetTree::with_capacity(32).unwrap();
        for cidr in &cidrs {
            tree.put(cidr.addr, cidr.prefix_len).unwrap();
        }

        for key in keys {
            prop_assert_eq!(tree.contains_key(key), cidrs.iter().any(|c| c.contains(key)));
        }
    }

    #[test]
    fn loaded_file_matches_brute_force(
        entries in entries_strategy(),
        keys in prop::collection::vec(any::<u32>(), 1..16),
        nginx in any::<bool>(),
    ) {
        let db: String = entries
            .iter()
            .map(|(cidr, value)| if nginx {
                format!("{cidr}\t{value:x};\n")
            } else {
                format!("{cidr}\t{value}\n")
            })
            .collect();
        let fixture = PrefixFixture::new(&db).unwrap();

        let format = if nginx { LineFormat::Nginx } else { LineFormat::Plain };
        let tree = PrefixLoader::new().with_format(format).load_int_tree(&fixture.db).unwrap();

        let expect: String = keys
            .iter()
            .map(|key| format!("{}\t{}\n", std::net::Ipv4Addr::from(*key), brute_force(&entries, *key)))
            .collect();
        let expect_path = fixture.add_file("expect.txt", &expect).unwrap();

        let report = verify_int_tree(&tree, &expect_path, 2).unwrap();
        prop_assert!(report.is_success(), "{:?}", report.mismatches);
        prop_assert_eq!(report.checked, keys.len());
    }

    #[test]
    fn overwrite_keeps_last_value(cidr in cidr_strategy(), first in 0i32..1000, second in 0i32..1000) {
        let mut tree = RadixIntTree::new();
        tree.put(cidr.addr, cidr.prefix_len, first).unwrap();
        let size = tree.size();
        tree.put(cidr.addr, cidr.prefix_len, second).unwrap();

        prop_assert_eq!(tree.size(), size);
        prop_assert_eq!(tree.select_value(cidr.addr), second);
    }

    #[test]
    fn size_never_exceeds_allocation(cidrs in prop::collection::vec(cidr_strategy(), 0..64)) {
        let mut tree = RadixSetTree::with_capacity(32).unwrap();
        for cidr in &cidrs {
            tree.put(cidr.addr, cidr.prefix_len).unwrap();
            prop_assert!(tree.size() <= tree.allocated_size());
            prop_assert_eq!(tree.allocated_size() % 32, 0);
        }
    }
}

#[test]
fn cidr_text_round_trips_through_tree() {
    crate::run_proptest!(cidr_strategy(), |cidr: Cidr| -> Result<(), TestCaseError> {
        let mut tree = RadixSetTree::with_capacity(32).unwrap();
        tree.put_cidr(&cidr.to_string()).unwrap();
        prop_assert!(tree.contains_key(cidr.addr));
        Ok(())
    });
}
