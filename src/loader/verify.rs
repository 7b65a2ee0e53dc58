//! Replays paired test files against a loaded tree.
//!
//! A test file holds one `address<TAB>expected` pair per line. Every address
//! is looked up and compared with its expectation; mismatches are collected
//! in file order. Lookups can be spread over several threads since a loaded
//! tree is only read.

use std::fmt::Debug;
use std::io::BufRead;
use std::path::Path;
use std::thread;

use serde::Serialize;

use crate::data_structures::radix_tree::{RadixIntTree, RadixSetTree, RadixTreeError};
use crate::error::load::LoadError;
use crate::loader::open;
use crate::net;

/// One test line whose lookup disagreed with the expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch<T> {
    /// 1-based line number in the test file
    pub line: usize,
    /// Address as written in the file
    pub address: String,
    /// Expected result
    pub expected: T,
    /// Result returned by the tree
    pub actual: T,
}

/// Outcome of replaying a test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport<T> {
    /// Number of lines checked
    pub checked: usize,
    /// Failing lines, in file order
    pub mismatches: Vec<Mismatch<T>>,
}

impl<T> VerifyReport<T> {
    /// Returns true if every line matched.
    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }
}

struct Case<T> {
    line: usize,
    address: String,
    key: u32,
    expected: T,
}

/// Checks every `address<TAB>value` line of `path` against [`RadixIntTree::select_value`].
pub fn verify_int_tree(
    tree: &RadixIntTree,
    path: impl AsRef<Path>,
    workers: usize,
) -> Result<VerifyReport<i32>, LoadError> {
    let cases = read_cases(open(path.as_ref())?, |raw| {
        raw.parse::<i32>()
            .map_err(|e| RadixTreeError::parse(raw, e.to_string()))
    })?;
    Ok(run_cases(&cases, workers, |key| tree.select_value(key)))
}

/// Checks every `address<TAB>true|false` line of `path` against [`RadixSetTree::contains_key`].
pub fn verify_set_tree(
    tree: &RadixSetTree,
    path: impl AsRef<Path>,
    workers: usize,
) -> Result<VerifyReport<bool>, LoadError> {
    let cases = read_cases(open(path.as_ref())?, parse_bool)?;
    Ok(run_cases(&cases, workers, |key| tree.contains_key(key)))
}

fn parse_bool(raw: &str) -> Result<bool, RadixTreeError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(RadixTreeError::parse(raw, "expected 'true' or 'false'"))
    }
}

fn read_cases<R, T, F>(reader: R, parse_expected: F) -> Result<Vec<Case<T>>, LoadError>
where
    R: BufRead,
    F: Fn(&str) -> Result<T, RadixTreeError>,
{
    let mut cases = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| LoadError::io("<test file>", e))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let address = fields.next().unwrap_or_default().trim().to_string();
        let raw = fields
            .next()
            .ok_or_else(|| LoadError::line(line_no, RadixTreeError::parse(&line, "missing expected value")))?
            .trim();

        let key = net::parse_ipv4(&address).map_err(|e| LoadError::line(line_no, e))?;
        let expected = parse_expected(raw).map_err(|e| LoadError::line(line_no, e))?;

        cases.push(Case {
            line: line_no,
            address,
            key,
            expected,
        });
    }

    Ok(cases)
}

fn run_cases<T, F>(cases: &[Case<T>], workers: usize, query: F) -> VerifyReport<T>
where
    T: Copy + PartialEq + Debug + Send + Sync,
    F: Fn(u32) -> T + Sync,
{
    let workers = workers.clamp(1, cases.len().max(1));
    let chunk_size = ((cases.len() + workers - 1) / workers).max(1);

    let check = |chunk: &[Case<T>]| -> Vec<Mismatch<T>> {
        chunk
            .iter()
            .filter_map(|case| {
                let actual = query(case.key);
                (actual != case.expected).then(|| Mismatch {
                    line: case.line,
                    address: case.address.clone(),
                    expected: case.expected,
                    actual,
                })
            })
            .collect()
    };

    let mismatches = if workers == 1 {
        check(cases)
    } else {
        let check = &check;
        thread::scope(|scope| {
            let handles: Vec<_> = cases
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || check(chunk)))
                .collect();
            // Chunks are joined in order, which keeps mismatches in file order.
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    };

    tracing::debug!(checked = cases.len(), failed = mismatches.len(), workers, "Verified test cases");

    VerifyReport {
        checked: cases.len(),
        mismatches,
    }
}
