//! Bulk loading of prefix databases.
//!
//! Prefix files are read twice: once to count lines so the tree can be
//! preallocated, once to insert. Two line dialects are understood for
//! valued trees:
//!
//! - [`LineFormat::Plain`]: `a.b.c.d/e<TAB>value`, value in decimal.
//! - [`LineFormat::Nginx`]: `a.b.c.d/e<TAB>value;` as found in nginx `geo`
//!   blocks. The trailing character is stripped and the value is read as
//!   hexadecimal, truncated to 32 bits so `80000000` maps to `i32::MIN`.
//!
//! Membership files hold one CIDR per line. Blank lines are skipped; any other
//! malformed line aborts the load with its line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_structures::radix_tree::{
    DuplicatePolicy, RadixIntTree, RadixSetTree, RadixTreeConfig, RadixTreeError, BITS_PER_WORD,
};
use crate::error::load::LoadError;

pub mod verify;

pub use verify::{verify_int_tree, verify_set_tree, Mismatch, VerifyReport};

/// Line dialect of a valued prefix file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineFormat {
    /// `prefix<TAB>decimal`
    #[default]
    Plain,
    /// `prefix<TAB>hex;`
    Nginx,
}

/// Reads prefix files into radix trees.
#[derive(Debug, Clone, Default)]
pub struct PrefixLoader {
    format: LineFormat,
    duplicate_policy: DuplicatePolicy,
    min_capacity: usize,
}

impl PrefixLoader {
    /// Creates a loader for plain files that overwrites duplicate prefixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line dialect for valued trees.
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the policy applied to prefixes that appear twice.
    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Set a floor for the preallocated node count.
    ///
    /// Membership trees round the floor up to a multiple of 32.
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Get the line dialect
    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// Loads a valued tree from `path`, sized to its line count.
    pub fn load_int_tree(&self, path: impl AsRef<Path>) -> Result<RadixIntTree, LoadError> {
        let path = path.as_ref();
        let lines = count_lines(path)?;
        let capacity = lines.max(self.min_capacity).max(1);
        let tree = self.read_int_tree(open(path)?, capacity)?;

        tracing::info!(
            path = %path.display(),
            lines,
            nodes = tree.size(),
            allocated = tree.allocated_size(),
            format = ?self.format,
            "Loaded valued prefix database"
        );
        Ok(tree)
    }

    /// Loads a membership tree from `path`.
    ///
    /// Capacity is the line count rounded up to the next multiple of 32.
    pub fn load_set_tree(&self, path: impl AsRef<Path>) -> Result<RadixSetTree, LoadError> {
        let path = path.as_ref();
        let lines = count_lines(path)?;
        let floor = self.min_capacity.div_ceil(BITS_PER_WORD) * BITS_PER_WORD;
        let capacity = (lines + BITS_PER_WORD - lines % BITS_PER_WORD).max(floor);
        let tree = self.read_set_tree(open(path)?, capacity)?;

        tracing::info!(
            path = %path.display(),
            lines,
            nodes = tree.size(),
            allocated = tree.allocated_size(),
            "Loaded prefix set"
        );
        Ok(tree)
    }

    /// Builds a valued tree with room for `capacity` nodes from `reader`.
    pub fn read_int_tree<R: BufRead>(
        &self,
        reader: R,
        capacity: usize,
    ) -> Result<RadixIntTree, LoadError> {
        let mut tree = RadixIntTree::with_config(self.tree_config(capacity))?;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| LoadError::io("<reader>", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let (cidr, value) =
                parse_int_line(&line, self.format).map_err(|e| LoadError::line(line_no, e))?;
            tree.put_cidr(cidr, value)
                .map_err(|e| LoadError::line(line_no, e))?;
        }

        Ok(tree)
    }

    /// Builds a membership tree with room for `capacity` nodes from `reader`.
    pub fn read_set_tree<R: BufRead>(
        &self,
        reader: R,
        capacity: usize,
    ) -> Result<RadixSetTree, LoadError> {
        let mut tree = RadixSetTree::with_config(self.tree_config(capacity))?;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LoadError::io("<reader>", e))?;
            let cidr = line.trim();
            if cidr.is_empty() {
                continue;
            }
            tree.put_cidr(cidr)
                .map_err(|e| LoadError::line(index + 1, e))?;
        }

        Ok(tree)
    }

    fn tree_config(&self, capacity: usize) -> RadixTreeConfig {
        RadixTreeConfig::new()
            .with_initial_capacity(capacity)
            .with_duplicate_policy(self.duplicate_policy)
    }
}

/// Loads a valued tree with the default loader settings.
pub fn load_int_tree(path: impl AsRef<Path>, format: LineFormat) -> Result<RadixIntTree, LoadError> {
    PrefixLoader::new().with_format(format).load_int_tree(path)
}

/// Loads a membership tree with the default loader settings.
pub fn load_set_tree(path: impl AsRef<Path>) -> Result<RadixSetTree, LoadError> {
    PrefixLoader::new().load_set_tree(path)
}

pub(crate) fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| LoadError::io(path, e))
}

/// Counts the lines in `path`.
pub fn count_lines(path: impl AsRef<Path>) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let mut count = 0;
    for line in open(path)?.lines() {
        line.map_err(|e| LoadError::io(path, e))?;
        count += 1;
    }
    Ok(count)
}

/// Splits a valued line into its CIDR text and decoded value.
fn parse_int_line(line: &str, format: LineFormat) -> Result<(&str, i32), RadixTreeError> {
    let mut fields = line.split('\t');
    let cidr = fields.next().unwrap_or_default();
    let raw = fields
        .next()
        .ok_or_else(|| RadixTreeError::parse(line, "missing tab-separated value"))?
        .trim();

    let value = match format {
        LineFormat::Plain => raw
            .parse::<i32>()
            .map_err(|e| RadixTreeError::parse(raw, e.to_string()))?,
        LineFormat::Nginx => {
            let mut chars = raw.chars();
            chars.next_back();
            let hex = chars.as_str();
            // Wider parse, then truncate: AS numbers such as 80000000 overflow i32.
            i64::from_str_radix(hex, 16)
                .map(|v| v as i32)
                .map_err(|e| RadixTreeError::parse(raw, format!("bad hex value: {e}")))?
        }
    };

    Ok((cidr, value))
}
