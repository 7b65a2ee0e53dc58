//! Lookup configuration module.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on verification threads.
const MAX_WORKER_THREADS: usize = 1024;

/// Lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupConfig {
    /// Number of threads sharing a loaded tree during verification
    pub worker_threads: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(ConfigError::ValueOutOfRange {
                key: "lookup.worker_threads".to_string(),
                message: format!("must be between 1 and {MAX_WORKER_THREADS}"),
            });
        }
        Ok(())
    }
}
