//! Loader configuration module.
//!
//! Describes the prefix database the command line tools read.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use crate::loader::LineFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoaderConfig {
    /// Prefix database to load when none is given on the command line
    pub database: Option<PathBuf>,

    /// Line dialect of valued databases
    pub format: LineFormat,

    /// Treat the database as a plain prefix list (no values)
    pub membership: bool,
}

impl Validate for LoaderConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.membership && self.format == LineFormat::Nginx {
            return Err(ConfigError::ValidationError(
                "the nginx format carries values and cannot be used for membership databases"
                    .to_string(),
            ));
        }

        if let Some(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "database path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
