//! Lens Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid configuration.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use lens_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[compiler]\nmax_filter_depth = 10").unwrap();
//! assert_eq!(config.compiler.max_filter_depth, 10);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [compiler]
//! max_filter_depth = 20
//! quoting = "verbatim"
//!
//! [table]
//! project = "my-project"
//! dataset = "analytics_123456"
//! ```

mod compiler;
mod error;
mod logging;
mod table;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use compiler::{CompilerConfig, DEFAULT_MAX_FILTER_DEPTH, QuotingMode};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use table::TableConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Query compiler settings
    pub compiler: CompilerConfig,

    /// Default event table coordinates
    pub table: TableConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.compiler.max_filter_depth == 0 {
            return Err(ConfigError::invalid_value(
                "compiler",
                "max_filter_depth",
                "must be at least 1",
            ));
        }
        if self.table.table.is_empty() {
            return Err(ConfigError::invalid_value("table", "table", "must not be empty"));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.compiler.max_filter_depth, DEFAULT_MAX_FILTER_DEPTH);
        assert_eq!(config.compiler.quoting, QuotingMode::Verbatim);
        assert_eq!(config.table.table, "events");
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[compiler]
max_filter_depth = 12
quoting = "escaped"

[table]
project = "acme-prod"
dataset = "analytics_987"
table = "events"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.compiler.max_filter_depth, 12);
        assert_eq!(config.compiler.quoting, QuotingMode::Escaped);
        assert_eq!(config.table.project.as_deref(), Some("acme-prod"));
        assert_eq!(config.table.dataset.as_deref(), Some("analytics_987"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = Config::from_str("[compiler]\nmax_filter_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "max_filter_depth", .. }));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = Config::from_str("[table]\ntable = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { section: "table", .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_str("[compiler\nmax_filter_depth = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[table]\nproject = \"from-file\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.table.project.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
