//! Query compiler configuration

use serde::Deserialize;

/// Default maximum nesting depth of filter expressions
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 20;

/// How filter values and identifiers are written into SQL
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuotingMode {
    /// Interpolate values as received (default)
    #[default]
    Verbatim,
    /// Escape literals, validate identifiers and numbers
    Escaped,
}

/// Compiler configuration
///
/// # Example
///
/// ```toml
/// [compiler]
/// max_filter_depth = 20
/// quoting = "escaped"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Maximum filter expression nesting depth (leaves count as a level)
    /// Default: 20
    pub max_filter_depth: usize,

    /// Quoting mode (verbatim, escaped)
    /// Default: verbatim
    pub quoting: QuotingMode,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
            quoting: QuotingMode::Verbatim,
        }
    }
}
