//! SQL text rendering helpers
//!
//! All literal and identifier interpolation goes through [`ValueQuoting`],
//! so the policy is chosen in one place.

use crate::error::{AnalyticsError, Result};

/// How client-supplied values and identifiers are written into SQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueQuoting {
    /// Interpolate values exactly as received
    ///
    /// Same tokens and clause shapes as the legacy builder. A value that
    /// contains a quote produces broken SQL.
    #[default]
    Verbatim,
    /// Escape literals and validate identifiers and numeric tokens
    Escaped,
}

impl ValueQuoting {
    /// Quoted string literal: `'value'`
    pub fn string(&self, value: &str) -> String {
        match self {
            Self::Verbatim => format!("'{}'", value),
            Self::Escaped => format!("'{}'", escape_string(value)),
        }
    }

    /// Quoted LIKE pattern with `prefix` and `suffix` wildcards around the value
    pub fn like(&self, prefix: &str, value: &str, suffix: &str) -> String {
        match self {
            Self::Verbatim => format!("'{}{}{}'", prefix, value, suffix),
            Self::Escaped => format!("'{}{}{}'", prefix, escape_like(value), suffix),
        }
    }

    /// Regular expression literal
    ///
    /// Verbatim mode keeps the raw `r'...'` form. Raw literals cannot carry
    /// a quote, so escaped mode switches to an ordinary escaped literal.
    pub fn regex(&self, pattern: &str) -> String {
        match self {
            Self::Verbatim => format!("r'{}'", pattern),
            Self::Escaped => format!("'{}'", escape_string(pattern)),
        }
    }

    /// Unquoted numeric token
    pub fn number<'a>(&self, value: &'a str) -> Result<&'a str> {
        match self {
            Self::Verbatim => Ok(value),
            Self::Escaped => {
                let trimmed = value.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() && !trimmed.is_empty() => Ok(trimmed),
                    _ => Err(AnalyticsError::InvalidNumber(value.to_string())),
                }
            }
        }
    }

    /// Column reference or alias, possibly dotted
    pub fn identifier<'a>(&self, name: &'a str) -> Result<&'a str> {
        match self {
            Self::Verbatim => Ok(name),
            Self::Escaped => {
                if is_identifier(name, |c| c == '_' || c == '.') {
                    Ok(name)
                } else {
                    Err(AnalyticsError::InvalidIdentifier(name.to_string()))
                }
            }
        }
    }

    /// Table coordinate (project, dataset or table id)
    pub fn table_part<'a>(&self, part: &'a str) -> Result<&'a str> {
        match self {
            Self::Verbatim => Ok(part),
            Self::Escaped => {
                if is_identifier(part, |c| c == '_' || c == '-') {
                    Ok(part)
                } else {
                    Err(AnalyticsError::InvalidIdentifier(part.to_string()))
                }
            }
        }
    }
}

/// Turn a dotted column name into a usable alias: `device.category` → `device__category`
pub fn normalize_name(name: &str) -> String {
    name.replace('.', "__")
}

fn is_identifier(s: &str, extra: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || extra(c))
}

/// Escape a string literal body (backslash escapes, BigQuery style)
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape LIKE pattern special characters inside a string literal
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\\\\\"),
            '%' => out.push_str("\\\\%"),
            '_' => out.push_str("\\\\_"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out
}
