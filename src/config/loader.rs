//! Loading restriction configuration from JSON.

use std::fs;
use std::path::Path;

use super::types::{RestrictionEntry, RuleOptions};

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the file from disk.
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An object entry has no `target`.
    #[error("Restriction #{index} is missing the required `target`")]
    MissingTarget { index: usize },

    /// A `target` does not compile as a regular expression.
    #[error("Restriction #{index} has an invalid target pattern `{pattern}`: {source}")]
    InvalidTarget {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A substitution key does not compile as a regular expression.
    #[error("Restriction #{index} has an invalid replacement pattern `{pattern}`: {source}")]
    InvalidSubstitution {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Substitution maps only apply to whole-module restrictions.
    #[error(
        "Restriction #{index} (`{target}`) combines `namedImports` with a substitution map; \
         named imports can only be relocated to a module name"
    )]
    UnsupportedNamedReplacement { index: usize, target: String },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reads restriction entries from a JSON file.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use restrict_imports::config::parse_file;
///
/// let entries = parse_file(Path::new("restricted-imports.json"))?;
/// println!("{} restrictions", entries.len());
/// ```
pub fn parse_file(path: &Path) -> ConfigResult<Vec<RestrictionEntry>> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses restriction entries from a JSON string.
///
/// Both the flat list and the `{ "paths": [...] }` shape are accepted.
///
/// # Example
///
/// ```
/// use restrict_imports::config::parse_str;
///
/// let entries = parse_str(r#"{ "paths": ["lodash", { "target": "react", "replacement": "preact" }] }"#).unwrap();
/// assert_eq!(entries.len(), 2);
/// ```
pub fn parse_str(content: &str) -> ConfigResult<Vec<RestrictionEntry>> {
    let options: RuleOptions = serde_json::from_str(content)?;
    Ok(options.into_entries())
}
