//! Configuration for restricted imports.
//!
//! A configuration is an ordered list of entries. Each entry is either a bare
//! module name or an object:
//!
//! ```json
//! {
//!   "paths": [
//!     "lodash",
//!     { "target": "react", "replacement": "preact" },
//!     {
//!       "target": "restricted-module",
//!       "namedImports": ["restrictedImport"],
//!       "replacement": "replacement-module"
//!     },
//!     {
//!       "target": "with-partial-replacements",
//!       "replacement": { "par(regExp)?tial-": "successfully-", "with-": "" }
//!     }
//!   ]
//! }
//! ```
//!
//! The `paths` wrapper is optional; a top-level array is accepted as well.

pub mod loader;
pub mod types;

pub use loader::{parse_file, parse_str, ConfigError, ConfigResult};
pub use types::{DetailedEntry, ReplacementConfig, RestrictionEntry, RuleOptions, SubstitutionList};
