//! restrict-imports - Flags restricted JavaScript/TypeScript imports and
//! rewrites them to their replacements.
//!
//! A list of restrictions names modules (exactly or by regular expression),
//! optionally narrowed to specific named imports, each with an optional
//! replacement. Every top-level `import` declaration is checked against that
//! list, and violations with a replacement get an automatic fix: the module
//! specifier is swapped, or the restricted named bindings are moved to an
//! import of the replacement module.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use restrict_imports::analysis::SourceLanguage;
//! use restrict_imports::config::parse_str;
//! use restrict_imports::lint::Linter;
//! use restrict_imports::restriction::RestrictionTable;
//!
//! let entries = parse_str(r#"[
//!     { "target": "restricted-module", "namedImports": ["restrictedImport"],
//!       "replacement": "replacement-module" }
//! ]"#).unwrap();
//! let mut linter = Linter::new(RestrictionTable::build(&entries).unwrap()).unwrap();
//!
//! let fixed = linter
//!     .fix_source(
//!         "import { restrictedImport, allowed } from 'restricted-module';\n",
//!         SourceLanguage::JavaScript,
//!         Path::new("index.js"),
//!     )
//!     .unwrap();
//! assert_eq!(
//!     fixed.text,
//!     "import { restrictedImport } from 'replacement-module';\n\
//!      import { allowed } from 'restricted-module';\n"
//! );
//! ```

pub mod analysis;
pub mod config;
pub mod fix;
pub mod lint;
pub mod report;
pub mod restriction;
pub mod rule;
