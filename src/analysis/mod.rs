//! Source code analysis module.
//!
//! This module turns JavaScript/TypeScript source into the import facts the
//! restriction rule works on.
//!
//! # Features
//!
//! - Parse ES `import` statements (default, named, namespace imports)
//! - String import names (`import { "a-b" as ab }`)
//! - TypeScript `import type` and inline `type` specifiers
//! - Byte ranges for the statement, its source literal and its `{ ... }` list
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use restrict_imports::analysis::ImportExtractor;
//!
//! let mut extractor = ImportExtractor::new()?;
//! let imports = extractor.extract_file(Path::new("src/index.js"))?;
//!
//! for import in imports {
//!     println!("{:?}: {:?}", import.module(), import.specifiers);
//! }
//! ```

pub mod extractor;
pub mod statement;

// Re-export main types for convenience
pub use extractor::{language_of, AnalysisError, AnalysisResult, ImportExtractor, SourceLanguage};
pub use statement::{
    ImportKind, ImportName, ImportSpecifier, ImportStatement, ModuleSource, NamedSlot, QuoteStyle,
    TextRange,
};
