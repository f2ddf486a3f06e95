//! Compiled restriction rules.
//!
//! [`RestrictionTable`] turns configuration entries into anchored regular
//! expressions and answers the two questions the evaluator asks: which rule
//! restricts this module, and which rule restricts this named binding.
//!
//! Targets that need look-around or backreferences are compiled with
//! `fancy_regex`; everything else uses `regex`. Substitution patterns always
//! use `regex`, and their replacement strings follow JavaScript `replace`
//! syntax (`$1`, `$<name>`, `$&`, `$$`).
//!
//! # Example
//!
//! ```rust
//! use restrict_imports::config::RestrictionEntry;
//! use restrict_imports::restriction::RestrictionTable;
//!
//! let table = RestrictionTable::build(&[RestrictionEntry::exact("lodash")]).unwrap();
//!
//! assert!(table.match_module("lodash").is_some());
//! assert!(table.match_module("lodash-es").is_none());
//! ```

mod table;
mod template;

pub use table::{Replacement, RestrictionRule, RestrictionTable, RuleScope, Substitution};
