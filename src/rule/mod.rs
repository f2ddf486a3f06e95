//! The import restriction rule.
//!
//! Evaluation and fixing are split the same way a linter splits reporting and
//! autofix:
//!
//! - [`evaluate`] classifies one statement against a
//!   [`RestrictionTable`](crate::restriction::RestrictionTable) and returns
//!   [`Violation`]s.
//! - [`plan`] turns those violations into an [`EditPlan`](crate::fix::EditPlan)
//!   that swaps the module specifier or relocates named bindings.
//!
//! # Example
//!
//! ```ignore
//! let index = ImportIndex::new(&statements);
//! for statement in &statements {
//!     let violations = evaluate(statement, &table);
//!     if let Some(fix) = plan(statement, &violations, &index) {
//!         // collect the fix and apply it with crate::fix::apply_plans
//!     }
//! }
//! ```

mod evaluator;
mod index;
mod render;
mod rewriter;
mod violation;

pub use evaluator::evaluate;
pub use index::ImportIndex;
pub use render::{render_import, render_named_list, render_specifier, StatementStyle};
pub use rewriter::plan;
pub use violation::{Violation, ViolationKind};
