//! Text edits and their application.
//!
//! An [`EditPlan`] is the unit of fixing: all of its edits are applied or none
//! are. Edits within a plan never overlap, so a plan can be applied in a
//! single back-to-front pass.

use serde::Serialize;
use thiserror::Error;

use crate::analysis::TextRange;

/// Errors raised while applying edits.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FixError {
    #[error("Invalid edit range {range} for text length {len}")]
    OutOfBounds { range: TextRange, len: usize },

    #[error("Edit range {range} does not fall on a character boundary")]
    NotCharBoundary { range: TextRange },
}

/// Result type for fix operations.
pub type FixResult<T> = Result<T, FixError>;

/// A single textual edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

impl TextEdit {
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn remove(range: TextRange) -> Self {
        Self {
            range,
            text: String::new(),
        }
    }

    /// Insert `text` immediately before `offset`.
    pub fn insert_before(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(offset),
            text: text.into(),
        }
    }
}

/// An ordered set of non-overlapping edits applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditPlan {
    edits: Vec<TextEdit>,
    /// Modules this plan adds a brand-new import statement for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    introduces: Vec<String>,
}

impl EditPlan {
    /// Builds a plan, ordering the edits by position.
    ///
    /// Insertions sort before a replacement starting at the same offset, so
    /// inserted text ends up in front of the replaced text.
    pub fn new(mut edits: Vec<TextEdit>) -> Self {
        edits.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(a.range.end.cmp(&b.range.end))
        });
        debug_assert!(
            edits
                .windows(2)
                .all(|w| w[0].range.end <= w[1].range.start),
            "overlapping edits in plan: {:?}",
            edits
        );
        Self {
            edits,
            introduces: Vec::new(),
        }
    }

    /// Records that this plan synthesizes new imports of `modules`.
    pub fn with_introduced(mut self, modules: Vec<String>) -> Self {
        self.introduces = modules;
        self
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn introduces(&self) -> &[String] {
        &self.introduces
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The smallest range covering every edit.
    pub fn span(&self) -> Option<TextRange> {
        let first = self.edits.first()?;
        let end = self.edits.iter().map(|e| e.range.end).max()?;
        Some(TextRange::new(first.range.start, end))
    }

    /// Applies the plan to `text`, returning the edited copy.
    pub fn apply_to(&self, text: &str) -> FixResult<String> {
        let mut out = text.to_string();
        apply_edits(&mut out, self.edits.iter())?;
        Ok(out)
    }
}

/// Returns true if `b` can be applied in the same pass as `a`.
///
/// Plans are compared by span rather than edit by edit, so a plan that
/// touches two distant statements also claims everything between them.
pub fn plans_conflict(a: &EditPlan, b: &EditPlan) -> bool {
    match (a.span(), b.span()) {
        (Some(x), Some(y)) => x.overlaps(&y),
        _ => false,
    }
}

/// Applies every plan that does not conflict with an earlier accepted one.
///
/// Returns the number of plans applied; skipped plans are left for a later
/// pass over the re-parsed text.
pub fn apply_plans(text: &mut String, plans: &[EditPlan]) -> FixResult<usize> {
    let mut accepted: Vec<&EditPlan> = Vec::new();

    for plan in plans.iter().filter(|p| !p.is_empty()) {
        if accepted.iter().any(|taken| plans_conflict(taken, plan)) {
            tracing::debug!("Deferring plan at {:?} to the next pass", plan.span());
            continue;
        }
        accepted.push(plan);
    }

    if accepted.is_empty() {
        return Ok(0);
    }

    let mut edits: Vec<&TextEdit> = accepted.iter().flat_map(|p| p.edits.iter()).collect();
    edits.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(a.range.end.cmp(&b.range.end))
    });
    apply_edits(text, edits.into_iter())?;

    Ok(accepted.len())
}

/// Applies position-sorted, non-overlapping edits back to front.
fn apply_edits<'a>(
    text: &mut String,
    edits: impl DoubleEndedIterator<Item = &'a TextEdit>,
) -> FixResult<()> {
    for edit in edits.rev() {
        let range = edit.range;
        if range.end > text.len() || range.start > range.end {
            return Err(FixError::OutOfBounds {
                range,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return Err(FixError::NotCharBoundary { range });
        }

        text.replace_range(range.start..range.end, &edit.text);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_constructors() {
        assert_eq!(TextEdit::remove(TextRange::new(0, 1)).text, "");
        let insert = TextEdit::insert_before(3, "x");
        assert!(insert.range.is_empty());
        assert_eq!(insert.range.start, 3);
    }

    #[test]
    fn test_plan_orders_insert_before_replace() {
        let plan = EditPlan::new(vec![
            TextEdit::replace(TextRange::new(0, 3), "bar"),
            TextEdit::insert_before(0, "new\n"),
        ]);
        assert!(plan.edits()[0].range.is_empty());
        assert_eq!(plan.apply_to("foo;").unwrap(), "new\nbar;");
    }

    #[test]
    fn test_plan_insert_then_remove() {
        let plan = EditPlan::new(vec![
            TextEdit::remove(TextRange::new(0, 3)),
            TextEdit::insert_before(0, "b;\n"),
        ]);
        assert_eq!(plan.apply_to("a;\nc;\nd;").unwrap(), "b;\nc;\nd;");
    }

    #[test]
    fn test_plan_span() {
        let plan = EditPlan::new(vec![
            TextEdit::replace(TextRange::new(10, 12), "x"),
            TextEdit::insert_before(2, "y"),
        ]);
        assert_eq!(plan.span(), Some(TextRange::new(2, 12)));
        assert_eq!(EditPlan::default().span(), None);
    }

    #[test]
    fn test_out_of_bounds_edit() {
        let plan = EditPlan::new(vec![TextEdit::replace(TextRange::new(2, 10), "x")]);
        assert_eq!(
            plan.apply_to("abc"),
            Err(FixError::OutOfBounds {
                range: TextRange::new(2, 10),
                len: 3
            })
        );
    }

    #[test]
    fn test_char_boundary_edit() {
        let plan = EditPlan::new(vec![TextEdit::replace(TextRange::new(1, 2), "x")]);
        assert!(matches!(
            plan.apply_to("é"),
            Err(FixError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn test_apply_plans_skips_conflicts() {
        let mut text = "aaa bbb ccc".to_string();
        let plans = vec![
            EditPlan::new(vec![TextEdit::replace(TextRange::new(0, 3), "AAA")]),
            EditPlan::new(vec![TextEdit::replace(TextRange::new(2, 5), "zz")]),
            EditPlan::new(vec![TextEdit::replace(TextRange::new(8, 11), "CCC")]),
        ];
        let applied = apply_plans(&mut text, &plans).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(text, "AAA bbb CCC");
    }

    #[test]
    fn test_apply_plans_spanning_plan_claims_middle() {
        let mut text = "one two three".to_string();
        let plans = vec![
            EditPlan::new(vec![
                TextEdit::replace(TextRange::new(0, 3), "1"),
                TextEdit::replace(TextRange::new(8, 13), "3"),
            ]),
            EditPlan::new(vec![TextEdit::replace(TextRange::new(4, 7), "2")]),
        ];
        let applied = apply_plans(&mut text, &plans).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(text, "1 two 3");
    }

    #[test]
    fn test_apply_plans_adjacent_insertions() {
        let mut text = "a;\nb;\n".to_string();
        let plans = vec![
            EditPlan::new(vec![TextEdit::replace(TextRange::new(0, 2), "A;")]),
            EditPlan::new(vec![TextEdit::insert_before(3, "x;\n")]),
        ];
        assert_eq!(apply_plans(&mut text, &plans).unwrap(), 2);
        assert_eq!(text, "A;\nx;\nb;\n");
    }
}
