//! Planning fixes for restricted imports.
//!
//! Whole-module violations are fixed by swapping the source literal. Named
//! violations relocate the flagged bindings: they are removed from the
//! offending statement and either merged into an existing import of the
//! replacement module or written into a new import inserted right before the
//! offending statement.
//!
//! When named bindings stay behind, only the moved specifiers are cut out of
//! the `{ ... }` list, so the rest of the statement keeps its text and
//! comments. Otherwise the statement is regenerated from its remaining
//! specifiers.

use std::collections::HashSet;

use tracing::debug;

use crate::analysis::{ImportSpecifier, ImportStatement, NamedSlot, TextRange};
use crate::fix::{EditPlan, TextEdit};

use super::index::ImportIndex;
use super::render::{render_import, render_named_list, StatementStyle};
use super::violation::{Violation, ViolationKind};

/// Plans the edits that resolve `violations` on `statement`.
///
/// `violations` are the ones [`evaluate`](super::evaluate) produced for this
/// statement. Returns `None` when nothing can be fixed, which is the case
/// whenever no replacement is configured, or when bindings would have to move
/// out of a statement whose specifiers cannot all be reproduced.
pub fn plan(
    statement: &ImportStatement,
    violations: &[Violation],
    index: &ImportIndex<'_>,
) -> Option<EditPlan> {
    let module = statement.module()?;

    if let Some(violation) = violations.iter().find(|v| v.is_module()) {
        return plan_module_rename(statement, module, violation);
    }

    plan_relocation(statement, module, violations, index)
}

fn plan_module_rename(
    statement: &ImportStatement,
    module: &str,
    violation: &Violation,
) -> Option<EditPlan> {
    let replacement = violation.replacement.as_deref()?;
    if replacement == module {
        debug!("Replacement for '{}' is the module itself; nothing to fix", module);
        return None;
    }

    let source = statement.source.as_ref()?;
    Some(EditPlan::new(vec![TextEdit::replace(
        source.range,
        source.quote.quote(replacement),
    )]))
}

fn plan_relocation(
    statement: &ImportStatement,
    module: &str,
    violations: &[Violation],
    index: &ImportIndex<'_>,
) -> Option<EditPlan> {
    if statement.unrepresentable_specifiers {
        debug!(
            "Import on line {} has specifiers that cannot be rewritten; not relocating",
            statement.line
        );
        return None;
    }

    let mut moved_named = Vec::new();
    let mut groups: Vec<(&str, Vec<ImportSpecifier>)> = Vec::new();
    let mut remaining: Vec<ImportSpecifier> = Vec::new();

    for specifier in &statement.specifiers {
        let target = relocation_target(specifier, module, violations);
        if specifier.is_named() {
            moved_named.push(target.is_some());
        }
        match target {
            Some(target) => match groups.iter_mut().find(|(m, _)| *m == target) {
                Some((_, moved)) => moved.push(specifier.clone()),
                None => groups.push((target, vec![specifier.clone()])),
            },
            None => remaining.push(specifier.clone()),
        }
    }

    if groups.is_empty() {
        return None;
    }

    let style = StatementStyle::of(statement);
    let mut edits = Vec::new();
    let mut inserted = String::new();
    let mut introduced = Vec::new();

    for (target, moved) in &groups {
        match index.merge_target(target, statement) {
            Some(existing) => {
                debug!(
                    "Merging {} binding(s) into the import of '{}' on line {}",
                    moved.len(),
                    target,
                    existing.line
                );
                if let Some(edit) = merge_into(existing, target, moved) {
                    edits.push(edit);
                }
            }
            None => {
                debug!(
                    "Adding an import of '{}' before line {}",
                    target, statement.line
                );
                inserted.push_str(&render_import(moved, target, &style, None));
                inserted.push('\n');
                introduced.push(target.to_string());
            }
        }
    }

    if !inserted.is_empty() {
        edits.push(TextEdit::insert_before(statement.insertion_anchor(), inserted));
    }

    if remaining.is_empty() {
        edits.push(TextEdit::remove(statement.line_range));
    } else if let Some(removals) = cut_named(&statement.named_slots, &moved_named) {
        edits.extend(removals);
    } else {
        edits.push(TextEdit::replace(
            statement.range,
            render_import(&remaining, module, &style, statement.attributes.as_deref()),
        ));
    }

    Some(EditPlan::new(edits).with_introduced(introduced))
}

/// Removal edits that cut the moved entries out of a `{ ... }` list.
///
/// `moved` runs parallel to `slots`. Returns `None` if the lists disagree or
/// nothing named would be left, in which case the statement is regenerated.
fn cut_named(slots: &[NamedSlot], moved: &[bool]) -> Option<Vec<TextEdit>> {
    if slots.len() != moved.len() || moved.iter().all(|&m| m) {
        return None;
    }

    let last = slots.len() - 1;
    let mut edits = Vec::new();
    let mut i = 0;

    while i < slots.len() {
        if !moved[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < last && moved[j + 1] {
            j += 1;
        }

        let range = if j < last {
            let end = slots[j]
                .separator_end
                .unwrap_or(slots[j + 1].range.start);
            TextRange::new(slots[i].range.start, end)
        } else {
            // Trailing run: take the separator in front of it instead.
            TextRange::new(slots[i - 1].range.end, slots[j].range.end)
        };
        edits.push(TextEdit::remove(range));
        i = j + 1;
    }

    Some(edits)
}

/// The module a named specifier must move to, if it was flagged with a
/// usable replacement.
fn relocation_target<'v>(
    specifier: &ImportSpecifier,
    module: &str,
    violations: &'v [Violation],
) -> Option<&'v str> {
    let ImportSpecifier::Named { imported, local, .. } = specifier else {
        return None;
    };

    violations.iter().find_map(|v| match &v.kind {
        ViolationKind::NamedImport {
            binding,
            local: flagged_local,
        } if binding == imported.value() && flagged_local == local => v
            .replacement
            .as_deref()
            .filter(|replacement| *replacement != module),
        _ => None,
    })
}

/// Adds `moved` to an existing import of `module`.
///
/// Bindings whose local name the target already binds are skipped. Returns
/// `None` if nothing is left to add.
fn merge_into(
    existing: &ImportStatement,
    module: &str,
    moved: &[ImportSpecifier],
) -> Option<TextEdit> {
    let mut taken: HashSet<&str> = existing
        .specifiers
        .iter()
        .map(|s| s.local_name())
        .collect();

    let additions: Vec<&ImportSpecifier> = moved
        .iter()
        .filter(|s| taken.insert(s.local_name()))
        .collect();

    if additions.is_empty() {
        return None;
    }

    let edit = match existing.named_imports_range {
        Some(braces) => TextEdit::replace(
            braces,
            render_named_list(
                existing.named_specifiers().chain(additions),
                existing.quote(),
            ),
        ),
        None => {
            let mut specifiers = existing.specifiers.clone();
            specifiers.extend(additions.into_iter().cloned());
            TextEdit::replace(
                existing.range,
                render_import(
                    &specifiers,
                    module,
                    &StatementStyle::of(existing),
                    existing.attributes.as_deref(),
                ),
            )
        }
    };

    Some(edit)
}
