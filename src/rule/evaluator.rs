use crate::analysis::{ImportSpecifier, ImportStatement};
use crate::restriction::RestrictionTable;

use super::violation::{Violation, ViolationKind};

/// Classifies one import statement against the restriction table.
///
/// A whole-module hit yields exactly one [`ViolationKind::Module`]. Otherwise
/// every named binding is resolved on its own, so one statement can produce
/// several named-import violations with different replacements. Statements
/// without a plain string-literal source yield nothing.
pub fn evaluate(statement: &ImportStatement, table: &RestrictionTable) -> Vec<Violation> {
    let Some(module) = statement.module() else {
        return Vec::new();
    };

    if let Some((index, rule)) = table.match_module(module) {
        if !rule.is_scoped() {
            return vec![Violation {
                kind: ViolationKind::Module,
                module: module.to_string(),
                rule: index,
                pattern: rule.display_pattern().to_string(),
                replacement: rule.replacement().and_then(|r| r.apply(module)),
            }];
        }
    }

    statement
        .specifiers
        .iter()
        .filter_map(|specifier| match specifier {
            ImportSpecifier::Named { imported, local, .. } => {
                let binding = imported.value();
                table
                    .match_named_binding(module, binding)
                    .map(|(index, rule)| Violation {
                        kind: ViolationKind::NamedImport {
                            binding: binding.to_string(),
                            local: local.clone(),
                        },
                        module: module.to_string(),
                        rule: index,
                        pattern: rule.display_pattern().to_string(),
                        replacement: rule.replacement().and_then(|r| r.apply(module)),
                    })
            }
            _ => None,
        })
        .collect()
}
