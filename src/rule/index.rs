use std::collections::HashMap;

use crate::analysis::ImportStatement;

/// Read-only lookup of a file's top-level imports by module specifier.
///
/// Built once per file so the rewriter can find merge targets without
/// rescanning the statement list.
#[derive(Debug, Default)]
pub struct ImportIndex<'a> {
    statements: &'a [ImportStatement],
    by_module: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ImportIndex<'a> {
    pub fn new(statements: &'a [ImportStatement]) -> Self {
        let mut by_module: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (i, statement) in statements.iter().enumerate() {
            if let Some(module) = statement.module() {
                by_module.entry(module).or_default().push(i);
            }
        }
        Self {
            statements,
            by_module,
        }
    }

    /// All imports of `module`, in file order.
    pub fn imports_of(&self, module: &str) -> impl Iterator<Item = &'a ImportStatement> + '_ {
        let statements = self.statements;
        self.by_module
            .get(module)
            .into_iter()
            .flatten()
            .map(move |&i| &statements[i])
    }

    /// The first import of `module` that named bindings moved out of
    /// `origin` can be merged into.
    ///
    /// Namespace imports cannot take a `{ ... }` list and are skipped, as are
    /// imports of a different kind (`import type` vs value imports) and
    /// imports with specifiers that cannot be regenerated.
    pub fn merge_target(
        &self,
        module: &str,
        origin: &ImportStatement,
    ) -> Option<&'a ImportStatement> {
        self.imports_of(module).find(|candidate| {
            candidate.range != origin.range
                && !candidate.has_namespace()
                && !candidate.unrepresentable_specifiers
                && candidate.kind == origin.kind
        })
    }
}
