//! Import statement text synthesis.
//!
//! Pure string functions: given specifiers, a module and a style they always
//! produce a statement, and never look at the surrounding source.

use crate::analysis::{ImportKind, ImportName, ImportSpecifier, ImportStatement, QuoteStyle};

/// Formatting carried over from an existing statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementStyle {
    pub quote: QuoteStyle,
    pub semicolon: bool,
    pub kind: ImportKind,
}

impl StatementStyle {
    pub fn of(statement: &ImportStatement) -> Self {
        Self {
            quote: statement.quote(),
            semicolon: statement.has_semicolon,
            kind: statement.kind,
        }
    }
}

/// Renders one named specifier, e.g. `foo`, `foo as bar`, `"a-b" as ab`,
/// `type Foo`. Default and namespace specifiers render as their local name
/// and `* as name` respectively.
pub fn render_specifier(specifier: &ImportSpecifier, quote: QuoteStyle) -> String {
    match specifier {
        ImportSpecifier::Default(local) => local.clone(),
        ImportSpecifier::Namespace(local) => format!("* as {}", local),
        ImportSpecifier::Named {
            imported,
            local,
            type_only,
        } => {
            let mut out = String::new();
            if *type_only {
                out.push_str("type ");
            }
            match imported {
                ImportName::Identifier(name) if name == local => out.push_str(name),
                ImportName::Identifier(name) => {
                    out.push_str(name);
                    out.push_str(" as ");
                    out.push_str(local);
                }
                ImportName::Str(value) => {
                    out.push_str(&quote.quote(value));
                    out.push_str(" as ");
                    out.push_str(local);
                }
            }
            out
        }
    }
}

/// Renders a `{ ... }` list from the named specifiers in `specifiers`.
pub fn render_named_list<'a>(
    specifiers: impl IntoIterator<Item = &'a ImportSpecifier>,
    quote: QuoteStyle,
) -> String {
    let names: Vec<String> = specifiers
        .into_iter()
        .filter(|s| s.is_named())
        .map(|s| render_specifier(s, quote))
        .collect();
    if names.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", names.join(", "))
    }
}

/// Renders a complete import statement.
///
/// Default comes first, then either the namespace or the named list. With no
/// specifiers at all the result is a side-effect import.
pub fn render_import(
    specifiers: &[ImportSpecifier],
    module: &str,
    style: &StatementStyle,
    attributes: Option<&str>,
) -> String {
    let mut out = String::from("import ");
    if let Some(keyword) = style.kind.keyword() {
        out.push_str(keyword);
        out.push(' ');
    }

    let mut clause: Vec<String> = Vec::new();
    clause.extend(
        specifiers
            .iter()
            .filter(|s| matches!(s, ImportSpecifier::Default(_)))
            .map(|s| render_specifier(s, style.quote)),
    );
    clause.extend(
        specifiers
            .iter()
            .filter(|s| s.is_namespace())
            .map(|s| render_specifier(s, style.quote)),
    );
    if specifiers.iter().any(|s| s.is_named()) {
        clause.push(render_named_list(specifiers, style.quote));
    }

    if !clause.is_empty() {
        out.push_str(&clause.join(", "));
        out.push_str(" from ");
    }
    out.push_str(&style.quote.quote(module));

    if let Some(attributes) = attributes {
        out.push(' ');
        out.push_str(attributes);
    }
    if style.semicolon {
        out.push(';');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(quote: QuoteStyle, semicolon: bool) -> StatementStyle {
        StatementStyle {
            quote,
            semicolon,
            kind: ImportKind::Value,
        }
    }

    // ===== Specifier Tests =====

    #[test]
    fn test_render_plain_and_alias() {
        let q = QuoteStyle::Single;
        assert_eq!(render_specifier(&ImportSpecifier::named("a"), q), "a");
        assert_eq!(
            render_specifier(&ImportSpecifier::aliased("restrictedImport", "aliasName"), q),
            "restrictedImport as aliasName"
        );
    }

    #[test]
    fn test_render_string_name_uses_literal_value() {
        let spec = ImportSpecifier::Named {
            imported: ImportName::Str("kebab-name".to_string()),
            local: "kebab".to_string(),
            type_only: false,
        };
        assert_eq!(render_specifier(&spec, QuoteStyle::Double), "\"kebab-name\" as kebab");
        assert_eq!(render_specifier(&spec, QuoteStyle::Single), "'kebab-name' as kebab");
    }

    #[test]
    fn test_render_inline_type() {
        let spec = ImportSpecifier::Named {
            imported: ImportName::Identifier("FC".to_string()),
            local: "FC".to_string(),
            type_only: true,
        };
        assert_eq!(render_specifier(&spec, QuoteStyle::Single), "type FC");
    }

    // ===== Statement Tests =====

    #[test]
    fn test_render_named_statement() {
        let text = render_import(
            &[ImportSpecifier::named("restrictedImport")],
            "replacement-module",
            &style(QuoteStyle::Single, true),
            None,
        );
        assert_eq!(text, "import { restrictedImport } from 'replacement-module';");
    }

    #[test]
    fn test_render_preserves_double_quotes_without_semicolon() {
        let text = render_import(
            &[ImportSpecifier::named("a"), ImportSpecifier::named("b")],
            "m",
            &style(QuoteStyle::Double, false),
            None,
        );
        assert_eq!(text, r#"import { a, b } from "m""#);
    }

    #[test]
    fn test_render_default_and_named() {
        let text = render_import(
            &[
                ImportSpecifier::named("b"),
                ImportSpecifier::Default("A".to_string()),
            ],
            "m",
            &style(QuoteStyle::Single, true),
            None,
        );
        assert_eq!(text, "import A, { b } from 'm';");
    }

    #[test]
    fn test_render_default_and_namespace() {
        let text = render_import(
            &[
                ImportSpecifier::Default("A".to_string()),
                ImportSpecifier::Namespace("ns".to_string()),
            ],
            "m",
            &style(QuoteStyle::Single, true),
            None,
        );
        assert_eq!(text, "import A, * as ns from 'm';");
    }

    #[test]
    fn test_render_side_effect() {
        let text = render_import(&[], "./polyfill", &style(QuoteStyle::Single, true), None);
        assert_eq!(text, "import './polyfill';");
    }

    #[test]
    fn test_render_type_import_with_attributes() {
        let text = render_import(
            &[ImportSpecifier::named("Config")],
            "./config.json",
            &StatementStyle {
                quote: QuoteStyle::Single,
                semicolon: true,
                kind: ImportKind::Type,
            },
            Some("with { type: 'json' }"),
        );
        assert_eq!(
            text,
            "import type { Config } from './config.json' with { type: 'json' };"
        );
    }

    #[test]
    fn test_render_named_list() {
        let specs = [
            ImportSpecifier::Default("D".to_string()),
            ImportSpecifier::named("existingImport"),
            ImportSpecifier::named("restrictedImport"),
        ];
        assert_eq!(
            render_named_list(&specs, QuoteStyle::Single),
            "{ existingImport, restrictedImport }"
        );
        let empty: &[ImportSpecifier] = &[];
        assert_eq!(render_named_list(empty, QuoteStyle::Single), "{}");
    }
}
