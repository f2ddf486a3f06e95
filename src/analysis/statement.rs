//! Structural facts about a single `import` statement.
//!
//! This is the read-only view the rule works on. It carries everything the
//! rewriter needs to regenerate a statement in its original style: the quote
//! character, the trailing semicolon, the TypeScript import kind and any
//! import attributes, plus the byte ranges edits are anchored to.

use std::fmt;

use serde::Serialize;

/// A half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {}..{}", start, end);
        Self { start, end }
    }

    /// An empty range at `offset`, used for insertions.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the two ranges share at least one byte.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Quote character delimiting a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    /// Detects the style from the opening character of a literal.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(QuoteStyle::Single),
            '"' => Some(QuoteStyle::Double),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }

    /// Quotes `value`, escaping backslashes and the quote character.
    pub fn quote(&self, value: &str) -> String {
        let q = self.as_char();
        let mut out = String::with_capacity(value.len() + 2);
        out.push(q);
        for c in value.chars() {
            if c == q || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(q);
        out
    }
}

/// TypeScript import kind keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ImportKind {
    /// `import ...`
    #[default]
    Value,
    /// `import type ...`
    Type,
    /// `import typeof ...`
    Typeof,
}

impl ImportKind {
    /// Keyword written after `import`, if any.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            ImportKind::Value => None,
            ImportKind::Type => Some("type"),
            ImportKind::Typeof => Some("typeof"),
        }
    }
}

/// The name a named import draws from its module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ImportName {
    /// `import { foo } from 'm'`
    Identifier(String),
    /// `import { "foo-bar" as foo } from 'm'`; holds the literal's value.
    Str(String),
}

impl ImportName {
    /// The exported name, regardless of how it is written.
    pub fn value(&self) -> &str {
        match self {
            ImportName::Identifier(name) | ImportName::Str(name) => name,
        }
    }
}

/// An individual import specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportSpecifier {
    /// `import foo from 'm'`
    Default(String),
    /// `import * as foo from 'm'`
    Namespace(String),
    /// `import { foo }`, `import { foo as bar }`, `import { type Foo }`
    Named {
        imported: ImportName,
        local: String,
        type_only: bool,
    },
}

impl ImportSpecifier {
    /// Shorthand for a plain named import without alias.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        ImportSpecifier::Named {
            imported: ImportName::Identifier(name.clone()),
            local: name,
            type_only: false,
        }
    }

    /// Shorthand for `imported as local`.
    pub fn aliased(imported: impl Into<String>, local: impl Into<String>) -> Self {
        ImportSpecifier::Named {
            imported: ImportName::Identifier(imported.into()),
            local: local.into(),
            type_only: false,
        }
    }

    /// The exported name for named imports.
    pub fn binding(&self) -> Option<&str> {
        match self {
            ImportSpecifier::Named { imported, .. } => Some(imported.value()),
            _ => None,
        }
    }

    /// The name bound in the importing file.
    pub fn local_name(&self) -> &str {
        match self {
            ImportSpecifier::Default(local)
            | ImportSpecifier::Namespace(local)
            | ImportSpecifier::Named { local, .. } => local,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, ImportSpecifier::Named { .. })
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, ImportSpecifier::Namespace(_))
    }
}

/// The string literal an import draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSource {
    /// Literal value without quotes.
    pub value: String,
    /// Quote character used in the source.
    pub quote: QuoteStyle,
    /// Range of the literal including its quotes.
    pub range: TextRange,
}

/// Where a named specifier sits inside the `{ ... }` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedSlot {
    /// The specifier itself, e.g. `foo as bar`.
    pub range: TextRange,
    /// End of the `,` that directly follows the specifier and of the
    /// whitespace after it. `None` for the last specifier without a trailing
    /// comma, or when a comment sits between the specifier and its comma.
    pub separator_end: Option<usize>,
}

/// Facts about one top-level `import` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStatement {
    /// The source literal; `None` when it is not a plain string literal.
    pub source: Option<ModuleSource>,
    /// Specifiers in source order. Empty for side-effect imports.
    pub specifiers: Vec<ImportSpecifier>,
    pub kind: ImportKind,
    pub has_semicolon: bool,
    /// Raw `with { ... }` / `assert { ... }` clause.
    pub attributes: Option<String>,
    /// The statement itself.
    pub range: TextRange,
    /// The `{ ... }` list, if the statement has one.
    pub named_imports_range: Option<TextRange>,
    /// One slot per named specifier, aligned with [`named_specifiers`].
    ///
    /// [`named_specifiers`]: ImportStatement::named_specifiers
    pub named_slots: Vec<NamedSlot>,
    /// Set when some specifier could not be represented, e.g. a string
    /// import name with escape sequences. Such a statement is still matched
    /// by module but never regenerated.
    pub unrepresentable_specifiers: bool,
    /// The statement extended over its indentation and line break when it
    /// sits alone on its line(s); otherwise equal to `range`.
    pub line_range: TextRange,
    /// 1-indexed line number.
    pub line: usize,
}

impl ImportStatement {
    /// The module specifier, if the source is a plain string literal.
    pub fn module(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.value.as_str())
    }

    pub fn quote(&self) -> QuoteStyle {
        self.source.as_ref().map(|s| s.quote).unwrap_or_default()
    }

    /// Named specifiers in source order.
    pub fn named_specifiers(&self) -> impl Iterator<Item = &ImportSpecifier> {
        self.specifiers.iter().filter(|s| s.is_named())
    }

    /// Exported names of the named specifiers.
    pub fn named_bindings(&self) -> impl Iterator<Item = &str> {
        self.specifiers.iter().filter_map(|s| s.binding())
    }

    pub fn has_namespace(&self) -> bool {
        self.specifiers.iter().any(|s| s.is_namespace())
    }

    pub fn is_side_effect_only(&self) -> bool {
        self.specifiers.is_empty() && self.named_imports_range.is_none()
    }

    /// Position a new statement is inserted at so it lands before this one.
    pub fn insertion_anchor(&self) -> usize {
        self.line_range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(QuoteStyle::Single.quote("react"), "'react'");
        assert_eq!(QuoteStyle::Double.quote("react"), "\"react\"");
        assert_eq!(QuoteStyle::Single.quote("it's"), r"'it\'s'");
        assert_eq!(QuoteStyle::Double.quote("it's"), "\"it's\"");
    }

    #[test]
    fn test_quote_from_char() {
        assert_eq!(QuoteStyle::from_char('\''), Some(QuoteStyle::Single));
        assert_eq!(QuoteStyle::from_char('"'), Some(QuoteStyle::Double));
        assert_eq!(QuoteStyle::from_char('`'), None);
    }

    #[test]
    fn test_range_overlap() {
        let a = TextRange::new(0, 5);
        assert!(a.overlaps(&TextRange::new(4, 8)));
        assert!(!a.overlaps(&TextRange::new(5, 8)));
        assert!(!a.overlaps(&TextRange::empty(5)));
        assert!(!TextRange::empty(0).overlaps(&a));
    }

    #[test]
    fn test_specifier_names() {
        let spec = ImportSpecifier::aliased("useState", "state");
        assert_eq!(spec.binding(), Some("useState"));
        assert_eq!(spec.local_name(), "state");

        let spec = ImportSpecifier::Default("React".to_string());
        assert_eq!(spec.binding(), None);
        assert_eq!(spec.local_name(), "React");

        let spec = ImportSpecifier::Named {
            imported: ImportName::Str("a-b".to_string()),
            local: "ab".to_string(),
            type_only: false,
        };
        assert_eq!(spec.binding(), Some("a-b"));
    }

    #[test]
    fn test_import_kind_keyword() {
        assert_eq!(ImportKind::Value.keyword(), None);
        assert_eq!(ImportKind::Type.keyword(), Some("type"));
        assert_eq!(ImportKind::Typeof.keyword(), Some("typeof"));
    }
}
