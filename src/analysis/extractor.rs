//! Import extraction using tree-sitter for JavaScript/TypeScript.
//!
//! Only top-level `import` declarations are collected. `require()` calls,
//! dynamic `import()` and TypeScript `import x = require()` are not import
//! statements in the sense of the rule and are ignored.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

use super::statement::{
    ImportKind, ImportName, ImportSpecifier, ImportStatement, ModuleSource, NamedSlot, QuoteStyle,
    TextRange,
};

/// Errors that can occur during import extraction.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extracts [`ImportStatement`] facts from JavaScript/TypeScript source.
pub struct ImportExtractor {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ImportExtractor {
    /// Create a new extractor with a parser per grammar.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: parser_for(SourceLanguage::JavaScript)?,
            ts_parser: parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: parser_for(SourceLanguage::Tsx)?,
        })
    }

    /// Read and extract imports from a file.
    pub fn extract_file(&mut self, path: &Path) -> AnalysisResult<Vec<ImportStatement>> {
        let language = language_of(path)?;
        let content = fs::read_to_string(path)?;
        self.extract_source(&content, language, path)
    }

    /// Extract imports from source text.
    ///
    /// `path` is only used for error messages.
    pub fn extract_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<Vec<ImportStatement>> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.display().to_string(),
            })?;

        let root = tree.root_node();
        let mut cursor = root.walk();
        let imports = root
            .named_children(&mut cursor)
            .filter(|node| node.kind() == "import_statement")
            .filter_map(|node| parse_import_statement(&node, source))
            .collect();

        Ok(imports)
    }
}

/// Resolve the source language for `path`.
pub fn language_of(path: &Path) -> AnalysisResult<SourceLanguage> {
    SourceLanguage::from_path(path).ok_or_else(|| {
        AnalysisError::UnsupportedFileType(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        )
    })
}

fn parser_for(language: SourceLanguage) -> AnalysisResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|_| AnalysisError::LanguageInit)?;
    Ok(parser)
}

/// Parse an ES import declaration into statement facts.
///
/// Returns `None` for statements that are not rewritable at all (syntax
/// errors, `import x = require()`). Statements whose source is not a plain
/// string literal are returned with `source: None`.
fn parse_import_statement(node: &Node, source: &str) -> Option<ImportStatement> {
    if node.has_error() {
        return None;
    }

    let mut kind = ImportKind::Value;
    let mut clause = ClauseFacts::default();
    let mut attributes = None;
    let mut module = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type" => kind = ImportKind::Type,
            "typeof" => kind = ImportKind::Typeof,
            "import_require_clause" => return None,
            "import_clause" => parse_import_clause(&child, source, &mut clause),
            "string" => module = Some(child),
            "import_attribute" | "import_assertion" => {
                attributes = node_text(&child, source).map(str::to_string);
            }
            _ => {}
        }
    }

    let module = node.child_by_field_name("source").or(module)?;
    let text = node_text(node, source)?;
    let range = node_range(node);

    let source_literal = string_literal(&module, source).map(|(value, quote)| ModuleSource {
        value,
        quote,
        range: node_range(&module),
    });

    Some(ImportStatement {
        source: source_literal,
        specifiers: clause.specifiers,
        kind,
        has_semicolon: text.trim_end().ends_with(';'),
        attributes,
        range,
        named_imports_range: clause.named_imports_range,
        named_slots: clause.named_slots,
        unrepresentable_specifiers: clause.unrepresentable,
        line_range: line_range(source, range),
        line: node.start_position().row + 1,
    })
}

/// What the import clause contributes to a statement.
#[derive(Default)]
struct ClauseFacts {
    specifiers: Vec<ImportSpecifier>,
    named_imports_range: Option<TextRange>,
    named_slots: Vec<NamedSlot>,
    unrepresentable: bool,
}

/// Parse the import clause (everything between `import` and `from`).
fn parse_import_clause(node: &Node, source: &str, facts: &mut ClauseFacts) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => match node_text(&child, source) {
                Some(name) => facts
                    .specifiers
                    .push(ImportSpecifier::Default(name.to_string())),
                None => facts.unrepresentable = true,
            },
            "namespace_import" => match find_namespace_name(&child, source) {
                Some(name) => facts.specifiers.push(ImportSpecifier::Namespace(name)),
                None => facts.unrepresentable = true,
            },
            "named_imports" => {
                facts.named_imports_range = Some(node_range(&child));
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    match parse_import_specifier(&spec, source) {
                        Some(parsed) => {
                            facts.specifiers.push(parsed);
                            facts.named_slots.push(NamedSlot {
                                range: node_range(&spec),
                                separator_end: separator_end(source, spec.end_byte()),
                            });
                        }
                        None => facts.unrepresentable = true,
                    }
                }
            }
            _ => {}
        }
    }
}

/// End of the `,` following `offset` and of the whitespace after it.
fn separator_end(source: &str, offset: usize) -> Option<usize> {
    let rest = source.get(offset..)?;
    let after_space = rest.trim_start();
    let comma = after_space.strip_prefix(',')?;
    let tail = comma.trim_start();
    Some(source.len() - tail.len())
}

/// Find the local name in a namespace import (`import * as NAME`).
fn find_namespace_name(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let name = node
        .children(&mut cursor)
        .find(|child| child.kind() == "identifier")?;
    node_text(&name, source).map(str::to_string)
}

/// Parse a single import specifier: `foo`, `foo as bar`, `"foo" as bar`,
/// `type Foo`.
fn parse_import_specifier(node: &Node, source: &str) -> Option<ImportSpecifier> {
    let name_node = node.child_by_field_name("name")?;
    let imported = match name_node.kind() {
        "string" => ImportName::Str(string_literal(&name_node, source)?.0),
        _ => ImportName::Identifier(node_text(&name_node, source)?.to_string()),
    };

    let local = match node.child_by_field_name("alias") {
        Some(alias) => node_text(&alias, source)?.to_string(),
        None => imported.value().to_string(),
    };

    let mut cursor = node.walk();
    let type_only = node
        .children(&mut cursor)
        .any(|child| matches!(child.kind(), "type" | "typeof"));

    Some(ImportSpecifier::Named {
        imported,
        local,
        type_only,
    })
}

/// Extract the value and quote style of a plain string literal.
///
/// Literals containing escape sequences are not plain and yield `None`.
fn string_literal(node: &Node, source: &str) -> Option<(String, QuoteStyle)> {
    let text = node_text(node, source)?;
    let quote = QuoteStyle::from_char(text.chars().next()?)?;
    if text.len() < 2 || !text.ends_with(quote.as_char()) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    if inner.contains('\\') {
        return None;
    }
    Some((inner.to_string(), quote))
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

fn node_range(node: &Node) -> TextRange {
    TextRange::new(node.start_byte(), node.end_byte())
}

/// Extend `range` over its indentation and line break if nothing else shares
/// its lines.
pub(crate) fn line_range(source: &str, range: TextRange) -> TextRange {
    let bytes = source.as_bytes();

    let mut start = range.start;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > 0 && bytes[start - 1] != b'\n' {
        return range;
    }

    let mut end = range.end;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }

    match bytes.get(end) {
        None => TextRange::new(start, end),
        Some(b'\n') => TextRange::new(start, end + 1),
        Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => TextRange::new(start, end + 2),
        Some(_) => range,
    }
}
