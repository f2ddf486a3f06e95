//! Substitution templates with JavaScript `String.prototype.replace` syntax.
//!
//! Recognized tokens: `$$`, `$&`, `` $` ``, `$'`, `$n`/`$nn` and `$<name>`.
//! A `$` that does not start one of them, or that names a group the pattern
//! does not have, is kept literally.

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
    Named(String),
    Match,
    Before,
    After,
}

/// A parsed replacement template, bound to the pattern it was parsed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parses `template` against the groups of `pattern`.
    pub fn parse(template: &str, pattern: &Regex) -> Self {
        let groups = pattern.captures_len() - 1;
        let has_names = pattern.capture_names().flatten().next().is_some();

        let mut pieces = Vec::new();
        let mut literal = String::new();
        let chars: Vec<char> = template.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] != '$' {
                literal.push(chars[i]);
                i += 1;
                continue;
            }

            let (piece, consumed) = match chars.get(i + 1) {
                Some('$') => (None, 2),
                Some('&') => (Some(Piece::Match), 2),
                Some('`') => (Some(Piece::Before), 2),
                Some('\'') => (Some(Piece::After), 2),
                Some(d) if d.is_ascii_digit() => match group_reference(&chars[i + 1..], groups) {
                    Some((n, len)) => (Some(Piece::Group(n)), 1 + len),
                    None => (None, 1),
                },
                Some('<') if has_names => {
                    match chars[i + 2..].iter().position(|&c| c == '>') {
                        Some(end) => {
                            let name: String = chars[i + 2..i + 2 + end].iter().collect();
                            (Some(Piece::Named(name)), end + 3)
                        }
                        None => (None, 1),
                    }
                }
                _ => (None, 1),
            };

            match piece {
                Some(piece) => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(piece);
                }
                None => literal.push('$'),
            }
            i += consumed;
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Self { pieces }
    }

    /// Appends the expansion for one match of the pattern in `haystack`.
    pub fn expand(&self, caps: &Captures<'_>, haystack: &str, out: &mut String) {
        let whole = caps.get(0);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Group(n) => out.push_str(caps.get(*n).map_or("", |m| m.as_str())),
                Piece::Named(name) => out.push_str(caps.name(name).map_or("", |m| m.as_str())),
                Piece::Match => out.push_str(whole.map_or("", |m| m.as_str())),
                Piece::Before => out.push_str(whole.map_or("", |m| &haystack[..m.start()])),
                Piece::After => out.push_str(whole.map_or("", |m| &haystack[m.end()..])),
            }
        }
    }
}

/// Resolves `$n`/`$nn` the way JavaScript does: two digits win when they name
/// an existing group, then one digit. Group 0 is never addressable.
fn group_reference(digits: &[char], groups: usize) -> Option<(usize, usize)> {
    let first = digits.first()?.to_digit(10)? as usize;
    if let Some(second) = digits.get(1).and_then(|c| c.to_digit(10)) {
        let two = first * 10 + second as usize;
        if (1..=groups).contains(&two) {
            return Some((two, 2));
        }
    }
    (1..=groups).contains(&first).then_some((first, 1))
}
