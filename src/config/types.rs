//! Configuration shapes for restricted imports.
//!
//! These types mirror the JSON accepted by the rule. They are deliberately
//! loose (e.g. `target` is optional) so that validation can report which
//! entry is broken instead of a generic "did not match any variant" error.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// The two accepted top-level option shapes.
///
/// ```ignore
/// ["lodash", { "target": "react", "replacement": "preact" }]
/// { "paths": ["lodash", { "target": "react", "replacement": "preact" }] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleOptions {
    /// A flat list of entries.
    List(Vec<RestrictionEntry>),
    /// Entries nested under the `paths` key.
    Nested(NestedOptions),
}

/// Entries nested inside an options object.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedOptions {
    pub paths: Vec<RestrictionEntry>,
}

impl RuleOptions {
    /// Normalizes both shapes to the ordered entry list.
    pub fn into_entries(self) -> Vec<RestrictionEntry> {
        match self {
            RuleOptions::List(entries) => entries,
            RuleOptions::Nested(nested) => nested.paths,
        }
    }
}

/// A single configured restriction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RestrictionEntry {
    /// Bare module name: exact match, whole module, no replacement.
    Exact(String),
    /// Object form with a regex target.
    Detailed(DetailedEntry),
}

impl RestrictionEntry {
    /// Convenience constructor used by tests and callers building configs in code.
    pub fn exact(target: impl Into<String>) -> Self {
        RestrictionEntry::Exact(target.into())
    }
}

/// Object form of a restriction entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedEntry {
    /// Regular expression matched against the whole module specifier.
    pub target: Option<String>,

    /// Binding names restricted by this entry. Empty or absent means the
    /// whole module is restricted.
    #[serde(rename = "namedImports", default)]
    pub named_imports: Option<Vec<String>>,

    /// What to suggest instead.
    #[serde(default)]
    pub replacement: Option<ReplacementConfig>,
}

impl DetailedEntry {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn named_imports<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.named_imports = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn replacement(mut self, replacement: ReplacementConfig) -> Self {
        self.replacement = Some(replacement);
        self
    }
}

impl From<DetailedEntry> for RestrictionEntry {
    fn from(entry: DetailedEntry) -> Self {
        RestrictionEntry::Detailed(entry)
    }
}

/// Replacement as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReplacementConfig {
    /// Replace the module specifier with this literal.
    Module(String),
    /// Rewrite the specifier with ordered regex substitutions.
    Substitutions(SubstitutionList),
}

impl ReplacementConfig {
    pub fn module(name: impl Into<String>) -> Self {
        ReplacementConfig::Module(name.into())
    }

    pub fn substitutions<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ReplacementConfig::Substitutions(SubstitutionList(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }
}

/// Ordered `pattern -> substitution` pairs.
///
/// Deserialized from a JSON object; key order is kept as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionList(pub Vec<(String, String)>);

impl SubstitutionList {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SubstitutionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = SubstitutionList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of regex patterns to substitution strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((pattern, substitution)) = map.next_entry::<String, String>()? {
                    if pairs.iter().any(|(p, _): &(String, String)| p == &pattern) {
                        return Err(de::Error::custom(format!(
                            "duplicate substitution pattern `{}`",
                            pattern
                        )));
                    }
                    pairs.push((pattern, substitution));
                }
                Ok(SubstitutionList(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
