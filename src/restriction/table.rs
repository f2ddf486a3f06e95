use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::template::Template;
use crate::config::{ConfigError, ConfigResult, ReplacementConfig, RestrictionEntry};

/// Which bindings of a matching module a rule restricts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// Every import of the module, whatever it binds.
    WholeModule,
    /// Only these named bindings, in configuration order.
    NamedImports(Vec<String>),
}

/// A single regex substitution step.
#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    template: Template,
}

impl Substitution {
    fn apply(&self, current: &str) -> String {
        self.pattern
            .replace_all(current, |caps: &Captures<'_>| {
                let mut out = String::new();
                self.template.expand(caps, current, &mut out);
                out
            })
            .into_owned()
    }
}

/// What a restricted module should be replaced with.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// A literal module specifier.
    Module(String),
    /// Substitutions applied one after another to the original specifier.
    Substitutions(Vec<Substitution>),
}

impl Replacement {
    /// Derives the replacement specifier for `specifier`.
    ///
    /// Each substitution searches the whole current string and replaces
    /// every match, so later steps see the output of earlier ones. An empty
    /// result is not a usable specifier and yields `None`.
    pub fn apply(&self, specifier: &str) -> Option<String> {
        let derived = match self {
            Replacement::Module(module) => module.clone(),
            Replacement::Substitutions(steps) => steps
                .iter()
                .fold(specifier.to_string(), |current, step| step.apply(&current)),
        };

        if derived.is_empty() {
            debug!("Replacement for '{}' is empty; ignoring it", specifier);
            return None;
        }
        Some(derived)
    }
}

/// A compiled, anchored target.
///
/// Patterns the `regex` crate cannot compile, such as look-around or
/// backreferences, fall back to the backtracking `fancy_regex` engine.
#[derive(Debug, Clone)]
enum TargetPattern {
    Standard(Regex),
    Backtracking(fancy_regex::Regex),
}

impl TargetPattern {
    /// Wraps a pattern so it must match the entire specifier.
    fn anchored(pattern: &str) -> Result<Self, regex::Error> {
        let source = format!("^(?:{})$", pattern);
        match Regex::new(&source) {
            Ok(re) => Ok(Self::Standard(re)),
            Err(err) => match fancy_regex::Regex::new(&source) {
                Ok(re) => {
                    debug!("Compiled target `{}` with the backtracking engine", pattern);
                    Ok(Self::Backtracking(re))
                }
                Err(_) => Err(err),
            },
        }
    }

    fn is_match(&self, specifier: &str) -> bool {
        match self {
            Self::Standard(re) => re.is_match(specifier),
            Self::Backtracking(re) => re.is_match(specifier).unwrap_or_else(|e| {
                warn!("Target `{}` failed on '{}': {}", re.as_str(), specifier, e);
                false
            }),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Standard(re) => re.as_str(),
            Self::Backtracking(re) => re.as_str(),
        }
    }
}

/// One compiled restriction.
#[derive(Debug, Clone)]
pub struct RestrictionRule {
    target: String,
    pattern: TargetPattern,
    scope: RuleScope,
    replacement: Option<Replacement>,
}

impl RestrictionRule {
    /// Returns true if `specifier` matches the whole target pattern.
    pub fn matches(&self, specifier: &str) -> bool {
        self.pattern.is_match(specifier)
    }

    /// Returns true if this rule lists `binding` among its named imports.
    pub fn restricts_binding(&self, binding: &str) -> bool {
        match &self.scope {
            RuleScope::WholeModule => false,
            RuleScope::NamedImports(names) => names.iter().any(|n| n == binding),
        }
    }

    /// Returns true if the rule only restricts specific named imports.
    pub fn is_scoped(&self) -> bool {
        matches!(self.scope, RuleScope::NamedImports(_))
    }

    pub fn scope(&self) -> &RuleScope {
        &self.scope
    }

    pub fn replacement(&self) -> Option<&Replacement> {
        self.replacement.as_ref()
    }

    /// The target as configured, without the anchors added at build time.
    pub fn display_pattern(&self) -> &str {
        &self.target
    }

    /// The compiled, anchored pattern source.
    pub fn anchored_pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Ordered collection of compiled restrictions.
///
/// Lookups walk the rules in configuration order and stop at the first hit,
/// which keeps resolution deterministic when several rules overlap.
#[derive(Debug, Clone, Default)]
pub struct RestrictionTable {
    rules: Vec<RestrictionRule>,
}

impl RestrictionTable {
    /// Compiles configuration entries into a table.
    ///
    /// Fails on the first broken entry; no partial table is produced.
    pub fn build(entries: &[RestrictionEntry]) -> ConfigResult<Self> {
        let rules = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| compile_entry(index, entry))
            .collect::<ConfigResult<Vec<_>>>()?;

        debug!("Compiled {} import restrictions", rules.len());

        Ok(Self { rules })
    }

    /// First rule, of any scope, whose pattern matches `specifier`.
    pub fn match_module(&self, specifier: &str) -> Option<(usize, &RestrictionRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(specifier))
    }

    /// First scoped rule whose pattern matches `specifier` and that restricts
    /// `binding`. Whole-module rules are never returned.
    pub fn match_named_binding(
        &self,
        specifier: &str,
        binding: &str,
    ) -> Option<(usize, &RestrictionRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.restricts_binding(binding) && rule.matches(specifier))
    }

    pub fn get(&self, index: usize) -> Option<&RestrictionRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestrictionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile_entry(index: usize, entry: &RestrictionEntry) -> ConfigResult<RestrictionRule> {
    match entry {
        RestrictionEntry::Exact(name) => Ok(RestrictionRule {
            target: name.clone(),
            pattern: TargetPattern::anchored(&regex::escape(name)).map_err(|source| {
                ConfigError::InvalidTarget {
                    index,
                    pattern: name.clone(),
                    source,
                }
            })?,
            scope: RuleScope::WholeModule,
            replacement: None,
        }),
        RestrictionEntry::Detailed(detailed) => {
            let target = detailed
                .target
                .clone()
                .ok_or(ConfigError::MissingTarget { index })?;

            let pattern =
                TargetPattern::anchored(&target).map_err(|source| ConfigError::InvalidTarget {
                    index,
                    pattern: target.clone(),
                    source,
                })?;

            let scope = match &detailed.named_imports {
                Some(names) if !names.is_empty() => RuleScope::NamedImports(names.clone()),
                _ => RuleScope::WholeModule,
            };

            let replacement = match &detailed.replacement {
                None => None,
                Some(ReplacementConfig::Module(module)) => Some(Replacement::Module(module.clone())),
                Some(ReplacementConfig::Substitutions(list)) => {
                    if matches!(scope, RuleScope::NamedImports(_)) {
                        return Err(ConfigError::UnsupportedNamedReplacement { index, target });
                    }
                    let steps = list
                        .iter()
                        .map(|(pattern, with)| {
                            Regex::new(pattern)
                                .map(|pattern| Substitution {
                                    template: Template::parse(with, &pattern),
                                    pattern,
                                })
                                .map_err(|source| ConfigError::InvalidSubstitution {
                                    index,
                                    pattern: pattern.to_string(),
                                    source,
                                })
                        })
                        .collect::<ConfigResult<Vec<_>>>()?;
                    Some(Replacement::Substitutions(steps))
                }
            };

            Ok(RestrictionRule {
                target,
                pattern,
                scope,
                replacement,
            })
        }
    }
}
