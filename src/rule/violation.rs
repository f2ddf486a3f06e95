use std::fmt;

use serde::Serialize;

/// How an import violates a restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViolationKind {
    /// The whole module is restricted.
    Module,
    /// A single named binding is restricted.
    NamedImport { binding: String, local: String },
}

/// A restriction hit on one import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(flatten)]
    pub kind: ViolationKind,
    /// Specifier of the offending import.
    pub module: String,
    /// Index of the rule in configuration order.
    pub rule: usize,
    /// The rule's target as configured.
    pub pattern: String,
    /// Module the import should come from instead, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl Violation {
    pub fn is_module(&self) -> bool {
        matches!(self.kind, ViolationKind::Module)
    }

    /// The restricted binding for named-import violations.
    pub fn binding(&self) -> Option<&str> {
        match &self.kind {
            ViolationKind::Module => None,
            ViolationKind::NamedImport { binding, .. } => Some(binding),
        }
    }

    pub fn has_replacement(&self) -> bool {
        self.replacement.is_some()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Module => {
                write!(
                    f,
                    "'{}' import is restricted from being used by a pattern '{}'.",
                    self.module, self.pattern
                )?;
                if let Some(replacement) = &self.replacement {
                    write!(f, " Replace it with '{}'.", replacement)?;
                }
            }
            ViolationKind::NamedImport { binding, .. } => {
                write!(f, "'{}' import from '{}' is restricted.", binding, self.module)?;
                if let Some(replacement) = &self.replacement {
                    write!(f, " Import it from '{}' instead.", replacement)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_violation(replacement: Option<&str>) -> Violation {
        Violation {
            kind: ViolationKind::Module,
            module: "with-regex-support".to_string(),
            rule: 0,
            pattern: "with(?:-regex)?-support".to_string(),
            replacement: replacement.map(str::to_string),
        }
    }

    #[test]
    fn test_module_message() {
        assert_eq!(
            module_violation(None).to_string(),
            "'with-regex-support' import is restricted from being used by a pattern 'with(?:-regex)?-support'."
        );
        assert_eq!(
            module_violation(Some("other")).to_string(),
            "'with-regex-support' import is restricted from being used by a pattern 'with(?:-regex)?-support'. Replace it with 'other'."
        );
    }

    #[test]
    fn test_named_message() {
        let violation = Violation {
            kind: ViolationKind::NamedImport {
                binding: "restrictedImport".to_string(),
                local: "restrictedImport".to_string(),
            },
            module: "restricted-module".to_string(),
            rule: 2,
            pattern: "restricted-module".to_string(),
            replacement: Some("replacement-module".to_string()),
        };
        assert_eq!(
            violation.to_string(),
            "'restrictedImport' import from 'restricted-module' is restricted. Import it from 'replacement-module' instead."
        );
        assert_eq!(violation.binding(), Some("restrictedImport"));
        assert!(!violation.is_module());
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(module_violation(None)).unwrap();
        assert_eq!(json["kind"], "module");
        assert_eq!(json["module"], "with-regex-support");
        assert!(json.get("replacement").is_none());
    }
}
