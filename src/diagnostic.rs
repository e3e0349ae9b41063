use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// The property path the diagnostic refers to, if any.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnresolvedField { index: i64 },
    EmptySegment { normalized: String },
    EmptyLeaf { normalized: String },
    ShadowedLeaf { normalized: String, node: String },
    UnknownIdentifier { name: String },
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            path: None,
        }
    }

    pub fn warning(kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            path: None,
        }
    }

    pub fn at(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl Severity {
    pub fn prefix(&self) -> char {
        match self {
            Self::Warning => 'W',
            Self::Error => 'E',
        }
    }
}

impl DiagnosticKind {
    pub fn number(&self) -> u32 {
        match self {
            Self::EmptySegment { .. } => 1,
            Self::EmptyLeaf { .. } => 2,
            Self::ShadowedLeaf { .. } => 3,
            Self::UnknownIdentifier { .. } => 4,
            Self::UnresolvedField { .. } => 100,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{path}: ")?;
        }
        write!(
            f,
            "{}{:0>3} {}",
            self.severity.prefix(),
            self.kind.number(),
            self.kind
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedField { index } => {
                write!(f, "field {index} does not exist in the fields config")
            }
            Self::EmptySegment { normalized } => {
                write!(f, "'{normalized}' has an empty path segment")
            }
            Self::EmptyLeaf { normalized } => {
                write!(f, "'{normalized}' has no displayable fields")
            }
            Self::ShadowedLeaf { normalized, node } => {
                write!(f, "'{normalized}' is hidden by earlier node '{node}'")
            }
            Self::UnknownIdentifier { name } => {
                write!(f, "identifier '{name}' does not name any field")
            }
        }
    }
}
