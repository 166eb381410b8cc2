//! Non-fatal diagnostics.
//!
//! Diagnostics are returned next to a complete result. Fatal conditions are
//! [`RunError`](crate::RunError)s instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A tag namespace failed its grammar and was ignored
    MalformedTag,

    /// A map key type was replaced by a placeholder
    UnsupportedMapKey,

    /// A reference matched no definition
    UnresolvedReference,

    /// An unbound reference matched several definitions
    AmbiguousReference,

    /// An unknown type carries the name of a definition
    UnknownMatchesDefinition,

    /// A reference targets a definition excluded from the output
    HiddenReference,

    /// A group root was not emitted
    SkippedRoot,
}

impl DiagnosticKind {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedTag => "malformed tag",
            DiagnosticKind::UnsupportedMapKey => "unsupported map key",
            DiagnosticKind::UnresolvedReference => "unresolved reference",
            DiagnosticKind::AmbiguousReference => "ambiguous reference",
            DiagnosticKind::UnknownMatchesDefinition => "unknown matches definition",
            DiagnosticKind::HiddenReference => "hidden reference",
            DiagnosticKind::SkippedRoot => "skipped root",
        }
    }
}

/// One non-fatal issue met while emitting a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Group being emitted
    pub group: String,

    /// Definition or `Definition.field` the issue is attached to
    pub subject: String,

    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.group, self.subject, self.message)
    }
}

/// Collects the diagnostics of one group in emission order.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    group: String,
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Create an empty sink for `group`.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            items: Vec::new(),
        }
    }

    /// Group these diagnostics belong to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Record a diagnostic.
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            group: self.group.clone(),
            subject: subject.into(),
            message: message.into(),
        };
        tracing::debug!(%diagnostic, "diagnostic recorded");
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the sink.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
