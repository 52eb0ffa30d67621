//! Diagnostics for records and rendered documents
//!
//! Rendering never fails; problems it works around (an unreadable signature,
//! for instance) are reported here instead, alongside the checks callers can
//! run on a record before handing it to a template.

pub mod record;

use serde::{Deserialize, Serialize};

pub use record::check_delivery_record;

/// Severity level for a diagnostic
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A problem found at a specific field of the input record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Field path in JavaScript naming (e.g. "episDelivered[0].quantity")
    pub path: String,
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Kind identifier (e.g. "quantity_zero", "signature_unreadable")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        path: impl Into<String>,
        severity: DiagnosticSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn error(path: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, DiagnosticSeverity::Error, kind, message)
    }

    pub fn warning(path: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, DiagnosticSeverity::Warning, kind, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Whether any diagnostic in the list is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
