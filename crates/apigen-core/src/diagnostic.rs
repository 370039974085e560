//! Non-fatal diagnostics collected during a generation run.
//!
//! A malformed operation or parameter never aborts generation. It is skipped,
//! logged with `tracing::warn!`, and recorded as a [`Diagnostic`] so callers
//! can surface it after the run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal generation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An operation is missing mandatory fields and was skipped.
    MalformedOperation,
    /// A parameter is missing `name` or `in` and was skipped.
    MalformedParameter,
    /// A local `$ref` could not be followed.
    UnresolvedReference,
    /// The HTTP method has no collaborator primitive; the operation was skipped.
    UnsupportedMethod,
    /// Two operations produced the same function name; one was renamed.
    DuplicateFunctionName,
    /// A request body was declared on a verb that does not send one.
    IgnoredRequestBody,
    /// The document declares no server; callers must supply a base URL.
    MissingBaseUrl,
}

impl DiagnosticKind {
    /// Returns the snake_case name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedOperation => "malformed_operation",
            Self::MalformedParameter => "malformed_parameter",
            Self::UnresolvedReference => "unresolved_reference",
            Self::UnsupportedMethod => "unsupported_method",
            Self::DuplicateFunctionName => "duplicate_function_name",
            Self::IgnoredRequestBody => "ignored_request_body",
            Self::MissingBaseUrl => "missing_base_url",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal issue, tied to the place in the document it concerns.
///
/// # Examples
///
/// ```
/// use apigen_core::{Diagnostic, DiagnosticKind};
///
/// let diag = Diagnostic::new(
///     DiagnosticKind::MalformedParameter,
///     "GET /pets",
///     "parameter #2 has no 'name'",
/// );
/// assert_eq!(diag.kind, DiagnosticKind::MalformedParameter);
/// assert_eq!(diag.to_string(), "[malformed_parameter] GET /pets: parameter #2 has no 'name'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Issue category
    pub kind: DiagnosticKind,
    /// Where in the document the issue was found (e.g. `GET /pets/{id}`)
    pub location: String,
    /// Human-readable explanation
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a diagnostic and logs it at `warn` level.
    #[must_use]
    pub fn warn(
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let diag = Self::new(kind, location, message);
        tracing::warn!(kind = %diag.kind, location = %diag.location, "{}", diag.message);
        diag
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&DiagnosticKind::UnresolvedReference).unwrap();
        assert_eq!(json, "\"unresolved_reference\"");
        assert_eq!(
            DiagnosticKind::UnresolvedReference.as_str(),
            "unresolved_reference"
        );
    }

    #[test]
    fn test_warn_builds_same_value_as_new() {
        let a = Diagnostic::new(DiagnosticKind::MissingBaseUrl, "servers", "none declared");
        let b = Diagnostic::warn(DiagnosticKind::MissingBaseUrl, "servers", "none declared");
        assert_eq!(a, b);
    }
}
