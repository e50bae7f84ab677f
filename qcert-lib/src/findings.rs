//! Non-fatal diagnostics recorded during decoding.
//!
//! A [`Finding`] never blocks further processing: decoders append findings
//! to their result and carry on, and the certificate aggregates them for
//! later reporting.  Messages embed the offending bytes base64-encoded so
//! reports can be analyzed without re-deriving the original input.

use serde::Serialize;

/// Severity of a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic recorded during a decode operation.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Logical name of the component that recorded the finding
    /// (e.g. `authorityInfoAccess`, `certificatePolicies`).
    pub component: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(component: &str, severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            component: component.to_string(),
            severity,
            message: message.into(),
        }
    }

    /// Shorthand for a warning-level finding.
    pub fn warning(component: &str, message: impl Into<String>) -> Self {
        Finding::new(component, Severity::Warning, message)
    }

    /// Shorthand for a critical-level finding.
    pub fn critical(component: &str, message: impl Into<String>) -> Self {
        Finding::new(component, Severity::Critical, message)
    }
}
