//! Warning channel for recoverable problems.
//!
//! Unresolved anchors, redefinitions and per-theme plugin failures do not stop
//! a run. They are collected here and mirrored to the `log` facade so the CLI
//! shows them as they happen while callers can still inspect them afterwards.

use std::fmt;

/// A single recoverable problem, tagged with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Location in `theme/module/step` form (may be partial, or empty for course-wide issues).
    pub location: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

/// Accumulated warnings for one processing run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, location: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            location: location.into(),
            message: message.into(),
        };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// True if any warning message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.message.contains(needle))
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
