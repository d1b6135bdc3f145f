// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Soft, accumulating diagnostics produced while parsing, building or
//! serializing a model.
//!
//! Unlike [`crate::error::Error`], a [`Diagnostic`] never aborts processing
//! on its own. A [`Result`] collects any number of them and is consulted by
//! the caller afterwards via [`Result::ok`], [`Result::has_issues`] and
//! [`Result::has_critical`].

use std::fmt;

use crate::config::Mode;

/// Severity of a single diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Something is off but processing continues unaffected.
    Warning,
    /// The model is broken in a way that should be fixed, but a best-effort
    /// model could still be produced.
    Error,
    /// Processing cannot meaningfully continue.
    Critical,
}

impl Severity {
    /// Downgrades `Error` to `Warning` when `mode` is [`Mode::Relaxed`].
    ///
    /// `Critical` is never downgraded: a broken document stays broken
    /// regardless of mode. Downgrading happens at report time, not at the
    /// point the issue was detected, so the same detection code runs in both
    /// modes.
    pub fn for_mode(self, mode: Mode) -> Severity {
        match (self, mode) {
            (Severity::Error, Mode::Relaxed) => Severity::Warning,
            (severity, _) => severity,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        })
    }
}

/// A single diagnostic message, optionally tied to a byte offset in the
/// source document.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    offset: Option<usize>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { severity, message: message.into(), offset: None }
    }

    pub fn at(severity: Severity, message: impl Into<String>, offset: usize) -> Self {
        Self { severity, message: message.into(), offset: Some(offset) }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}: offset {}", self.message, offset),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Accumulates diagnostics produced while processing a model.
#[derive(Debug, Clone, Default)]
pub struct Result {
    diagnostics: Vec<Diagnostic>,
}

impl Result {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity() >= Severity::Warning {
            match diagnostic.severity() {
                Severity::Warning => log::warn!("{diagnostic}"),
                Severity::Error | Severity::Critical => log::error!("{diagnostic}"),
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn add_error(&mut self, severity: Severity, message: impl Into<String>) {
        self.add(Diagnostic::new(severity, message));
    }

    pub fn add_error_at(&mut self, severity: Severity, message: impl Into<String>, offset: usize) {
        self.add(Diagnostic::at(severity, message, offset));
    }

    /// Merges another result's diagnostics into this one.
    pub fn merge(&mut self, other: Result) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// `true` unless the result contains an `Error` or `Critical` diagnostic.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity() >= Severity::Error)
    }

    pub fn has_issues(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn has_critical(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity() == Severity::Critical)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_true_with_only_warnings() {
        let mut result = Result::new();
        result.add_error(Severity::Warning, "just a warning");
        assert!(result.ok());
        assert!(result.has_issues());
        assert!(!result.has_critical());
    }

    #[test]
    fn ok_false_with_error() {
        let mut result = Result::new();
        result.add_error(Severity::Error, "broken attribute");
        assert!(!result.ok());
        assert!(!result.has_critical());
    }

    #[test]
    fn critical_detected() {
        let mut result = Result::new();
        result.add_error(Severity::Critical, "unparsable document");
        assert!(!result.ok());
        assert!(result.has_critical());
    }

    #[test]
    fn relaxed_mode_downgrades_error_to_warning() {
        assert_eq!(Severity::Error.for_mode(Mode::Relaxed), Severity::Warning);
        assert_eq!(Severity::Error.for_mode(Mode::Strict), Severity::Error);
        assert_eq!(Severity::Critical.for_mode(Mode::Relaxed), Severity::Critical);
    }
}
