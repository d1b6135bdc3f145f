// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crate-wide hard-failure error type.
//!
//! This is distinct from [`crate::diagnostics`], which accumulates soft,
//! recoverable issues discovered while processing a model. `Error` is raised
//! for failures that make it impossible to continue: malformed input that
//! cannot even be tokenized, I/O failures, or builder misuse.

use std::fmt;

/// Crate-wide result alias for operations that can hard-fail.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures raised by the model-processing pipeline.
#[derive(Debug)]
pub enum Error {
    // === Parsing Errors ===
    /// The document could not be tokenized by the underlying XML or JSON reader.
    Syntax(String),
    /// The document failed structural (schema) validation badly enough that
    /// no model could be produced at all.
    Schema(String),
    /// A value could not be decoded into its declared value type.
    Decode(String),

    // === Database Errors ===
    /// No database model is registered for the requested version/language.
    UnknownDbModel { version: String, language: String },
    /// The database model document itself is malformed.
    DbModel(String),

    // === Builder Errors ===
    /// A builder operation was called outside of its required context, e.g.
    /// `attribute()` called before any `component()`.
    BuilderState(String),
    /// A symbolic reference used during building never resolved to a component.
    UnresolvedReference(String),

    // === Resource Errors ===
    /// An I/O operation failed.
    Io(std::io::Error),
    /// A requested format is not known or not registered.
    UnknownFormat(String),

    // === Other Errors ===
    /// A catch-all for conditions that should be unreachable in correct code.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(msg) => write!(f, "syntax error: {msg}"),
            Error::Schema(msg) => write!(f, "schema validation failed: {msg}"),
            Error::Decode(msg) => write!(f, "value decode failed: {msg}"),
            Error::UnknownDbModel { version, language } => {
                write!(f, "no database model for version {version} language {language}")
            }
            Error::DbModel(msg) => write!(f, "database model error: {msg}"),
            Error::BuilderState(msg) => write!(f, "builder used out of order: {msg}"),
            Error::UnresolvedReference(msg) => write!(f, "unresolved reference: {msg}"),
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::UnknownFormat(msg) => write!(f, "unknown format: {msg}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
