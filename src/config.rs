// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crate-level configuration.

use std::path::PathBuf;

use crate::format::Format;

/// Controls how strictly detected issues are reported.
///
/// Detection code is mode-agnostic; only the severity attached to a
/// diagnostic at report time depends on the mode (see
/// [`crate::diagnostics::Severity::for_mode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Issues that would otherwise be `Error` stay `Error`.
    #[default]
    Strict,
    /// Issues that would otherwise be `Error` are downgraded to `Warning`.
    /// `Critical` diagnostics are never downgraded.
    Relaxed,
}

/// A caller-supplied mapping from a custom file extension to a [`Format`],
/// consulted before falling back to the built-in extension table.
#[derive(Debug, Clone)]
pub struct CustomExtensionMapping {
    pub extension: String,
    pub format: Format,
}

/// Crate-wide configuration consulted by parsing, building and serializing.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory the (external) database model loader resolves resource
    /// files against. The loader itself is not part of this crate.
    pub database_path: Option<PathBuf>,
    /// Extra file-extension-to-format mappings, consulted before the
    /// built-in table in [`Format::from_extension`].
    pub custom_extensions: Vec<CustomExtensionMapping>,
    /// Default mode used when a caller does not specify one explicitly.
    pub mode: Mode,
    /// Safety cap on document size accepted by the schema validator, in
    /// bytes. `None` means unbounded.
    pub max_document_bytes: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn with_max_document_bytes(mut self, max: u64) -> Self {
        self.max_document_bytes = Some(max);
        self
    }

    /// Resolves the format for a custom extension, if one was registered.
    pub fn resolve_custom_extension(&self, extension: &str) -> Option<Format> {
        self.custom_extensions
            .iter()
            .find(|mapping| mapping.extension.eq_ignore_ascii_case(extension))
            .map(|mapping| mapping.format)
    }
}
