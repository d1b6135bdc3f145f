// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema-driven structural validation, run before semantic validation.
//!
//! This crate embeds a bespoke subset of XSD (for the tree format) and of
//! JSON Schema draft-07 (for the JSON format) sufficient to validate the
//! REXS document shape; it is not a general-purpose schema engine. Any
//! conformant full engine could be substituted behind the same
//! [`SchemaValidator`] trait (see `SPEC_FULL.md` §4.3).
//!
//! Grounded on `original_source/include/rexsapi/XSDSchemaValidator.hxx` and
//! `JsonSchemaValidator.hxx`.

pub mod json;
pub mod tree;

use crate::diagnostics::Result as DiagResult;

/// The contract both embedded schema validators implement.
pub trait SchemaValidator {
    /// Validates raw document text, returning accumulated diagnostics.
    /// `Critical` diagnostics mean no model could safely be parsed at all.
    fn validate(&self, document: &str) -> DiagResult;
}

pub use json::JsonSchemaValidator;
pub use tree::TreeSchemaValidator;
