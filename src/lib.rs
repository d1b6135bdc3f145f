// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # rexs - REXS gearbox interchange models
//!
//! Reads, writes, validates and builds [REXS](https://www.rexs.info/) models:
//! the vendor-neutral interchange format gear calculation tools use to
//! exchange the component/attribute/relation graph (and optional load
//! spectrum) that describes a gearbox.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rexs::config::Mode;
//! use rexs::db::model::DbModel;
//! use rexs::parser::{ModelParser, TreeModelParser};
//!
//! fn main() -> rexs::error::Result<()> {
//!     let document = std::fs::read_to_string("gearbox.rexs")?;
//!     let db = DbModel::new("1.5", "en"); // normally loaded from a Registry
//!
//!     // parse() runs schema validation, reference resolution and semantic
//!     // checking in one pass, returning the best-effort model alongside
//!     // accumulated diagnostics.
//!     let (model, result) = TreeModelParser::new().parse(&document, &db, Mode::Strict);
//!     let model = model.ok_or_else(|| rexs::error::Error::Schema("no model produced".into()))?;
//!
//!     if !result.ok() {
//!         for diagnostic in result.diagnostics() {
//!             eprintln!("{diagnostic}");
//!         }
//!     }
//!     let _ = model;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                      schema (structural shape)                     |
//! |   TreeSchemaValidator | JsonSchemaValidator                        |
//! +---------------------------------------------------------------------+
//! |                    parser / decoder / serializer                    |
//! |   TreeModelParser | JsonModelParser | ValueDecoder | *ModelSerializer|
//! +---------------------------------------------------------------------+
//! |                         model (in-memory)                           |
//! |   Model | Component | Attribute | Relation | LoadSpectrum           |
//! +---------------------------------------------------------------------+
//! |                    semantic (post-parse validation)                 |
//! |   SemanticValidator | relation/external-subcomponent tables         |
//! +---------------------------------------------------------------------+
//! |                       db (version catalog)                          |
//! |   DbRegistry | DbModel | DbAttribute | DbComponent                  |
//! +---------------------------------------------------------------------+
//! ```
//!
//! Building a model programmatically goes through [`builder::Builder`]
//! instead of a parser; it produces the same [`model::Model`] the parsers do.
//!
//! ## Modules Overview
//!
//! - [`value`] - the 18-way typed [`value::Value`] union and its binary codec
//! - [`db`] - the versioned database registry models are validated against
//! - [`model`] - the in-memory component/attribute/relation/load-spectrum graph
//! - [`decoder`] - text and coded-binary value decoding
//! - [`schema`] - structural (XSD/JSON-Schema-style) document validation
//! - [`parser`] - tree and JSON document parsing into a [`model::Model`]
//! - [`serializer`] - rendering a [`model::Model`] back to either wire format
//! - [`semantic`] - range/unit/enum/relation-role validation of a built model
//! - [`builder`] - programmatic model construction with id minting
//! - [`diagnostics`] - soft, accumulating validation results
//! - [`error`] - hard-failure error type for unrecoverable conditions
//! - [`config`] - [`config::Mode`] and format/path configuration
//! - [`format`] - wire-format sniffing by extension or content
//!
//! ## See Also
//!
//! - [REXS file format](https://www.rexs.info/rexs_en.html)

pub mod builder;
pub mod config;
pub mod db;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod model;
pub mod parser;
pub mod schema;
pub mod semantic;
pub mod serializer;
pub mod value;

pub use builder::Builder;
pub use config::{Config, Mode};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use format::Format;
pub use model::{Component, Model, ModelInfo, Relation};
pub use value::{CodeType, Value, ValueType};

/// The crate's semantic version, exposed for diagnostics and `applicationVersion`-style reporting.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
