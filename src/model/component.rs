// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Components and their attributes.

use crate::value::Value;

/// A named, typed attribute value attached to a [`Component`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: String,
    pub unit: Option<String>,
    pub value: Value,
}

impl Attribute {
    pub fn new(id: impl Into<String>, value: Value) -> Self {
        Self { id: id.into(), unit: None, value }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// A single component in a model: a gear, a shaft, a bearing, etc.
///
/// `internal_id` is the process-unique id this crate assigns and that every
/// relation/reference resolves through; `external_id` is the id the
/// originating document used, kept only for traceability back to it.
/// Components minted by [`crate::builder::Builder`] have no originating
/// document and so carry `external_id: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub external_id: Option<i64>,
    pub internal_id: i64,
    pub component_type: String,
    pub name: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Component {
    pub fn new(internal_id: i64, component_type: impl Into<String>) -> Self {
        Self { external_id: None, internal_id, component_type: component_type.into(), name: None, attributes: Vec::new() }
    }

    pub fn with_external_id(mut self, external_id: i64) -> Self {
        self.external_id = Some(external_id);
        self
    }

    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.id == id)
    }

    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}
