// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The optional load spectrum: load cases, their per-component loads, and
//! the accumulation that summarizes them.
//!
//! Grounded on `original_source/include/rexsapi/LoadSpectrum.hxx`.

use crate::model::component::Attribute;

/// The attribute values a single component carries within one load case.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadComponent {
    pub component_id: i64,
    pub attributes: Vec<Attribute>,
}

impl LoadComponent {
    pub fn new(component_id: i64) -> Self {
        Self { component_id, attributes: Vec::new() }
    }
}

/// One named load case: a set of per-component attribute overrides that
/// apply for that operating condition.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCase {
    pub id: i64,
    pub load_components: Vec<LoadComponent>,
}

impl LoadCase {
    pub fn new(id: i64) -> Self {
        Self { id, load_components: Vec::new() }
    }
}

/// A statistical accumulation summarizing the load cases, e.g. a duration
/// distribution or infinite-life indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub load_components: Vec<LoadComponent>,
}

impl Accumulation {
    pub fn new() -> Self {
        Self { load_components: Vec::new() }
    }
}

impl Default for Accumulation {
    fn default() -> Self {
        Self::new()
    }
}

/// The optional load spectrum attached to a [`crate::model::Model`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadSpectrum {
    pub load_cases: Vec<LoadCase>,
    pub accumulation: Option<Accumulation>,
}

impl LoadSpectrum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.load_cases.is_empty() && self.accumulation.is_none()
    }
}
