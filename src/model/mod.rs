// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory REXS model: components, relations and an optional load
//! spectrum, plus the version/language/applicationId metadata every model
//! carries.

pub mod component;
pub mod load_spectrum;
pub mod relation;

use crate::db::registry::Version;

pub use component::{Attribute, Component};
pub use load_spectrum::{Accumulation, LoadCase, LoadComponent, LoadSpectrum};
pub use relation::{Relation, RelationReference, RelationRole, RelationRoleType, RelationType};

/// Identifying metadata every model carries, mirroring the `model` element
/// attributes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub version: Version,
    pub language: String,
    pub application_id: String,
    pub application_version: String,
    pub date: String,
}

/// A complete, in-memory REXS gearbox interchange model.
///
/// Immutable once constructed: a parser, [`crate::builder::Builder`] or the
/// post-processor shared by both produces a finished `Model` in one go.
/// There is no public API for mutating a `Model` after the fact -- producing
/// a changed model means building a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    info: ModelInfo,
    components: Vec<Component>,
    relations: Vec<Relation>,
    load_spectrum: LoadSpectrum,
}

impl Model {
    pub fn new(info: ModelInfo) -> Self {
        Self { info, components: Vec::new(), relations: Vec::new(), load_spectrum: LoadSpectrum::new() }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn load_spectrum(&self) -> &LoadSpectrum {
        &self.load_spectrum
    }

    /// Looks up a component by its process-unique `internal_id`.
    pub fn component(&self, internal_id: i64) -> Option<&Component> {
        self.components.iter().find(|c| c.internal_id == internal_id)
    }

    pub fn relation(&self, id: i64) -> Option<&Relation> {
        self.relations.iter().find(|r| r.id == id)
    }

    /// The highest internal component id currently in use, used by the
    /// builder to mint fresh ids.
    pub fn max_component_id(&self) -> i64 {
        self.components.iter().map(|c| c.internal_id).max().unwrap_or(0)
    }

    pub fn max_relation_id(&self) -> i64 {
        self.relations.iter().map(|r| r.id).max().unwrap_or(0)
    }

    /// Assembles a `Model` from already-validated parts. Used by parsers and
    /// the builder, which each have their own rules for how those parts were
    /// produced; nothing outside the crate can reach this.
    pub(crate) fn from_parts(info: ModelInfo, components: Vec<Component>, relations: Vec<Relation>, load_spectrum: LoadSpectrum) -> Self {
        Self { info, components, relations, load_spectrum }
    }

    pub(crate) fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub(crate) fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub(crate) fn components_mut(&mut self) -> &mut Vec<Component> {
        &mut self.components
    }

    pub(crate) fn relations_mut(&mut self) -> &mut Vec<Relation> {
        &mut self.relations
    }
}
