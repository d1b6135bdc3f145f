// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parses a wire-format document into a [`crate::model::Model`], given the
//! [`DbModel`] that governs the declared version/language.

pub mod json;
pub mod tree;

use std::collections::{HashMap, HashSet};

use crate::config::Mode;
use crate::db::model::DbModel;
use crate::diagnostics::{Result as DiagResult, Severity};
use crate::model::Model;
use crate::semantic::SemanticValidator;
use crate::value::{Value, ValueType};

/// The contract both wire-format parsers implement.
pub trait ModelParser {
    /// Parses `document` into a `Model`, consulting `db` to decode
    /// attribute values per their declared value type and `mode` to decide
    /// how the semantic checks that close out parsing report their findings.
    ///
    /// Returns the best-effort model alongside accumulated diagnostics; the
    /// caller decides, via [`crate::diagnostics::Result::ok`], whether the
    /// model is usable.
    fn parse(&self, document: &str, db: &DbModel, mode: Mode) -> (Option<Model>, DiagResult);
}

pub use json::JsonModelParser;
pub use tree::TreeModelParser;

/// The one attribute id exempt from reference rewriting: it carries a raw,
/// document-native id on purpose rather than a resolvable component
/// reference.
pub(crate) const RAW_REFERENCE_ID_ATTRIBUTE: &str = "referenced_component_id";

/// Shared post-processing step both format parsers run after building their
/// raw `Model`: mints a process-unique `internal_id` for every component in
/// document order, rewrites every `Reference Component` attribute payload and
/// relation reference from the document's raw ids to those internal ids, and
/// flags components no relation ever refers to.
///
/// Grounded on the original's `JsonModelLoader`/`XMLModelLoader`, which both
/// resolve references through a single shared `TModelBuilder` pass.
pub(crate) fn post_process(model: &mut Model, result: &mut DiagResult) {
    let mut id_map: HashMap<i64, i64> = HashMap::new();
    let mut seen_raw_ids: HashSet<i64> = HashSet::new();

    for (index, component) in model.components_mut().iter_mut().enumerate() {
        let raw_id = component.internal_id;
        if !seen_raw_ids.insert(raw_id) {
            result.add_error(Severity::Critical, format!("duplicate component id {raw_id}"));
        }
        let internal_id = (index + 1) as i64;
        id_map.insert(raw_id, internal_id);
        component.external_id = Some(raw_id);
        component.internal_id = internal_id;
    }

    for component in model.components_mut().iter_mut() {
        let component_id = component.internal_id;
        for attribute in &mut component.attributes {
            if attribute.id == RAW_REFERENCE_ID_ATTRIBUTE || attribute.value.value_type() != ValueType::ReferenceComponent {
                continue;
            }
            let Some(raw_target) = attribute.value.as_integer() else { continue };
            match id_map.get(&raw_target) {
                Some(&internal) => attribute.value = Value::reference_component(internal),
                None => result.add_error(
                    Severity::Error,
                    format!("attribute '{}' on component {component_id} references unknown component {raw_target}", attribute.id),
                ),
            }
        }
    }

    for relation in model.relations_mut().iter_mut() {
        for reference in &mut relation.references {
            match id_map.get(&reference.component_id) {
                Some(&internal) => reference.component_id = internal,
                None => result.add_error(
                    Severity::Error,
                    format!("relation {} references unknown component {}", relation.id, reference.component_id),
                ),
            }
        }
    }

    check_unused_components(model, result);
}

fn check_unused_components(model: &Model, result: &mut DiagResult) {
    if model.relations().is_empty() {
        return;
    }
    let referenced: HashSet<i64> = model.relations().iter().flat_map(|r| r.references.iter().map(|reference| reference.component_id)).collect();
    for component in model.components() {
        if !referenced.contains(&component.internal_id) {
            result.add_error(
                Severity::Warning,
                format!("component {} of type '{}' is not referenced by any relation", component.internal_id, component.component_type),
            );
        }
    }
}

/// Runs the full semantic check ([`SemanticValidator`]) over an
/// already post-processed model, merging its diagnostics into `result`.
pub(crate) fn run_semantic_validation(model: &Model, db: &DbModel, mode: Mode, result: &mut DiagResult) {
    let semantic_result = SemanticValidator::new(db, mode).validate(model);
    result.merge(semantic_result);
}
