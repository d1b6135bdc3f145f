// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic validation: range intervals, unit matching, enum membership,
//! relation-role cardinality, and duplicate/reference-integrity checks.
//!
//! This runs after schema validation (`crate::schema`) and after decoding
//! (`crate::decoder`); it operates on an already-built [`Model`] plus the
//! [`DbModel`] that governs it.

pub mod tables;

use std::collections::{HashMap, HashSet};

use crate::config::Mode;
use crate::db::model::DbModel;
use crate::db::registry::Version;
use crate::diagnostics::{Diagnostic, Result as DiagResult, Severity};
use crate::model::{Model, RelationRoleType};

/// Validates a [`Model`] against the [`DbModel`] that governs its version,
/// accumulating diagnostics rather than aborting on the first issue.
pub struct SemanticValidator<'a> {
    db: &'a DbModel,
    mode: Mode,
}

impl<'a> SemanticValidator<'a> {
    pub fn new(db: &'a DbModel, mode: Mode) -> Self {
        Self { db, mode }
    }

    pub fn validate(&self, model: &Model) -> DiagResult {
        let mut result = DiagResult::new();
        self.check_duplicate_component_ids(model, &mut result);
        self.check_duplicate_relation_ids(model, &mut result);
        self.check_attributes(model, &mut result);
        self.check_relations(model, &mut result);
        result
    }

    fn severity(&self, severity: Severity) -> Severity {
        severity.for_mode(self.mode)
    }

    /// Duplicate `internal_id`s cannot occur after parsing mints them
    /// sequentially, so this guards the one path that can still produce
    /// them: a model assembled directly through the builder from
    /// hand-picked ids. It checks `external_id` so two components that
    /// genuinely originated under the same document id are still caught.
    fn check_duplicate_component_ids(&self, model: &Model, result: &mut DiagResult) {
        let mut seen = HashSet::new();
        for component in model.components() {
            let Some(external_id) = component.external_id else { continue };
            if !seen.insert(external_id) {
                result.add_error(self.severity(Severity::Critical), format!("duplicate component id {external_id}"));
            }
        }
    }

    fn check_duplicate_relation_ids(&self, model: &Model, result: &mut DiagResult) {
        let mut seen = HashSet::new();
        for relation in model.relations() {
            if !seen.insert(relation.id) {
                result.add_error(self.severity(Severity::Critical), format!("duplicate relation id {}", relation.id));
            }
        }
    }

    fn check_attributes(&self, model: &Model, result: &mut DiagResult) {
        for component in model.components() {
            let Some(db_component) = self.db.component(&component.component_type) else {
                result.add_error(
                    self.severity(Severity::Error),
                    format!("unknown component type '{}' for component {}", component.component_type, component.internal_id),
                );
                continue;
            };
            for attribute in &component.attributes {
                if !db_component.allows_attribute(&attribute.id) {
                    result.add_error(
                        self.severity(Severity::Error),
                        format!(
                            "attribute '{}' is not allowed on component type '{}'",
                            attribute.id, component.component_type
                        ),
                    );
                    continue;
                }
                let Some(db_attribute) = self.db.attribute(&attribute.id) else {
                    result.add_error(self.severity(Severity::Error), format!("unknown attribute '{}'", attribute.id));
                    continue;
                };
                if !attribute.value.matches_type(db_attribute.value_type) {
                    result.add_error(
                        self.severity(Severity::Error),
                        format!(
                            "attribute '{}' on component {} has value type {} but database declares {}",
                            attribute.id,
                            component.internal_id,
                            attribute.value.value_type(),
                            db_attribute.value_type
                        ),
                    );
                    continue;
                }
                if let (Some(declared_unit), Some(actual_unit)) = (&db_attribute.unit, &attribute.unit) {
                    if declared_unit != actual_unit {
                        result.add_error(
                            self.severity(Severity::Error),
                            format!(
                                "attribute '{}' on component {} uses unit '{}' but database declares '{}'",
                                attribute.id, component.internal_id, actual_unit, declared_unit
                            ),
                        );
                    }
                }
                if let Some(enum_name) = &db_attribute.enum_name {
                    if let Some(db_enum) = self.db.find_enum(enum_name) {
                        if let Some(value) = attribute.value.as_str() {
                            if !db_enum.contains(value) {
                                result.add_error(
                                    self.severity(Severity::Error),
                                    format!("attribute '{}' has enum value '{}' not in '{}'", attribute.id, value, enum_name),
                                );
                            }
                        }
                    }
                }
                if let Some(interval) = &db_attribute.interval {
                    if let Some(value) = attribute.value.as_float() {
                        if !interval.contains(value) {
                            result.add_error(
                                self.severity(Severity::Error),
                                format!("attribute '{}' on component {} value {} is out of range", attribute.id, component.internal_id, value),
                            );
                        }
                    }
                }
            }
        }
    }

    fn check_relations(&self, model: &Model, result: &mut DiagResult) {
        let component_ids: HashSet<i64> = model.components().iter().map(|c| c.internal_id).collect();
        let version = Version::parse(&self.db.version).unwrap_or(Version::new(1, 0));

        for relation in model.relations() {
            let Some(rule) = tables::rule_for(version, relation.relation_type) else {
                result.add_error(
                    self.severity(Severity::Warning),
                    format!("relation type '{}' is not recognized for database version {}", relation.relation_type, self.db.version),
                );
                continue;
            };

            let mut role_counts: HashMap<_, usize> = HashMap::new();
            for reference in &relation.references {
                *role_counts.entry(reference.role).or_insert(0) += 1;

                if !component_ids.contains(&reference.component_id) {
                    result.add_error(
                        self.severity(Severity::Critical),
                        format!("relation {} references unknown component {}", relation.id, reference.component_id),
                    );
                }
                if !rule.allowed_roles.contains(&reference.role) {
                    result.add_error(
                        self.severity(Severity::Error),
                        format!(
                            "role '{}' is not permitted for relation type '{}'",
                            reference.role, relation.relation_type
                        ),
                    );
                }
                if rule.ordered && reference.order.is_none() {
                    result.add_error(
                        self.severity(Severity::Error),
                        format!("relation {} of ordered type '{}' is missing an order on one of its references", relation.id, relation.relation_type),
                    );
                }
                if reference.role.role_type() == RelationRoleType::TopLevel && relation.references.len() == 1 {
                    result.add_error(
                        self.severity(Severity::Warning),
                        format!("relation {} has a single top-level reference with no sub-level counterpart", relation.id),
                    );
                }
            }

            for required_role in rule.allowed_roles {
                if !role_counts.contains_key(required_role) {
                    result.add_error(
                        self.severity(Severity::Error),
                        format!("relation {} of type '{}' is missing a reference with role '{}'", relation.id, relation.relation_type, required_role),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model::{DbAttribute, DbComponent, DbModel};
    use crate::model::{Component, ModelInfo, RelationReference};
    use crate::value::{Value, ValueType};

    fn db_with_gear() -> DbModel {
        let mut db = DbModel::new("1.5", "en");
        db.add_component(DbComponent {
            id: "gear".into(),
            name: "Gear".into(),
            attribute_ids: vec!["number_of_teeth".into()],
        });
        db.add_attribute(DbAttribute {
            id: "number_of_teeth".into(),
            name: "Number of teeth".into(),
            value_type: ValueType::Integer,
            unit: None,
            enum_name: None,
            interval: None,
        });
        db
    }

    fn model_info() -> ModelInfo {
        ModelInfo {
            version: Version::new(1, 5),
            language: "en".into(),
            application_id: "test".into(),
            application_version: "1.0".into(),
            date: "2024-01-01".into(),
        }
    }

    #[test]
    fn flags_duplicate_component_ids() {
        let db = db_with_gear();
        let mut model = Model::new(model_info());
        model.push_component(Component::new(1, "gear").with_external_id(1));
        model.push_component(Component::new(2, "gear").with_external_id(1));
        let validator = SemanticValidator::new(&db, Mode::Strict);
        let result = validator.validate(&model);
        assert!(result.has_critical());
    }

    #[test]
    fn flags_unknown_attribute() {
        let db = db_with_gear();
        let mut model = Model::new(model_info());
        let mut component = Component::new(1, "gear");
        component.push_attribute(crate::model::Attribute::new("unknown_attribute", Value::integer(1)));
        model.push_component(component);
        let validator = SemanticValidator::new(&db, Mode::Strict);
        let result = validator.validate(&model);
        assert!(!result.ok());
    }

    #[test]
    fn relaxed_mode_downgrades_errors() {
        let db = db_with_gear();
        let mut model = Model::new(model_info());
        let mut component = Component::new(1, "gear");
        component.push_attribute(crate::model::Attribute::new("unknown_attribute", Value::integer(1)));
        model.push_component(component);
        let validator = SemanticValidator::new(&db, Mode::Relaxed);
        let result = validator.validate(&model);
        assert!(result.ok());
        assert!(result.has_issues());
    }

    #[test]
    fn flags_relation_referencing_unknown_component() {
        let db = db_with_gear();
        let mut model = Model::new(model_info());
        model.push_component(Component::new(1, "gear"));
        let relation = crate::model::Relation::new(1, crate::model::RelationType::Assembly)
            .with_reference(RelationReference {
                role: crate::model::RelationRole::Assembly,
                component_id: 1,
                order: None,
                hint: None,
            })
            .with_reference(RelationReference {
                role: crate::model::RelationRole::Part,
                component_id: 99,
                order: None,
                hint: None,
            });
        model.push_relation(relation);
        let validator = SemanticValidator::new(&db, Mode::Strict);
        let result = validator.validate(&model);
        assert!(result.has_critical());
    }
}
