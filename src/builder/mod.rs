// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateful DSL for constructing a [`Model`] programmatically.
//!
//! Grounded on `original_source/include/rexsapi/ModelBuilder.hxx`. The
//! builder maintains three nested levels of in-progress state -- the
//! component under construction, the attribute under construction, and the
//! relation under construction -- committing each level into its parent the
//! moment a sibling of the same level is started.

use std::collections::HashSet;

use crate::config::Mode;
use crate::db::model::DbModel;
use crate::db::registry::Version;
use crate::error::{Error, Result};
use crate::model::load_spectrum::{Accumulation, LoadCase, LoadComponent, LoadSpectrum};
use crate::model::{Attribute, Component, Model, ModelInfo, Relation, RelationReference, RelationRole, RelationType};
use crate::semantic::tables;
use crate::value::{CodeType, Matrix, Value, ValueType};

/// An attribute id exempt from reference rewriting and from the `value()`
/// rejection that otherwise applies to `Reference Component` attributes.
const RAW_REFERENCE_ID_ATTRIBUTE: &str = "referenced_component_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdMode {
    Unset,
    Auto,
    Caller,
}

struct PendingAttribute {
    id: String,
    value_type: ValueType,
    unit: Option<String>,
    value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeTarget {
    Component,
    LoadComponent,
}

/// Builds a [`Model`] one component, attribute and relation at a time,
/// minting ids, resolving symbolic references and running the relation
/// checker before handing back a structurally valid model.
pub struct Builder<'a> {
    db: &'a DbModel,
    id_mode: IdMode,
    next_id: i64,

    components: Vec<Component>,
    current_component: Option<Component>,

    relations: Vec<Relation>,
    current_relation: Option<Relation>,

    load_cases: Vec<LoadCase>,
    current_load_case: Option<LoadCase>,
    accumulation: Option<Accumulation>,
    in_accumulation: bool,
    current_load_component: Option<LoadComponent>,

    attribute_target: AttributeTarget,
    current_attribute: Option<PendingAttribute>,
}

impl<'a> Builder<'a> {
    pub fn new(db: &'a DbModel) -> Self {
        Self {
            db,
            id_mode: IdMode::Unset,
            next_id: 1,
            components: Vec::new(),
            current_component: None,
            relations: Vec::new(),
            current_relation: None,
            load_cases: Vec::new(),
            current_load_case: None,
            accumulation: None,
            in_accumulation: false,
            current_load_component: None,
            attribute_target: AttributeTarget::Component,
            current_attribute: None,
        }
    }

    // --- components -----------------------------------------------------

    pub fn add_component(&mut self, component_type: impl Into<String>, id: Option<i64>) -> Result<()> {
        self.commit_component();
        let id = match (id, self.id_mode) {
            (Some(id), IdMode::Unset) => {
                self.id_mode = IdMode::Caller;
                id
            }
            (Some(id), IdMode::Caller) => id,
            (Some(_), IdMode::Auto) => {
                return Err(Error::BuilderState("cannot mix caller-supplied ids with auto-minted ids".into()))
            }
            (None, IdMode::Unset) => {
                self.id_mode = IdMode::Auto;
                self.mint_id()
            }
            (None, IdMode::Auto) => self.mint_id(),
            (None, IdMode::Caller) => {
                return Err(Error::BuilderState("an id is required once caller-supplied ids are in use".into()))
            }
        };
        self.current_component = Some(Component::new(id, component_type));
        self.attribute_target = AttributeTarget::Component;
        Ok(())
    }

    fn mint_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // --- attributes -------------------------------------------------------

    pub fn add_attribute(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        let Some(db_attribute) = self.db.attribute(&id) else {
            return Err(Error::BuilderState(format!("unknown attribute '{id}'")));
        };
        self.start_attribute(id, db_attribute.value_type, db_attribute.unit.clone())
    }

    pub fn add_custom_attribute(&mut self, id: impl Into<String>, value_type: ValueType) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::BuilderState("custom attribute id must not be empty".into()));
        }
        self.start_attribute(id, value_type, None)
    }

    fn start_attribute(&mut self, id: String, value_type: ValueType, unit: Option<String>) -> Result<()> {
        self.commit_attribute();
        if self.attribute_owner_has(&id) {
            return Err(Error::BuilderState(format!("duplicate attribute '{id}'")));
        }
        self.current_attribute = Some(PendingAttribute { id, value_type, unit, value: None });
        Ok(())
    }

    fn attribute_owner_has(&self, id: &str) -> bool {
        match self.attribute_target {
            AttributeTarget::Component => self.current_component.as_ref().is_some_and(|c| c.attribute(id).is_some()),
            AttributeTarget::LoadComponent => {
                self.current_load_component.as_ref().is_some_and(|c| c.attributes.iter().any(|a| a.id == id))
            }
        }
    }

    fn active_attribute(&mut self) -> Result<&mut PendingAttribute> {
        self.current_attribute.as_mut().ok_or_else(|| Error::BuilderState("no attribute is under construction".into()))
    }

    fn set_value(&mut self, expected: ValueType, value: Value) -> Result<()> {
        let attribute = self.active_attribute()?;
        if attribute.value_type != expected {
            return Err(Error::BuilderState(format!(
                "attribute '{}' expects {} but got {}",
                attribute.id, attribute.value_type, expected
            )));
        }
        if attribute.value_type == ValueType::ReferenceComponent && attribute.id != RAW_REFERENCE_ID_ATTRIBUTE {
            return Err(Error::BuilderState(format!(
                "attribute '{}' is a reference component; use reference(id) instead of value()",
                attribute.id
            )));
        }
        attribute.value = Some(value);
        Ok(())
    }

    pub fn float_value(&mut self, v: f64) -> Result<()> {
        self.set_value(ValueType::Float, Value::float(v))
    }

    pub fn integer_value(&mut self, v: i64) -> Result<()> {
        self.set_value(ValueType::Integer, Value::integer(v))
    }

    pub fn boolean_value(&mut self, v: bool) -> Result<()> {
        self.set_value(ValueType::Boolean, Value::boolean(v))
    }

    pub fn string_value(&mut self, v: impl Into<String>) -> Result<()> {
        self.set_value(ValueType::String, Value::string(v.into()))
    }

    pub fn enum_value(&mut self, v: impl Into<String>) -> Result<()> {
        self.set_value(ValueType::Enum, Value::enum_value(v.into()))
    }

    pub fn file_reference_value(&mut self, v: impl Into<String>) -> Result<()> {
        self.set_value(ValueType::FileReference, Value::file_reference(v.into()))
    }

    pub fn float_array_value(&mut self, v: Vec<f64>) -> Result<()> {
        self.set_value(ValueType::FloatArray, Value::float_array(v))
    }

    pub fn integer_array_value(&mut self, v: Vec<i64>) -> Result<()> {
        self.set_value(ValueType::IntegerArray, Value::integer_array(v))
    }

    pub fn boolean_array_value(&mut self, v: Vec<bool>) -> Result<()> {
        self.set_value(ValueType::BooleanArray, Value::boolean_array(v))
    }

    pub fn float_matrix_value(&mut self, rows: Vec<Vec<f64>>) -> Result<()> {
        let matrix = Matrix::new(rows).ok_or_else(|| Error::BuilderState("matrix rows are not uniform".into()))?;
        self.set_value(ValueType::FloatMatrix, Value::float_matrix(matrix))
    }

    pub fn integer_matrix_value(&mut self, rows: Vec<Vec<i64>>) -> Result<()> {
        let matrix = Matrix::new(rows).ok_or_else(|| Error::BuilderState("matrix rows are not uniform".into()))?;
        self.set_value(ValueType::IntegerMatrix, Value::integer_matrix(matrix))
    }

    /// Records a symbolic reference to another component's external id. The
    /// target is rewritten to the component's internal id when [`Self::build`]
    /// resolves it; an unresolved target is reported there, not here.
    pub fn reference(&mut self, target_id: i64) -> Result<()> {
        let attribute = self.active_attribute()?;
        if attribute.value_type != ValueType::ReferenceComponent {
            return Err(Error::BuilderState(format!("attribute '{}' is not a reference component", attribute.id)));
        }
        attribute.value = Some(Value::reference_component(target_id));
        Ok(())
    }

    pub fn coded(&mut self, code_type: CodeType) -> Result<()> {
        let attribute = self.active_attribute()?;
        let value = attribute.value.take().ok_or_else(|| Error::BuilderState("attribute has no value to code".into()))?;
        attribute.value = Some(value.with_coded(code_type));
        Ok(())
    }

    fn commit_attribute(&mut self) {
        let Some(pending) = self.current_attribute.take() else { return };
        let Some(value) = pending.value else { return };
        let mut attribute = Attribute::new(pending.id, value);
        if let Some(unit) = pending.unit {
            attribute = attribute.with_unit(unit);
        }
        match self.attribute_target {
            AttributeTarget::Component => {
                if let Some(component) = self.current_component.as_mut() {
                    component.push_attribute(attribute);
                }
            }
            AttributeTarget::LoadComponent => {
                if let Some(lc) = self.current_load_component.as_mut() {
                    lc.attributes.push(attribute);
                }
            }
        }
    }

    fn commit_component(&mut self) {
        self.commit_attribute();
        if let Some(component) = self.current_component.take() {
            self.components.push(component);
        }
    }

    // --- relations --------------------------------------------------------

    pub fn add_relation(&mut self, relation_type: RelationType, id: Option<i64>) -> Result<()> {
        self.commit_relation();
        let id = id.unwrap_or_else(|| self.relations.iter().map(|r| r.id).max().unwrap_or(0) + 1);
        self.current_relation = Some(Relation::new(id, relation_type));
        Ok(())
    }

    pub fn relation_order(&mut self, order: i64) -> Result<()> {
        let relation = self.current_relation.as_mut().ok_or_else(|| Error::BuilderState("no relation is under construction".into()))?;
        relation.order = Some(order);
        Ok(())
    }

    pub fn add_ref(&mut self, role: RelationRole, component_id: i64, order: Option<i64>) -> Result<()> {
        let relation = self.current_relation.as_mut().ok_or_else(|| Error::BuilderState("no relation is under construction".into()))?;
        relation.references.push(RelationReference { role, component_id, order, hint: None });
        Ok(())
    }

    fn commit_relation(&mut self) {
        if let Some(relation) = self.current_relation.take() {
            self.relations.push(relation);
        }
    }

    // --- load spectrum ------------------------------------------------------

    pub fn add_load_case(&mut self, id: i64) -> Result<()> {
        self.commit_load_case();
        self.in_accumulation = false;
        self.current_load_case = Some(LoadCase::new(id));
        Ok(())
    }

    pub fn add_accumulation(&mut self) -> Result<()> {
        self.commit_load_case();
        self.in_accumulation = true;
        self.accumulation.get_or_insert_with(Accumulation::new);
        Ok(())
    }

    pub fn add_load_component(&mut self, component_id: i64) -> Result<()> {
        if !self.in_accumulation && self.current_load_case.is_none() {
            return Err(Error::BuilderState("add_load_case or add_accumulation must be called before add_load_component".into()));
        }
        self.commit_load_component();
        self.attribute_target = AttributeTarget::LoadComponent;
        self.current_load_component = Some(LoadComponent::new(component_id));
        Ok(())
    }

    fn commit_load_component(&mut self) {
        self.commit_attribute();
        let Some(load_component) = self.current_load_component.take() else { return };
        if self.in_accumulation {
            self.accumulation.get_or_insert_with(Accumulation::new).load_components.push(load_component);
        } else if let Some(case) = self.current_load_case.as_mut() {
            case.load_components.push(load_component);
        }
    }

    fn commit_load_case(&mut self) {
        self.commit_load_component();
        if let Some(case) = self.current_load_case.take() {
            self.load_cases.push(case);
        }
    }

    // --- build --------------------------------------------------------------

    /// Materializes the constructed components, resolves every symbolic
    /// reference, checks every component participates in at least one
    /// relation (when any relation exists), and runs the relation checker
    /// in strict mode, aggregating all failures into a single error.
    pub fn build(mut self, info: ModelInfo) -> Result<Model> {
        self.commit_component();
        self.commit_relation();
        self.commit_load_case();
        self.attribute_target = AttributeTarget::Component;

        let component_ids: HashSet<i64> = self.components.iter().map(|c| c.internal_id).collect();

        let mut errors = Vec::new();
        for component in &mut self.components {
            for attribute in &mut component.attributes {
                if attribute.value.value_type() != ValueType::ReferenceComponent || attribute.id == RAW_REFERENCE_ID_ATTRIBUTE {
                    continue;
                }
                let Some(target) = attribute.value.as_integer() else { continue };
                if !component_ids.contains(&target) {
                    errors.push(format!("attribute '{}' references unknown component {target}", attribute.id));
                }
            }
        }

        if !self.relations.is_empty() {
            let mut referenced: HashSet<i64> = HashSet::new();
            for relation in &self.relations {
                for reference in &relation.references {
                    referenced.insert(reference.component_id);
                }
            }
            for id in &component_ids {
                if !referenced.contains(id) {
                    errors.push(format!("component {id} is not used in any relation"));
                }
            }
        }

        let version = Version::parse(&self.db.version).unwrap_or(Version::new(1, 0));
        for relation in &self.relations {
            let Some(rule) = tables::rule_for(version, relation.relation_type) else {
                errors.push(format!("relation type '{}' is not recognized for database version {}", relation.relation_type, self.db.version));
                continue;
            };
            let mut seen_roles = HashSet::new();
            for reference in &relation.references {
                if !rule.allowed_roles.contains(&reference.role) {
                    errors.push(format!("role '{}' is not permitted for relation type '{}'", reference.role, relation.relation_type));
                }
                if rule.ordered && reference.order.is_none() {
                    errors.push(format!("relation {} of ordered type '{}' is missing an order", relation.id, relation.relation_type));
                }
                seen_roles.insert(reference.role);
            }
            for required_role in rule.allowed_roles {
                if !seen_roles.contains(required_role) {
                    errors.push(format!("relation {} of type '{}' is missing a reference with role '{}'", relation.id, relation.relation_type, required_role));
                }
            }
        }

        if !errors.is_empty() {
            return Err(Error::BuilderState(errors.join("; ")));
        }

        log::info!("built model with {} components and {} relations", self.components.len(), self.relations.len());

        let mut load_spectrum = LoadSpectrum::new();
        load_spectrum.load_cases = self.load_cases;
        load_spectrum.accumulation = self.accumulation;
        Ok(Model::from_parts(info, self.components, self.relations, load_spectrum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model::{DbAttribute, DbComponent};

    fn db() -> DbModel {
        let mut db = DbModel::new("1.5", "en");
        db.add_component(DbComponent { id: "gear".into(), name: "Gear".into(), attribute_ids: vec!["weight".into(), "reference_component_for_position".into()] });
        db.add_attribute(DbAttribute { id: "weight".into(), name: "Weight".into(), value_type: ValueType::Float, unit: Some("kg".into()), enum_name: None, interval: None });
        db.add_attribute(DbAttribute {
            id: "reference_component_for_position".into(),
            name: "Reference".into(),
            value_type: ValueType::ReferenceComponent,
            unit: None,
            enum_name: None,
            interval: None,
        });
        db
    }

    fn info() -> ModelInfo {
        ModelInfo { version: Version::new(1, 5), language: "en".into(), application_id: "test".into(), application_version: "1.0".into(), date: "2024-01-01".into() }
    }

    #[test]
    fn mints_auto_ids_when_caller_omits_them() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", None).unwrap();
        builder.add_attribute("weight").unwrap();
        builder.float_value(12.0).unwrap();
        builder.add_component("gear", None).unwrap();
        let model = builder.build(info()).unwrap();
        assert_eq!(model.components()[0].internal_id, 1);
        assert_eq!(model.components()[1].internal_id, 2);
    }

    #[test]
    fn rejects_mixing_auto_and_caller_ids() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", None).unwrap();
        let err = builder.add_component("gear", Some(5)).unwrap_err();
        assert!(matches!(err, Error::BuilderState(_)));
    }

    #[test]
    fn rejects_scalar_value_on_reference_component_attribute() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", Some(1)).unwrap();
        builder.add_attribute("reference_component_for_position").unwrap();
        let err = builder.integer_value(42).unwrap_err();
        assert!(matches!(err, Error::BuilderState(_)));
    }

    #[test]
    fn resolves_reference_to_another_components_internal_id() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", Some(42)).unwrap();
        builder.add_component("gear", Some(43)).unwrap();
        builder.add_attribute("reference_component_for_position").unwrap();
        builder.reference(42).unwrap();
        builder.add_relation(RelationType::Assembly, Some(1)).unwrap();
        builder.add_ref(RelationRole::Assembly, 42, None).unwrap();
        builder.add_ref(RelationRole::Part, 43, None).unwrap();
        let model = builder.build(info()).unwrap();
        let target = model.components()[1].attribute("reference_component_for_position").unwrap();
        assert_eq!(target.value.as_integer(), Some(42));
    }

    #[test]
    fn rejects_dangling_reference() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", Some(1)).unwrap();
        builder.add_attribute("reference_component_for_position").unwrap();
        builder.reference(999).unwrap();
        let err = builder.build(info()).unwrap_err();
        assert!(matches!(err, Error::BuilderState(_)));
    }

    #[test]
    fn builds_a_load_case_with_its_own_attributes() {
        let db = db();
        let mut builder = Builder::new(&db);
        builder.add_component("gear", Some(1)).unwrap();
        builder.add_component("gear", Some(2)).unwrap();
        builder.add_relation(RelationType::Assembly, Some(1)).unwrap();
        builder.add_ref(RelationRole::Assembly, 1, None).unwrap();
        builder.add_ref(RelationRole::Part, 2, None).unwrap();
        builder.add_load_case(1).unwrap();
        builder.add_load_component(1).unwrap();
        builder.add_attribute("weight").unwrap();
        builder.float_value(99.0).unwrap();
        let model = builder.build(info()).unwrap();
        assert_eq!(model.load_spectrum().load_cases.len(), 1);
        assert_eq!(model.load_spectrum().load_cases[0].load_components[0].attributes[0].value.as_float(), Some(99.0));
    }
}
