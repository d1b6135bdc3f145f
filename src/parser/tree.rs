// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parses the structured-text tree format using `roxmltree`.
//!
//! Grounded on `original_source/include/rexsapi/XMLModelLoader.hxx` and on
//! the teacher's `roxmltree` traversal style in
//! `hdds::dds::qos::loaders::fastdds`.

use crate::config::Mode;
use crate::db::model::DbModel;
use crate::db::registry::Version;
use crate::decoder::{self, DecoderResult, RawPayload};
use crate::diagnostics::{Result as DiagResult, Severity};
use crate::model::{
    Attribute, Component, Model, ModelInfo, Relation, RelationReference, RelationRole, RelationType,
};
use crate::parser::{self, ModelParser};
use crate::schema::{SchemaValidator, TreeSchemaValidator};
use crate::value::codec::CodedValueType;

pub struct TreeModelParser;

impl TreeModelParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_attribute(node: roxmltree::Node, db: &DbModel, result: &mut DiagResult) -> Option<Attribute> {
        let id = node.attribute("id")?.to_string();
        let Some(db_attribute) = db.attribute(&id) else {
            result.add_error_at(Severity::Error, format!("unknown attribute '{id}'"), node.range().start);
            return None;
        };
        let unit = node.attribute("unit").map(str::to_string);
        let coded_attr = node.attribute("coded");
        let rows = node.attribute("rows").and_then(|s| s.parse::<usize>().ok());
        let text = node.text().unwrap_or("").trim();

        let payload = if let Some(coded) = coded_attr {
            let wire_type = match CodedValueType::from_wire_str(coded) {
                Ok(t) => t,
                Err(e) => {
                    result.add_error_at(Severity::Error, e.to_string(), node.range().start);
                    return None;
                }
            };
            RawPayload::Coded { data: text, wire_type, rows }
        } else if text.is_empty() {
            RawPayload::Empty
        } else {
            RawPayload::Text(text)
        };

        match decoder::decode(db_attribute.value_type, payload) {
            DecoderResult::Success(value) => {
                let mut attribute = Attribute::new(id, value);
                if let Some(unit) = unit {
                    attribute = attribute.with_unit(unit);
                }
                Some(attribute)
            }
            DecoderResult::NoValue => None,
            DecoderResult::WrongType(msg) | DecoderResult::Failure(msg) => {
                result.add_error_at(Severity::Error, format!("attribute '{id}': {msg}"), node.range().start);
                None
            }
        }
    }

    fn parse_component(node: roxmltree::Node, db: &DbModel, result: &mut DiagResult) -> Option<Component> {
        let id: i64 = node.attribute("id")?.parse().ok()?;
        let component_type = node.attribute("type")?.to_string();
        let mut component = Component::new(id, component_type);
        component.name = node.attribute("name").map(str::to_string);
        for attr_node in node.children().filter(|c| c.has_tag_name("attribute")) {
            if let Some(attribute) = Self::parse_attribute(attr_node, db, result) {
                component.push_attribute(attribute);
            }
        }
        Some(component)
    }

    fn parse_relation(node: roxmltree::Node, result: &mut DiagResult) -> Option<Relation> {
        let id: i64 = node.attribute("id")?.parse().ok()?;
        let type_str = node.attribute("type")?;
        let Some(relation_type) = RelationType::from_wire_str(type_str) else {
            result.add_error_at(Severity::Error, format!("unknown relation type '{type_str}'"), node.range().start);
            return None;
        };
        let mut relation = Relation::new(id, relation_type);
        relation.order = node.attribute("order").and_then(|s| s.parse().ok());
        for ref_node in node.children().filter(|c| c.has_tag_name("ref")) {
            let Some(component_id) = ref_node.attribute("id").and_then(|s| s.parse::<i64>().ok()) else {
                result.add_error_at(Severity::Error, "relation ref is missing a valid id".to_string(), ref_node.range().start);
                continue;
            };
            let Some(role) = ref_node.attribute("role").and_then(RelationRole::from_wire_str) else {
                result.add_error_at(Severity::Error, "relation ref has an unknown role".to_string(), ref_node.range().start);
                continue;
            };
            relation.references.push(RelationReference {
                role,
                component_id,
                order: ref_node.attribute("order").and_then(|s| s.parse().ok()),
                hint: ref_node.attribute("hint").map(str::to_string),
            });
        }
        Some(relation)
    }
}

impl Default for TreeModelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelParser for TreeModelParser {
    fn parse(&self, document: &str, db: &DbModel, mode: Mode) -> (Option<Model>, DiagResult) {
        log::info!("parsing tree-format model document");
        let mut result = TreeSchemaValidator::for_model().validate(document);
        if result.has_critical() {
            return (None, result);
        }

        let doc = match roxmltree::Document::parse(document) {
            Ok(doc) => doc,
            Err(e) => {
                result.add_error(Severity::Critical, format!("malformed XML: {e}"));
                return (None, result);
            }
        };

        let root = doc.root_element();
        let version_str = root.attribute("version").unwrap_or_default();
        let Some(version) = Version::parse(version_str) else {
            result.add_error(Severity::Critical, format!("model declares an unparsable version '{version_str}'"));
            return (None, result);
        };

        let info = ModelInfo {
            version,
            language: root.attribute("language").unwrap_or("en").to_string(),
            application_id: root.attribute("applicationId").unwrap_or_default().to_string(),
            application_version: root.attribute("applicationVersion").unwrap_or_default().to_string(),
            date: root.attribute("date").unwrap_or_default().to_string(),
        };
        let mut model = Model::new(info);

        if let Some(components_node) = root.children().find(|c| c.has_tag_name("components")) {
            for component_node in components_node.children().filter(|c| c.has_tag_name("component")) {
                if let Some(component) = Self::parse_component(component_node, db, &mut result) {
                    model.push_component(component);
                }
            }
        }

        if let Some(relations_node) = root.children().find(|c| c.has_tag_name("relations")) {
            for relation_node in relations_node.children().filter(|c| c.has_tag_name("relation")) {
                if let Some(relation) = Self::parse_relation(relation_node, &mut result) {
                    model.push_relation(relation);
                }
            }
        }

        log::info!(
            "parsed model with {} components and {} relations",
            model.components().len(),
            model.relations().len()
        );

        parser::post_process(&mut model, &mut result);
        parser::run_semantic_validation(&model, db, mode, &mut result);

        (Some(model), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::model::{DbAttribute, DbComponent};
    use crate::value::ValueType;

    fn db() -> DbModel {
        let mut db = DbModel::new("1.5", "en");
        db.add_component(DbComponent { id: "gear".into(), name: "Gear".into(), attribute_ids: vec!["weight".into()] });
        db.add_attribute(DbAttribute {
            id: "weight".into(),
            name: "Weight".into(),
            value_type: ValueType::Float,
            unit: Some("kg".into()),
            enum_name: None,
            interval: None,
        });
        db
    }

    #[test]
    fn parses_minimal_model() {
        let xml = r#"<model applicationId="test" applicationVersion="1.0" date="2024-01-01" version="1.5">
            <relations/>
            <components>
                <component id="1" type="gear">
                    <attribute id="weight" unit="kg">10.5</attribute>
                </component>
            </components>
        </model>"#;
        let parser = TreeModelParser::new();
        let (model, result) = parser.parse(xml, &db(), crate::config::Mode::Strict);
        assert!(result.ok());
        let model = model.unwrap();
        assert_eq!(model.components().len(), 1);
        assert_eq!(model.components()[0].attribute("weight").unwrap().value.as_float(), Some(10.5));
    }

    #[test]
    fn unknown_attribute_is_flagged_but_parsing_continues() {
        let xml = r#"<model applicationId="test" applicationVersion="1.0" date="2024-01-01" version="1.5">
            <relations/>
            <components>
                <component id="1" type="gear">
                    <attribute id="unknown">1</attribute>
                </component>
            </components>
        </model>"#;
        let parser = TreeModelParser::new();
        let (model, result) = parser.parse(xml, &db(), crate::config::Mode::Strict);
        assert!(!result.ok());
        assert!(model.is_some());
    }
}
