// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parses the JSON wire format.
//!
//! Grounded on `original_source/include/rexsapi/JsonModelLoader.hxx`.

use serde_json::Value as Json;

use crate::config::Mode;
use crate::db::model::DbModel;
use crate::db::registry::Version;
use crate::decoder::{self, DecoderResult, RawPayload};
use crate::diagnostics::{Result as DiagResult, Severity};
use crate::model::{Attribute, Component, Model, ModelInfo, Relation, RelationReference, RelationRole, RelationType};
use crate::parser::{self, ModelParser};
use crate::schema::{JsonSchemaValidator, SchemaValidator};
use crate::value::codec::CodedValueType;

pub struct JsonModelParser;

impl JsonModelParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_attribute(json: &Json, db: &DbModel, result: &mut DiagResult) -> Option<Attribute> {
        let id = json.get("id")?.as_str()?.to_string();
        let Some(db_attribute) = db.attribute(&id) else {
            result.add_error(Severity::Error, format!("unknown attribute '{id}'"));
            return None;
        };
        let unit = json.get("unit").and_then(Json::as_str).map(str::to_string);

        let payload = if let Some(coded) = json.get("coded").and_then(Json::as_str) {
            let wire_type = match CodedValueType::from_wire_str(coded) {
                Ok(t) => t,
                Err(e) => {
                    result.add_error(Severity::Error, e.to_string());
                    return None;
                }
            };
            let data = json.get("value").and_then(Json::as_str).unwrap_or_default();
            let rows = json.get("rows").and_then(Json::as_u64).map(|v| v as usize);
            RawPayload::Coded { data, wire_type, rows }
        } else {
            match json.get("value") {
                None | Some(Json::Null) => RawPayload::Empty,
                Some(value) => {
                    return Self::decode_structured_value(&id, db_attribute.value_type, value, unit, result);
                }
            }
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
                result.add_error(Severity::Error, format!("attribute '{id}': {msg}"));
                None
            }
        }
    }

    /// JSON natively distinguishes numbers/strings/arrays/booleans, so
    /// non-coded values are decoded directly from the `serde_json::Value`
    /// rather than round-tripped through the text decoder used by the tree
    /// format.
    fn decode_structured_value(
        id: &str,
        value_type: crate::value::ValueType,
        json: &Json,
        unit: Option<String>,
        result: &mut DiagResult,
    ) -> Option<Attribute> {
        use crate::value::{Matrix, Value, ValueType};

        let value = match (value_type, json) {
            (ValueType::Float, Json::Number(n)) => Value::float(n.as_f64()?),
            (ValueType::Integer, Json::Number(n)) => Value::integer(n.as_i64()?),
            (ValueType::ReferenceComponent, Json::Number(n)) => Value::reference_component(n.as_i64()?),
            (ValueType::Boolean, Json::Bool(b)) => Value::boolean(*b),
            (ValueType::Enum, Json::String(s)) => Value::enum_value(s.clone()),
            (ValueType::String, Json::String(s)) => Value::string(s.clone()),
            (ValueType::FileReference, Json::String(s)) => Value::file_reference(s.clone()),
            (ValueType::DateTime, Json::String(s)) => match crate::value::DateTimeValue::parse(s) {
                Some(dt) => Value::date_time(dt),
                None => {
                    result.add_error(Severity::Error, format!("attribute '{id}' has an invalid date time"));
                    return None;
                }
            },
            (ValueType::FloatArray, Json::Array(items)) => {
                Value::float_array(items.iter().filter_map(Json::as_f64).collect())
            }
            (ValueType::IntegerArray, Json::Array(items)) => {
                Value::integer_array(items.iter().filter_map(Json::as_i64).collect())
            }
            (ValueType::BooleanArray, Json::Array(items)) => {
                Value::boolean_array(items.iter().filter_map(Json::as_bool).collect())
            }
            (ValueType::StringArray, Json::Array(items)) | (ValueType::EnumArray, Json::Array(items)) => {
                let strings: Vec<String> = items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
                if value_type == ValueType::EnumArray { Value::enum_array(strings) } else { Value::string_array(strings) }
            }
            (ValueType::ArrayOfIntegerArrays, Json::Array(rows)) => {
                let parsed: Vec<Vec<i64>> = rows
                    .iter()
                    .map(|row| row.as_array().map(|r| r.iter().filter_map(Json::as_i64).collect()).unwrap_or_default())
                    .collect();
                Value::array_of_integer_arrays(parsed)
            }
            (ValueType::FloatMatrix, Json::Array(rows)) => {
                let parsed: Vec<Vec<f64>> = rows
                    .iter()
                    .map(|row| row.as_array().map(|r| r.iter().filter_map(Json::as_f64).collect()).unwrap_or_default())
                    .collect();
                match Matrix::new(parsed) {
                    Some(matrix) => Value::float_matrix(matrix),
                    None => {
                        result.add_error(Severity::Error, format!("attribute '{id}' matrix rows are not uniform"));
                        return None;
                    }
                }
            }
            (ValueType::IntegerMatrix, Json::Array(rows)) => {
                let parsed: Vec<Vec<i64>> = rows
                    .iter()
                    .map(|row| row.as_array().map(|r| r.iter().filter_map(Json::as_i64).collect()).unwrap_or_default())
                    .collect();
                match Matrix::new(parsed) {
                    Some(matrix) => Value::integer_matrix(matrix),
                    None => {
                        result.add_error(Severity::Error, format!("attribute '{id}' matrix rows are not uniform"));
                        return None;
                    }
                }
            }
            _ => {
                result.add_error(Severity::Error, format!("attribute '{id}' has value type {value_type} but an incompatible JSON shape"));
                return None;
            }
        };

        let mut attribute = Attribute::new(id, value);
        if let Some(unit) = unit {
            attribute = attribute.with_unit(unit);
        }
        Some(attribute)
    }

    fn parse_component(json: &Json, db: &DbModel, result: &mut DiagResult) -> Option<Component> {
        let id = json.get("id")?.as_i64()?;
        let component_type = json.get("type")?.as_str()?.to_string();
        let mut component = Component::new(id, component_type);
        component.name = json.get("name").and_then(Json::as_str).map(str::to_string);
        if let Some(attrs) = json.get("attributes").and_then(Json::as_array) {
            for attr in attrs {
                if let Some(attribute) = Self::parse_attribute(attr, db, result) {
                    component.push_attribute(attribute);
                }
            }
        }
        Some(component)
    }

    fn parse_relation(json: &Json, result: &mut DiagResult) -> Option<Relation> {
        let id = json.get("id")?.as_i64()?;
        let type_str = json.get("type")?.as_str()?;
        let Some(relation_type) = RelationType::from_wire_str(type_str) else {
            result.add_error(Severity::Error, format!("unknown relation type '{type_str}'"));
            return None;
        };
        let mut relation = Relation::new(id, relation_type);
        relation.order = json.get("order").and_then(Json::as_i64);
        if let Some(refs) = json.get("refs").and_then(Json::as_array) {
            for reference in refs {
                let Some(component_id) = reference.get("id").and_then(Json::as_i64) else {
                    result.add_error(Severity::Error, "relation ref is missing a valid id".to_string());
                    continue;
                };
                let Some(role) = reference.get("role").and_then(Json::as_str).and_then(RelationRole::from_wire_str) else {
                    result.add_error(Severity::Error, "relation ref has an unknown role".to_string());
                    continue;
                };
                relation.references.push(RelationReference {
                    role,
                    component_id,
                    order: reference.get("order").and_then(Json::as_i64),
                    hint: reference.get("hint").and_then(Json::as_str).map(str::to_string),
                });
            }
        }
        Some(relation)
    }
}

impl Default for JsonModelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelParser for JsonModelParser {
    fn parse(&self, document: &str, db: &DbModel, mode: Mode) -> (Option<Model>, DiagResult) {
        log::info!("parsing JSON-format model document");
        let mut result = JsonSchemaValidator::for_model().validate(document);
        if result.has_critical() {
            return (None, result);
        }

        let root: Json = match serde_json::from_str(document) {
            Ok(v) => v,
            Err(e) => {
                result.add_error(Severity::Critical, format!("malformed JSON: {e}"));
                return (None, result);
            }
        };
        let model_json = root.get("model").expect("schema validation guarantees 'model' is present");

        let version_str = model_json.get("version").and_then(Json::as_str).unwrap_or_default();
        let Some(version) = Version::parse(version_str) else {
            result.add_error(Severity::Critical, format!("model declares an unparsable version '{version_str}'"));
            return (None, result);
        };

        let info = ModelInfo {
            version,
            language: model_json.get("language").and_then(Json::as_str).unwrap_or("en").to_string(),
            application_id: model_json.get("applicationId").and_then(Json::as_str).unwrap_or_default().to_string(),
            application_version: model_json.get("applicationVersion").and_then(Json::as_str).unwrap_or_default().to_string(),
            date: model_json.get("date").and_then(Json::as_str).unwrap_or_default().to_string(),
        };
        let mut model = Model::new(info);

        if let Some(components) = model_json.get("components").and_then(Json::as_array) {
            for component_json in components {
                if let Some(component) = Self::parse_component(component_json, db, &mut result) {
                    model.push_component(component);
                }
            }
        }

        if let Some(relations) = model_json.get("relations").and_then(Json::as_array) {
            for relation_json in relations {
                if let Some(relation) = Self::parse_relation(relation_json, &mut result) {
                    model.push_relation(relation);
                }
            }
        }

        log::info!("parsed model with {} components and {} relations", model.components().len(), model.relations().len());

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
        let json = r#"{"model":{"applicationId":"test","applicationVersion":"1.0","date":"2024-01-01","version":"1.5",
            "components":[{"id":1,"type":"gear","attributes":[{"id":"weight","unit":"kg","value":10.5}]}],
            "relations":[]}}"#;
        let parser = JsonModelParser::new();
        let (model, result) = parser.parse(json, &db(), crate::config::Mode::Strict);
        assert!(result.ok());
        let model = model.unwrap();
        assert_eq!(model.components()[0].attribute("weight").unwrap().value.as_float(), Some(10.5));
    }
}
