// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializes a model to the JSON wire format.
//!
//! Grounded on `original_source/include/rexsapi/JsonModelSerializer.hxx`.

use std::collections::HashMap;

use serde_json::{json, Value as Json};

use crate::model::{Attribute, Component, Model, Relation};
use crate::parser::RAW_REFERENCE_ID_ATTRIBUTE;
use crate::serializer::ModelSerializer;
use crate::value::codec;
use crate::value::{CodeType, Value, ValueType};

pub struct JsonModelSerializer;

impl JsonModelSerializer {
    pub fn new() -> Self {
        Self
    }

    fn attribute_value_json(attribute_id: &str, value: &Value, id_map: &HashMap<i64, i64>) -> Json {
        match value.value_type() {
            ValueType::Float => json!(value.as_float()),
            ValueType::Integer => json!(value.as_integer()),
            ValueType::ReferenceComponent if attribute_id == RAW_REFERENCE_ID_ATTRIBUTE => json!(value.as_integer()),
            ValueType::ReferenceComponent => json!(value.as_integer().map(|target| *id_map.get(&target).unwrap_or(&target))),
            ValueType::Boolean => json!(value.as_boolean()),
            ValueType::Enum | ValueType::String | ValueType::FileReference => json!(value.as_str()),
            ValueType::DateTime => json!(value.as_date_time().map(|dt| dt.as_local_string())),
            ValueType::FloatArray => json!(value.as_float_array()),
            ValueType::IntegerArray => json!(value.as_integer_array()),
            ValueType::BooleanArray => json!(value.as_boolean_array()),
            ValueType::StringArray | ValueType::EnumArray => json!(value.as_string_array()),
            ValueType::FloatMatrix => json!(value.as_float_matrix().map(|m| m.rows().to_vec())),
            ValueType::IntegerMatrix => json!(value.as_integer_matrix().map(|m| m.rows().to_vec())),
            _ => Json::Null,
        }
    }

    fn attribute_json(attribute: &Attribute, id_map: &HashMap<i64, i64>) -> Json {
        let coded = attribute.value.coded();
        if coded != CodeType::None {
            if let Some(values) = attribute.value.as_integer_array() {
                let (encoded, wire_type) = codec::encode_integer_array(values);
                return json!({"id": attribute.id, "unit": attribute.unit, "coded": wire_type.as_wire_str(), "value": encoded});
            }
            if let Some(values) = attribute.value.as_float_array() {
                if let Ok((encoded, wire_type)) = codec::encode_float_array(values, coded) {
                    return json!({"id": attribute.id, "unit": attribute.unit, "coded": wire_type.as_wire_str(), "value": encoded});
                }
            }
        }
        json!({
            "id": attribute.id,
            "unit": attribute.unit,
            "value": Self::attribute_value_json(&attribute.id, &attribute.value, id_map),
        })
    }

    fn component_json(component: &Component, id_map: &HashMap<i64, i64>) -> Json {
        json!({
            "id": id_map.get(&component.internal_id).copied().unwrap_or(component.internal_id),
            "type": component.component_type,
            "name": component.name,
            "attributes": component.attributes.iter().map(|a| Self::attribute_json(a, id_map)).collect::<Vec<_>>(),
        })
    }

    fn relation_json(relation: &Relation, id_map: &HashMap<i64, i64>) -> Json {
        json!({
            "id": relation.id,
            "type": relation.relation_type.as_wire_str(),
            "order": relation.order,
            "refs": relation.references.iter().map(|r| json!({
                "id": id_map.get(&r.component_id).copied().unwrap_or(r.component_id),
                "role": r.role.as_wire_str(),
                "order": r.order,
                "hint": r.hint,
            })).collect::<Vec<_>>(),
        })
    }
}

impl Default for JsonModelSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSerializer for JsonModelSerializer {
    fn serialize(&self, model: &Model) -> String {
        log::info!("serializing model with {} components and {} relations to JSON format", model.components().len(), model.relations().len());

        // Component ids are renumbered to a dense, 1-based sequence in
        // document order; every reference is rewritten through the same map
        // so the emitted document is self-consistent.
        let id_map: HashMap<i64, i64> =
            model.components().iter().enumerate().map(|(index, c)| (c.internal_id, (index + 1) as i64)).collect();

        let root = json!({
            "model": {
                "applicationId": model.info().application_id,
                "applicationVersion": model.info().application_version,
                "date": model.info().date,
                "version": model.info().version.to_string(),
                "language": model.info().language,
                "components": model.components().iter().map(|c| Self::component_json(c, &id_map)).collect::<Vec<_>>(),
                "relations": model.relations().iter().map(|r| Self::relation_json(r, &id_map)).collect::<Vec<_>>(),
            }
        });
        serde_json::to_string_pretty(&root).expect("a constructed serde_json::Value always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelInfo;
    use crate::parser::{JsonModelParser, ModelParser};

    #[test]
    fn round_trips_a_minimal_model() {
        let info = ModelInfo {
            version: crate::db::registry::Version::new(1, 5),
            language: "en".into(),
            application_id: "test".into(),
            application_version: "1.0".into(),
            date: "2024-01-01".into(),
        };
        let model = Model::new(info);
        let serializer = JsonModelSerializer::new();
        let rendered = serializer.serialize(&model);

        let db = crate::db::model::DbModel::new("1.5", "en");
        let parser = JsonModelParser::new();
        let (parsed, result) = parser.parse(&rendered, &db, crate::config::Mode::Strict);
        assert!(result.ok());
        assert_eq!(parsed.unwrap().info().application_id, "test");
    }
}
