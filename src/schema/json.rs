// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal JSON Schema draft-07 subset validator: `type`, `required`,
//! `properties`, `items`, `enum`. Sufficient for validating the REXS JSON
//! wire format without pulling in a full draft-07 engine.
//!
//! Grounded on `original_source/include/rexsapi/JsonSchemaValidator.hxx`.

use serde_json::Value as Json;

use crate::diagnostics::{Result as DiagResult, Severity};
use crate::schema::SchemaValidator;

/// The JSON types `"type"` can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl JsonType {
    fn matches(self, value: &Json) -> bool {
        match self {
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Null => value.is_null(),
        }
    }
}

/// One schema node, recursively describing a JSON value's shape.
pub struct JsonSchema {
    pub json_type: Option<JsonType>,
    pub required: &'static [&'static str],
    pub properties: &'static [(&'static str, &'static JsonSchema)],
    pub items: Option<&'static JsonSchema>,
    pub enum_values: &'static [&'static str],
}

pub const EMPTY_SCHEMA: JsonSchema =
    JsonSchema { json_type: None, required: &[], properties: &[], items: None, enum_values: &[] };

static ATTRIBUTE: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Object), required: &["id"], properties: &[], items: None, enum_values: &[] };

static ATTRIBUTES: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Array), required: &[], properties: &[], items: Some(&ATTRIBUTE), enum_values: &[] };

static COMPONENT: JsonSchema = JsonSchema {
    json_type: Some(JsonType::Object),
    required: &["id", "type"],
    properties: &[("attributes", &ATTRIBUTES)],
    items: None,
    enum_values: &[],
};

static COMPONENTS: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Array), required: &[], properties: &[], items: Some(&COMPONENT), enum_values: &[] };

static REF: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Object), required: &["id", "role"], properties: &[], items: None, enum_values: &[] };

static REFS: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Array), required: &[], properties: &[], items: Some(&REF), enum_values: &[] };

static RELATION: JsonSchema = JsonSchema {
    json_type: Some(JsonType::Object),
    required: &["id", "type", "refs"],
    properties: &[("refs", &REFS)],
    items: None,
    enum_values: &[],
};

static RELATIONS: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Array), required: &[], properties: &[], items: Some(&RELATION), enum_values: &[] };

static MODEL: JsonSchema = JsonSchema {
    json_type: Some(JsonType::Object),
    required: &["applicationId", "applicationVersion", "date", "version", "components", "relations"],
    properties: &[("components", &COMPONENTS), ("relations", &RELATIONS)],
    items: None,
    enum_values: &[],
};

static ROOT: JsonSchema =
    JsonSchema { json_type: Some(JsonType::Object), required: &["model"], properties: &[("model", &MODEL)], items: None, enum_values: &[] };

/// The embedded schema for a REXS JSON document's top-level `model` object.
pub fn model_schema() -> &'static JsonSchema {
    &ROOT
}

/// Validates a JSON document against an embedded [`JsonSchema`].
pub struct JsonSchemaValidator {
    schema: &'static JsonSchema,
}

impl JsonSchemaValidator {
    pub fn new(schema: &'static JsonSchema) -> Self {
        Self { schema }
    }

    pub fn for_model() -> Self {
        Self::new(model_schema())
    }

    fn validate_value(&self, schema: &JsonSchema, path: &str, value: &Json, result: &mut DiagResult) {
        if let Some(expected) = schema.json_type {
            if !expected.matches(value) {
                result.add_error(Severity::Error, format!("'{path}' has the wrong JSON type"));
                return;
            }
        }
        if !schema.enum_values.is_empty() {
            if let Some(s) = value.as_str() {
                if !schema.enum_values.contains(&s) {
                    result.add_error(Severity::Error, format!("'{path}' has value '{s}' not in the allowed enumeration"));
                }
            }
        }
        if let Json::Object(map) = value {
            for required in schema.required {
                if !map.contains_key(*required) {
                    result.add_error(Severity::Error, format!("'{path}' is missing required property '{required}'"));
                }
            }
            for (name, child_schema) in schema.properties {
                if let Some(child) = map.get(*name) {
                    self.validate_value(child_schema, &format!("{path}.{name}"), child, result);
                }
            }
        }
        if let (Json::Array(items), Some(item_schema)) = (value, schema.items) {
            for (i, item) in items.iter().enumerate() {
                self.validate_value(item_schema, &format!("{path}[{i}]"), item, result);
            }
        }
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, document: &str) -> DiagResult {
        let mut result = DiagResult::new();
        match serde_json::from_str::<Json>(document) {
            Ok(value) => self.validate_value(self.schema, "$", &value, &mut result),
            Err(e) => result.add_error(Severity::Critical, format!("malformed JSON: {e}")),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_missing_required_property() {
        let json = r#"{"model":{"applicationId":"x"}}"#;
        let validator = JsonSchemaValidator::for_model();
        let result = validator.validate(json);
        assert!(!result.ok());
    }

    #[test]
    fn accepts_well_formed_minimal_model() {
        let json = r#"{"model":{"applicationId":"x","applicationVersion":"1","date":"2024","version":"1.5","components":[],"relations":[]}}"#;
        let validator = JsonSchemaValidator::for_model();
        let result = validator.validate(json);
        assert!(result.ok());
    }

    #[test]
    fn flags_malformed_json() {
        let validator = JsonSchemaValidator::for_model();
        let result = validator.validate("{not json");
        assert!(result.has_critical());
    }
}
