// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializes a model to the structured-text tree format.
//!
//! Grounded on `original_source/include/rexsapi/XMLModelSerializer.hxx`.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::model::{Component, Model, Relation};
use crate::parser::RAW_REFERENCE_ID_ATTRIBUTE;
use crate::serializer::ModelSerializer;
use crate::value::codec::{self};
use crate::value::{CodeType, ValueType};

pub struct TreeModelSerializer;

impl TreeModelSerializer {
    pub fn new() -> Self {
        Self
    }

    fn write_attribute(out: &mut String, attribute: &crate::model::Attribute, id_map: &HashMap<i64, i64>) {
        let unit_attr = attribute.unit.as_deref().map(|u| format!(r#" unit="{}""#, escape(u))).unwrap_or_default();

        let coded = attribute.value.coded();
        if coded != CodeType::None {
            if let Some(values) = attribute.value.as_integer_array() {
                let (encoded, wire_type) = codec::encode_integer_array(values);
                let _ = writeln!(out, r#"      <attribute id="{}"{unit_attr} coded="{}">{}</attribute>"#, attribute.id, wire_type.as_wire_str(), encoded);
                return;
            }
            if let Some(values) = attribute.value.as_float_array() {
                if let Ok((encoded, wire_type)) = codec::encode_float_array(values, coded) {
                    let _ = writeln!(out, r#"      <attribute id="{}"{unit_attr} coded="{}">{}</attribute>"#, attribute.id, wire_type.as_wire_str(), encoded);
                    return;
                }
            }
            if let Some(matrix) = attribute.value.as_integer_matrix() {
                let (encoded, wire_type) = codec::encode_integer_matrix(matrix);
                let _ = writeln!(
                    out,
                    r#"      <attribute id="{}"{unit_attr} coded="{}" rows="{}">{}</attribute>"#,
                    attribute.id, wire_type.as_wire_str(), matrix.row_count(), encoded
                );
                return;
            }
            if let Some(matrix) = attribute.value.as_float_matrix() {
                if let Ok((encoded, wire_type)) = codec::encode_float_matrix(matrix, coded) {
                    let _ = writeln!(
                        out,
                        r#"      <attribute id="{}"{unit_attr} coded="{}" rows="{}">{}</attribute>"#,
                        attribute.id, wire_type.as_wire_str(), matrix.row_count(), encoded
                    );
                    return;
                }
            }
        }

        if attribute.value.value_type() == ValueType::ReferenceComponent && attribute.id != RAW_REFERENCE_ID_ATTRIBUTE {
            let target = attribute.value.as_integer().map(|target| *id_map.get(&target).unwrap_or(&target));
            let _ = writeln!(out, r#"      <attribute id="{}"{unit_attr}>{}</attribute>"#, attribute.id, target.map(|t| t.to_string()).unwrap_or_default());
            return;
        }

        let _ = writeln!(out, r#"      <attribute id="{}"{unit_attr}>{}</attribute>"#, attribute.id, escape(&attribute.value.as_string()));
    }

    fn write_component(out: &mut String, component: &Component, id_map: &HashMap<i64, i64>) {
        let name_attr = component.name.as_deref().map(|n| format!(r#" name="{}""#, escape(n))).unwrap_or_default();
        let emitted_id = id_map.get(&component.internal_id).copied().unwrap_or(component.internal_id);
        let _ = writeln!(out, r#"    <component id="{}" type="{}"{name_attr}>"#, emitted_id, escape(&component.component_type));
        for attribute in &component.attributes {
            Self::write_attribute(out, attribute, id_map);
        }
        let _ = writeln!(out, "    </component>");
    }

    fn write_relation(out: &mut String, relation: &Relation, id_map: &HashMap<i64, i64>) {
        let _ = writeln!(out, r#"    <relation id="{}" type="{}">"#, relation.id, relation.relation_type.as_wire_str());
        for reference in &relation.references {
            let order_attr = reference.order.map(|o| format!(r#" order="{o}""#)).unwrap_or_default();
            let emitted_id = id_map.get(&reference.component_id).copied().unwrap_or(reference.component_id);
            let _ = writeln!(out, r#"      <ref id="{}" role="{}"{order_attr}/>"#, emitted_id, reference.role.as_wire_str());
        }
        let _ = writeln!(out, "    </relation>");
    }
}

impl Default for TreeModelSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSerializer for TreeModelSerializer {
    fn serialize(&self, model: &Model) -> String {
        log::info!("serializing model with {} components and {} relations to tree format", model.components().len(), model.relations().len());

        // Component ids are renumbered to a dense, 1-based sequence in
        // document order; every reference is rewritten through the same map
        // so the emitted document is self-consistent.
        let id_map: HashMap<i64, i64> =
            model.components().iter().enumerate().map(|(index, c)| (c.internal_id, (index + 1) as i64)).collect();

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<model applicationId="{}" applicationVersion="{}" date="{}" version="{}" language="{}">"#,
            escape(&model.info().application_id),
            escape(&model.info().application_version),
            escape(&model.info().date),
            model.info().version,
            escape(&model.info().language),
        );
        let _ = writeln!(out, "  <relations>");
        for relation in model.relations() {
            Self::write_relation(&mut out, relation, &id_map);
        }
        let _ = writeln!(out, "  </relations>");
        let _ = writeln!(out, "  <components>");
        for component in model.components() {
            Self::write_component(&mut out, component, &id_map);
        }
        let _ = writeln!(out, "  </components>");
        let _ = writeln!(out, "</model>");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelInfo;
    use crate::parser::{ModelParser, TreeModelParser};

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
        let serializer = TreeModelSerializer::new();
        let rendered = serializer.serialize(&model);

        let db = crate::db::model::DbModel::new("1.5", "en");
        let parser = TreeModelParser::new();
        let (parsed, result) = parser.parse(&rendered, &db, crate::config::Mode::Strict);
        assert!(result.ok());
        assert_eq!(parsed.unwrap().info().application_id, "test");
    }
}
