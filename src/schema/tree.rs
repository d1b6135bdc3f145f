// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal element/attribute tree validator for the tree wire format,
//! covering just the shape REXS documents need: required elements, required
//! attributes, and child cardinality.
//!
//! Grounded on `original_source/include/rexsapi/XSDSchemaValidator.hxx`.

use crate::diagnostics::{Result as DiagResult, Severity};
use crate::schema::SchemaValidator;

/// How many times a child element is permitted to appear under its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Cardinality {
    fn satisfied_by(self, count: usize) -> bool {
        match self {
            Cardinality::ExactlyOne => count == 1,
            Cardinality::ZeroOrOne => count <= 1,
            Cardinality::OneOrMore => count >= 1,
            Cardinality::ZeroOrMore => true,
        }
    }
}

/// A single element rule: its required attributes and the cardinality of
/// each permitted child element.
pub struct ElementRule {
    pub name: &'static str,
    pub required_attributes: &'static [&'static str],
    pub children: &'static [(&'static str, Cardinality)],
}

/// The full set of element rules making up one tree-format schema.
pub struct TreeSchema {
    pub root: &'static str,
    pub elements: &'static [ElementRule],
}

impl TreeSchema {
    fn element(&self, name: &str) -> Option<&ElementRule> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// The embedded REXS tree-format schema.
pub static REXS_MODEL_SCHEMA: TreeSchema = TreeSchema {
    root: "model",
    elements: &[
        ElementRule {
            name: "model",
            required_attributes: &["applicationId", "applicationVersion", "date", "version"],
            children: &[
                ("relations", Cardinality::ExactlyOne),
                ("components", Cardinality::ExactlyOne),
                ("load_spectrum", Cardinality::ZeroOrOne),
            ],
        },
        ElementRule {
            name: "components",
            required_attributes: &[],
            children: &[("component", Cardinality::ZeroOrMore)],
        },
        ElementRule {
            name: "component",
            required_attributes: &["id", "type"],
            children: &[("attribute", Cardinality::ZeroOrMore)],
        },
        ElementRule {
            name: "attribute",
            required_attributes: &["id"],
            children: &[],
        },
        ElementRule {
            name: "relations",
            required_attributes: &[],
            children: &[("relation", Cardinality::ZeroOrMore)],
        },
        ElementRule {
            name: "relation",
            required_attributes: &["id", "type"],
            children: &[("ref", Cardinality::OneOrMore)],
        },
        ElementRule {
            name: "ref",
            required_attributes: &["id", "role"],
            children: &[],
        },
        ElementRule {
            name: "load_spectrum",
            required_attributes: &[],
            children: &[("load_case", Cardinality::ZeroOrMore), ("accumulation", Cardinality::ZeroOrOne)],
        },
        ElementRule {
            name: "load_case",
            required_attributes: &["id"],
            children: &[("component", Cardinality::ZeroOrMore)],
        },
        ElementRule {
            name: "accumulation",
            required_attributes: &[],
            children: &[("component", Cardinality::ZeroOrMore)],
        },
    ],
};

/// Validates a tree-format document against an embedded [`TreeSchema`].
pub struct TreeSchemaValidator {
    schema: &'static TreeSchema,
}

impl TreeSchemaValidator {
    pub fn new(schema: &'static TreeSchema) -> Self {
        Self { schema }
    }

    pub fn for_model() -> Self {
        Self::new(&REXS_MODEL_SCHEMA)
    }

    fn validate_node(&self, node: roxmltree::Node, result: &mut DiagResult) {
        let Some(rule) = self.schema.element(node.tag_name().name()) else {
            return;
        };
        for attribute in rule.required_attributes {
            if node.attribute(*attribute).is_none() {
                result.add_error_at(
                    Severity::Error,
                    format!("element <{}> is missing required attribute '{}'", rule.name, attribute),
                    node.range().start,
                );
            }
        }
        for (child_name, cardinality) in rule.children {
            let count = node.children().filter(|c| c.is_element() && c.tag_name().name() == *child_name).count();
            if !cardinality.satisfied_by(count) {
                result.add_error_at(
                    Severity::Error,
                    format!("element <{}> has {} child elements <{}>, which violates its cardinality", rule.name, count, child_name),
                    node.range().start,
                );
            }
        }
        for child in node.children().filter(|c| c.is_element()) {
            self.validate_node(child, result);
        }
    }
}

impl SchemaValidator for TreeSchemaValidator {
    fn validate(&self, document: &str) -> DiagResult {
        let mut result = DiagResult::new();
        match roxmltree::Document::parse(document) {
            Ok(doc) => {
                let root = doc.root_element();
                if root.tag_name().name() != self.schema.root {
                    result.add_error(
                        Severity::Critical,
                        format!("expected root element <{}>, found <{}>", self.schema.root, root.tag_name().name()),
                    );
                    return result;
                }
                self.validate_node(root, &mut result);
            }
            Err(e) => result.add_error(Severity::Critical, format!("malformed XML: {e}")),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_missing_required_attribute() {
        let xml = r#"<model applicationId="x" applicationVersion="1" date="2024"><relations/><components/></model>"#;
        let validator = TreeSchemaValidator::for_model();
        let result = validator.validate(xml);
        assert!(!result.ok());
    }

    #[test]
    fn accepts_well_formed_minimal_model() {
        let xml = r#"<model applicationId="x" applicationVersion="1" date="2024" version="1.5"><relations/><components/></model>"#;
        let validator = TreeSchemaValidator::for_model();
        let result = validator.validate(xml);
        assert!(result.ok());
    }

    #[test]
    fn flags_malformed_xml() {
        let validator = TreeSchemaValidator::for_model();
        let result = validator.validate("<model>");
        assert!(result.has_critical());
    }
}
