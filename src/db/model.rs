// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The database model: units, enums, attributes and components as declared
//! by a specific REXS database version/language pair.
//!
//! Grounded on `original_source/include/rexsapi/database/Model.hxx`.

use std::collections::HashMap;

use crate::value::ValueType;

/// A physical unit, e.g. `mm`, `deg`, `kg m^2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbUnit {
    pub name: String,
}

/// One legal value of an enum-typed attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbEnumValue {
    pub value: String,
    pub display_name: String,
}

/// The set of legal values for an enum-typed attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbEnum {
    pub name: String,
    pub values: Vec<DbEnumValue>,
}

impl DbEnum {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.value == value)
    }
}

/// An inclusive or exclusive numeric range an attribute's value must fall
/// within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Option<f64>,
    pub min_exclusive: bool,
    pub max: Option<f64>,
    pub max_exclusive: bool,
}

impl Interval {
    pub fn unbounded() -> Self {
        Self { min: None, min_exclusive: false, max: None, max_exclusive: false }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Some(min) if self.min_exclusive => value > min,
            Some(min) => value >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_exclusive => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above_min && below_max
    }
}

/// A single attribute definition as declared by the database: its id,
/// value type, default unit, and any enum/interval constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct DbAttribute {
    pub id: String,
    pub name: String,
    pub value_type: ValueType,
    pub unit: Option<String>,
    pub enum_name: Option<String>,
    pub interval: Option<Interval>,
}

/// A component type definition: which attributes it may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbComponent {
    pub id: String,
    pub name: String,
    pub attribute_ids: Vec<String>,
}

impl DbComponent {
    pub fn allows_attribute(&self, attribute_id: &str) -> bool {
        self.attribute_ids.iter().any(|id| id == attribute_id)
    }
}

/// One version/language database model: the full catalog of units, enums,
/// attributes and components valid for that pairing.
#[derive(Debug, Clone)]
pub struct DbModel {
    pub version: String,
    pub language: String,
    units: HashMap<String, DbUnit>,
    enums: HashMap<String, DbEnum>,
    attributes: HashMap<String, DbAttribute>,
    components: HashMap<String, DbComponent>,
}

impl DbModel {
    pub fn new(version: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            language: language.into(),
            units: HashMap::new(),
            enums: HashMap::new(),
            attributes: HashMap::new(),
            components: HashMap::new(),
        }
    }

    pub fn add_unit(&mut self, unit: DbUnit) {
        self.units.insert(unit.name.clone(), unit);
    }

    pub fn add_enum(&mut self, e: DbEnum) {
        self.enums.insert(e.name.clone(), e);
    }

    pub fn add_attribute(&mut self, attribute: DbAttribute) {
        self.attributes.insert(attribute.id.clone(), attribute);
    }

    pub fn add_component(&mut self, component: DbComponent) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn unit(&self, name: &str) -> Option<&DbUnit> {
        self.units.get(name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&DbEnum> {
        self.enums.get(name)
    }

    pub fn attribute(&self, id: &str) -> Option<&DbAttribute> {
        self.attributes.get(id)
    }

    pub fn component(&self, id: &str) -> Option<&DbComponent> {
        self.components.get(id)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &DbAttribute> {
        self.attributes.values()
    }

    pub fn components(&self) -> impl Iterator<Item = &DbComponent> {
        self.components.values()
    }
}
