// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relations between components, and the `RelationType`/`RelationRole`
//! glossary.
//!
//! Grounded on `original_source/include/rexsapi/Types.hxx`.

use std::fmt;

/// The kind of relationship a [`Relation`] describes between its referenced
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    Assembly,
    CentralShaft,
    Connection,
    Contact,
    Coupling,
    Flank,
    ManufacturingStep,
    OrderedAssembly,
    OrderedReference,
    PlanetCarrierShaft,
    PlanetPin,
    PlanetShaft,
    Reference,
    Side,
    Stage,
    StageGearData,
}

impl RelationType {
    pub fn from_wire_str(s: &str) -> Option<RelationType> {
        Some(match s {
            "assembly" => RelationType::Assembly,
            "central_shaft" => RelationType::CentralShaft,
            "connection" => RelationType::Connection,
            "contact" => RelationType::Contact,
            "coupling" => RelationType::Coupling,
            "flank" => RelationType::Flank,
            "manufacturing_step" => RelationType::ManufacturingStep,
            "ordered_assembly" => RelationType::OrderedAssembly,
            "ordered_reference" => RelationType::OrderedReference,
            "planet_carrier_shaft" => RelationType::PlanetCarrierShaft,
            "planet_pin" => RelationType::PlanetPin,
            "planet_shaft" => RelationType::PlanetShaft,
            "reference" => RelationType::Reference,
            "side" => RelationType::Side,
            "stage" => RelationType::Stage,
            "stage_gear_data" => RelationType::StageGearData,
            _ => return None,
        })
    }

    pub fn as_wire_str(self) -> &'static str {
        match self {
            RelationType::Assembly => "assembly",
            RelationType::CentralShaft => "central_shaft",
            RelationType::Connection => "connection",
            RelationType::Contact => "contact",
            RelationType::Coupling => "coupling",
            RelationType::Flank => "flank",
            RelationType::ManufacturingStep => "manufacturing_step",
            RelationType::OrderedAssembly => "ordered_assembly",
            RelationType::OrderedReference => "ordered_reference",
            RelationType::PlanetCarrierShaft => "planet_carrier_shaft",
            RelationType::PlanetPin => "planet_pin",
            RelationType::PlanetShaft => "planet_shaft",
            RelationType::Reference => "reference",
            RelationType::Side => "side",
            RelationType::Stage => "stage",
            RelationType::StageGearData => "stage_gear_data",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Classifies a [`RelationRole`] by where in a relation's reference list it
/// is expected to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationRoleType {
    TopLevel,
    SubLevel,
}

/// The role a referenced component plays within a [`Relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationRole {
    Assembly,
    Gear,
    Gear1,
    Gear2,
    InnerPart,
    Left,
    ManufacturingSettings,
    Origin,
    OuterPart,
    Part,
    PlanetaryStage,
    Referenced,
    Right,
    Shaft,
    Side1,
    Side2,
    Stage,
    StageGearData,
    Tool,
    Workpiece,
}

impl RelationRole {
    pub fn from_wire_str(s: &str) -> Option<RelationRole> {
        Some(match s {
            "assembly" => RelationRole::Assembly,
            "gear" => RelationRole::Gear,
            "gear_1" => RelationRole::Gear1,
            "gear_2" => RelationRole::Gear2,
            "inner_part" => RelationRole::InnerPart,
            "left" => RelationRole::Left,
            "manufacturing_settings" => RelationRole::ManufacturingSettings,
            "origin" => RelationRole::Origin,
            "outer_part" => RelationRole::OuterPart,
            "part" => RelationRole::Part,
            "planetary_stage" => RelationRole::PlanetaryStage,
            "referenced" => RelationRole::Referenced,
            "right" => RelationRole::Right,
            "shaft" => RelationRole::Shaft,
            "side_1" => RelationRole::Side1,
            "side_2" => RelationRole::Side2,
            "stage" => RelationRole::Stage,
            "stage_gear_data" => RelationRole::StageGearData,
            "tool" => RelationRole::Tool,
            "workpiece" => RelationRole::Workpiece,
            _ => return None,
        })
    }

    pub fn as_wire_str(self) -> &'static str {
        match self {
            RelationRole::Assembly => "assembly",
            RelationRole::Gear => "gear",
            RelationRole::Gear1 => "gear_1",
            RelationRole::Gear2 => "gear_2",
            RelationRole::InnerPart => "inner_part",
            RelationRole::Left => "left",
            RelationRole::ManufacturingSettings => "manufacturing_settings",
            RelationRole::Origin => "origin",
            RelationRole::OuterPart => "outer_part",
            RelationRole::Part => "part",
            RelationRole::PlanetaryStage => "planetary_stage",
            RelationRole::Referenced => "referenced",
            RelationRole::Right => "right",
            RelationRole::Shaft => "shaft",
            RelationRole::Side1 => "side_1",
            RelationRole::Side2 => "side_2",
            RelationRole::Stage => "stage",
            RelationRole::StageGearData => "stage_gear_data",
            RelationRole::Tool => "tool",
            RelationRole::Workpiece => "workpiece",
        }
    }

    pub fn role_type(self) -> RelationRoleType {
        match self {
            RelationRole::Assembly
            | RelationRole::Gear
            | RelationRole::Origin
            | RelationRole::PlanetaryStage
            | RelationRole::Stage
            | RelationRole::Workpiece => RelationRoleType::TopLevel,
            _ => RelationRoleType::SubLevel,
        }
    }
}

impl fmt::Display for RelationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// One reference from a [`Relation`] to a component, tagged with the role
/// the component plays and, for ordered relations, its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationReference {
    pub role: RelationRole,
    pub component_id: i64,
    pub order: Option<i64>,
    pub hint: Option<String>,
}

/// A relationship between two or more components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: i64,
    pub relation_type: RelationType,
    pub order: Option<i64>,
    pub references: Vec<RelationReference>,
}

impl Relation {
    pub fn new(id: i64, relation_type: RelationType) -> Self {
        Self { id, relation_type, order: None, references: Vec::new() }
    }

    pub fn with_reference(mut self, reference: RelationReference) -> Self {
        self.references.push(reference);
        self
    }
}
