// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static, version-keyed tables backing the relation-type and
//! external-subcomponent checkers.
//!
//! Grounded on `original_source/include/rexsapi/RelationTypeChecker.hxx`
//! and `ExternalSubcomponentsChecker.hxx`. Both originals embed their rules
//! as compiled-in tables rather than loading them from a resource file;
//! this crate does the same. Each table is keyed by the REXS version it was
//! introduced in; resolution picks the highest table version `<=` the
//! model's version.

use crate::db::registry::Version;
use crate::model::relation::{RelationRole, RelationType};

/// The legal roles for one relation type, plus whether order matters.
pub struct RelationRule {
    pub relation_type: RelationType,
    pub allowed_roles: &'static [RelationRole],
    pub ordered: bool,
}

/// One version-keyed snapshot of the relation-type rule table.
pub struct RelationTable {
    pub since: Version,
    pub rules: &'static [RelationRule],
}

macro_rules! v {
    ($major:expr, $minor:expr) => {
        Version { major: $major, minor: $minor }
    };
}

pub static RELATION_TABLES: &[RelationTable] = &[
    RelationTable {
        since: v!(1, 0),
        rules: &[
            RelationRule {
                relation_type: RelationType::Assembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Connection,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Reference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Side,
                allowed_roles: &[RelationRole::Left, RelationRole::Right],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Stage,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear1, RelationRole::Gear2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::StageGearData,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear, RelationRole::StageGearData],
                ordered: false,
            },
        ],
    },
    RelationTable {
        since: v!(1, 1),
        rules: &[
            RelationRule {
                relation_type: RelationType::Assembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Connection,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Coupling,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Reference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Side,
                allowed_roles: &[RelationRole::Left, RelationRole::Right],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::OrderedAssembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::Stage,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear1, RelationRole::Gear2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::StageGearData,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear, RelationRole::StageGearData],
                ordered: false,
            },
        ],
    },
    RelationTable {
        since: v!(1, 3),
        rules: &[
            RelationRule {
                relation_type: RelationType::Assembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Connection,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Coupling,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Reference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Side,
                allowed_roles: &[RelationRole::Left, RelationRole::Right],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::OrderedAssembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::OrderedReference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::CentralShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::Part],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::PlanetCarrierShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::PlanetPin,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::PlanetShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Stage,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear1, RelationRole::Gear2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::StageGearData,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear, RelationRole::StageGearData],
                ordered: false,
            },
        ],
    },
    RelationTable {
        since: v!(1, 5),
        rules: &[
            RelationRule {
                relation_type: RelationType::Assembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Connection,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Coupling,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Reference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Side,
                allowed_roles: &[RelationRole::Left, RelationRole::Right],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::OrderedAssembly,
                allowed_roles: &[RelationRole::Assembly, RelationRole::Part],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::OrderedReference,
                allowed_roles: &[RelationRole::Origin, RelationRole::Referenced],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::CentralShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::Part],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::PlanetCarrierShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::PlanetPin,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::PlanetShaft,
                allowed_roles: &[RelationRole::Shaft, RelationRole::PlanetaryStage],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Contact,
                allowed_roles: &[RelationRole::Side1, RelationRole::Side2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::Flank,
                allowed_roles: &[RelationRole::Gear1, RelationRole::Gear2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::ManufacturingStep,
                allowed_roles: &[RelationRole::Tool, RelationRole::Workpiece, RelationRole::ManufacturingSettings],
                ordered: true,
            },
            RelationRule {
                relation_type: RelationType::Stage,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear1, RelationRole::Gear2],
                ordered: false,
            },
            RelationRule {
                relation_type: RelationType::StageGearData,
                allowed_roles: &[RelationRole::Stage, RelationRole::Gear, RelationRole::StageGearData],
                ordered: false,
            },
        ],
    },
];

/// Picks the highest registered relation table whose `since` version is
/// `<=` the given model version.
pub fn relation_table_for(version: Version) -> Option<&'static RelationTable> {
    RELATION_TABLES.iter().filter(|t| t.since <= version).max_by_key(|t| t.since)
}

/// Looks up the rule for `relation_type` in the table applicable to
/// `version`.
pub fn rule_for(version: Version, relation_type: RelationType) -> Option<&'static RelationRule> {
    relation_table_for(version)?.rules.iter().find(|r| r.relation_type == relation_type)
}

/// External-subcomponent rules: which component types are permitted as
/// "external" subcomponents (referenced from elsewhere, not owned by the
/// enclosing assembly) for a given relation type, by version.
pub struct ExternalSubcomponentTable {
    pub since: Version,
    pub rules: &'static [(RelationType, &'static [&'static str])],
}

pub static EXTERNAL_SUBCOMPONENT_TABLES: &[ExternalSubcomponentTable] = &[
    ExternalSubcomponentTable {
        since: v!(1, 0),
        rules: &[(RelationType::Assembly, &["gear_casing", "lubricant"])],
    },
    ExternalSubcomponentTable {
        since: v!(1, 3),
        rules: &[
            (RelationType::Assembly, &["gear_casing", "lubricant", "environment"]),
            (RelationType::PlanetCarrierShaft, &["planet_carrier"]),
        ],
    },
];

pub fn external_subcomponent_table_for(version: Version) -> Option<&'static ExternalSubcomponentTable> {
    EXTERNAL_SUBCOMPONENT_TABLES.iter().filter(|t| t.since <= version).max_by_key(|t| t.since)
}

pub fn is_external_subcomponent(version: Version, relation_type: RelationType, component_type: &str) -> bool {
    let Some(table) = external_subcomponent_table_for(version) else {
        return false;
    };
    table
        .rules
        .iter()
        .find(|(rt, _)| *rt == relation_type)
        .is_some_and(|(_, types)| types.contains(&component_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_table_not_exceeding_version() {
        let table = relation_table_for(Version::new(1, 4)).unwrap();
        assert_eq!(table.since, Version::new(1, 3));
    }

    #[test]
    fn rule_lookup_finds_type() {
        let rule = rule_for(Version::new(1, 5), RelationType::Flank).unwrap();
        assert!(rule.allowed_roles.contains(&RelationRole::Gear1));
    }

    #[test]
    fn external_subcomponent_respects_version() {
        assert!(!is_external_subcomponent(Version::new(1, 0), RelationType::Assembly, "environment"));
        assert!(is_external_subcomponent(Version::new(1, 3), RelationType::Assembly, "environment"));
    }

    #[test]
    fn stage_relation_requires_both_gears_since_v1_0() {
        let rule = rule_for(Version::new(1, 0), RelationType::Stage).unwrap();
        assert_eq!(rule.allowed_roles.len(), 3);
        assert!(rule.allowed_roles.contains(&RelationRole::Stage));
        assert!(rule.allowed_roles.contains(&RelationRole::Gear1));
        assert!(rule.allowed_roles.contains(&RelationRole::Gear2));
    }

    #[test]
    fn stage_gear_data_relation_is_its_own_type_since_v1_0() {
        let rule = rule_for(Version::new(1, 0), RelationType::StageGearData).unwrap();
        assert!(rule.allowed_roles.contains(&RelationRole::StageGearData));
    }
}
