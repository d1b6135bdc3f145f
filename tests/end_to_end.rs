// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios exercising the full pipeline: building or parsing a
//! model, validating it, and round-tripping it across wire formats.

use rexs::builder::Builder;
use rexs::config::Mode;
use rexs::db::model::{DbAttribute, DbComponent, DbModel, Interval};
use rexs::db::registry::Version;
use rexs::model::{ModelInfo, RelationRole, RelationType};
use rexs::parser::{JsonModelParser, ModelParser, TreeModelParser};
use rexs::semantic::SemanticValidator;
use rexs::serializer::{JsonModelSerializer, ModelSerializer, TreeModelSerializer};
use rexs::value::{CodeType, Value, ValueType};

fn model_info() -> ModelInfo {
    ModelInfo { version: Version::new(1, 5), language: "en".into(), application_id: "test-app".into(), application_version: "1.0".into(), date: "2024-01-01".into() }
}

fn db_with_gearbox_attributes() -> DbModel {
    let mut db = DbModel::new("1.5", "en");
    db.add_component(DbComponent {
        id: "gear_unit".into(),
        name: "Gear unit".into(),
        attribute_ids: vec!["account_for_gravity".into(), "u_axis_vector".into(), "temperature_lubricant".into(), "reference_component_for_position".into()],
    });
    db.add_attribute(DbAttribute { id: "account_for_gravity".into(), name: "Account for gravity".into(), value_type: ValueType::Boolean, unit: None, enum_name: None, interval: None });
    db.add_attribute(DbAttribute { id: "u_axis_vector".into(), name: "U axis vector".into(), value_type: ValueType::FloatArray, unit: Some("mm".into()), enum_name: None, interval: None });
    db.add_attribute(DbAttribute {
        id: "temperature_lubricant".into(),
        name: "Lubricant temperature".into(),
        value_type: ValueType::Float,
        unit: Some("C".into()),
        enum_name: None,
        interval: Some(Interval { min: Some(-273.15), min_exclusive: false, max: None, max_exclusive: false }),
    });
    db.add_attribute(DbAttribute {
        id: "reference_component_for_position".into(),
        name: "Reference component for position".into(),
        value_type: ValueType::ReferenceComponent,
        unit: None,
        enum_name: None,
        interval: None,
    });
    db
}

/// Scenario 1: a boolean scalar survives a build -> JSON -> parse round trip.
#[test]
fn boolean_scalar_round_trips_through_json() {
    let db = db_with_gearbox_attributes();
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(1)).unwrap();
    builder.add_attribute("account_for_gravity").unwrap();
    builder.boolean_value(true).unwrap();
    let model = builder.build(model_info()).unwrap();

    let rendered = JsonModelSerializer::new().serialize(&model);
    assert!(rendered.contains("\"value\": true"), "expected a literal JSON boolean, got:\n{rendered}");

    let (parsed, result) = JsonModelParser::new().parse(&rendered, &db, Mode::Strict);
    assert!(result.ok());
    let parsed = parsed.unwrap();
    assert_eq!(parsed.components()[0].attribute("account_for_gravity").unwrap().value.as_boolean(), Some(true));
}

/// Scenario 2: a `float32`-coded array widens to `f64` on decode and
/// re-encodes as `float64` once the coding is switched to `Default`.
#[test]
fn coded_float32_array_widens_and_recodes_as_float64() {
    let db = db_with_gearbox_attributes();
    let json = r#"{"model":{"applicationId":"test","applicationVersion":"1.0","date":"2024-01-01","version":"1.5",
        "components":[{"id":1,"type":"gear_unit","attributes":[
            {"id":"u_axis_vector","coded":"float32","value":"MveeQZ6hM0I="}
        ]}],
        "relations":[]}}"#;

    let (parsed, result) = JsonModelParser::new().parse(json, &db, Mode::Strict);
    assert!(result.ok());
    let model = parsed.unwrap();
    let attribute = model.component(1).unwrap().attribute("u_axis_vector").unwrap();
    assert_eq!(attribute.value.coded(), CodeType::Optimized);
    let values = attribute.value.as_float_array().unwrap().to_vec();
    assert!((values[0] - 19.8707).abs() < 1e-3);
    assert!((values[1] - 44.9078).abs() < 1e-3);

    // Re-recoding as float64 happens by rebuilding the model -- `Model` is
    // immutable once constructed, so the recode goes through the builder
    // rather than mutating the parsed component in place.
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(1)).unwrap();
    builder.add_attribute("u_axis_vector").unwrap();
    builder.float_array_value(values).unwrap();
    builder.coded(CodeType::Default).unwrap();
    let recoded_model = builder.build(model_info()).unwrap();

    let rendered = JsonModelSerializer::new().serialize(&recoded_model);
    assert!(rendered.contains("\"coded\": \"float64\""), "expected float64 coding, got:\n{rendered}");
}

/// Scenario 3: a range violation is reported as an `Error` in strict mode
/// but the offending value is still present in the produced model.
#[test]
fn range_violation_is_reported_but_value_survives() {
    let db = db_with_gearbox_attributes();
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(1)).unwrap();
    builder.add_attribute("temperature_lubricant").unwrap();
    builder.float_value(-300.0).unwrap();
    let model = builder.build(model_info()).unwrap();

    let validator = SemanticValidator::new(&db, Mode::Strict);
    let result = validator.validate(&model);
    assert!(!result.ok());
    assert!(result.diagnostics().iter().any(|d| d.message().contains("temperature_lubricant") && d.message().contains("out of range")));
    assert_eq!(model.components()[0].attribute("temperature_lubricant").unwrap().value.as_float(), Some(-300.0));
}

/// Scenario 4: a symbolic reference set via the builder resolves to the
/// target component's id, not some separately tracked internal id -- the
/// builder uses the same id space for both.
#[test]
fn reference_resolves_to_target_component() {
    let db = db_with_gearbox_attributes();
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(42)).unwrap();
    builder.add_component("gear_unit", Some(43)).unwrap();
    builder.add_attribute("reference_component_for_position").unwrap();
    builder.reference(42).unwrap();
    builder.add_relation(RelationType::Assembly, Some(1)).unwrap();
    builder.add_ref(RelationRole::Assembly, 42, None).unwrap();
    builder.add_ref(RelationRole::Part, 43, None).unwrap();

    let model = builder.build(model_info()).unwrap();
    let target = model.components()[1].attribute("reference_component_for_position").unwrap();
    assert_eq!(target.value.as_integer(), Some(42));
}

/// Scenario 5: a `stage` relation declared at model version 1.3 referencing
/// only `gear_1` is reported as missing `gear_2`, and the model is still
/// returned -- the relation-role checker runs inside `parse()` itself, not
/// as a separate step the caller has to remember to invoke.
#[test]
fn stage_relation_missing_gear_2_is_flagged_at_v1_3() {
    let mut db = DbModel::new("1.3", "en");
    db.add_component(DbComponent { id: "stage".into(), name: "Stage".into(), attribute_ids: vec![] });
    db.add_component(DbComponent { id: "gear".into(), name: "Gear".into(), attribute_ids: vec![] });
    let json = r#"{"model":{"applicationId":"test","applicationVersion":"1.0","date":"2024-01-01","version":"1.3",
        "components":[{"id":1,"type":"stage"},{"id":2,"type":"gear"}],
        "relations":[{"id":1,"type":"stage","refs":[{"id":1,"role":"stage"},{"id":2,"role":"gear_1"}]}]}}"#;

    let (model, result) = JsonModelParser::new().parse(json, &db, Mode::Strict);
    assert!(model.is_some());
    assert!(!result.ok());
    assert!(result.diagnostics().iter().any(|d| d.message().contains("missing a reference with role 'gear_2'")));
}

/// Scenario 6: the builder rejects a scalar `value()` call on a `Reference
/// Component`-typed attribute, directing the caller to `reference(...)`.
#[test]
fn builder_rejects_scalar_value_for_reference_component_attribute() {
    let db = db_with_gearbox_attributes();
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(1)).unwrap();
    builder.add_attribute("reference_component_for_position").unwrap();
    let err = builder.integer_value(42).unwrap_err().to_string();
    assert!(err.contains("reference"), "expected the error to direct the caller to reference(...), got: {err}");
}

/// A model built programmatically survives a round trip through both wire
/// formats and comes back with the same component/attribute structure.
#[test]
fn builder_output_round_trips_through_both_wire_formats() {
    let db = db_with_gearbox_attributes();
    let mut builder = Builder::new(&db);
    builder.add_component("gear_unit", Some(1)).unwrap();
    builder.add_attribute("u_axis_vector").unwrap();
    builder.float_array_value(vec![1.0, 2.0, 3.0]).unwrap();
    builder.add_relation(RelationType::Assembly, Some(1)).unwrap();
    builder.add_ref(RelationRole::Assembly, 1, None).unwrap();
    builder.add_component("gear_unit", None).unwrap();
    // auto id mode was never engaged -- this call should fail since the
    // first component used a caller-supplied id.
    let err = builder.add_component("gear_unit", None);
    assert!(err.is_err());

    let model = builder.build(model_info()).unwrap();

    let tree_text = TreeModelSerializer::new().serialize(&model);
    let (tree_parsed, tree_result) = TreeModelParser::new().parse(&tree_text, &db, Mode::Strict);
    assert!(tree_result.ok());
    assert_eq!(tree_parsed.unwrap().components()[0].attribute("u_axis_vector").unwrap().value.as_float_array(), Some(&[1.0, 2.0, 3.0][..]));

    let json_text = JsonModelSerializer::new().serialize(&model);
    let (json_parsed, json_result) = JsonModelParser::new().parse(&json_text, &db, Mode::Strict);
    assert!(json_result.ok());
    assert_eq!(json_parsed.unwrap().components()[0].attribute("u_axis_vector").unwrap().value.as_float_array(), Some(&[1.0, 2.0, 3.0][..]));
}
