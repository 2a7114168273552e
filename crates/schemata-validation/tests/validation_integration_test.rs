//! Integration tests for schemata-validation
//!
//! These tests validate instances end to end: build a schema in a draft
//! environment, run the engine and inspect the report.

use schemata_schema::{Draft, Environment, MetaSchema};
use schemata_validation::{ValidationEngine, ValidationReport};
use serde_json::{Value, json};

fn check(env: &mut Environment, schema: &Value, instance: &Value) -> anyhow::Result<ValidationReport> {
    Ok(ValidationEngine::new().validate_value(env, instance, schema)?)
}

fn keywords(report: &ValidationReport) -> Vec<&str> {
    report.errors().iter().map(|e| e.keyword.as_str()).collect()
}

#[test]
fn test_repeated_validation_is_deterministic() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let id = env.create_schema(
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "required": true},
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
            },
            "additionalProperties": false
        })
        .into(),
        MetaSchema::Default,
        Some("http://example.com/tagged"),
    )?;
    let instance = json!({"tags": ["a", 1, "a"], "extra": true});
    let engine = ValidationEngine::new();

    let first = engine.validate(&env, &instance, id)?;
    let second = engine.validate(&env, &instance, "http://example.com/tagged")?;
    assert_eq!(first.errors(), second.errors());
    assert_eq!(keywords(&first), vec!["required", "type", "uniqueItems", "additionalProperties"]);
    Ok(())
}

#[test]
fn test_type_union() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"type": ["string", "number"]});

    assert!(check(&mut env, &schema, &json!("x"))?.is_valid());
    assert!(check(&mut env, &schema, &json!(3))?.is_valid());
    for rejected in [json!(true), json!(null)] {
        let report = check(&mut env, &schema, &rejected)?;
        assert_eq!(keywords(&report), vec!["type"]);
        assert_eq!(report.errors()[0].details, json!(["string", "number"]));
    }
    Ok(())
}

#[test]
fn test_type_with_nested_schema() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"type": ["null", {"type": "integer", "minimum": 1}]});

    assert!(check(&mut env, &schema, &json!(null))?.is_valid());
    assert!(check(&mut env, &schema, &json!(4))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!(0))?), vec!["type"]);
    Ok(())
}

#[test]
fn test_failed_type_alternative_does_not_hide_later_checks() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    env.create_schema(
        json!({"properties": {"x": {"type": "string"}}}).into(),
        MetaSchema::Default,
        Some("http://example.com/labelled"),
    )?;
    let instance = json!({"x": 1});
    let parent = json!({"$ref": "http://example.com/labelled"});

    let alone = check(&mut env, &json!({"extends": [parent.clone()]}), &instance)?;
    let with_type = check(
        &mut env,
        &json!({"type": [parent.clone(), "object"], "extends": [parent.clone()]}),
        &instance,
    )?;
    assert_eq!(alone.errors().len(), 1);
    assert_eq!(alone.errors()[0].to_string(), "#/x: type: Instance is not a required type");
    assert_eq!(with_type.errors(), alone.errors());

    let matching = json!({"x": "a"});
    let schema = json!({"type": [parent.clone()], "extends": [parent]});
    assert!(check(&mut env, &schema, &matching)?.is_valid());
    Ok(())
}

#[test]
fn test_optional_property_in_draft_02() -> anyhow::Result<()> {
    let mut env = Draft::Draft02.environment()?;
    let schema = json!({"properties": {"a": {"type": "string", "optional": false}}});

    let report = check(&mut env, &schema, &json!({}))?;
    assert_eq!(keywords(&report), vec!["optional"]);
    assert_eq!(report.errors()[0].pointer, "/a");
    assert_eq!(report.errors()[0].message, "Property is required");

    assert!(check(&mut env, &schema, &json!({"a": "x"}))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!({"a": 1}))?), vec!["type"]);
    Ok(())
}

#[test]
fn test_required_property_in_draft_03() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"properties": {"a": {"required": true}, "b": {"type": "string"}}});

    let report = check(&mut env, &schema, &json!({}))?;
    assert_eq!(keywords(&report), vec!["required"]);
    assert_eq!(report.errors()[0].pointer, "/a");
    assert!(check(&mut env, &schema, &json!({"a": null}))?.is_valid());
    Ok(())
}

#[test]
fn test_extends_with_bounds() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"extends": {"minimum": 0}, "maximum": 10});

    assert_eq!(keywords(&check(&mut env, &schema, &json!(-1))?), vec!["minimum"]);
    assert_eq!(keywords(&check(&mut env, &schema, &json!(11))?), vec!["maximum"]);
    assert!(check(&mut env, &schema, &json!(5))?.is_valid());
    Ok(())
}

#[test]
fn test_extends_list_runs_every_parent() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"extends": [{"type": "string"}, {"maxLength": 2}]});

    assert!(check(&mut env, &schema, &json!("ab"))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!("abc"))?), vec!["maxLength"]);
    assert_eq!(keywords(&check(&mut env, &schema, &json!(7))?), vec!["type"]);
    Ok(())
}

#[test]
fn test_exclusive_bounds() -> anyhow::Result<()> {
    let mut draft03 = Draft::Draft03.environment()?;
    let schema = json!({"minimum": 0, "exclusiveMinimum": true, "maximum": 1});
    assert_eq!(keywords(&check(&mut draft03, &schema, &json!(0))?), vec!["minimum"]);
    assert!(check(&mut draft03, &schema, &json!(1))?.is_valid());

    let mut draft01 = Draft::Draft01.environment()?;
    let schema = json!({"maximum": 1, "maximumCanEqual": false});
    assert_eq!(keywords(&check(&mut draft01, &schema, &json!(1))?), vec!["maximum"]);
    assert!(check(&mut draft01, &schema, &json!(0.5))?.is_valid());
    Ok(())
}

#[test]
fn test_additional_properties_forbidden() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"properties": {"a": {}}, "additionalProperties": false});

    let report = check(&mut env, &schema, &json!({"a": 1, "b": 2}))?;
    assert_eq!(report.len(), 1);
    let error = &report.errors()[0];
    assert_eq!(error.keyword, "additionalProperties");
    assert_eq!(error.details, json!("b"));
    assert_eq!(error.pointer, "/b");
    Ok(())
}

#[test]
fn test_additional_properties_schema_and_patterns() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({
        "patternProperties": {"^x-": {"type": "string"}},
        "additionalProperties": {"type": "integer"}
    });

    assert!(check(&mut env, &schema, &json!({"x-a": "s", "count": 3}))?.is_valid());
    let report = check(&mut env, &schema, &json!({"x-a": 1, "count": "3"}))?;
    let pointers: Vec<&str> = report.errors().iter().map(|e| e.pointer.as_str()).collect();
    assert_eq!(keywords(&report), vec!["type", "type"]);
    assert!(pointers.contains(&"/x-a"));
    assert!(pointers.contains(&"/count"));
    Ok(())
}

#[test]
fn test_tuple_items_overflow() -> anyhow::Result<()> {
    let mut draft03 = Draft::Draft03.environment()?;
    let schema = json!({"items": [{"type": "string"}, {"type": "number"}], "additionalItems": false});
    assert!(check(&mut draft03, &schema, &json!(["a", 1]))?.is_valid());
    let report = check(&mut draft03, &schema, &json!(["a", 1, true, null]))?;
    assert_eq!(keywords(&report), vec!["additionalItems", "additionalItems"]);
    assert_eq!(report.errors()[1].pointer, "/3");
    assert_eq!(report.errors()[0].message, "Additional items are not allowed");

    let mut draft01 = Draft::Draft01.environment()?;
    let schema = json!({"items": [{"type": "string"}], "additionalProperties": {"type": "boolean"}});
    assert!(check(&mut draft01, &schema, &json!(["a", true, false]))?.is_valid());
    assert_eq!(keywords(&check(&mut draft01, &schema, &json!(["a", 1]))?), vec!["type"]);
    Ok(())
}

#[test]
fn test_unique_items() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"uniqueItems": true});

    let report = check(&mut env, &schema, &json!([1, 2, 1]))?;
    assert_eq!(report.len(), 1);
    assert_eq!(report.errors()[0].details, json!([0, 2]));
    assert!(check(&mut env, &schema, &json!([1, 2, 3]))?.is_valid());
    assert_eq!(check(&mut env, &schema, &json!([1, 1.0, {"a": [1]}, {"a": [1]}]))?.len(), 2);
    Ok(())
}

#[test]
fn test_requires_and_dependencies() -> anyhow::Result<()> {
    let mut draft02 = Draft::Draft02.environment()?;
    let schema = json!({"properties": {
        "card": {"optional": true, "requires": "billing"},
        "billing": {"optional": true}
    }});
    let report = check(&mut draft02, &schema, &json!({"card": "1234"}))?;
    assert_eq!(keywords(&report), vec!["requires"]);
    assert_eq!(report.errors()[0].message, "Property requires sibling property \"billing\"");
    assert!(check(&mut draft02, &schema, &json!({"card": "1234", "billing": "x"}))?.is_valid());
    assert!(check(&mut draft02, &schema, &json!({}))?.is_valid());

    let mut draft03 = Draft::Draft03.environment()?;
    let schema = json!({"dependencies": {
        "card": ["billing", "name"],
        "coupon": {"properties": {"total": {"required": true}}}
    }});
    let report = check(&mut draft03, &schema, &json!({"card": "1234", "name": "x"}))?;
    assert_eq!(keywords(&report), vec!["dependencies"]);
    assert_eq!(report.errors()[0].details, json!("billing"));
    assert_eq!(keywords(&check(&mut draft03, &schema, &json!({"coupon": "X"}))?), vec!["required"]);
    assert!(check(&mut draft03, &schema, &json!({"coupon": "X", "total": 3}))?.is_valid());
    Ok(())
}

#[test]
fn test_string_constraints() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"minLength": 2, "maxLength": 3, "pattern": "^[a-zé]+$"});

    assert!(check(&mut env, &schema, &json!("éé"))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!("a"))?), vec!["minLength"]);
    assert_eq!(keywords(&check(&mut env, &schema, &json!("abcd"))?), vec!["maxLength"]);
    assert_eq!(keywords(&check(&mut env, &schema, &json!("A1"))?), vec!["pattern"]);
    assert!(check(&mut env, &schema, &json!(12))?.is_valid());
    Ok(())
}

#[test]
fn test_malformed_pattern_is_reported_not_raised() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let id = env.create_schema(json!({"pattern": "(unclosed"}).into(), MetaSchema::Default, None)?;
    let engine = ValidationEngine::new();

    let report = engine.validate(&env, &json!("anything"), id)?;
    assert_eq!(keywords(&report), vec!["pattern"]);
    assert_eq!(report.errors()[0].message, "Invalid pattern");
    assert!(engine.validate(&env, &json!({}), "urn:schemata:missing").is_err());
    Ok(())
}

#[test]
fn test_enum_compares_numbers_by_value() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"enum": [1, "one", [1, 2]]});

    assert!(check(&mut env, &schema, &json!(1.0))?.is_valid());
    assert!(check(&mut env, &schema, &json!([1, 2]))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!(2))?), vec!["enum"]);
    Ok(())
}

#[test]
fn test_disallow_ignores_unknown_types() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"disallow": ["string", "unicorn"]});

    assert_eq!(keywords(&check(&mut env, &schema, &json!("x"))?), vec!["disallow"]);
    assert!(check(&mut env, &schema, &json!(1))?.is_valid());

    let permissive = json!({"type": "unicorn"});
    assert!(check(&mut env, &permissive, &json!(1))?.is_valid());
    Ok(())
}

#[test]
fn test_formats() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"format": "date-time"});

    assert!(check(&mut env, &schema, &json!("2011-03-15T10:20:30Z"))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!("yesterday"))?), vec!["format"]);
    assert!(check(&mut env, &json!({"format": "color"}), &json!("red"))?.is_valid());
    Ok(())
}

#[test]
fn test_divisible_by() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let schema = json!({"divisibleBy": 0.5});

    assert!(check(&mut env, &schema, &json!(2.5))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!(2.25))?), vec!["divisibleBy"]);

    let id = env.create_schema(json!({"divisibleBy": 0}).into(), MetaSchema::Default, None)?;
    let report = ValidationEngine::new().validate(&env, &json!(4), id)?;
    assert_eq!(report.errors()[0].message, "Divisor must not be zero");
    Ok(())
}

#[test]
fn test_divisible_by_at_integer_limits() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let engine = ValidationEngine::new();
    let negative_one = env.create_schema(json!({"divisibleBy": -1}).into(), MetaSchema::Default, None)?;
    let two = env.create_schema(json!({"divisibleBy": 2}).into(), MetaSchema::Default, None)?;

    assert!(engine.validate(&env, &json!(i64::MIN), negative_one)?.is_valid());
    assert!(engine.validate(&env, &json!(i64::MAX), negative_one)?.is_valid());
    assert!(engine.validate(&env, &json!(i64::MIN), two)?.is_valid());
    let report = engine.validate(&env, &json!(i64::MAX), two)?;
    assert_eq!(keywords(&report), vec!["divisibleBy"]);
    Ok(())
}

#[test]
fn test_max_decimal_in_draft_01() -> anyhow::Result<()> {
    let mut env = Draft::Draft01.environment()?;
    let schema = json!({"maxDecimal": 2});

    assert!(check(&mut env, &schema, &json!(1.25))?.is_valid());
    assert!(check(&mut env, &schema, &json!(7))?.is_valid());
    assert_eq!(keywords(&check(&mut env, &schema, &json!(1.125))?), vec!["maxDecimal"]);
    Ok(())
}

#[test]
fn test_recursive_schema() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let id = env.create_schema(
        json!({
            "type": "object",
            "properties": {
                "value": {"type": "integer", "required": true},
                "children": {"type": "array", "items": {"$ref": "#"}}
            }
        })
        .into(),
        MetaSchema::Default,
        Some("http://example.com/tree"),
    )?;
    let tree = json!({"value": 1, "children": [{"value": 2}, {"value": "3", "children": [{}]}]});

    let report = ValidationEngine::new().validate(&env, &tree, id)?;
    let found: Vec<(&str, &str)> = report
        .errors()
        .iter()
        .map(|e| (e.pointer.as_str(), e.keyword.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![("/children/1/children/0/value", "required"), ("/children/1/value", "type")]
    );
    Ok(())
}

#[test]
fn test_hyper_schemas_validate_themselves() -> anyhow::Result<()> {
    let engine = ValidationEngine::new();
    for draft in Draft::ALL {
        let env = draft.environment()?;
        for uri in [draft.hyper_schema_uri(), draft.schema_uri(), draft.links_uri()] {
            let id = env.find_schema(&uri).expect("draft schema registered");
            let report = engine.validate_schema(&env, id)?;
            assert!(report.is_valid(), "{uri}: {:?}", report.errors());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_schema_is_reported_first() -> anyhow::Result<()> {
    let mut env = Draft::Draft03.environment()?;
    let report = check(&mut env, &json!({"type": 5, "minItems": -1}), &json!([]))?;
    assert!(!report.is_valid());
    assert!(report.errors().iter().all(|e| e.instance_uri.starts_with("urn:schemata:")));
    Ok(())
}
