//! Keyword validators
//!
//! Every check only appends to the report; malformed schema values were
//! already filtered or captured when the schema was built.

use crate::engine::Validator;
use crate::reporter::ValidationReport;
use schemata_ir::{Instance, PrimitiveType, json_equal};
use schemata_schema::{
    AttributeValue, Dependency, Keyword, PatternSchema, SchemaId, SchemaNode, TypeEntry, TypeName,
};
use serde_json::{Number, Value, json};

/// Relative tolerance for `divisibleBy` on non-integral numbers
const DIVISIBILITY_EPSILON: f64 = 1e-9;

/// The instance and schema a keyword is checked in
pub(crate) struct Frame<'f> {
    pub instance: &'f Instance<'f>,
    /// Object holding the instance, when it was reached through a property
    pub parent: Option<&'f Instance<'f>>,
    pub schema: &'f SchemaNode,
}

impl Frame<'_> {
    fn error(&self, report: &mut ValidationReport, keyword: &str, message: impl Into<String>, details: Value) {
        report.add_error(self.instance, self.schema.uri(), keyword, message, details);
    }

    /// The schema's raw value for a keyword, for error details
    fn raw(&self, keyword: &str) -> Value {
        self.schema.value().get(keyword).cloned().unwrap_or(Value::Null)
    }

    fn flag(&self, keyword: &Keyword) -> Option<bool> {
        self.schema.attribute(keyword).and_then(AttributeValue::as_bool)
    }
}

/// Dispatch one keyword
pub(crate) fn check(
    v: &Validator<'_>,
    frame: &Frame<'_>,
    keyword: &Keyword,
    attribute: Option<&AttributeValue>,
    report: &mut ValidationReport,
) {
    match (keyword, attribute) {
        (Keyword::Optional, attr) => check_optional(frame, attr, report),
        (Keyword::Required, attr) => check_required(frame, attr, report),
        (_, None) => {}

        (Keyword::Type, Some(AttributeValue::Types(entries))) => check_type(v, frame, entries, report),
        (Keyword::Disallow, Some(AttributeValue::Types(entries))) => {
            check_disallow(v, frame, entries, report);
        }
        (Keyword::Properties, Some(AttributeValue::SchemaMap(schemas))) => {
            if frame.instance.is(PrimitiveType::Object) {
                for (key, id) in schemas {
                    v.validate(&frame.instance.property(key), Some(frame.instance), *id, report);
                }
            }
        }
        (Keyword::PatternProperties, Some(AttributeValue::Patterns(patterns))) => {
            check_pattern_properties(v, frame, patterns, report);
        }
        (Keyword::AdditionalProperties, Some(additional)) => {
            check_additional_properties(v, frame, additional, report);
        }
        (Keyword::Items, Some(items)) => check_items(v, frame, items, report),
        (Keyword::Requires, Some(requires)) => check_requires(v, frame, requires, report),
        (Keyword::Dependencies, Some(AttributeValue::Dependencies(deps))) => {
            check_dependencies(v, frame, deps, report);
        }
        (Keyword::Minimum, Some(AttributeValue::Number(minimum))) => check_minimum(frame, minimum, report),
        (Keyword::Maximum, Some(AttributeValue::Number(maximum))) => check_maximum(frame, maximum, report),
        (Keyword::MinItems, Some(AttributeValue::Integer(min))) => {
            if let Some(items) = frame.instance.value().and_then(Value::as_array) {
                if (items.len() as u64) < *min {
                    frame.error(report, "minItems", "The number of items is less than the required minimum", json!(min));
                }
            }
        }
        (Keyword::MaxItems, Some(AttributeValue::Integer(max))) => {
            if let Some(items) = frame.instance.value().and_then(Value::as_array) {
                if items.len() as u64 > *max {
                    frame.error(report, "maxItems", "The number of items is greater than the required maximum", json!(max));
                }
            }
        }
        (Keyword::UniqueItems, Some(AttributeValue::Bool(true))) => check_unique_items(frame, report),
        (Keyword::Pattern, Some(AttributeValue::Pattern(pattern))) => {
            if frame.instance.is_present() {
                match pattern {
                    Err(_) => frame.error(report, "pattern", "Invalid pattern", frame.raw("pattern")),
                    Ok(regex) => {
                        if let Some(s) = frame.instance.value().and_then(Value::as_str) {
                            if !regex.is_match(s) {
                                frame.error(report, "pattern", "String does not match pattern", frame.raw("pattern"));
                            }
                        }
                    }
                }
            }
        }
        (Keyword::MinLength, Some(AttributeValue::Integer(min))) => {
            if let Some(s) = frame.instance.value().and_then(Value::as_str) {
                if (s.chars().count() as u64) < *min {
                    frame.error(report, "minLength", "String is less than the required minimum length", json!(min));
                }
            }
        }
        (Keyword::MaxLength, Some(AttributeValue::Integer(max))) => {
            if let Some(s) = frame.instance.value().and_then(Value::as_str) {
                if s.chars().count() as u64 > *max {
                    frame.error(report, "maxLength", "String is greater than the required maximum length", json!(max));
                }
            }
        }
        (Keyword::Enum, Some(AttributeValue::Values(values))) => {
            if frame.instance.is_present() && !values.iter().any(|value| frame.instance.equals(value)) {
                frame.error(report, "enum", "Instance is not one of the possible values", json!(values));
            }
        }
        (Keyword::Format, Some(AttributeValue::String(format))) => {
            if let Some(value) = frame.instance.value() {
                if !v.formats().check(format, value) {
                    frame.error(report, "format", "String is not in the required format", json!(format));
                }
            }
        }
        (Keyword::DivisibleBy, Some(AttributeValue::Number(divisor))) => check_divisible_by(frame, divisor, report),
        (Keyword::MaxDecimal, Some(AttributeValue::Integer(max))) => {
            if let Some(Value::Number(n)) = frame.instance.value() {
                if decimal_places(n) > *max {
                    frame.error(
                        report,
                        "maxDecimal",
                        "The number of decimal places is greater than the allowed maximum",
                        json!(max),
                    );
                }
            }
        }
        (Keyword::Extends, Some(extends)) => {
            for id in extends.schema_ids() {
                v.validate(frame.instance, frame.parent, id, report);
            }
        }
        (Keyword::PathStart, Some(AttributeValue::String(prefix))) => {
            if frame.instance.is_present() && !frame.instance.uri().starts_with(prefix.as_str()) {
                frame.error(
                    report,
                    "pathStart",
                    format!("Instance's URI does not start with {prefix}"),
                    json!(prefix),
                );
            }
        }
        // Annotations, bounds modifiers read by `minimum`/`maximum`, and
        // `additionalItems`, which `items` consults.
        _ => {}
    }
}

fn check_optional(frame: &Frame<'_>, attribute: Option<&AttributeValue>, report: &mut ValidationReport) {
    let optional = attribute.and_then(AttributeValue::as_bool).unwrap_or(false);
    if !frame.instance.is_present() && !optional {
        frame.error(report, "optional", "Property is required", json!(false));
    }
}

fn check_required(frame: &Frame<'_>, attribute: Option<&AttributeValue>, report: &mut ValidationReport) {
    let required = attribute.and_then(AttributeValue::as_bool).unwrap_or(false);
    if !frame.instance.is_present() && required {
        frame.error(report, "required", "Property is required", json!(true));
    }
}

/// Whether the instance matches one `type`/`disallow` entry
///
/// Unknown type names match when `unknown_matches` is set. A schema entry
/// is tried in a branch that is kept only when it passes, so a failed try
/// leaves its pairs free for later checks.
fn matches_entry(
    v: &Validator<'_>,
    frame: &Frame<'_>,
    entry: &TypeEntry,
    unknown_matches: bool,
    report: &mut ValidationReport,
) -> bool {
    match entry {
        TypeEntry::Name(TypeName::Known(ty)) => frame.instance.is(*ty),
        TypeEntry::Name(TypeName::Unknown(_)) => unknown_matches,
        TypeEntry::Schema(id) => {
            let mut branch = report.branch();
            v.validate(frame.instance, frame.parent, *id, &mut branch);
            let matched = branch.is_valid();
            if matched {
                report.merge(branch);
            }
            matched
        }
    }
}

fn check_type(v: &Validator<'_>, frame: &Frame<'_>, entries: &[TypeEntry], report: &mut ValidationReport) {
    if !frame.instance.is_present() {
        return;
    }
    if !entries.iter().any(|entry| matches_entry(v, frame, entry, true, report)) {
        frame.error(report, "type", "Instance is not a required type", frame.raw("type"));
    }
}

fn check_disallow(v: &Validator<'_>, frame: &Frame<'_>, entries: &[TypeEntry], report: &mut ValidationReport) {
    if !frame.instance.is_present() {
        return;
    }
    if entries.iter().any(|entry| matches_entry(v, frame, entry, false, report)) {
        frame.error(report, "disallow", "Instance is a disallowed type", frame.raw("disallow"));
    }
}

fn check_pattern_properties(
    v: &Validator<'_>,
    frame: &Frame<'_>,
    patterns: &[PatternSchema],
    report: &mut ValidationReport,
) {
    if !frame.instance.is(PrimitiveType::Object) {
        return;
    }
    let properties = frame.instance.properties();
    for pattern in patterns {
        match &pattern.regex {
            Err(_) => frame.error(report, "patternProperties", "Invalid pattern", json!(pattern.source)),
            Ok(regex) => {
                for (key, child) in &properties {
                    if regex.is_match(key) {
                        v.validate(child, Some(frame.instance), pattern.schema, report);
                    }
                }
            }
        }
    }
}

/// Whether `properties` or a valid `patternProperties` pattern covers `key`
fn is_declared(schema: &SchemaNode, key: &str) -> bool {
    let declared = matches!(
        schema.attribute(&Keyword::Properties),
        Some(AttributeValue::SchemaMap(map)) if map.contains_key(key)
    );
    declared
        || matches!(
            schema.attribute(&Keyword::PatternProperties),
            Some(AttributeValue::Patterns(patterns))
                if patterns.iter().any(|p| p.regex.as_ref().is_ok_and(|re| re.is_match(key)))
        )
}

fn check_additional_properties(
    v: &Validator<'_>,
    frame: &Frame<'_>,
    additional: &AttributeValue,
    report: &mut ValidationReport,
) {
    if !frame.instance.is(PrimitiveType::Object) {
        return;
    }
    for (key, child) in frame.instance.properties() {
        if is_declared(frame.schema, key) {
            continue;
        }
        match additional {
            AttributeValue::Forbidden => report.add_error(
                &child,
                frame.schema.uri(),
                "additionalProperties",
                "Additional properties are not allowed",
                json!(key),
            ),
            AttributeValue::Schema(id) => v.validate(&child, Some(frame.instance), *id, report),
            _ => {}
        }
    }
}

fn check_items(v: &Validator<'_>, frame: &Frame<'_>, items: &AttributeValue, report: &mut ValidationReport) {
    let Some(values) = frame.instance.value().and_then(Value::as_array) else {
        return;
    };
    match items {
        AttributeValue::Schema(id) => {
            for index in 0..values.len() {
                v.validate(&frame.instance.item(index), None, *id, report);
            }
        }
        AttributeValue::SchemaList(ids) => {
            for (index, id) in ids.iter().enumerate().take(values.len()) {
                v.validate(&frame.instance.item(index), None, *id, report);
            }
            if values.len() <= ids.len() {
                return;
            }

            // Draft 03 names the overflow schema `additionalItems`; earlier
            // drafts reuse `additionalProperties`.
            let meta = &v.env[frame.schema.meta()];
            let keyword = if meta.definitions().contains(&Keyword::AdditionalItems) {
                Keyword::AdditionalItems
            } else {
                Keyword::AdditionalProperties
            };
            match frame.schema.attribute(&keyword) {
                Some(AttributeValue::Forbidden) => {
                    for index in ids.len()..values.len() {
                        report.add_error(
                            &frame.instance.item(index),
                            frame.schema.uri(),
                            keyword.as_str(),
                            "Additional items are not allowed",
                            json!(false),
                        );
                    }
                }
                Some(AttributeValue::Schema(id)) => {
                    for index in ids.len()..values.len() {
                        v.validate(&frame.instance.item(index), None, *id, report);
                    }
                }
                _ => {}
            }
        }
        _ => {}
    }
}

fn check_requires(v: &Validator<'_>, frame: &Frame<'_>, requires: &AttributeValue, report: &mut ValidationReport) {
    let (true, Some(parent)) = (frame.instance.is_present(), frame.parent) else {
        return;
    };
    match requires {
        AttributeValue::String(name) => {
            if parent.value_of_property(name).is_none() {
                frame.error(
                    report,
                    "requires",
                    format!("Property requires sibling property \"{name}\""),
                    json!(name),
                );
            }
        }
        AttributeValue::Schema(id) => v.validate(parent, None, *id, report),
        _ => {}
    }
}

fn check_dependencies(
    v: &Validator<'_>,
    frame: &Frame<'_>,
    deps: &std::collections::BTreeMap<String, Dependency>,
    report: &mut ValidationReport,
) {
    if !frame.instance.is(PrimitiveType::Object) {
        return;
    }
    for (key, dependency) in deps {
        if frame.instance.value_of_property(key).is_none() {
            continue;
        }
        match dependency {
            Dependency::Properties(names) => {
                let dependent = frame.instance.property(key);
                for name in names {
                    if frame.instance.value_of_property(name).is_none() {
                        report.add_error(
                            &dependent,
                            frame.schema.uri(),
                            "dependencies",
                            format!("Property requires sibling property \"{name}\""),
                            json!(name),
                        );
                    }
                }
            }
            Dependency::Schema(id) => v.validate(frame.instance, frame.parent, *id, report),
        }
    }
}

fn number(frame: &Frame<'_>) -> Option<f64> {
    frame.instance.value().and_then(Value::as_f64)
}

fn check_minimum(frame: &Frame<'_>, minimum: &Number, report: &mut ValidationReport) {
    let (Some(value), Some(bound)) = (number(frame), minimum.as_f64()) else {
        return;
    };
    let exclusive = frame.flag(&Keyword::ExclusiveMinimum) == Some(true)
        || frame.flag(&Keyword::MinimumCanEqual) == Some(false);
    if value < bound || (exclusive && value <= bound) {
        frame.error(report, "minimum", "Number is less than the required minimum value", json!(minimum));
    }
}

fn check_maximum(frame: &Frame<'_>, maximum: &Number, report: &mut ValidationReport) {
    let (Some(value), Some(bound)) = (number(frame), maximum.as_f64()) else {
        return;
    };
    let exclusive = frame.flag(&Keyword::ExclusiveMaximum) == Some(true)
        || frame.flag(&Keyword::MaximumCanEqual) == Some(false);
    if value > bound || (exclusive && value >= bound) {
        frame.error(report, "maximum", "Number is greater than the required maximum value", json!(maximum));
    }
}

fn check_unique_items(frame: &Frame<'_>, report: &mut ValidationReport) {
    let Some(items) = frame.instance.value().and_then(Value::as_array) else {
        return;
    };
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if json_equal(&items[i], &items[j]) {
                frame.error(report, "uniqueItems", "Array can only contain unique items", json!([i, j]));
            }
        }
    }
}

fn check_divisible_by(frame: &Frame<'_>, divisor: &Number, report: &mut ValidationReport) {
    let Some(Value::Number(value)) = frame.instance.value() else {
        return;
    };
    if divisor.as_f64() == Some(0.0) {
        frame.error(report, "divisibleBy", "Divisor must not be zero", json!(divisor));
        return;
    }
    if !is_divisible(value, divisor) {
        frame.error(report, "divisibleBy", format!("Number is not divisible by {divisor}"), json!(divisor));
    }
}

fn is_divisible(value: &Number, divisor: &Number) -> bool {
    if let (Some(v), Some(d)) = (value.as_i64(), divisor.as_i64()) {
        return d == -1 || v.checked_rem(d) == Some(0);
    }
    if let (Some(v), Some(d)) = (value.as_u64(), divisor.as_u64()) {
        return d != 0 && v % d == 0;
    }
    match (value.as_f64(), divisor.as_f64()) {
        (Some(v), Some(d)) if d != 0.0 => {
            let quotient = v / d;
            (quotient - quotient.round()).abs() <= DIVISIBILITY_EPSILON * quotient.abs().max(1.0)
        }
        _ => false,
    }
}

/// Decimal places in the shortest representation of a number
fn decimal_places(n: &Number) -> u64 {
    if n.is_i64() || n.is_u64() {
        return 0;
    }
    let text = n.to_string();
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().unwrap_or(0)),
        None => (text.as_str(), 0),
    };
    let fraction = mantissa
        .split_once('.')
        .map_or(0, |(_, f)| f.trim_end_matches('0').len());
    let places = i64::try_from(fraction).unwrap_or(i64::MAX).saturating_sub(exponent);
    u64::try_from(places).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(&number(json!(3))), 0);
        assert_eq!(decimal_places(&number(json!(1.25))), 2);
        assert_eq!(decimal_places(&number(json!(0.5))), 1);
        assert_eq!(decimal_places(&number(json!(1e-7))), 7);
        assert_eq!(decimal_places(&number(json!(1.5e3))), 0);
    }

    #[test]
    fn test_divisibility() {
        assert!(is_divisible(&number(json!(10)), &number(json!(5))));
        assert!(!is_divisible(&number(json!(10)), &number(json!(3))));
        assert!(is_divisible(&number(json!(-9)), &number(json!(3))));
        assert!(is_divisible(&number(json!(0.3)), &number(json!(0.1))));
        assert!(is_divisible(&number(json!(4.5)), &number(json!(1.5))));
        assert!(!is_divisible(&number(json!(4.6)), &number(json!(1.5))));
    }

    #[test]
    fn test_divisibility_at_integer_limits() {
        assert!(is_divisible(&number(json!(i64::MIN)), &number(json!(-1))));
        assert!(is_divisible(&number(json!(i64::MIN)), &number(json!(2))));
        assert!(!is_divisible(&number(json!(i64::MIN)), &number(json!(i64::MAX))));
        assert!(is_divisible(&number(json!(u64::MAX)), &number(json!(5))));
        assert!(!is_divisible(&number(json!(1)), &number(json!(0))));
    }
}
