//! Whitelist check of a frame's `data` against a model contract.
//!
//! Two passes: every present key must be known and correctly typed,
//! then every required key must be present. All violations are
//! returned together; an empty list means the data is accepted.

use serde_json::{Map, Value};

use ingest_core::FieldViolation;

use crate::model::{DeviceModelContract, FieldType};

pub const REASON_NOT_ALLOWED: &str = "key not allowed for this device model";
pub const REASON_EXPECTED_NUMBER: &str = "type mismatch: expected number (finite)";
pub const REASON_EXPECTED_BOOLEAN: &str = "type mismatch: expected boolean";
pub const REASON_MISSING: &str = "missing required key";

/// Validate `data` against `contract`.
///
/// Present-key violations come first, ordered by key; missing required
/// keys follow in contract order.
pub fn validate(contract: &DeviceModelContract, data: &Map<String, Value>) -> Vec<FieldViolation> {
    let mut errors = Vec::new();

    let mut keys: Vec<&String> = data.keys().collect();
    keys.sort();
    for key in keys {
        let Some(rule) = contract.field(key) else {
            errors.push(FieldViolation::new(key.as_str(), REASON_NOT_ALLOWED));
            continue;
        };
        if !matches_type(rule.field_type, &data[key]) {
            let reason = match rule.field_type {
                FieldType::Number => REASON_EXPECTED_NUMBER,
                FieldType::Boolean => REASON_EXPECTED_BOOLEAN,
            };
            errors.push(FieldViolation::new(key.as_str(), reason));
        }
    }

    for rule in contract.required_fields() {
        if !data.contains_key(&rule.key) {
            errors.push(FieldViolation::new(rule.key.as_str(), REASON_MISSING));
        }
    }

    errors
}

fn matches_type(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Number => value.as_f64().is_some_and(f64::is_finite),
        FieldType::Boolean => value.is_boolean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldRule;

    fn voltage() -> DeviceModelContract {
        DeviceModelContract {
            id: "VOLTAGE_BOARD_V1".into(),
            display_name: "voltage-board".into(),
            version: "v1".into(),
            fields: vec![
                FieldRule::required("psu.v1.v", FieldType::Number),
                FieldRule::required("psu.v2.v", FieldType::Number),
            ],
        }
    }

    fn coolant() -> DeviceModelContract {
        DeviceModelContract {
            id: "RACK_COOLANT_V1".into(),
            display_name: "rack-coolant-board".into(),
            version: "v1".into(),
            fields: vec![
                FieldRule::required("water.temp1.c", FieldType::Number),
                FieldRule::required("tank.level.ok", FieldType::Boolean),
                FieldRule::optional("room.humi.pct", FieldType::Number),
            ],
        }
    }

    fn data(v: serde_json::Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn accepts_exact_contract() {
        let errors = validate(&voltage(), &data(serde_json::json!({
            "psu.v1.v": 12.0,
            "psu.v2.v": 5,
        })));
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_and_missing_reported_together() {
        let errors = validate(&voltage(), &data(serde_json::json!({
            "psu.v1.v": 12.0,
            "psu.v3.v": 1.0,
        })));
        assert_eq!(errors, vec![
            FieldViolation::new("psu.v3.v", REASON_NOT_ALLOWED),
            FieldViolation::new("psu.v2.v", REASON_MISSING),
        ]);
    }

    #[test]
    fn booleans_and_numbers_are_not_interchangeable() {
        let errors = validate(&coolant(), &data(serde_json::json!({
            "water.temp1.c": true,
            "tank.level.ok": 1,
        })));
        assert_eq!(errors, vec![
            FieldViolation::new("tank.level.ok", REASON_EXPECTED_BOOLEAN),
            FieldViolation::new("water.temp1.c", REASON_EXPECTED_NUMBER),
        ]);
    }

    #[test]
    fn strings_and_nulls_are_type_mismatches() {
        let errors = validate(&coolant(), &data(serde_json::json!({
            "water.temp1.c": "24.7",
            "tank.level.ok": null,
        })));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.reason.starts_with("type mismatch")));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let errors = validate(&coolant(), &data(serde_json::json!({
            "water.temp1.c": 24.7,
            "tank.level.ok": false,
        })));
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_data_lists_every_required_key_in_contract_order() {
        let errors = validate(&coolant(), &Map::new());
        let keys: Vec<&str> = errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["water.temp1.c", "tank.level.ok"]);
        assert!(errors.iter().all(|e| e.reason == REASON_MISSING));
    }

    #[test]
    fn result_does_not_depend_on_insertion_order() {
        let mut forward = Map::new();
        forward.insert("zzz".into(), serde_json::json!(1));
        forward.insert("water.temp1.c".into(), serde_json::json!("x"));
        forward.insert("aaa".into(), serde_json::json!(true));

        let mut backward = Map::new();
        backward.insert("aaa".into(), serde_json::json!(true));
        backward.insert("water.temp1.c".into(), serde_json::json!("x"));
        backward.insert("zzz".into(), serde_json::json!(1));

        let a = validate(&coolant(), &forward);
        let b = validate(&coolant(), &backward);
        assert_eq!(a, b);
        // one entry per offending key
        assert_eq!(a.len(), 4);
    }
}
