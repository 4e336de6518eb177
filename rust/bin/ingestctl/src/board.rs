//! Board profiles for synthetic frames.
//!
//! Each board type lists the keys it reports and how to fake a
//! plausible reading. Value ranges live here, on the device side; the
//! server only checks key names and types.

use rand::Rng;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// Uniform in `[min, max)`, rounded to `scale` decimals.
    Number { min: f64, max: f64, scale: u32 },
    /// `true` with probability `true_prob`.
    Boolean { true_prob: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldProfile {
    pub key: &'static str,
    pub reading: Reading,
}

const fn number(key: &'static str, min: f64, max: f64, scale: u32) -> FieldProfile {
    FieldProfile {
        key,
        reading: Reading::Number { min, max, scale },
    }
}

const RACK_COOLANT: &[FieldProfile] = &[
    number("water.temp1.c", 18.0, 32.0, 1),
    number("water.temp2.c", 18.0, 32.0, 1),
    number("water.temp3.c", 18.0, 32.0, 1),
    number("room.temp.c", 18.0, 27.0, 1),
    number("room.humi.pct", 20.0, 60.0, 1),
    // Level switch reads OK most of the time.
    FieldProfile {
        key: "tank.level.ok",
        reading: Reading::Boolean { true_prob: 0.9 },
    },
];

const FLOW: &[FieldProfile] = &[number("flow.rate.lpm", 0.0, 100.0, 1)];

const VOLTAGE: &[FieldProfile] = &[
    number("psu.v1.v", 0.0, 24.0, 2),
    number("psu.v2.v", 0.0, 24.0, 2),
];

pub const BOARDS: &[&str] = &["rack-coolant-board", "flow-board", "voltage-board"];

pub fn profile(board: &str) -> Option<&'static [FieldProfile]> {
    match board {
        "rack-coolant-board" => Some(RACK_COOLANT),
        "flow-board" => Some(FLOW),
        "voltage-board" => Some(VOLTAGE),
        _ => None,
    }
}

/// One random reading per field.
pub fn build_data<R: Rng + ?Sized>(fields: &[FieldProfile], rng: &mut R) -> Map<String, Value> {
    let mut data = Map::new();
    for field in fields {
        let value = match field.reading {
            Reading::Number { min, max, scale } => {
                let raw = rng.gen_range(min..max);
                let factor = 10f64.powi(scale as i32);
                Value::from((raw * factor).round() / factor)
            }
            Reading::Boolean { true_prob } => Value::Bool(rng.gen_bool(true_prob)),
        };
        data.insert(field.key.to_string(), value);
    }
    data
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_board_has_a_profile() {
        for board in BOARDS {
            assert!(profile(board).is_some(), "{}", board);
        }
        assert!(profile("toaster-board").is_none());
    }

    #[test]
    fn numbers_stay_in_range_and_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let data = build_data(VOLTAGE, &mut rng);
            for key in ["psu.v1.v", "psu.v2.v"] {
                let v = data[key].as_f64().unwrap();
                assert!((0.0..=24.0).contains(&v), "{} = {}", key, v);
                let scaled = v * 100.0;
                assert!((scaled - scaled.round()).abs() < 1e-6, "{} has more than 2 decimals", v);
            }
        }
    }

    #[test]
    fn coolant_board_reports_all_six_keys() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = build_data(RACK_COOLANT, &mut rng);
        assert_eq!(data.len(), 6);
        assert!(data["tank.level.ok"].is_boolean());
        assert!(data["room.humi.pct"].is_number());
    }
}
