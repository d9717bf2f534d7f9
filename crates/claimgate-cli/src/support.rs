use crate::config::Config;
use claimgate_kernel::WireError;
use claimgate_kernel::report::ScientificReport;
use claimgate_kernel::wire::parse_report;
use serde::Serialize;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value, json};
use std::fmt;
use std::fs;
use std::path::Path;

pub fn load_config_or_exit(explicit: Option<&Path>) -> Config {
    Config::load(explicit).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn read_text_or_exit(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(1);
    })
}

/// Read a JSON document. Syntax errors and repeated object keys are load
/// failures, not wire findings.
pub fn read_json_or_exit(path: &Path) -> Value {
    let raw = read_text_or_exit(path);
    parse_json_strict(&raw).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {} as JSON: {e}", path.display());
        std::process::exit(1);
    })
}

/// Parse JSON into a `Value`, rejecting any key repeated within one object.
pub fn parse_json_strict(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str::<StrictValue>(raw).map(|StrictValue(value)| value)
}

struct StrictValue(Value);

impl<'de> Deserialize<'de> for StrictValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictVisitor).map(StrictValue)
    }
}

struct StrictVisitor;

impl<'de> Visitor<'de> for StrictVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(StrictValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if object.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            let StrictValue(value) = map.next_value()?;
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Route a report file through the wire boundary.
///
/// A wire rejection is reported (as JSON or text) and exits 1.
pub fn load_report_or_exit(path: &Path, json_output: bool) -> ScientificReport {
    let wire = read_json_or_exit(path);
    parse_report(&wire).unwrap_or_else(|error| {
        if json_output {
            print_json_or_exit(&wire_rejection_payload(path, &error));
        } else {
            let location = match error.path() {
                Some(at) => format!(" at {at}"),
                None => String::new(),
            };
            println!("[wire] FAIL {}{location}", error.category());
            println!("  - {error}");
        }
        std::process::exit(1);
    })
}

fn wire_rejection_payload(path: &Path, error: &WireError) -> Value {
    json!({
        "schema": 1,
        "reportPath": path.display().to_string(),
        "result": "rejected",
        "stage": "wire",
        "failureClasses": [error.category()],
        "error": {
            "category": error.category(),
            "path": error.path(),
            "message": error.to_string(),
        }
    })
}

pub fn print_json_or_exit(payload: &impl Serialize) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|error| {
        eprintln!("error: failed to render payload: {error}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_rejects_repeated_keys_at_any_depth() {
        let err = parse_json_strict(r#"{"a": 1, "a": 2}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key `a`"), "{err}");

        let err = parse_json_strict(r#"{"claims": [{"id": "x", "id": "y"}]}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key `id`"), "{err}");
    }

    #[test]
    fn strict_json_agrees_with_plain_parse_otherwise() {
        let raw = r#"{"claims": [], "n": -3, "f": 0.5, "ok": true, "none": null, "s": "x"}"#;
        assert_eq!(
            parse_json_strict(raw).unwrap(),
            serde_json::from_str::<Value>(raw).unwrap()
        );
        assert!(parse_json_strict("{\"claims\": [").is_err());
    }
}
