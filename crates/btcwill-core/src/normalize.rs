//! Boundary normalization.
//!
//! Storage may hand back each record section either as structured JSON or as
//! the serialized text of it. Everything is folded into one canonical
//! `serde_json::Value` shape here, once, before any business logic runs.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::record::{WillRecord, WillStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A field that must hold a map or list held something else entirely.
    #[error("{field}: expected an object or array, found {found}")]
    MalformedShape { field: String, found: &'static str },
}

/// Normalize a text-or-structured field into a structured value.
///
/// Null and blank text read as an empty object. Objects and arrays pass
/// through. Text is parsed as JSON and must yield an object or array.
pub fn parse_or_pass_through(field: &str, value: &Value) -> Result<Value, RecordError> {
    match value {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) | Value::Array(_) => Ok(value.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(Value::Object(Map::new())),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                debug!(field, "parsed serialized section text");
                Ok(parsed)
            }
            Ok(other) => Err(malformed(field, &other)),
            Err(_) => Err(RecordError::MalformedShape {
                field: field.to_string(),
                found: "unparseable text",
            }),
        },
        other => Err(malformed(field, other)),
    }
}

/// Normalize a whole record value (object, or text holding one) into a `WillRecord`.
pub fn record_from_value(value: &Value) -> Result<WillRecord, RecordError> {
    let map = match parse_or_pass_through("record", value)? {
        Value::Object(map) => map,
        other => return Err(malformed("record", &other)),
    };

    let section = |field: &str| match map.get(field) {
        Some(raw) => parse_or_pass_through(field, raw),
        None => Ok(Value::Object(Map::new())),
    };

    let status = map
        .get("status")
        .cloned()
        .and_then(|raw| serde_json::from_value::<WillStatus>(raw).ok())
        .unwrap_or_default();

    Ok(WillRecord::from_sections(
        section("personal_info")?,
        section("bitcoin_assets")?,
        section("beneficiaries")?,
        section("instructions")?,
        status,
    ))
}

fn malformed(field: &str, value: &Value) -> RecordError {
    RecordError::MalformedShape {
        field: field.to_string(),
        found: kind_of(value),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_values_pass_through() {
        let value = json!({"wallets": []});
        assert_eq!(parse_or_pass_through("bitcoin_assets", &value), Ok(value));
        let list = json!([{"name": "Ann"}]);
        assert_eq!(parse_or_pass_through("beneficiaries", &list), Ok(list));
    }

    #[test]
    fn serialized_text_is_parsed() {
        let text = Value::String(r#"{"access_instructions":"open the safe"}"#.into());
        assert_eq!(
            parse_or_pass_through("instructions", &text),
            Ok(json!({"access_instructions": "open the safe"}))
        );
    }

    #[test]
    fn absence_reads_as_empty_object() {
        assert_eq!(parse_or_pass_through("x", &Value::Null), Ok(json!({})));
        assert_eq!(parse_or_pass_through("x", &json!("   ")), Ok(json!({})));
    }

    #[test]
    fn bare_scalars_are_rejected() {
        assert_eq!(
            parse_or_pass_through("personal_info", &json!(42)),
            Err(RecordError::MalformedShape {
                field: "personal_info".into(),
                found: "number"
            })
        );
        assert_eq!(
            parse_or_pass_through("personal_info", &json!("\"just text\"")),
            Err(RecordError::MalformedShape {
                field: "personal_info".into(),
                found: "string"
            })
        );
        assert!(parse_or_pass_through("personal_info", &json!("not json")).is_err());
    }

    #[test]
    fn record_from_mixed_text_and_structured_fields() {
        let raw = json!({
            "personal_info": r#"{"full_name":"Satoshi"}"#,
            "bitcoin_assets": {"wallets": [{"name": "W1", "type": "hardware"}]},
            "beneficiaries": null,
            "status": "completed"
        });
        let record = record_from_value(&raw).expect("normalize");
        assert_eq!(record.personal_info.full_name, "Satoshi");
        assert_eq!(record.bitcoin_assets.wallets.len(), 1);
        assert!(record.beneficiaries.primary.is_empty());
        assert_eq!(record.status, WillStatus::Completed);
    }

    #[test]
    fn record_must_be_an_object() {
        let err = record_from_value(&json!(7)).expect_err("number is not a record");
        assert_eq!(
            err,
            RecordError::MalformedShape {
                field: "record".into(),
                found: "number"
            }
        );
        assert!(record_from_value(&json!([1, 2])).is_err());
        assert_eq!(record_from_value(&json!({})), Ok(WillRecord::default()));
    }

    #[test]
    fn malformed_section_propagates() {
        let err = record_from_value(&json!({"instructions": true})).expect_err("bool section");
        assert_eq!(
            err,
            RecordError::MalformedShape {
                field: "instructions".into(),
                found: "boolean"
            }
        );
    }
}
