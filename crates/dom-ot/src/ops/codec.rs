//! JSON wire form of operations.
//!
//! ```text
//! {"type": "Move", "from": [0, 1] | null, "to": [2] | null, "payload": <JsonML>}
//! {"type": "Manipulate", "path": [0], "attribute": "id", "value": "y" | null}
//! {"type": "ManipulateText", "path": [0, 0], "text": "hello"}
//! ```
//!
//! `payload` is omitted when a move carries none.

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::Operation;
use crate::path::Path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid operation: {0}")]
    InvalidOp(String),
}

// ── Path helpers ──────────────────────────────────────────────────────────

fn encode_path(path: &[usize]) -> Value {
    Value::Array(path.iter().map(|&i| json!(i)).collect())
}

fn encode_opt_path(path: &Option<Path>) -> Value {
    path.as_deref().map(encode_path).unwrap_or(Value::Null)
}

fn decode_path(v: &Value, field: &str) -> Result<Path, CodecError> {
    let arr = v
        .as_array()
        .ok_or_else(|| CodecError::InvalidOp(format!("'{field}' must be an array")))?;
    arr.iter()
        .map(|step| {
            step.as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| {
                    CodecError::InvalidOp(format!("'{field}' must hold non-negative integers"))
                })
        })
        .collect()
}

fn decode_opt_path(obj: &Map<String, Value>, field: &str) -> Result<Option<Path>, CodecError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => decode_path(v, field).map(Some),
    }
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    op: &str,
) -> Result<&'a Value, CodecError> {
    obj.get(field)
        .ok_or_else(|| CodecError::InvalidOp(format!("{op} requires '{field}'")))
}

fn require_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    op: &str,
) -> Result<&'a str, CodecError> {
    require(obj, field, op)?
        .as_str()
        .ok_or_else(|| CodecError::InvalidOp(format!("'{field}' must be a string")))
}

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(op: &Operation) -> Value {
    match op {
        Operation::Move { from, to, payload } => {
            let mut obj = Map::new();
            obj.insert("type".into(), json!("Move"));
            obj.insert("from".into(), encode_opt_path(from));
            obj.insert("to".into(), encode_opt_path(to));
            if let Some(payload) = payload {
                obj.insert("payload".into(), payload.clone());
            }
            Value::Object(obj)
        }
        Operation::Manipulate {
            path,
            attribute,
            value,
        } => json!({
            "type": "Manipulate",
            "path": encode_path(path),
            "attribute": attribute,
            "value": value,
        }),
        Operation::ManipulateText { path, text } => json!({
            "type": "ManipulateText",
            "path": encode_path(path),
            "text": text,
        }),
    }
}

pub fn oplist_to_json(ops: &[Operation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn from_json(v: &Value) -> Result<Operation, CodecError> {
    let obj = v
        .as_object()
        .ok_or_else(|| CodecError::InvalidOp("operation must be an object".into()))?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::InvalidOp("missing 'type' field".into()))?;

    match kind {
        "Move" => {
            let from = decode_opt_path(obj, "from")?;
            let to = decode_opt_path(obj, "to")?;
            let payload = obj.get("payload").filter(|p| !p.is_null()).cloned();
            Ok(Operation::Move { from, to, payload })
        }
        "Manipulate" => {
            let path = decode_path(require(obj, "path", kind)?, "path")?;
            let attribute = require_str(obj, "attribute", kind)?.to_owned();
            let value = match obj.get("value") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => {
                    return Err(CodecError::InvalidOp(
                        "'value' must be a string or null".into(),
                    ))
                }
            };
            Ok(Operation::Manipulate {
                path,
                attribute,
                value,
            })
        }
        "ManipulateText" => {
            let path = decode_path(require(obj, "path", kind)?, "path")?;
            let text = require_str(obj, "text", kind)?.to_owned();
            Ok(Operation::ManipulateText { path, text })
        }
        other => Err(CodecError::InvalidOp(format!("unknown type: {other}"))),
    }
}

pub fn oplist_from_json(v: &Value) -> Result<Vec<Operation>, CodecError> {
    let arr = v
        .as_array()
        .ok_or_else(|| CodecError::InvalidOp("oplist must be an array".into()))?;
    arr.iter().map(from_json).collect()
}
