//! JsonML subtree payloads.
//!
//! A subtree travels inside a `Move` operation as JsonML:
//! an element is `[tag, attrs?, ...children]` where `attrs` is an object of
//! string values and may be omitted when empty; a text node is a bare JSON
//! string.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::tree::{NodeId, NodeKind, Tree, TreeError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonMlError {
    #[error("expected a string or an array")]
    InvalidNode,
    #[error("element is missing its tag")]
    MissingTag,
    #[error("attribute {0:?} must be a string")]
    InvalidAttribute(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// ── Serializer ────────────────────────────────────────────────────────────

/// Deep copy of `node` and its descendants as JsonML.
pub fn serialize(tree: &Tree, node: NodeId) -> Value {
    match tree.kind(node) {
        NodeKind::Text(text) => Value::String(text.clone()),
        NodeKind::Element { tag, attributes } => {
            let mut out = Vec::with_capacity(2 + tree.children(node).len());
            out.push(Value::String(tag.clone()));
            if !attributes.is_empty() {
                let attrs: Map<String, Value> = attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                out.push(Value::Object(attrs));
            }
            for &child in tree.children(node) {
                out.push(serialize(tree, child));
            }
            Value::Array(out)
        }
    }
}

// ── Materializer ──────────────────────────────────────────────────────────

/// Build a detached subtree in `tree` from a JsonML value.
pub fn materialize(tree: &mut Tree, value: &Value) -> Result<NodeId, JsonMlError> {
    match value {
        Value::String(text) => Ok(tree.create_text(text)),
        Value::Array(items) => {
            let tag = items
                .first()
                .and_then(Value::as_str)
                .ok_or(JsonMlError::MissingTag)?;
            let node = tree.create_element(tag);
            let mut rest = &items[1..];
            if let Some(Value::Object(attrs)) = rest.first() {
                for (name, v) in attrs {
                    let v = v
                        .as_str()
                        .ok_or_else(|| JsonMlError::InvalidAttribute(name.clone()))?;
                    tree.set_attribute(node, name, v)?;
                }
                rest = &rest[1..];
            }
            for item in rest {
                let child = materialize(tree, item)?;
                tree.append_child(node, child)?;
            }
            Ok(node)
        }
        _ => Err(JsonMlError::InvalidNode),
    }
}
