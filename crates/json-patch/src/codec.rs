//! Wire codec for patch documents.
//!
//! The interchange form is the RFC 6902 JSON array of operation objects:
//! `[{"op": "add", "path": "/a", "value": 1}, ...]`. Encoding is total;
//! decoding validates operation kinds and per-kind field requirements and
//! reports failures as [`PatchError::InvalidDocument`] or
//! [`PatchError::InvalidOp`].

use serde_json::{json, Map, Value};

use crate::document::PatchDocument;
use crate::error::PatchError;
use crate::operation::{OpKind, Operation};

/// Encode one operation as its wire object.
pub fn operation_to_json(operation: &Operation) -> Value {
    let mut obj = Map::new();
    obj.insert("op".to_string(), json!(operation.kind.as_str()));
    obj.insert("path".to_string(), json!(operation.path));
    if let Some(from) = &operation.from {
        obj.insert("from".to_string(), json!(from));
    }
    if let Some(value) = &operation.value {
        obj.insert("value".to_string(), value.clone());
    }
    Value::Object(obj)
}

/// Decode one operation from its wire object.
pub fn operation_from_json(value: &Value) -> Result<Operation, PatchError> {
    let obj = value
        .as_object()
        .ok_or_else(|| PatchError::InvalidDocument("operation must be an object".to_string()))?;
    let op = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidDocument("operation is missing 'op'".to_string()))?;
    let kind = OpKind::parse(op)?;
    let path = obj
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidDocument("operation is missing 'path'".to_string()))?;
    let from = match obj.get("from") {
        Some(Value::String(f)) => Some(f.clone()),
        Some(_) => {
            return Err(PatchError::InvalidDocument(
                "'from' must be a string".to_string(),
            ))
        }
        None => None,
    };
    let value = obj.get("value").cloned();
    Operation::new(kind, path.to_string(), from, value)
}

/// Encode a whole document as the wire array.
pub fn document_to_json(document: &PatchDocument) -> Value {
    Value::Array(document.operations().iter().map(operation_to_json).collect())
}

/// Decode a whole document from the wire array.
pub fn document_from_json(value: &Value) -> Result<PatchDocument, PatchError> {
    let ops = value
        .as_array()
        .ok_or_else(|| PatchError::InvalidDocument("patch document must be an array".to_string()))?;
    let mut document = PatchDocument::new();
    for op in ops {
        document.push(operation_from_json(op)?);
    }
    Ok(document)
}

/// Decode a document from JSON text.
pub fn document_from_str(text: &str) -> Result<PatchDocument, PatchError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PatchError::InvalidDocument(e.to_string()))?;
    document_from_json(&value)
}

/// Encode a document as compact JSON text.
pub fn document_to_string(document: &PatchDocument) -> String {
    document_to_json(document).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_all_six_verbs() {
        let doc = PatchDocument::new()
            .add("/a", json!(1))
            .remove("/b")
            .replace("/c", json!("x"))
            .move_value("/d", "/e")
            .copy("/f", "/g")
            .test("/h", json!(true));
        let encoded = document_to_json(&doc);
        assert_eq!(
            encoded,
            json!([
                {"op": "add", "path": "/a", "value": 1},
                {"op": "remove", "path": "/b"},
                {"op": "replace", "path": "/c", "value": "x"},
                {"op": "move", "path": "/e", "from": "/d"},
                {"op": "copy", "path": "/g", "from": "/f"},
                {"op": "test", "path": "/h", "value": true},
            ])
        );
    }

    #[test]
    fn decode_round_trips_encode() {
        let doc = PatchDocument::new()
            .add("/a/b", json!({"nested": [1, 2]}))
            .move_value("/x", "/y");
        let decoded = document_from_json(&document_to_json(&doc)).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn decode_accepts_null_value() {
        let op = operation_from_json(&json!({"op": "add", "path": "/a", "value": null})).unwrap();
        assert_eq!(op.value, Some(Value::Null));
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = operation_from_json(&json!({"op": "merge", "path": "/a"})).unwrap_err();
        assert_eq!(err, PatchError::InvalidOp { op: "merge".into() });
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        assert!(operation_from_json(&json!({"path": "/a"})).is_err());
        assert!(operation_from_json(&json!({"op": "add"})).is_err());
        assert!(operation_from_json(&json!({"op": "move", "path": "/a"})).is_err());
        assert!(operation_from_json(&json!({"op": "test", "path": "/a"})).is_err());
    }

    #[test]
    fn non_array_document_is_rejected() {
        assert!(matches!(
            document_from_json(&json!({"op": "add"})).unwrap_err(),
            PatchError::InvalidDocument(_)
        ));
    }

    #[test]
    fn text_round_trip() {
        let doc = PatchDocument::new().replace("/n", json!(3.5));
        let text = document_to_string(&doc);
        assert_eq!(document_from_str(&text).unwrap(), doc);
    }
}
