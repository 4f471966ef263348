// JSON-Patch-style delta engine for STATE_DELTA events
//
// Paths are JSON-Pointer strings: segments split on '/', with the leading
// empty segment discarded. Segments address object properties only; this
// engine does not implement numeric array indexing, so a path into an
// array overwrites it with an object-shaped intermediate. That matches the
// wire producers this runtime pairs with and is pinned by tests.

use serde_json::{Map, Value};

use runlens_contracts::JsonPatchOp;

use crate::error::{Result, StateError};

/// Apply a whole STATE_DELTA atomically (pure function).
///
/// Folds ops left to right over a copy of the document. Any failure, a
/// `test` mismatch or a malformed op, discards the copy and returns the
/// error; the caller's document is never touched.
pub fn apply_delta(doc: &Value, ops: &[JsonPatchOp]) -> Result<Value> {
    let mut result = doc.clone();

    for op in ops {
        apply_op(&mut result, op)?;
    }

    Ok(result)
}

/// Apply a single operation to a document (mutating).
pub(crate) fn apply_op(doc: &mut Value, op: &JsonPatchOp) -> Result<()> {
    let segments = parse_pointer(&op.path);

    match op.op.as_str() {
        "add" | "replace" => {
            let value = require_value(op)?;
            set_checked(doc, &segments, value)
        }
        "remove" => {
            if segments.is_empty() {
                return Err(StateError::invalid_op("cannot remove the document root"));
            }
            remove_at(doc, &segments);
            Ok(())
        }
        "move" => {
            let from_segments = parse_pointer(require_from(op)?);
            match get_at(doc, &from_segments).cloned() {
                Some(value) => {
                    remove_at(doc, &from_segments);
                    set_checked(doc, &segments, value)
                }
                // Absent source resolves to nothing; there is nothing to move.
                None => Ok(()),
            }
        }
        "copy" => {
            let from_segments = parse_pointer(require_from(op)?);
            match get_at(doc, &from_segments).cloned() {
                Some(value) => set_checked(doc, &segments, value),
                None => Ok(()),
            }
        }
        "test" => {
            let expected = op.value.as_ref().ok_or_else(|| {
                StateError::invalid_op(format!("test op at {:?} has no value", op.path))
            })?;
            match get_at(doc, &segments) {
                // Value equality, not identity; an absent path never matches.
                Some(actual) if actual == expected => Ok(()),
                found => Err(StateError::test_failed(
                    op.path.clone(),
                    expected.clone(),
                    found.cloned().unwrap_or(Value::Null),
                )),
            }
        }
        other => Err(StateError::invalid_op(format!(
            "unsupported op kind: {other:?}"
        ))),
    }
}

/// Resolve a JSON-Pointer string against a document.
///
/// A missing or non-object intermediate yields `None`, never an error.
pub fn resolve<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    get_at(doc, &parse_pointer(pointer))
}

/// Split a pointer into segments, discarding the leading empty segment
/// produced by the conventional '/' prefix. The empty pointer addresses
/// the document root.
fn parse_pointer(pointer: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = pointer.split('/').collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }
    segments
}

fn require_value(op: &JsonPatchOp) -> Result<Value> {
    op.value
        .clone()
        .ok_or_else(|| StateError::invalid_op(format!("{} op at {:?} has no value", op.op, op.path)))
}

fn require_from(op: &JsonPatchOp) -> Result<&str> {
    op.from
        .as_deref()
        .ok_or_else(|| StateError::invalid_op(format!("{} op at {:?} has no from", op.op, op.path)))
}

/// Root writes must keep the document a mapping; nested writes are
/// infallible and create object intermediates as needed.
fn set_checked(doc: &mut Value, segments: &[&str], value: Value) -> Result<()> {
    if segments.is_empty() && !value.is_object() {
        return Err(StateError::invalid_op("root write requires an object value"));
    }
    set_at(doc, segments, value);
    Ok(())
}

/// Recursively set a value, creating intermediate objects as needed.
fn set_at(current: &mut Value, segments: &[&str], value: Value) {
    match segments {
        [] => {
            *current = value;
        }
        [key, rest @ ..] => {
            // Non-object intermediates (arrays included) are overwritten
            // with an empty mapping.
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            if let Value::Object(obj) = current {
                if rest.is_empty() {
                    obj.insert((*key).to_string(), value);
                } else {
                    let entry = obj.entry((*key).to_string()).or_insert(Value::Null);
                    set_at(entry, rest, value);
                }
            }
        }
    }
}

/// Try to remove the value at a path. Returns true if something was
/// removed; a missing intermediate makes this a no-op.
fn remove_at(current: &mut Value, segments: &[&str]) -> bool {
    match segments {
        [] => false,
        [key] => current
            .as_object_mut()
            .map(|obj| obj.remove(*key).is_some())
            .unwrap_or(false),
        [key, rest @ ..] => match current.as_object_mut().and_then(|obj| obj.get_mut(*key)) {
            Some(child) => remove_at(child, rest),
            None => false,
        },
    }
}

/// Walk the pointer segment by segment. Only objects are descended into.
fn get_at<'a>(doc: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut current = doc;
    for segment in segments {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_sets_value_at_path() {
        let doc = json!({});
        let result = apply_delta(&doc, &[JsonPatchOp::add("/name", json!("Alice"))]).unwrap();
        assert_eq!(result, json!({"name": "Alice"}));
    }

    #[test]
    fn add_creates_intermediate_objects() {
        let doc = json!({});
        let result = apply_delta(&doc, &[JsonPatchOp::add("/a/b/c", json!(42))]).unwrap();
        assert_eq!(result, json!({"a": {"b": {"c": 42}}}));
    }

    #[test]
    fn add_and_replace_behave_identically() {
        let doc = json!({"x": 1});
        let added = apply_delta(&doc, &[JsonPatchOp::add("/x", json!(2))]).unwrap();
        let replaced = apply_delta(&doc, &[JsonPatchOp::replace("/x", json!(2))]).unwrap();
        assert_eq!(added, replaced);
    }

    #[test]
    fn non_object_intermediate_is_overwritten() {
        let doc = json!({"a": 5});
        let result = apply_delta(&doc, &[JsonPatchOp::add("/a/b", json!(1))]).unwrap();
        assert_eq!(result, json!({"a": {"b": 1}}));
    }

    #[test]
    fn array_path_creates_object_intermediate_not_index() {
        // Numeric segments are object keys here, not array indexes.
        let doc = json!({"items": [1, 2, 3]});
        let result = apply_delta(&doc, &[JsonPatchOp::add("/items/0", json!(9))]).unwrap();
        assert_eq!(result, json!({"items": {"0": 9}}));
    }

    #[test]
    fn remove_deletes_terminal_key() {
        let doc = json!({"x": 1, "y": 2});
        let result = apply_delta(&doc, &[JsonPatchOp::remove("/x")]).unwrap();
        assert_eq!(result, json!({"y": 2}));
    }

    #[test]
    fn remove_missing_path_is_noop() {
        let doc = json!({"x": 1});
        let result = apply_delta(&doc, &[JsonPatchOp::remove("/a/b/c")]).unwrap();
        assert_eq!(result, json!({"x": 1}));
    }

    #[test]
    fn remove_root_is_rejected() {
        let doc = json!({"x": 1});
        let err = apply_delta(&doc, &[JsonPatchOp::remove("")]).unwrap_err();
        assert!(matches!(err, StateError::InvalidPatchOp(_)));
    }

    #[test]
    fn add_then_remove_restores_document() {
        let doc = json!({"kept": true});
        let result = apply_delta(
            &doc,
            &[
                JsonPatchOp::add("/x", json!(5)),
                JsonPatchOp::remove("/x"),
            ],
        )
        .unwrap();
        assert_eq!(result, doc);
    }

    #[test]
    fn move_transfers_value() {
        let doc = json!({"draft": {"text": "hi"}});
        let result = apply_delta(&doc, &[JsonPatchOp::move_op("/draft", "/final")]).unwrap();
        assert_eq!(result, json!({"final": {"text": "hi"}}));
    }

    #[test]
    fn move_missing_source_is_noop() {
        let doc = json!({"x": 1});
        let result = apply_delta(&doc, &[JsonPatchOp::move_op("/missing", "/y")]).unwrap();
        assert_eq!(result, json!({"x": 1}));
    }

    #[test]
    fn copy_duplicates_value_leaving_source() {
        let doc = json!({"src": [1, 2]});
        let result = apply_delta(&doc, &[JsonPatchOp::copy_op("/src", "/dst")]).unwrap();
        assert_eq!(result, json!({"src": [1, 2], "dst": [1, 2]}));
    }

    #[test]
    fn test_passes_on_deep_equality() {
        let doc = json!({"cfg": {"a": 1, "b": [true, null]}});
        let ops = [JsonPatchOp::test("/cfg", json!({"a": 1, "b": [true, null]}))];
        assert!(apply_delta(&doc, &ops).is_ok());
    }

    #[test]
    fn test_fails_on_mismatch() {
        let doc = json!({"a": 2});
        let err = apply_delta(&doc, &[JsonPatchOp::test("/a", json!(1))]).unwrap_err();
        match err {
            StateError::PatchTestFailed {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "/a");
                assert_eq!(expected, json!(1));
                assert_eq!(actual, json!(2));
            }
            other => panic!("expected PatchTestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_fails_against_missing_path() {
        // Absence is not equality, even against an expected null. The
        // error reports null as the found value.
        let doc = json!({});
        let err = apply_delta(&doc, &[JsonPatchOp::test("/absent", json!(null))]).unwrap_err();
        assert!(matches!(
            err,
            StateError::PatchTestFailed { actual, .. } if actual == json!(null)
        ));
    }

    #[test]
    fn failed_test_aborts_remaining_ops() {
        let doc = json!({"a": 2});
        let result = apply_delta(
            &doc,
            &[
                JsonPatchOp::test("/a", json!(1)),
                JsonPatchOp::add("/b", json!(2)),
            ],
        );
        assert!(result.is_err());
        // Pure function: the input document is untouched by construction.
        assert_eq!(doc, json!({"a": 2}));
    }

    #[test]
    fn ops_fold_left_to_right() {
        let doc = json!({});
        let result = apply_delta(
            &doc,
            &[
                JsonPatchOp::add("/n", json!(1)),
                JsonPatchOp::replace("/n", json!(2)),
                JsonPatchOp::copy_op("/n", "/m"),
                JsonPatchOp::remove("/n"),
            ],
        )
        .unwrap();
        assert_eq!(result, json!({"m": 2}));
    }

    #[test]
    fn move_without_from_is_invalid() {
        let doc = json!({});
        let op = JsonPatchOp {
            op: "move".into(),
            path: "/x".into(),
            from: None,
            value: None,
        };
        let err = apply_delta(&doc, &[op]).unwrap_err();
        assert!(matches!(err, StateError::InvalidPatchOp(_)));
    }

    #[test]
    fn add_without_value_is_invalid() {
        let doc = json!({});
        let op = JsonPatchOp {
            op: "add".into(),
            path: "/x".into(),
            from: None,
            value: None,
        };
        let err = apply_delta(&doc, &[op]).unwrap_err();
        assert!(matches!(err, StateError::InvalidPatchOp(_)));
    }

    #[test]
    fn unsupported_op_kind_is_invalid() {
        let doc = json!({});
        let op = JsonPatchOp {
            op: "merge".into(),
            path: "/x".into(),
            from: None,
            value: Some(json!(1)),
        };
        let err = apply_delta(&doc, &[op]).unwrap_err();
        assert!(matches!(err, StateError::InvalidPatchOp(_)));
    }

    #[test]
    fn root_add_replaces_whole_document() {
        let doc = json!({"old": 1});
        let result = apply_delta(&doc, &[JsonPatchOp::add("", json!({"new": 2}))]).unwrap();
        assert_eq!(result, json!({"new": 2}));
    }

    #[test]
    fn root_add_of_scalar_is_rejected() {
        let doc = json!({"old": 1});
        let err = apply_delta(&doc, &[JsonPatchOp::add("", json!(5))]).unwrap_err();
        assert!(matches!(err, StateError::InvalidPatchOp(_)));
    }

    #[test]
    fn lone_slash_addresses_empty_key() {
        let doc = json!({});
        let result = apply_delta(&doc, &[JsonPatchOp::add("/", json!(1))]).unwrap();
        assert_eq!(result, json!({"": 1}));
    }

    #[test]
    fn resolve_walks_objects_only() {
        let doc = json!({"a": {"b": 7}, "arr": [1, 2]});
        assert_eq!(resolve(&doc, "/a/b"), Some(&json!(7)));
        assert_eq!(resolve(&doc, ""), Some(&doc));
        assert_eq!(resolve(&doc, "/a/missing"), None);
        assert_eq!(resolve(&doc, "/arr/0"), None);
    }
}
