//! The standard handler set against RFC 6902 appendix A and friends.

mod common;

use patchkit::json_patch::{
    apply_patch, from_json_patch, standard_registry, ApplyPatchOptions, PatchError, Target,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

#[test]
fn rfc6902_cases() {
    common::init_logging();
    for case in common::apply_cases() {
        let patch = from_json_patch(&case.patch)
            .unwrap_or_else(|e| panic!("{}: patch does not decode: {e}", case.comment));
        let mut doc = case.doc.clone();
        let result = apply_patch(&mut doc, &patch, &ApplyPatchOptions::default());

        match (&case.expected, &case.error, result) {
            (Some(expected), None, Ok(())) => assert_eq!(&doc, expected, "{}", case.comment),
            (None, Some(error), Err(PatchError::Failed(failures))) => {
                assert_eq!(failures[0].reason.to_string(), *error, "{}", case.comment);
                assert_eq!(doc, case.doc, "{}: input was modified", case.comment);
            }
            (_, _, result) => panic!("{}: unexpected {result:?}", case.comment),
        }
    }
}

#[test]
fn target_collects_every_failure() {
    let patch = from_json_patch(&json!([
        {"op": "remove", "path": "/missing"},
        {"op": "add", "path": "/ok", "value": true},
        {"op": "test", "path": "/ok", "value": false},
        {"op": "replace", "path": "/gone", "value": 1}
    ]))
    .unwrap();

    let mut target = Target::new(json!({}));
    standard_registry().apply(&patch, &mut target).unwrap();

    assert_eq!(target.doc, json!({"ok": true}));
    assert_eq!(
        target.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
        [0, 2, 3]
    );
    assert!(matches!(target.into_result(), Err(PatchError::Failed(f)) if f.len() == 3));
}

fn small_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..8)
        .prop_map(|m| m.into_iter().map(|(k, v)| (k, json!(v))).collect())
}

proptest! {
    #[test]
    fn add_then_remove_restores_document(object in small_object(), key in "[A-Z]{1,4}") {
        let original = Value::Object(object);
        let pointer = format!("/{key}");
        let patch = from_json_patch(&json!([
            {"op": "add", "path": pointer, "value": [1, 2]},
            {"op": "test", "path": pointer, "value": [1, 2]},
            {"op": "remove", "path": pointer}
        ]))
        .unwrap();

        let mut doc = original.clone();
        apply_patch(&mut doc, &patch, &ApplyPatchOptions::default()).unwrap();
        prop_assert_eq!(doc, original);
    }

    #[test]
    fn copy_then_test_succeeds(object in small_object()) {
        prop_assume!(!object.is_empty());
        let key = object.keys().next().cloned().unwrap_or_default();
        let from = format!("/{key}");
        let expected = object[&key].clone();
        let patch = from_json_patch(&json!([
            {"op": "copy", "from": from, "path": "/copied"},
            {"op": "test", "path": "/copied", "value": expected}
        ]))
        .unwrap();

        let mut doc = Value::Object(object);
        let options = ApplyPatchOptions { mutate: true };
        prop_assert!(apply_patch(&mut doc, &patch, &options).is_ok());
    }
}
