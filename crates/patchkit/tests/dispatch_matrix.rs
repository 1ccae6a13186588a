//! Every subset of handlers against a document that uses every kind.

mod common;

use std::cell::Cell;
use std::collections::BTreeSet;

use patchkit::json_patch::{
    ContextualOperationRegistry, JsonPointer, Op, OperationKind, OperationRegistry,
    PatchDocument, PatchError, PatchValue,
};
use serde_json::Value;

type Counts = [usize; 6];

fn slot(kind: OperationKind) -> usize {
    OperationKind::ALL
        .iter()
        .position(|k| *k == kind)
        .expect("kind listed in ALL")
}

fn subset(mask: u8) -> BTreeSet<OperationKind> {
    OperationKind::ALL
        .into_iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, kind)| kind)
        .collect()
}

fn occurrences(patch: &PatchDocument) -> Counts {
    let mut counts = [0; 6];
    for op in patch {
        counts[slot(op.kind())] += 1;
    }
    counts
}

fn plain_registry<'a>(
    kinds: &BTreeSet<OperationKind>,
    counts: &'a [Cell<usize>; 6],
) -> OperationRegistry<'a> {
    let bump = move |kind: OperationKind| {
        let cell = &counts[slot(kind)];
        cell.set(cell.get() + 1);
    };
    let mut registry = OperationRegistry::new();
    for kind in kinds {
        match kind {
            OperationKind::Add => registry.set_add(move |_, _| bump(OperationKind::Add)),
            OperationKind::Copy => registry.set_copy(move |_, _| bump(OperationKind::Copy)),
            OperationKind::Move => registry.set_move(move |_, _| bump(OperationKind::Move)),
            OperationKind::Remove => registry.set_remove(move |_| bump(OperationKind::Remove)),
            OperationKind::Replace => {
                registry.set_replace(move |_, _| bump(OperationKind::Replace))
            }
            OperationKind::Test => registry.set_test(move |_, _| {
                bump(OperationKind::Test);
                true
            }),
        };
    }
    registry
}

fn contextual_registry(kinds: &BTreeSet<OperationKind>) -> ContextualOperationRegistry<'static, Counts> {
    let mut registry = ContextualOperationRegistry::new();
    for kind in kinds {
        match kind {
            OperationKind::Add => {
                registry.set_add(|c: &mut Counts, _, _| c[slot(OperationKind::Add)] += 1)
            }
            OperationKind::Copy => {
                registry.set_copy(|c: &mut Counts, _, _| c[slot(OperationKind::Copy)] += 1)
            }
            OperationKind::Move => {
                registry.set_move(|c: &mut Counts, _, _| c[slot(OperationKind::Move)] += 1)
            }
            OperationKind::Remove => {
                registry.set_remove(|c: &mut Counts, _| c[slot(OperationKind::Remove)] += 1)
            }
            OperationKind::Replace => {
                registry.set_replace(|c: &mut Counts, _, _| c[slot(OperationKind::Replace)] += 1)
            }
            OperationKind::Test => registry.set_test(|c: &mut Counts, _, _| {
                c[slot(OperationKind::Test)] += 1;
                true
            }),
        };
    }
    registry
}

fn expected_counts(supported: &BTreeSet<OperationKind>, patch: &PatchDocument) -> Counts {
    let mut counts = occurrences(patch);
    for kind in OperationKind::ALL {
        if !supported.contains(&kind) {
            counts[slot(kind)] = 0;
        }
    }
    counts
}

fn assert_outcome(
    supported: &BTreeSet<OperationKind>,
    result: Result<(), PatchError>,
    counts: Counts,
    patch: &PatchDocument,
) {
    let missing: BTreeSet<_> = OperationKind::ALL
        .into_iter()
        .filter(|kind| !supported.contains(kind))
        .collect();
    match result {
        Ok(()) => assert!(missing.is_empty(), "{supported:?}: expected {missing:?}"),
        Err(err) => assert_eq!(err.unsupported_kinds(), Some(&missing), "{supported:?}"),
    }
    assert_eq!(counts, expected_counts(supported, patch), "{supported:?}");
}

#[test]
fn fixture_uses_every_kind() {
    let patch = common::patch_request();
    assert_eq!(patch.kinds().len(), 6);
    assert_eq!(occurrences(&patch), [3, 1, 1, 2, 2, 2]);
}

#[test]
fn every_subset_plain() {
    common::init_logging();
    let patch = common::patch_request();
    for mask in 0..64u8 {
        let supported = subset(mask);
        let counts: [Cell<usize>; 6] = Default::default();
        let result = plain_registry(&supported, &counts).apply(&patch);
        assert_outcome(&supported, result, counts.map(Cell::into_inner), &patch);
    }
}

#[test]
fn every_subset_contextual() {
    common::init_logging();
    let patch = common::patch_request();
    for mask in 0..64u8 {
        let supported = subset(mask);
        let mut counts = [0; 6];
        let result = contextual_registry(&supported).apply(&patch, &mut counts);
        assert_outcome(&supported, result, counts, &patch);
    }
}

#[test]
fn empty_registries_report_all_six_kinds() {
    let patch = common::patch_request();
    let all: BTreeSet<_> = OperationKind::ALL.into_iter().collect();

    let err = OperationRegistry::new().apply(&patch).unwrap_err();
    assert_eq!(err.unsupported_kinds(), Some(&all));
    assert_eq!(
        err.to_string(),
        "operation(s) not supported: add, copy, move, remove, replace, test"
    );

    let mut counts = [0; 6];
    let err = ContextualOperationRegistry::new()
        .apply(&patch, &mut counts)
        .unwrap_err();
    assert_eq!(err.unsupported_kinds(), Some(&all));
    assert_eq!(counts, [0; 6]);
}

#[test]
fn preflight_agrees_with_apply() {
    let patch = common::patch_request();
    for mask in 0..64u8 {
        let supported = subset(mask);
        let mut registry = contextual_registry(&supported);
        let unsupported = registry.unsupported_in(&patch);

        let mut counts = [0; 6];
        match registry.ensure_supported(&patch) {
            Ok(()) => assert!(unsupported.is_empty()),
            Err(err) => assert_eq!(err.unsupported_kinds(), Some(&unsupported)),
        }
        assert_eq!(counts, [0; 6]);

        let applied = registry.apply(&patch, &mut counts);
        assert_eq!(
            applied.err().as_ref().and_then(PatchError::unsupported_kinds),
            (!unsupported.is_empty()).then_some(&unsupported)
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    kind: OperationKind,
    path: String,
    from: Option<String>,
    value: Option<Value>,
}

impl Call {
    fn of(op: &Op) -> Self {
        Call {
            kind: op.kind(),
            path: op.path().to_string(),
            from: op.from().map(ToString::to_string),
            value: op.value().map(|v| v.as_value().clone()),
        }
    }
}

fn record(
    kind: OperationKind,
    path: &JsonPointer,
    from: Option<&JsonPointer>,
    value: Option<&PatchValue>,
) -> Call {
    Call {
        kind,
        path: path.to_string(),
        from: from.map(ToString::to_string),
        value: value.map(|v| v.as_value().clone()),
    }
}

fn recording_registry(
    kinds: &BTreeSet<OperationKind>,
) -> ContextualOperationRegistry<'static, Vec<Call>> {
    let mut registry = ContextualOperationRegistry::new();
    for kind in kinds {
        match kind {
            OperationKind::Add => registry.set_add(|log: &mut Vec<Call>, path, value| {
                log.push(record(OperationKind::Add, path, None, Some(value)))
            }),
            OperationKind::Copy => registry.set_copy(|log: &mut Vec<Call>, from, path| {
                log.push(record(OperationKind::Copy, path, Some(from), None))
            }),
            OperationKind::Move => registry.set_move(|log: &mut Vec<Call>, from, path| {
                log.push(record(OperationKind::Move, path, Some(from), None))
            }),
            OperationKind::Remove => registry.set_remove(|log: &mut Vec<Call>, path| {
                log.push(record(OperationKind::Remove, path, None, None))
            }),
            OperationKind::Replace => registry.set_replace(|log: &mut Vec<Call>, path, value| {
                log.push(record(OperationKind::Replace, path, None, Some(value)))
            }),
            OperationKind::Test => registry.set_test(|log: &mut Vec<Call>, path, value| {
                log.push(record(OperationKind::Test, path, None, Some(value)));
                true
            }),
        };
    }
    registry
}

#[test]
fn repeated_applies_are_deterministic() {
    let patch = common::patch_request();
    for mask in [0b111111u8, 0b010101, 0b101010] {
        let supported = subset(mask);
        let mut registry = recording_registry(&supported);

        let mut first = Vec::new();
        let first_result = registry.apply(&patch, &mut first);
        let mut second = Vec::new();
        let second_result = registry.apply(&patch, &mut second);

        let expected: Vec<Call> = patch
            .iter()
            .filter(|op| supported.contains(&op.kind()))
            .map(Call::of)
            .collect();
        assert_eq!(first, expected, "{supported:?}");
        assert_eq!(second, first, "{supported:?}");
        assert_eq!(
            first_result.map_err(|e| e.to_string()),
            second_result.map_err(|e| e.to_string())
        );
    }
}
