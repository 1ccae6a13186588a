#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use patchkit::json_patch::{from_json_patch, PatchDocument};
use serde::Deserialize;
use serde_json::Value;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn load_json(name: &str) -> Value {
    let path = fixtures_dir().join(name);
    let text =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {path:?}: {e}"))
}

/// One of every operation kind, several of them more than once.
pub fn patch_request() -> PatchDocument {
    from_json_patch(&load_json("patch_request.json")).expect("fixture decodes")
}

#[derive(Debug, Deserialize)]
pub struct ApplyCase {
    pub comment: String,
    pub doc: Value,
    pub patch: Value,
    #[serde(default)]
    pub expected: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn apply_cases() -> Vec<ApplyCase> {
    serde_json::from_value(load_json("rfc6902.json")).expect("fixture shape")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
