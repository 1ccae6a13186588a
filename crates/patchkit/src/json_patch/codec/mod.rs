//! Codecs for JSON Patch documents.

pub mod json;
