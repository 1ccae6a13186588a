//! patchkit: JSON Patch documents routed to pluggable handlers.
//!
//! - [`json_patch`]: operation model, codec, registries and the standard
//!   RFC 6902 handler set
//! - [`json_cli`]: logic behind the `json-patch` and `json-pointer` binaries
//!
//! Pointer parsing and resolution live in `patchkit-json-pointer`.

pub mod json_cli;
pub mod json_patch;
