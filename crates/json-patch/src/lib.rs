//! JSON Patch (RFC 6902) application engine.
//!
//! This crate implements [JSON Patch (RFC 6902)](https://tools.ietf.org/html/rfc6902)
//! against a typed target model: patch documents carry the six standard
//! verbs (`add`, `remove`, `replace`, `move`, `copy`, `test`), paths are
//! JSON Pointers, and targets are lists, keyed maps, contract-backed
//! structured objects, or open dynamic property bags, each patched
//! through its own adapter.
//!
//! # Example
//!
//! ```
//! use json_patch::{DefaultContractResolver, PatchDocument, Target};
//! use serde_json::json;
//!
//! let mut target = Target::from_value(&json!({
//!     "name": "draft",
//!     "tags": ["a", "b"],
//! })).unwrap();
//!
//! let patch = PatchDocument::new()
//!     .replace("/name", json!("final"))
//!     .add("/tags/-", json!("c"));
//!
//! patch.apply_to(&mut target, &DefaultContractResolver).unwrap();
//! assert_eq!(target.to_value(), json!({
//!     "name": "final",
//!     "tags": ["a", "b", "c"],
//! }));
//! ```

pub mod adapter;
pub mod codec;
pub mod contract;
pub mod diff;
pub mod document;
pub mod error;
pub mod operation;
pub mod target;
pub mod visitor;

pub use adapter::{resolve_adapter, Adapter};
pub use codec::{
    document_from_json, document_from_str, document_to_json, document_to_string,
    operation_from_json, operation_to_json,
};
pub use contract::{
    ContractResolver, DefaultContractResolver, Member, StructuredContract,
    StructuredContractBuilder,
};
pub use diff::diff;
pub use document::PatchDocument;
pub use error::{JsonPatchError, PatchError};
pub use operation::{OpKind, Operation};
pub use target::{
    DynamicValue, Kind, KeyKind, ListValue, MapKey, MapValue, StructuredValue, Target, MAX_DEPTH,
};
pub use visitor::visit;
