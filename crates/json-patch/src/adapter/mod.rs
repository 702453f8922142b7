//! Adapters: per-shape strategy objects implementing the five patch verbs.
//!
//! Each adapter knows how to `add`, `get`, `remove`, `replace`, and `test`
//! a single path segment against one container shape, plus `traverse` for
//! descending during multi-segment walks. [`resolve_adapter`] picks the
//! variant by matching the target's tag; resolution happens once per
//! traversal step, never ahead of time, because a path may cross between
//! shapes.

use serde_json::Value;

use crate::contract::ContractResolver;
use crate::error::PatchError;
use crate::target::Target;

mod dynamic;
mod list;
mod map;
mod structured;

pub use dynamic::DynamicAdapter;
pub use list::ListAdapter;
pub use map::MapAdapter;
pub use structured::StructuredAdapter;

/// The uniform five-verb contract plus traversal.
///
/// Verbs return `Err` only for the failures in the [`PatchError`]
/// taxonomy; `traverse` reports an unresolvable segment as `Ok(None)`
/// rather than an error, since traversal is looking for a container to
/// descend into, not mutating.
pub trait Adapter {
    fn add(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError>;

    fn get(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<Target, PatchError>;

    fn remove(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<(), PatchError>;

    fn replace(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError>;

    fn test(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError>;

    fn traverse<'a>(
        &self,
        target: &'a mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<Option<&'a mut Target>, PatchError>;
}

impl std::fmt::Debug for dyn Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Adapter")
    }
}

/// Select the adapter for a target's current shape.
///
/// Priority order: list, map, dynamic, structured. Scalars are not
/// addressable containers and resolve to `None`.
pub fn resolve_adapter(target: &Target) -> Option<&'static dyn Adapter> {
    match target {
        Target::List(_) => Some(&ListAdapter),
        Target::Map(_) => Some(&MapAdapter),
        Target::Dynamic(_) => Some(&DynamicAdapter),
        Target::Structured(_) => Some(&StructuredAdapter),
        Target::Scalar(_) => None,
    }
}

/// The shape the adapter expects was not the shape it was handed; the
/// segment cannot be resolved against this container.
pub(crate) fn shape_mismatch(segment: &str) -> PatchError {
    PatchError::SegmentNotFound {
        segment: segment.to_string(),
    }
}
