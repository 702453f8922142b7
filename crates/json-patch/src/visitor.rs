//! Traversal of a parsed path down through nested containers.
//!
//! The visitor walks every segment except the last, resolving an adapter
//! for the current target's shape at each step and descending via
//! `traverse`. It yields the final container together with the adapter
//! for that container; the dispatcher then applies the requested verb
//! with the path's last segment.

use json_patch_pointer::ParsedPath;

use crate::adapter::{resolve_adapter, Adapter};
use crate::contract::ContractResolver;
use crate::error::PatchError;
use crate::target::Target;

/// Walk all but the last segment of `path`, returning the container that
/// holds the final segment and the adapter for it.
///
/// The first unresolvable segment aborts the walk with
/// [`PatchError::SegmentNotFound`] naming that segment. A scalar
/// encountered where a container is needed is likewise "not found".
pub fn visit<'a>(
    root: &'a mut Target,
    path: &ParsedPath,
    resolver: &dyn ContractResolver,
) -> Result<(&'a mut Target, &'static dyn Adapter), PatchError> {
    let mut current = root;
    for segment in path.parent_segments() {
        let adapter = resolve_adapter(current).ok_or_else(|| PatchError::SegmentNotFound {
            segment: segment.clone(),
        })?;
        match adapter.traverse(current, segment, resolver)? {
            Some(next) => current = next,
            None => {
                return Err(PatchError::SegmentNotFound {
                    segment: segment.clone(),
                })
            }
        }
    }
    let adapter = resolve_adapter(current).ok_or_else(|| PatchError::SegmentNotFound {
        segment: path.last_segment().unwrap_or_default().to_string(),
    })?;
    Ok((current, adapter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DefaultContractResolver;
    use serde_json::json;

    const R: DefaultContractResolver = DefaultContractResolver;

    #[test]
    fn visits_nested_containers() {
        let mut target = Target::from_value(&json!({"a": {"b": [1, 2, {"c": 3}]}})).unwrap();
        let path = ParsedPath::parse("/a/b/2/c").unwrap();
        let (container, adapter) = visit(&mut target, &path, &R).unwrap();
        // Final container is the object holding "c"
        assert_eq!(container.to_value(), json!({"c": 3}));
        let got = adapter.get(container, "c", &R).unwrap();
        assert_eq!(got.to_value(), json!(3));
    }

    #[test]
    fn root_path_returns_root() {
        let mut target = Target::from_value(&json!({"a": 1})).unwrap();
        let path = ParsedPath::parse("").unwrap();
        let (container, _) = visit(&mut target, &path, &R).unwrap();
        assert_eq!(container.to_value(), json!({"a": 1}));
    }

    #[test]
    fn first_unresolvable_segment_is_named() {
        let mut target = Target::from_value(&json!({"a": {"b": 1}})).unwrap();
        let path = ParsedPath::parse("/a/x/y").unwrap();
        assert_eq!(
            visit(&mut target, &path, &R).unwrap_err(),
            PatchError::SegmentNotFound {
                segment: "x".into()
            }
        );
    }

    #[test]
    fn scalar_final_container_is_not_found() {
        // "/a" resolves to a scalar, which cannot contain "b"
        let mut target = Target::from_value(&json!({"a": 5})).unwrap();
        let path = ParsedPath::parse("/a/b").unwrap();
        assert_eq!(
            visit(&mut target, &path, &R).unwrap_err(),
            PatchError::SegmentNotFound {
                segment: "b".into()
            }
        );
    }

    #[test]
    fn scalar_mid_path_is_not_found() {
        let mut target = Target::from_value(&json!({"a": 5})).unwrap();
        let path = ParsedPath::parse("/a/b/c").unwrap();
        assert_eq!(
            visit(&mut target, &path, &R).unwrap_err(),
            PatchError::SegmentNotFound {
                segment: "b".into()
            }
        );
    }

    #[test]
    fn path_may_cross_container_shapes() {
        // dynamic object -> list -> dynamic object
        let mut target = Target::from_value(&json!({"rows": [{"id": 1}, {"id": 2}]})).unwrap();
        let path = ParsedPath::parse("/rows/1/id").unwrap();
        let (container, adapter) = visit(&mut target, &path, &R).unwrap();
        let got = adapter.get(container, "id", &R).unwrap();
        assert_eq!(got.to_value(), json!(2));
    }
}
