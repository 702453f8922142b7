//! Adapter for open-ended dynamic property bags.

use serde_json::Value;

use super::{shape_mismatch, Adapter};
use crate::contract::ContractResolver;
use crate::error::PatchError;
use crate::target::{DynamicValue, Kind, Target};

/// Addresses members resolved at runtime against a property bag with no
/// fixed member set. The contract's name resolver maps the path segment
/// to the actual member name (defaulting to the segment itself).
///
/// `remove` mirrors structured-object semantics: the member is reset to a
/// default for its current kind, not deleted from the bag.
pub struct DynamicAdapter;

fn as_dynamic<'a>(target: &'a Target, segment: &str) -> Result<&'a DynamicValue, PatchError> {
    match target {
        Target::Dynamic(d) => Ok(d),
        _ => Err(shape_mismatch(segment)),
    }
}

fn as_dynamic_mut<'a>(
    target: &'a mut Target,
    segment: &str,
) -> Result<&'a mut DynamicValue, PatchError> {
    match target {
        Target::Dynamic(d) => Ok(d),
        _ => Err(shape_mismatch(segment)),
    }
}

fn missing(segment: &str) -> PatchError {
    PatchError::SegmentNotFound {
        segment: segment.to_string(),
    }
}

impl Adapter for DynamicAdapter {
    fn add(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let dynamic = as_dynamic_mut(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        // Add inserts a new member or overwrites an existing one
        let converted = resolver.convert(value, &Kind::Any)?;
        dynamic.entries.insert(name, converted);
        Ok(())
    }

    fn get(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<Target, PatchError> {
        let dynamic = as_dynamic(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        dynamic
            .entries
            .get(&name)
            .cloned()
            .ok_or_else(|| missing(segment))
    }

    fn remove(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<(), PatchError> {
        let dynamic = as_dynamic_mut(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        let current = dynamic.entries.get(&name).ok_or_else(|| missing(segment))?;
        // Reset to a default for the member's current kind, as structured
        // remove does
        let default = current.kind().default_value();
        dynamic.entries.insert(name, default);
        Ok(())
    }

    fn replace(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let dynamic = as_dynamic_mut(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        let current = dynamic.entries.get(&name).ok_or_else(|| missing(segment))?;
        // Conversion guided by the member's current runtime kind
        let converted = resolver.convert(value, &current.kind())?;
        dynamic.entries.insert(name, converted);
        Ok(())
    }

    fn test(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let dynamic = as_dynamic(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        let current = dynamic.entries.get(&name).ok_or_else(|| missing(segment))?;
        let expected = resolver
            .convert(value, &current.kind())
            .or_else(|_| resolver.convert(value, &Kind::Any))?;
        if *current != expected {
            return Err(PatchError::ValueNotEqualToTestValue {
                current: current.to_value().to_string(),
                test: value.to_string(),
                segment: segment.to_string(),
            });
        }
        Ok(())
    }

    fn traverse<'a>(
        &self,
        target: &'a mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<Option<&'a mut Target>, PatchError> {
        let dynamic = as_dynamic_mut(target, segment)?;
        let name = resolver.resolve_dynamic_name(segment);
        Ok(dynamic.entries.get_mut(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DefaultContractResolver;
    use serde_json::json;

    const R: DefaultContractResolver = DefaultContractResolver;

    fn bag(value: Value) -> Target {
        Target::from_value(&value).unwrap()
    }

    #[test]
    fn add_inserts_and_overwrites() {
        let mut target = bag(json!({"a": 1}));
        DynamicAdapter.add(&mut target, "b", &R, &json!("x")).unwrap();
        DynamicAdapter.add(&mut target, "a", &R, &json!(2)).unwrap();
        assert_eq!(target.to_value(), json!({"a": 2, "b": "x"}));
    }

    #[test]
    fn get_missing_member_not_found() {
        let target = bag(json!({"a": 1}));
        assert_eq!(
            DynamicAdapter.get(&target, "b", &R),
            Err(PatchError::SegmentNotFound {
                segment: "b".into()
            })
        );
    }

    #[test]
    fn remove_resets_to_kind_default() {
        let mut target = bag(json!({"n": 7, "s": "hi", "flag": true}));
        DynamicAdapter.remove(&mut target, "n", &R).unwrap();
        DynamicAdapter.remove(&mut target, "s", &R).unwrap();
        DynamicAdapter.remove(&mut target, "flag", &R).unwrap();
        assert_eq!(
            target.to_value(),
            json!({"n": 0, "s": null, "flag": false})
        );
        assert_eq!(
            DynamicAdapter.remove(&mut target, "missing", &R),
            Err(PatchError::SegmentNotFound {
                segment: "missing".into()
            })
        );
    }

    #[test]
    fn replace_converts_to_current_kind() {
        let mut target = bag(json!({"n": 7}));
        DynamicAdapter
            .replace(&mut target, "n", &R, &json!("42"))
            .unwrap();
        assert_eq!(target.to_value(), json!({"n": 42}));
        assert!(matches!(
            DynamicAdapter.replace(&mut target, "n", &R, &json!("abc")),
            Err(PatchError::InvalidValueForProperty { .. })
        ));
    }

    #[test]
    fn custom_name_resolver() {
        struct Prefixed;
        impl ContractResolver for Prefixed {
            fn resolve_dynamic_name(&self, segment: &str) -> String {
                format!("x_{segment}")
            }
        }
        let mut target = bag(json!({}));
        DynamicAdapter
            .add(&mut target, "name", &Prefixed, &json!(1))
            .unwrap();
        assert_eq!(target.to_value(), json!({"x_name": 1}));
        assert!(DynamicAdapter.get(&target, "name", &Prefixed).is_ok());
    }

    #[test]
    fn test_verb() {
        let target = bag(json!({"a": {"b": 2}}));
        DynamicAdapter
            .test(&target, "a", &R, &json!({"b": 2}))
            .unwrap();
        assert!(matches!(
            DynamicAdapter.test(&target, "a", &R, &json!({"b": 3})),
            Err(PatchError::ValueNotEqualToTestValue { .. })
        ));
    }

    #[test]
    fn traverse_missing_is_not_found() {
        let mut target = bag(json!({"a": {"b": 1}}));
        assert!(DynamicAdapter.traverse(&mut target, "a", &R).unwrap().is_some());
        assert!(DynamicAdapter.traverse(&mut target, "z", &R).unwrap().is_none());
    }
}
