//! Adapter for keyed maps with declared key and value kinds.

use serde_json::Value;

use super::{shape_mismatch, Adapter};
use crate::contract::ContractResolver;
use crate::error::PatchError;
use crate::target::{Kind, MapKey, MapValue, Target};

/// Addresses entries by key, converting the path segment through the
/// contract's key resolver.
///
/// Per RFC 6902, `add` on an existing key replaces the entry; the other
/// verbs require the key to exist.
pub struct MapAdapter;

fn as_map<'a>(target: &'a Target, segment: &str) -> Result<&'a MapValue, PatchError> {
    match target {
        Target::Map(map) => Ok(map),
        _ => Err(shape_mismatch(segment)),
    }
}

fn as_map_mut<'a>(target: &'a mut Target, segment: &str) -> Result<&'a mut MapValue, PatchError> {
    match target {
        Target::Map(map) => Ok(map),
        _ => Err(shape_mismatch(segment)),
    }
}

fn missing(segment: &str) -> PatchError {
    PatchError::SegmentNotFound {
        segment: segment.to_string(),
    }
}

/// Convert a payload for an entry. When the declared value kind is `Any`
/// and the entry already holds a value, conversion is guided by that
/// value's runtime kind, so a narrower textual payload still lands on the
/// existing concrete type; on failure the payload converts as `Any`.
fn convert_for_entry(
    map: &MapValue,
    key: &MapKey,
    resolver: &dyn ContractResolver,
    value: &Value,
) -> Result<Target, PatchError> {
    if map.value == Kind::Any {
        if let Some(existing) = map.entries.get(key) {
            let guided = existing.kind();
            if guided != Kind::Any {
                if let Ok(converted) = resolver.convert(value, &guided) {
                    return Ok(converted);
                }
            }
        }
    }
    resolver.convert(value, &map.value)
}

impl Adapter for MapAdapter {
    fn add(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let map = as_map_mut(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        // Add over an existing key replaces the entry
        let converted = convert_for_entry(map, &key, resolver, value)?;
        map.entries.insert(key, converted);
        Ok(())
    }

    fn get(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<Target, PatchError> {
        let map = as_map(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        map.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| missing(segment))
    }

    fn remove(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
    ) -> Result<(), PatchError> {
        let map = as_map_mut(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        // Entries are removable outright, unlike structured members
        map.entries
            .shift_remove(&key)
            .map(|_| ())
            .ok_or_else(|| missing(segment))
    }

    fn replace(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let map = as_map_mut(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        if !map.entries.contains_key(&key) {
            return Err(missing(segment));
        }
        let converted = convert_for_entry(map, &key, resolver, value)?;
        map.entries.insert(key, converted);
        Ok(())
    }

    fn test(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let map = as_map(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        let current = map.entries.get(&key).ok_or_else(|| missing(segment))?;
        let expected = convert_for_entry(map, &key, resolver, value)?;
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
        let map = as_map_mut(target, segment)?;
        let key = resolver.resolve_map_key(map.key, segment)?;
        Ok(map.entries.get_mut(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DefaultContractResolver;
    use crate::target::KeyKind;
    use serde_json::json;

    const R: DefaultContractResolver = DefaultContractResolver;

    fn str_int_map(entries: &[(&str, i64)]) -> Target {
        let mut map = MapValue::new(KeyKind::Str, Kind::Int);
        for (k, v) in entries {
            map.entries
                .insert(MapKey::Str((*k).to_string()), Target::Scalar(json!(*v)));
        }
        Target::Map(map)
    }

    #[test]
    fn add_inserts_new_key() {
        let mut target = str_int_map(&[("one", 1)]);
        MapAdapter.add(&mut target, "two", &R, &json!(2)).unwrap();
        assert_eq!(target.to_value(), json!({"one": 1, "two": 2}));
    }

    #[test]
    fn add_over_existing_replaces() {
        let mut target = str_int_map(&[("one", 1)]);
        MapAdapter.add(&mut target, "one", &R, &json!(99)).unwrap();
        assert_eq!(target.to_value(), json!({"one": 99}));
    }

    #[test]
    fn replace_requires_existing_key() {
        let mut target = str_int_map(&[("one", 1)]);
        MapAdapter
            .replace(&mut target, "one", &R, &json!(99))
            .unwrap();
        assert_eq!(target.to_value(), json!({"one": 99}));
        assert_eq!(
            MapAdapter.replace(&mut target, "two", &R, &json!(2)),
            Err(PatchError::SegmentNotFound {
                segment: "two".into()
            })
        );
    }

    #[test]
    fn remove_deletes_entry() {
        let mut target = str_int_map(&[("one", 1), ("two", 2)]);
        MapAdapter.remove(&mut target, "one", &R).unwrap();
        assert_eq!(target.to_value(), json!({"two": 2}));
        assert_eq!(
            MapAdapter.remove(&mut target, "one", &R),
            Err(PatchError::SegmentNotFound {
                segment: "one".into()
            })
        );
    }

    #[test]
    fn int_keys_resolve_through_contract() {
        let mut map = MapValue::new(KeyKind::Int, Kind::String);
        map.entries
            .insert(MapKey::Int(5), Target::Scalar(json!("five")));
        let mut target = Target::Map(map);

        let got = MapAdapter.get(&target, "5", &R).unwrap();
        assert_eq!(got, Target::Scalar(json!("five")));

        assert_eq!(
            MapAdapter.get(&target, "five", &R),
            Err(PatchError::InvalidPathSegment {
                segment: "five".into()
            })
        );

        MapAdapter.add(&mut target, "6", &R, &json!("six")).unwrap();
        assert_eq!(target.to_value(), json!({"5": "five", "6": "six"}));
    }

    #[test]
    fn add_guided_by_existing_runtime_kind() {
        // Any-valued map: a textual payload lands on the existing entry's
        // concrete kind
        let mut map = MapValue::new(KeyKind::Str, Kind::Any);
        map.entries
            .insert(MapKey::Str("n".into()), Target::Scalar(json!(1)));
        let mut target = Target::Map(map);
        MapAdapter.add(&mut target, "n", &R, &json!("42")).unwrap();
        assert_eq!(target.to_value(), json!({"n": 42}));
    }

    #[test]
    fn test_verb_mismatch() {
        let target = str_int_map(&[("one", 1)]);
        MapAdapter.test(&target, "one", &R, &json!(1)).unwrap();
        assert!(matches!(
            MapAdapter.test(&target, "one", &R, &json!(2)),
            Err(PatchError::ValueNotEqualToTestValue { .. })
        ));
        assert_eq!(
            MapAdapter.test(&target, "two", &R, &json!(1)),
            Err(PatchError::SegmentNotFound {
                segment: "two".into()
            })
        );
    }

    #[test]
    fn traverse_missing_key_is_not_found() {
        let mut target = str_int_map(&[("one", 1)]);
        assert!(MapAdapter.traverse(&mut target, "one", &R).unwrap().is_some());
        assert!(MapAdapter.traverse(&mut target, "two", &R).unwrap().is_none());
    }
}
