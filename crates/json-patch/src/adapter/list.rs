//! Adapter for ordered, index-addressable sequences.

use json_patch_pointer::is_valid_index;
use serde_json::Value;

use super::{shape_mismatch, Adapter};
use crate::contract::ContractResolver;
use crate::error::PatchError;
use crate::target::{ListValue, Target};

/// Addresses elements by non-negative decimal index or the append marker
/// `-`.
///
/// `add` accepts indices `0..=len` (inserting at `len` appends) and `-`
/// as append. `replace` and `remove` accept `0..len`, with `-` addressing
/// the last element. `get` and `test` accept only concrete indices.
/// Fixed-size sequences reject `add` and `remove` outright.
pub struct ListAdapter;

fn parse_index(segment: &str) -> Result<usize, PatchError> {
    if !is_valid_index(segment) {
        return Err(PatchError::InvalidIndexValue {
            segment: segment.to_string(),
        });
    }
    segment
        .parse::<usize>()
        .map_err(|_| PatchError::InvalidIndexValue {
            segment: segment.to_string(),
        })
}

fn out_of_bounds(segment: &str) -> PatchError {
    PatchError::IndexOutOfBounds {
        segment: segment.to_string(),
    }
}

fn as_list<'a>(target: &'a Target, segment: &str) -> Result<&'a ListValue, PatchError> {
    match target {
        Target::List(list) => Ok(list),
        _ => Err(shape_mismatch(segment)),
    }
}

fn as_list_mut<'a>(target: &'a mut Target, segment: &str) -> Result<&'a mut ListValue, PatchError> {
    match target {
        Target::List(list) => Ok(list),
        _ => Err(shape_mismatch(segment)),
    }
}

/// Resolve a segment to an existing element index; `-` means the last
/// element when `allow_end` is set.
fn existing_index(list: &ListValue, segment: &str, allow_end: bool) -> Result<usize, PatchError> {
    if segment == "-" {
        if !allow_end || list.items.is_empty() {
            return Err(if allow_end {
                out_of_bounds(segment)
            } else {
                PatchError::InvalidIndexValue {
                    segment: segment.to_string(),
                }
            });
        }
        return Ok(list.items.len() - 1);
    }
    let index = parse_index(segment)?;
    if index >= list.items.len() {
        return Err(out_of_bounds(segment));
    }
    Ok(index)
}

impl Adapter for ListAdapter {
    fn add(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let list = as_list_mut(target, segment)?;
        if list.fixed {
            return Err(PatchError::PatchNotSupportedForFixedSizeList);
        }
        let converted = resolver.convert(value, &list.elem)?;
        if segment == "-" {
            list.items.push(converted);
            return Ok(());
        }
        let index = parse_index(segment)?;
        if index > list.items.len() {
            return Err(out_of_bounds(segment));
        }
        list.items.insert(index, converted);
        Ok(())
    }

    fn get(
        &self,
        target: &Target,
        segment: &str,
        _resolver: &dyn ContractResolver,
    ) -> Result<Target, PatchError> {
        let list = as_list(target, segment)?;
        let index = existing_index(list, segment, false)?;
        Ok(list.items[index].clone())
    }

    fn remove(
        &self,
        target: &mut Target,
        segment: &str,
        _resolver: &dyn ContractResolver,
    ) -> Result<(), PatchError> {
        let list = as_list_mut(target, segment)?;
        if list.fixed {
            return Err(PatchError::PatchNotSupportedForFixedSizeList);
        }
        let index = existing_index(list, segment, true)?;
        list.items.remove(index);
        Ok(())
    }

    fn replace(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let list = as_list_mut(target, segment)?;
        let index = existing_index(list, segment, true)?;
        let converted = resolver.convert(value, &list.elem)?;
        list.items[index] = converted;
        Ok(())
    }

    fn test(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let list = as_list(target, segment)?;
        let index = existing_index(list, segment, false)?;
        let current = &list.items[index];
        let expected = resolver.convert(value, &list.elem)?;
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
        _resolver: &dyn ContractResolver,
    ) -> Result<Option<&'a mut Target>, PatchError> {
        let list = as_list_mut(target, segment)?;
        // Traversal looks for a container to descend into; a bad or
        // out-of-range index is "not found" here, not an index error.
        if segment == "-" || !is_valid_index(segment) {
            return Ok(None);
        }
        let index = match segment.parse::<usize>() {
            Ok(i) => i,
            Err(_) => return Ok(None),
        };
        Ok(list.items.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DefaultContractResolver;
    use crate::target::Kind;
    use serde_json::json;

    fn int_list(values: &[i64]) -> Target {
        Target::List(ListValue::with_items(
            Kind::Int,
            values
                .iter()
                .map(|v| Target::Scalar(json!(*v)))
                .collect(),
        ))
    }

    const R: DefaultContractResolver = DefaultContractResolver;

    #[test]
    fn add_inserts_and_shifts() {
        let mut target = int_list(&[1, 2, 3]);
        ListAdapter.add(&mut target, "0", &R, &json!(4)).unwrap();
        assert_eq!(target.to_value(), json!([4, 1, 2, 3]));
    }

    #[test]
    fn add_at_length_appends() {
        let mut target = int_list(&[1, 2]);
        ListAdapter.add(&mut target, "2", &R, &json!(3)).unwrap();
        assert_eq!(target.to_value(), json!([1, 2, 3]));
    }

    #[test]
    fn add_append_marker() {
        let mut target = int_list(&[1, 2]);
        ListAdapter.add(&mut target, "-", &R, &json!(3)).unwrap();
        assert_eq!(target.to_value(), json!([1, 2, 3]));
    }

    #[test]
    fn add_past_length_is_out_of_bounds() {
        let mut target = int_list(&[1, 2]);
        assert_eq!(
            ListAdapter.add(&mut target, "3", &R, &json!(9)),
            Err(PatchError::IndexOutOfBounds {
                segment: "3".into()
            })
        );
    }

    #[test]
    fn negative_index_is_invalid() {
        let mut target = int_list(&[1, 2]);
        assert_eq!(
            ListAdapter.add(&mut target, "-1", &R, &json!(9)),
            Err(PatchError::InvalidIndexValue {
                segment: "-1".into()
            })
        );
        assert_eq!(
            ListAdapter.remove(&mut target, "-1", &R),
            Err(PatchError::InvalidIndexValue {
                segment: "-1".into()
            })
        );
    }

    #[test]
    fn add_converts_to_element_type() {
        let mut target = int_list(&[1]);
        ListAdapter.add(&mut target, "0", &R, &json!("7")).unwrap();
        assert_eq!(target.to_value(), json!([7, 1]));
        assert!(matches!(
            ListAdapter.add(&mut target, "0", &R, &json!("x")),
            Err(PatchError::InvalidValueForProperty { .. })
        ));
    }

    #[test]
    fn remove_at_index_and_end() {
        let mut target = int_list(&[1, 2, 3]);
        ListAdapter.remove(&mut target, "1", &R).unwrap();
        assert_eq!(target.to_value(), json!([1, 3]));
        ListAdapter.remove(&mut target, "-", &R).unwrap();
        assert_eq!(target.to_value(), json!([1]));
    }

    #[test]
    fn remove_out_of_bounds() {
        let mut target = int_list(&[1, 2]);
        assert_eq!(
            ListAdapter.remove(&mut target, "2", &R),
            Err(PatchError::IndexOutOfBounds {
                segment: "2".into()
            })
        );
    }

    #[test]
    fn replace_in_place_and_at_end() {
        let mut target = int_list(&[1, 2, 3]);
        ListAdapter.replace(&mut target, "0", &R, &json!(9)).unwrap();
        ListAdapter.replace(&mut target, "-", &R, &json!(8)).unwrap();
        assert_eq!(target.to_value(), json!([9, 2, 8]));
    }

    #[test]
    fn get_and_test_reject_append_marker() {
        let target = int_list(&[1, 2]);
        assert_eq!(
            ListAdapter.get(&target, "-", &R),
            Err(PatchError::InvalidIndexValue {
                segment: "-".into()
            })
        );
        assert_eq!(
            ListAdapter.test(&target, "-", &R, &json!(2)),
            Err(PatchError::InvalidIndexValue {
                segment: "-".into()
            })
        );
    }

    #[test]
    fn test_compares_converted_values() {
        let target = int_list(&[1, 2]);
        ListAdapter.test(&target, "1", &R, &json!(2)).unwrap();
        assert!(matches!(
            ListAdapter.test(&target, "1", &R, &json!(5)),
            Err(PatchError::ValueNotEqualToTestValue { .. })
        ));
    }

    #[test]
    fn fixed_lists_reject_resizing() {
        let mut target = Target::List(ListValue::fixed(
            Kind::Int,
            vec![Target::Scalar(json!(1)), Target::Scalar(json!(2))],
        ));
        assert_eq!(
            ListAdapter.add(&mut target, "-", &R, &json!(3)),
            Err(PatchError::PatchNotSupportedForFixedSizeList)
        );
        assert_eq!(
            ListAdapter.remove(&mut target, "0", &R),
            Err(PatchError::PatchNotSupportedForFixedSizeList)
        );
        // Replacement keeps the length and remains allowed
        ListAdapter.replace(&mut target, "0", &R, &json!(9)).unwrap();
        assert_eq!(target.to_value(), json!([9, 2]));
    }

    #[test]
    fn traverse_reports_missing_as_not_found() {
        let mut target = int_list(&[1]);
        assert_eq!(ListAdapter.traverse(&mut target, "5", &R).unwrap(), None);
        assert_eq!(ListAdapter.traverse(&mut target, "-", &R).unwrap(), None);
        assert_eq!(ListAdapter.traverse(&mut target, "x", &R).unwrap(), None);
        assert!(ListAdapter.traverse(&mut target, "0", &R).unwrap().is_some());
    }
}
