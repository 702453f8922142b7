//! Adapter for structured objects with registered member contracts.

use std::sync::Arc;

use serde_json::Value;

use super::{shape_mismatch, Adapter};
use crate::contract::{ContractResolver, Member};
use crate::error::PatchError;
use crate::target::{StructuredValue, Target};

/// Addresses declared members through the type's [`StructuredContract`]
/// (case-insensitive lookup, readable/writable enforcement).
///
/// Structured members are declared, not removable: `remove` resets the
/// member to its declared kind's default instead of deleting it.
///
/// [`StructuredContract`]: crate::contract::StructuredContract
pub struct StructuredAdapter;

fn as_structured<'a>(target: &'a Target, segment: &str) -> Result<&'a StructuredValue, PatchError> {
    match target {
        Target::Structured(s) => Ok(s),
        _ => Err(shape_mismatch(segment)),
    }
}

fn as_structured_mut<'a>(
    target: &'a mut Target,
    segment: &str,
) -> Result<&'a mut StructuredValue, PatchError> {
    match target {
        Target::Structured(s) => Ok(s),
        _ => Err(shape_mismatch(segment)),
    }
}

/// Resolve the segment to an owned copy of the member descriptor, so the
/// caller can mutate the value while holding it.
fn resolve_member(value: &StructuredValue, segment: &str) -> Result<Member, PatchError> {
    let contract = Arc::clone(value.contract());
    contract
        .member(segment)
        .cloned()
        .ok_or_else(|| PatchError::SegmentNotFound {
            segment: segment.to_string(),
        })
}

fn writable(member: &Member, segment: &str) -> Result<(), PatchError> {
    if member.writable {
        Ok(())
    } else {
        Err(PatchError::CannotUpdateProperty {
            segment: segment.to_string(),
        })
    }
}

fn readable(member: &Member, segment: &str) -> Result<(), PatchError> {
    if member.readable {
        Ok(())
    } else {
        Err(PatchError::CannotReadProperty {
            segment: segment.to_string(),
        })
    }
}

impl Adapter for StructuredAdapter {
    fn add(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        // Add on a member that already holds a value overwrites it
        self.replace_member(target, segment, resolver, value)
    }

    fn get(
        &self,
        target: &Target,
        segment: &str,
        _resolver: &dyn ContractResolver,
    ) -> Result<Target, PatchError> {
        let structured = as_structured(target, segment)?;
        let member = resolve_member(structured, segment)?;
        readable(&member, segment)?;
        Ok(structured
            .field(&member.name)
            .cloned()
            .unwrap_or_else(|| member.kind.default_value()))
    }

    fn remove(
        &self,
        target: &mut Target,
        segment: &str,
        _resolver: &dyn ContractResolver,
    ) -> Result<(), PatchError> {
        let structured = as_structured_mut(target, segment)?;
        let member = resolve_member(structured, segment)?;
        writable(&member, segment)?;
        structured.set_field(&member.name, member.kind.default_value());
        Ok(())
    }

    fn replace(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        self.replace_member(target, segment, resolver, value)
    }

    fn test(
        &self,
        target: &Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let structured = as_structured(target, segment)?;
        let member = resolve_member(structured, segment)?;
        readable(&member, segment)?;
        let expected = resolver.convert(value, &member.kind)?;
        let default = member.kind.default_value();
        let current = structured.field(&member.name).unwrap_or(&default);
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
        let structured = as_structured_mut(target, segment)?;
        let member = match resolve_member(structured, segment) {
            Ok(member) => member,
            Err(_) => return Ok(None),
        };
        Ok(structured.field_mut(&member.name))
    }
}

impl StructuredAdapter {
    fn replace_member(
        &self,
        target: &mut Target,
        segment: &str,
        resolver: &dyn ContractResolver,
        value: &Value,
    ) -> Result<(), PatchError> {
        let structured = as_structured_mut(target, segment)?;
        let member = resolve_member(structured, segment)?;
        writable(&member, segment)?;
        let converted = resolver.convert(value, &member.kind)?;
        structured.set_field(&member.name, converted);
        Ok(())
    }
}
