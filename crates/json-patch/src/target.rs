//! The patchable target data model.
//!
//! Patch operations mutate a [`Target`]: a closed sum type over the four
//! container shapes the engine knows how to address (ordered list, keyed
//! map, structured object, dynamic object) plus scalar leaves. Adapter
//! selection is a match over the variant tag; a path may cross between
//! shapes freely (a list element may be a map, and so on).
//!
//! Scalar leaves hold `serde_json::Value` but never `Value::Array` or
//! `Value::Object`; containers always use the dedicated variants.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::contract::StructuredContract;

/// Maximum nesting depth for value conversion and deep cloning.
///
/// Guards against unbounded recursion on pathological payloads or cyclic
/// construction mistakes.
pub const MAX_DEPTH: usize = 64;

// ── Kinds ─────────────────────────────────────────────────────────────────

/// Key type of a [`MapValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Str,
    Int,
}

/// A map key, converted from a path segment by the contract's key resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Str(String),
    Int(i64),
}

impl MapKey {
    /// Render the key back into path-segment form.
    pub fn to_segment(&self) -> String {
        match self {
            MapKey::Str(s) => s.clone(),
            MapKey::Int(i) => i.to_string(),
        }
    }
}

/// Declared type of a member, list element, or map value.
///
/// `Any` places no constraint: conversion infers the shape from the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Any,
    Bool,
    Int,
    Float,
    String,
    List(Box<Kind>),
    Map(KeyKind, Box<Kind>),
    Structured(Arc<StructuredContract>),
    Dynamic,
}

impl Kind {
    /// The value a structured or dynamic member resets to on `remove`:
    /// zero/empty for value-like kinds, null for reference-like kinds.
    pub fn default_value(&self) -> Target {
        match self {
            Kind::Bool => Target::Scalar(Value::Bool(false)),
            Kind::Int => Target::Scalar(Value::from(0i64)),
            Kind::Float => Target::Scalar(Value::from(0.0f64)),
            _ => Target::Scalar(Value::Null),
        }
    }
}

// ── Container values ──────────────────────────────────────────────────────

/// An ordered, index-addressable sequence with a declared element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    pub elem: Kind,
    pub items: Vec<Target>,
    /// Fixed-size sequences cannot grow or shrink; `add` and `remove`
    /// against them are rejected as a fundamental precondition.
    pub fixed: bool,
}

impl ListValue {
    pub fn new(elem: Kind) -> Self {
        ListValue {
            elem,
            items: Vec::new(),
            fixed: false,
        }
    }

    pub fn with_items(elem: Kind, items: Vec<Target>) -> Self {
        ListValue {
            elem,
            items,
            fixed: false,
        }
    }

    pub fn fixed(elem: Kind, items: Vec<Target>) -> Self {
        ListValue {
            elem,
            items,
            fixed: true,
        }
    }
}

/// A keyed map with declared key and value kinds. Entries keep insertion
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapValue {
    pub key: KeyKind,
    pub value: Kind,
    pub entries: IndexMap<MapKey, Target>,
}

impl MapValue {
    pub fn new(key: KeyKind, value: Kind) -> Self {
        MapValue {
            key,
            value,
            entries: IndexMap::new(),
        }
    }
}

/// A structured object: storage bound to a per-type member contract.
///
/// Fields are keyed by the member's canonical (declared) name; every
/// declared member is always present, initialized to its kind's default.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredValue {
    contract: Arc<StructuredContract>,
    fields: IndexMap<String, Target>,
}

impl StructuredValue {
    /// Create an instance with every member set to its default.
    pub fn new(contract: Arc<StructuredContract>) -> Self {
        let mut fields = IndexMap::new();
        for member in contract.members() {
            fields.insert(member.name.clone(), member.kind.default_value());
        }
        StructuredValue { contract, fields }
    }

    pub fn contract(&self) -> &Arc<StructuredContract> {
        &self.contract
    }

    /// Look up a field by canonical member name.
    pub fn field(&self, name: &str) -> Option<&Target> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Target> {
        self.fields.get_mut(name)
    }

    /// Overwrite a field. The name must be a canonical member name.
    pub fn set_field(&mut self, name: &str, value: Target) {
        self.fields.insert(name.to_string(), value);
    }
}

/// An open-ended property bag addressed by runtime member names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicValue {
    pub entries: IndexMap<String, Target>,
}

impl DynamicValue {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Target ────────────────────────────────────────────────────────────────

/// A patchable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Scalar(Value),
    List(ListValue),
    Map(MapValue),
    Structured(StructuredValue),
    Dynamic(DynamicValue),
}

impl Target {
    /// The null scalar.
    pub fn null() -> Target {
        Target::Scalar(Value::Null)
    }

    /// Convert an arbitrary JSON value into a target with no declared
    /// kind constraints: objects become dynamic property bags, arrays
    /// become `Any`-element lists.
    pub fn from_value(value: &Value) -> Result<Target, crate::error::PatchError> {
        crate::contract::convert_value(value, &Kind::Any, MAX_DEPTH)
    }

    /// The runtime kind of this value, used to guide conversion when the
    /// declared kind is `Any`.
    pub fn kind(&self) -> Kind {
        match self {
            Target::Scalar(v) => match v {
                Value::Bool(_) => Kind::Bool,
                Value::Number(n) if n.is_i64() || n.is_u64() => Kind::Int,
                Value::Number(_) => Kind::Float,
                Value::String(_) => Kind::String,
                _ => Kind::Any,
            },
            Target::List(l) => Kind::List(Box::new(l.elem.clone())),
            Target::Map(m) => Kind::Map(m.key, Box::new(m.value.clone())),
            Target::Structured(s) => Kind::Structured(s.contract.clone()),
            Target::Dynamic(_) => Kind::Dynamic,
        }
    }

    /// Serialize back into a plain JSON value. Map keys are rendered in
    /// segment form; structured fields appear under their canonical names
    /// in declaration order.
    pub fn to_value(&self) -> Value {
        match self {
            Target::Scalar(v) => v.clone(),
            Target::List(l) => Value::Array(l.items.iter().map(Target::to_value).collect()),
            Target::Map(m) => {
                let mut out = serde_json::Map::new();
                for (key, value) in &m.entries {
                    out.insert(key.to_segment(), value.to_value());
                }
                Value::Object(out)
            }
            Target::Structured(s) => {
                let mut out = serde_json::Map::new();
                for member in s.contract().members() {
                    if let Some(field) = s.field(&member.name) {
                        out.insert(member.name.clone(), field.to_value());
                    }
                }
                Value::Object(out)
            }
            Target::Dynamic(d) => {
                let mut out = serde_json::Map::new();
                for (name, value) in &d.entries {
                    out.insert(name.clone(), value.to_value());
                }
                Value::Object(out)
            }
        }
    }

    /// Structural deep clone: element-wise for lists, entry-wise for maps
    /// and dynamic bags, member-wise for structured objects.
    ///
    /// Returns `None` when the structure is deeper than `max_depth`.
    pub fn deep_clone(&self, max_depth: usize) -> Option<Target> {
        if max_depth == 0 {
            return None;
        }
        Some(match self {
            Target::Scalar(v) => Target::Scalar(v.clone()),
            Target::List(l) => {
                let mut items = Vec::with_capacity(l.items.len());
                for item in &l.items {
                    items.push(item.deep_clone(max_depth - 1)?);
                }
                Target::List(ListValue {
                    elem: l.elem.clone(),
                    items,
                    fixed: l.fixed,
                })
            }
            Target::Map(m) => {
                let mut entries = IndexMap::with_capacity(m.entries.len());
                for (key, value) in &m.entries {
                    entries.insert(key.clone(), value.deep_clone(max_depth - 1)?);
                }
                Target::Map(MapValue {
                    key: m.key,
                    value: m.value.clone(),
                    entries,
                })
            }
            Target::Structured(s) => {
                let mut fields = IndexMap::with_capacity(s.fields.len());
                for (name, value) in &s.fields {
                    fields.insert(name.clone(), value.deep_clone(max_depth - 1)?);
                }
                Target::Structured(StructuredValue {
                    contract: s.contract.clone(),
                    fields,
                })
            }
            Target::Dynamic(d) => {
                let mut entries = IndexMap::with_capacity(d.entries.len());
                for (name, value) in &d.entries {
                    entries.insert(name.clone(), value.deep_clone(max_depth - 1)?);
                }
                Target::Dynamic(DynamicValue { entries })
            }
        })
    }
}
