//! Contracts: the shape-descriptor collaborators of the engine.
//!
//! A [`StructuredContract`] is an explicit, per-type registration of
//! addressable members (name, declared kind, readable/writable flags),
//! built once and shared via `Arc`. A [`ContractResolver`] supplies the
//! pluggable name/key resolution and value-conversion policy; the engine
//! treats both purely as capabilities.

use std::sync::Arc;

use serde_json::Value;

use crate::error::PatchError;
use crate::target::{
    DynamicValue, Kind, KeyKind, ListValue, MapKey, MapValue, StructuredValue, Target, MAX_DEPTH,
};

// ── Structured contracts ──────────────────────────────────────────────────

/// One addressable member of a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: Kind,
    pub readable: bool,
    pub writable: bool,
}

/// The registered member set of one structured type.
///
/// Member lookup by path segment is case-insensitive.
#[derive(Debug, PartialEq)]
pub struct StructuredContract {
    name: String,
    members: Vec<Member>,
}

impl StructuredContract {
    pub fn builder(name: impl Into<String>) -> StructuredContractBuilder {
        StructuredContractBuilder {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// The registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Case-insensitive member lookup by path segment.
    pub fn member(&self, segment: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(segment))
    }

    /// Instantiate a value of this type with every member defaulted.
    pub fn instantiate(self: &Arc<Self>) -> Target {
        Target::Structured(StructuredValue::new(self.clone()))
    }
}

/// Builder for [`StructuredContract`].
pub struct StructuredContractBuilder {
    name: String,
    members: Vec<Member>,
}

impl StructuredContractBuilder {
    /// Register a readable, writable member.
    pub fn member(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind,
            readable: true,
            writable: true,
        });
        self
    }

    /// Register a member that can be read but not written.
    pub fn read_only(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind,
            readable: true,
            writable: false,
        });
        self
    }

    /// Register a member that can be written but not read back.
    pub fn write_only(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind,
            readable: false,
            writable: true,
        });
        self
    }

    pub fn build(self) -> Arc<StructuredContract> {
        Arc::new(StructuredContract {
            name: self.name,
            members: self.members,
        })
    }
}

// ── Contract resolver ─────────────────────────────────────────────────────

/// Pluggable resolution policy consumed by the adapters.
///
/// The default methods implement the engine's standard behavior; custom
/// resolvers override only what they need (a naming strategy, a stricter
/// conversion, a different key codec).
pub trait ContractResolver {
    /// Convert a path segment into a map key of the given kind.
    fn resolve_map_key(&self, kind: KeyKind, segment: &str) -> Result<MapKey, PatchError> {
        match kind {
            KeyKind::Str => Ok(MapKey::Str(segment.to_string())),
            KeyKind::Int => segment
                .parse::<i64>()
                .map(MapKey::Int)
                .map_err(|_| PatchError::InvalidPathSegment {
                    segment: segment.to_string(),
                }),
        }
    }

    /// Map a path segment to a dynamic member name. Defaults to the
    /// segment itself.
    fn resolve_dynamic_name(&self, segment: &str) -> String {
        segment.to_string()
    }

    /// Convert a payload value to the declared kind.
    fn convert(&self, value: &Value, kind: &Kind) -> Result<Target, PatchError> {
        convert_value(value, kind, MAX_DEPTH)
    }
}

/// The stock resolver: identity naming, standard key and value conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContractResolver;

impl ContractResolver for DefaultContractResolver {}

// ── Value conversion ──────────────────────────────────────────────────────

fn invalid(value: &Value) -> PatchError {
    PatchError::InvalidValueForProperty {
        value: value.to_string(),
    }
}

/// Convert a JSON payload to a [`Target`] of the declared kind.
///
/// Conversion is lenient where the original serializer round-trip was:
/// numeric strings convert to `Int`/`Float`, and integral floats to `Int`.
/// Recursion is bounded by `depth`; exceeding it is a conversion failure.
pub fn convert_value(value: &Value, kind: &Kind, depth: usize) -> Result<Target, PatchError> {
    if depth == 0 {
        return Err(invalid(value));
    }
    match kind {
        Kind::Any => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(convert_value(item, &Kind::Any, depth - 1)?);
                }
                Ok(Target::List(ListValue::with_items(Kind::Any, out)))
            }
            Value::Object(map) => {
                let mut out = DynamicValue::new();
                for (name, item) in map {
                    out.entries
                        .insert(name.clone(), convert_value(item, &Kind::Any, depth - 1)?);
                }
                Ok(Target::Dynamic(out))
            }
            scalar => Ok(Target::Scalar(scalar.clone())),
        },
        Kind::Bool => match value {
            Value::Bool(_) => Ok(Target::Scalar(value.clone())),
            _ => Err(invalid(value)),
        },
        Kind::Int => match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Target::Scalar(Value::from(i)))
                } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                    Ok(Target::Scalar(Value::from(f as i64)))
                } else {
                    Err(invalid(value))
                }
            }
            Value::String(s) => s
                .parse::<i64>()
                .map(|i| Target::Scalar(Value::from(i)))
                .map_err(|_| invalid(value)),
            _ => Err(invalid(value)),
        },
        Kind::Float => match value {
            Value::Number(n) => n
                .as_f64()
                .map(|f| Target::Scalar(Value::from(f)))
                .ok_or_else(|| invalid(value)),
            Value::String(s) => s
                .parse::<f64>()
                .map(|f| Target::Scalar(Value::from(f)))
                .map_err(|_| invalid(value)),
            _ => Err(invalid(value)),
        },
        Kind::String => match value {
            Value::String(_) => Ok(Target::Scalar(value.clone())),
            Value::Null => Ok(Target::null()),
            _ => Err(invalid(value)),
        },
        Kind::List(elem) => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(convert_value(item, elem, depth - 1)?);
                }
                Ok(Target::List(ListValue::with_items((**elem).clone(), out)))
            }
            Value::Null => Ok(Target::null()),
            _ => Err(invalid(value)),
        },
        Kind::Map(key_kind, value_kind) => match value {
            Value::Object(map) => {
                let mut out = MapValue::new(*key_kind, (**value_kind).clone());
                for (name, item) in map {
                    let key = match key_kind {
                        KeyKind::Str => MapKey::Str(name.clone()),
                        KeyKind::Int => {
                            MapKey::Int(name.parse::<i64>().map_err(|_| invalid(value))?)
                        }
                    };
                    out.entries
                        .insert(key, convert_value(item, value_kind, depth - 1)?);
                }
                Ok(Target::Map(out))
            }
            Value::Null => Ok(Target::null()),
            _ => Err(invalid(value)),
        },
        Kind::Structured(contract) => match value {
            Value::Object(map) => {
                let mut out = StructuredValue::new(contract.clone());
                for (name, item) in map {
                    // Unknown keys are ignored, as a tolerant deserializer would
                    if let Some(member) = contract.member(name) {
                        let converted = convert_value(item, &member.kind, depth - 1)?;
                        out.set_field(&member.name, converted);
                    }
                }
                Ok(Target::Structured(out))
            }
            Value::Null => Ok(Target::null()),
            _ => Err(invalid(value)),
        },
        Kind::Dynamic => match value {
            Value::Object(map) => {
                let mut out = DynamicValue::new();
                for (name, item) in map {
                    out.entries
                        .insert(name.clone(), convert_value(item, &Kind::Any, depth - 1)?);
                }
                Ok(Target::Dynamic(out))
            }
            Value::Null => Ok(Target::null()),
            _ => Err(invalid(value)),
        },
    }
}
