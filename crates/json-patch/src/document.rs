//! Patch documents: ordered operation sequences and their dispatcher.
//!
//! A [`PatchDocument`] is built with the fluent verb methods (paths are
//! normalized to leading-slash form) or decoded from JSON, then applied
//! to a [`Target`] in order. Application halts at the first failing
//! operation; earlier operations remain applied and later ones never run.
//! There is no transactional rollback.

use serde_json::Value;

use json_patch_pointer::{normalize_path, ParsedPath};

use crate::contract::ContractResolver;
use crate::error::{JsonPatchError, PatchError};
use crate::operation::{OpKind, Operation};
use crate::target::{Target, MAX_DEPTH};
use crate::visitor::visit;

/// An ordered sequence of patch operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchDocument {
    operations: Vec<Operation>,
}

impl PatchDocument {
    pub fn new() -> Self {
        PatchDocument::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Append an already-constructed operation without path normalization.
    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    // ── Builder verbs ────────────────────────────────────────────────

    pub fn add(mut self, path: &str, value: Value) -> Self {
        self.operations.push(Operation::add(normalize_path(path), value));
        self
    }

    pub fn remove(mut self, path: &str) -> Self {
        self.operations.push(Operation::remove(normalize_path(path)));
        self
    }

    pub fn replace(mut self, path: &str, value: Value) -> Self {
        self.operations
            .push(Operation::replace(normalize_path(path), value));
        self
    }

    pub fn move_value(mut self, from: &str, path: &str) -> Self {
        self.operations
            .push(Operation::move_value(normalize_path(from), normalize_path(path)));
        self
    }

    pub fn copy(mut self, from: &str, path: &str) -> Self {
        self.operations
            .push(Operation::copy(normalize_path(from), normalize_path(path)));
        self
    }

    pub fn test(mut self, path: &str, value: Value) -> Self {
        self.operations.push(Operation::test(normalize_path(path), value));
        self
    }

    // ── Application ──────────────────────────────────────────────────

    /// Apply every operation in order, stopping at the first failure.
    pub fn apply_to(
        &self,
        target: &mut Target,
        resolver: &dyn ContractResolver,
    ) -> Result<(), JsonPatchError> {
        for operation in &self.operations {
            if let Err(error) = apply_operation(operation, target, resolver) {
                return Err(JsonPatchError::new(target.clone(), operation.clone(), error));
            }
        }
        Ok(())
    }

    /// Apply every operation in order; on the first failure, deliver the
    /// error to `sink` and stop instead of returning it.
    pub fn apply_to_with_sink(
        &self,
        target: &mut Target,
        resolver: &dyn ContractResolver,
        mut sink: impl FnMut(JsonPatchError),
    ) {
        for operation in &self.operations {
            if let Err(error) = apply_operation(operation, target, resolver) {
                sink(JsonPatchError::new(target.clone(), operation.clone(), error));
                return;
            }
        }
    }
}

fn parse_path(path: &str) -> Result<ParsedPath, PatchError> {
    let parsed = ParsedPath::parse(path).map_err(|_| PatchError::InvalidPath)?;
    // Whole-document operations have no containing adapter to dispatch to.
    if parsed.is_root() {
        return Err(PatchError::TargetLocationNotFound {
            path: path.to_string(),
        });
    }
    Ok(parsed)
}

fn missing_field(operation: &Operation) -> PatchError {
    PatchError::CannotPerformOperation {
        op: operation.kind.as_str().to_string(),
        path: operation.path.clone(),
    }
}

fn required_value(operation: &Operation) -> Result<&Value, PatchError> {
    operation.value.as_ref().ok_or_else(|| missing_field(operation))
}

fn required_from(operation: &Operation) -> Result<&str, PatchError> {
    operation.from.as_deref().ok_or_else(|| missing_field(operation))
}

/// Dispatch one operation against the target.
fn apply_operation(
    operation: &Operation,
    target: &mut Target,
    resolver: &dyn ContractResolver,
) -> Result<(), PatchError> {
    match operation.kind {
        OpKind::Add => {
            let value = required_value(operation)?;
            add_at(&operation.path, value, target, resolver)
        }
        OpKind::Remove => remove_at(&operation.path, target, resolver),
        OpKind::Replace => {
            let value = required_value(operation)?;
            let path = parse_path(&operation.path)?;
            let (container, adapter) = visit(target, &path, resolver)?;
            adapter.replace(container, path.last_segment().unwrap_or(""), resolver, value)
        }
        OpKind::Test => {
            let value = required_value(operation)?;
            let path = parse_path(&operation.path)?;
            let (container, adapter) = visit(target, &path, resolver)?;
            adapter.test(container, path.last_segment().unwrap_or(""), resolver, value)
        }
        OpKind::Move => {
            let from = required_from(operation)?;
            let moved = get_at(from, target, resolver)?;
            remove_at(from, target, resolver)?;
            add_at(&operation.path, &moved.to_value(), target, resolver)
        }
        OpKind::Copy => {
            let from = required_from(operation)?;
            let source = get_at(from, target, resolver)?;
            let cloned = source
                .deep_clone(MAX_DEPTH)
                .ok_or_else(|| PatchError::CannotCopyProperty {
                    from: from.to_string(),
                })?;
            add_at(&operation.path, &cloned.to_value(), target, resolver)
        }
    }
}

fn add_at(
    path: &str,
    value: &Value,
    target: &mut Target,
    resolver: &dyn ContractResolver,
) -> Result<(), PatchError> {
    let path = parse_path(path)?;
    let (container, adapter) = visit(target, &path, resolver)?;
    adapter.add(container, path.last_segment().unwrap_or(""), resolver, value)
}

fn remove_at(
    path: &str,
    target: &mut Target,
    resolver: &dyn ContractResolver,
) -> Result<(), PatchError> {
    let path = parse_path(path)?;
    let (container, adapter) = visit(target, &path, resolver)?;
    adapter.remove(container, path.last_segment().unwrap_or(""), resolver)
}

fn get_at(
    path: &str,
    target: &mut Target,
    resolver: &dyn ContractResolver,
) -> Result<Target, PatchError> {
    let path = parse_path(path)?;
    let (container, adapter) = visit(target, &path, resolver)?;
    adapter.get(container, path.last_segment().unwrap_or(""), resolver)
}
