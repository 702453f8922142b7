//! Patch operations: the six RFC 6902 verbs and their invariants.

use serde_json::Value;

use crate::error::PatchError;

/// The closed set of operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Remove => "remove",
            OpKind::Replace => "replace",
            OpKind::Move => "move",
            OpKind::Copy => "copy",
            OpKind::Test => "test",
        }
    }

    /// Parse a textual kind, case-insensitively. An unrecognized kind is
    /// a construction-time error.
    pub fn parse(op: &str) -> Result<OpKind, PatchError> {
        match op.to_ascii_lowercase().as_str() {
            "add" => Ok(OpKind::Add),
            "remove" => Ok(OpKind::Remove),
            "replace" => Ok(OpKind::Replace),
            "move" => Ok(OpKind::Move),
            "copy" => Ok(OpKind::Copy),
            "test" => Ok(OpKind::Test),
            _ => Err(PatchError::InvalidOp { op: op.to_string() }),
        }
    }
}

/// One patch step: a kind, a target path, an optional source path
/// (`from`, move/copy only), and an optional value payload (add/replace/
/// test only).
///
/// Field requirements are enforced at construction; a built `Operation`
/// always satisfies its kind's invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<Value>,
}

impl Operation {
    /// Generic constructor validating the per-kind field requirements:
    /// `from` for move/copy, `value` for add/replace/test.
    pub fn new(
        kind: OpKind,
        path: String,
        from: Option<String>,
        value: Option<Value>,
    ) -> Result<Operation, PatchError> {
        match kind {
            OpKind::Move | OpKind::Copy if from.is_none() => Err(PatchError::InvalidDocument(
                format!("'{}' operation requires 'from'", kind.as_str()),
            )),
            OpKind::Add | OpKind::Replace | OpKind::Test if value.is_none() => {
                Err(PatchError::InvalidDocument(format!(
                    "'{}' operation requires 'value'",
                    kind.as_str()
                )))
            }
            _ => Ok(Operation {
                kind,
                path,
                from,
                value,
            }),
        }
    }

    pub fn add(path: impl Into<String>, value: Value) -> Operation {
        Operation {
            kind: OpKind::Add,
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Operation {
        Operation {
            kind: OpKind::Remove,
            path: path.into(),
            from: None,
            value: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Operation {
        Operation {
            kind: OpKind::Replace,
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }

    pub fn move_value(from: impl Into<String>, path: impl Into<String>) -> Operation {
        Operation {
            kind: OpKind::Move,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    pub fn copy(from: impl Into<String>, path: impl Into<String>) -> Operation {
        Operation {
            kind: OpKind::Copy,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    pub fn test(path: impl Into<String>, value: Value) -> Operation {
        Operation {
            kind: OpKind::Test,
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(OpKind::parse("add").unwrap(), OpKind::Add);
        assert_eq!(OpKind::parse("Move").unwrap(), OpKind::Move);
        assert_eq!(OpKind::parse("TEST").unwrap(), OpKind::Test);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            OpKind::parse("patch"),
            Err(PatchError::InvalidOp { op: "patch".into() })
        );
    }

    #[test]
    fn move_requires_from() {
        assert!(Operation::new(OpKind::Move, "/a".into(), None, None).is_err());
        assert!(Operation::new(OpKind::Move, "/a".into(), Some("/b".into()), None).is_ok());
    }

    #[test]
    fn add_requires_value() {
        assert!(Operation::new(OpKind::Add, "/a".into(), None, None).is_err());
        assert!(Operation::new(OpKind::Add, "/a".into(), None, Some(json!(1))).is_ok());
    }

    #[test]
    fn remove_requires_nothing_extra() {
        assert!(Operation::new(OpKind::Remove, "/a".into(), None, None).is_ok());
    }
}
