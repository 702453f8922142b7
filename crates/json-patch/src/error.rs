//! Error taxonomy and the error-reporting channel.
//!
//! Every adapter and traversal call returns `Result<_, PatchError>`; the
//! dispatcher is the single point that converts a failure into either a
//! returned [`JsonPatchError`] or a call to a caller-supplied sink. All
//! variants are "operation failed" outcomes distinguished by message, not
//! by differing control flow.

use thiserror::Error;

use crate::operation::Operation;
use crate::target::Target;

/// A failure while parsing, traversing, or applying a patch operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// Malformed path string (bad escape, too many segments).
    #[error("the provided path is invalid")]
    InvalidPath,
    /// Traversal could not resolve the location named by a full path.
    #[error("the target location specified by path '{path}' was not found")]
    TargetLocationNotFound { path: String },
    /// A single segment could not be resolved against its container.
    #[error("the target location specified by path segment '{segment}' was not found")]
    SegmentNotFound { segment: String },
    /// The member exists but is not writable.
    #[error("the property at path segment '{segment}' could not be updated")]
    CannotUpdateProperty { segment: String },
    /// The member exists but is not readable.
    #[error("the property at path segment '{segment}' could not be read")]
    CannotReadProperty { segment: String },
    /// The value could not be converted to the declared or element type.
    #[error("the value '{value}' is invalid for the target property")]
    InvalidValueForProperty { value: String },
    /// A map key segment could not be converted to the key type.
    #[error("the path segment '{segment}' is invalid for the target dictionary key type")]
    InvalidPathSegment { segment: String },
    /// A list index was outside the valid range for the verb.
    #[error("the index value provided by path segment '{segment}' is out of bounds of the array size")]
    IndexOutOfBounds { segment: String },
    /// A list segment was neither a valid index nor the append marker.
    #[error("the path segment '{segment}' is invalid for an array index")]
    InvalidIndexValue { segment: String },
    /// The `test` verb found an unequal value.
    #[error("the current value '{current}' at path segment '{segment}' is not equal to the test value '{test}'")]
    ValueNotEqualToTestValue {
        current: String,
        test: String,
        segment: String,
    },
    /// Deep-cloning a copy source failed.
    #[error("the property at '{from}' could not be copied")]
    CannotCopyProperty { from: String },
    /// The target sequence is fixed-size and cannot grow or shrink.
    #[error("patching is not supported for fixed-size sequences")]
    PatchNotSupportedForFixedSizeList,
    /// Unrecognized operation kind at construction or decode time.
    #[error("invalid JSON Patch operation '{op}'")]
    InvalidOp { op: String },
    /// A patch document failed to decode from its wire form.
    #[error("invalid patch document: {0}")]
    InvalidDocument(String),
    /// Generic fallback when a verb fails without a more specific message.
    #[error("the '{op}' operation at path '{path}' could not be performed")]
    CannotPerformOperation { op: String, path: String },
}

/// Structured error delivered to the caller: the offending root target
/// (snapshot taken at failure time), the operation, and the message.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPatchError {
    pub target: Target,
    pub operation: Operation,
    pub error: PatchError,
}

impl JsonPatchError {
    pub fn new(target: Target, operation: Operation, error: PatchError) -> Self {
        JsonPatchError {
            target,
            operation,
            error,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for JsonPatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' operation at '{}' failed: {}",
            self.operation.kind.as_str(),
            self.operation.path,
            self.error
        )
    }
}

impl std::error::Error for JsonPatchError {}
