//! JSON Pointer (RFC 6901) utilities for the JSON Patch engine.
//!
//! This crate implements the path-segment parser and escaping helpers for
//! [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901) as used by
//! [JSON Patch (RFC 6902)](https://tools.ietf.org/html/rfc6902) paths.
//!
//! # Example
//!
//! ```
//! use json_patch_pointer::{ParsedPath, format_pointer};
//!
//! // Parse a pointer string into unescaped segments
//! let path = ParsedPath::parse("/foo/bar~0baz").unwrap();
//! assert_eq!(path.segments(), &["foo".to_string(), "bar~baz".to_string()]);
//! assert_eq!(path.last_segment(), Some("bar~baz"));
//!
//! // Format segments back into a pointer string
//! let ptr = format_pointer(path.segments());
//! assert_eq!(ptr, "/foo/bar~0baz");
//! ```

use thiserror::Error;

/// Maximum number of segments accepted in one pointer.
///
/// Guards against pathological input driving unbounded traversal work.
pub const MAX_SEGMENTS: usize = 256;

/// Error raised while parsing a pointer string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// `~` was followed by something other than `0` or `1`, or ended the path.
    #[error("invalid escape sequence in path segment")]
    InvalidEscape,
    /// The pointer exceeded [`MAX_SEGMENTS`].
    #[error("pointer has too many segments")]
    TooLong,
}

/// An immutable, parsed JSON Pointer: an ordered sequence of unescaped
/// segments.
///
/// An empty pointer string parses to zero segments and addresses the root.
/// Separator handling is permissive: consecutive, leading, and trailing `/`
/// characters produce no empty segments. Escape handling is strict: a `~`
/// not followed by `0` or `1` is a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    segments: Vec<String>,
}

impl ParsedPath {
    /// Parse a pointer string into unescaped segments.
    ///
    /// # Example
    ///
    /// ```
    /// use json_patch_pointer::ParsedPath;
    ///
    /// assert_eq!(ParsedPath::parse("").unwrap().segments().len(), 0);
    /// assert_eq!(
    ///     ParsedPath::parse("/a/b~1c").unwrap().segments(),
    ///     &["a".to_string(), "b/c".to_string()]
    /// );
    /// assert!(ParsedPath::parse("/a/b~2").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self, PointerError> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars();
        while let Some(c) = chars.next() {
            match c {
                '/' => {
                    // Permissive separators: empty accumulators close nothing.
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                '~' => match chars.next() {
                    Some('0') => current.push('~'),
                    Some('1') => current.push('/'),
                    _ => return Err(PointerError::InvalidEscape),
                },
                other => current.push(other),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if segments.len() > MAX_SEGMENTS {
            return Err(PointerError::TooLong);
        }
        Ok(ParsedPath { segments })
    }

    /// The ordered, unescaped segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, or `None` for the root pointer.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// All segments except the last. Empty for the root pointer and for
    /// single-segment pointers.
    pub fn parent_segments(&self) -> &[String] {
        if self.segments.is_empty() {
            &self.segments
        } else {
            &self.segments[..self.segments.len() - 1]
        }
    }

    /// True if this pointer addresses the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Escapes a single path segment.
///
/// Per RFC 6901, `~` becomes `~0` and `/` becomes `~1`.
///
/// # Example
///
/// ```
/// use json_patch_pointer::escape_segment;
///
/// assert_eq!(escape_segment("a~b"), "a~0b");
/// assert_eq!(escape_segment("c/d"), "c~1d");
/// assert_eq!(escape_segment("plain"), "plain");
/// ```
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('~') && !segment.contains('/') {
        return segment.to_string();
    }
    // Order matters: ~ must be escaped before /
    segment.replace('~', "~0").replace('/', "~1")
}

/// Unescapes a single path segment.
///
/// Decodes each escape exactly once, left to right. Returns an error for a
/// `~` not followed by `0` or `1`.
pub fn unescape_segment(segment: &str) -> Result<String, PointerError> {
    if !segment.contains('~') {
        return Ok(segment.to_string());
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return Err(PointerError::InvalidEscape),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Format unescaped segments into a pointer string.
///
/// Returns an empty string for the root (no segments).
///
/// # Example
///
/// ```
/// use json_patch_pointer::format_pointer;
///
/// assert_eq!(format_pointer(&[]), "");
/// assert_eq!(
///     format_pointer(&["a~b".to_string(), "c".to_string()]),
///     "/a~0b/c"
/// );
/// ```
pub fn format_pointer(segments: &[String]) -> String {
    if segments.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&escape_segment(segment));
    }
    out
}

/// Normalize a builder-supplied path so it carries a leading `/`.
///
/// Escape sequences in the input are left untouched; only the leading
/// separator is guaranteed.
///
/// # Example
///
/// ```
/// use json_patch_pointer::normalize_path;
///
/// assert_eq!(normalize_path("a/b"), "/a/b");
/// assert_eq!(normalize_path("/a/b"), "/a/b");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        let mut out = String::with_capacity(path.len() + 1);
        out.push('/');
        out.push_str(path);
        out
    }
}

/// Check if a segment is a valid non-negative array index.
///
/// Leading zeros are rejected except for `"0"` itself.
///
/// # Example
///
/// ```
/// use json_patch_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    let bytes = segment.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}
