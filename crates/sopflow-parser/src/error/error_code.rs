//! Error codes for the sopflow diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Document errors (syntax, root shape)
//! - `E2xx` - Element structure errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E1xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The analysis reply could not be decoded as JSON at all.
    E100,

    /// Root is not an object.
    ///
    /// The document must be a JSON object with `title` and `elements`.
    E101,

    // =========================================================================
    // Element Errors (E2xx)
    // =========================================================================
    /// Missing element type.
    ///
    /// Every element needs a `type` discriminator.
    E200,

    /// Unknown element type.
    ///
    /// `type` must be `"step"` or `"decision"`.
    E201,

    /// Missing decision structure.
    ///
    /// A `decision` element needs a nested `decision` object holding its
    /// question and branches.
    E202,

    /// Field has the wrong JSON type.
    ///
    /// For example `"branches": "yes"` where an array is required.
    E203,

    /// Element is not an object.
    E204,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
