//! How strongly a diagnostic counts against an analysis document.

use std::fmt;

/// Severity of a decoder diagnostic.
///
/// A document with at least one [`Severity::Error`] decodes to no procedure
/// at all. [`Severity::Warning`] marks content the decoder skipped or
/// tolerated, such as a `decision` object on a step element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Returns `true` if a diagnostic of this severity rejects the document.
    pub fn rejects_document(self) -> bool {
        self == Severity::Error
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(self) -> bool {
        self == Severity::Warning
    }

    /// Lowercase label used as the prefix of rendered diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
