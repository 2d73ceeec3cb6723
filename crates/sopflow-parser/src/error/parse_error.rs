//! The error returned when an analysis document cannot be decoded.

use std::fmt;

use crate::error::Diagnostic;

/// A rejected analysis document.
///
/// Holds every diagnostic the decoder collected in document order, including
/// warnings emitted before or alongside the errors that caused the rejection.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// All collected diagnostics, in document order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The diagnostics that caused the rejection.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity().rejects_document())
    }

    /// The diagnostic that headlines the error: the first rejecting one,
    /// or the first of any severity when none rejects.
    pub fn primary(&self) -> Option<&Diagnostic> {
        self.errors().next().or_else(|| self.diagnostics.first())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(primary) = self.primary() else {
            return f.write_str("analysis document rejected");
        };
        write!(f, "{primary}")?;
        let others = self.diagnostics.len() - 1;
        if others > 0 {
            write!(f, " (+{others} more)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}
