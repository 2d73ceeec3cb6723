//! Element paths used to locate structural problems in a document.

use std::fmt;

/// Dotted path from the document root to a value, e.g.
/// `elements[1].decision.branches[0].steps[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Path(String);

impl Path {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    /// Path of a named field below this one.
    pub(crate) fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Path of an array item below this one.
    pub(crate) fn index(&self, idx: usize) -> Self {
        Self(format!("{}[{idx}]", self.0))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}
