//! Identifiers for process graph nodes and flows.
//!
//! This module provides the [`Id`] type. Identifiers are plain owned strings:
//! every compilation run mints its own ids, so no process-wide table is
//! shared between concurrent runs.

use std::fmt;

/// Identifier of a node or a sequence flow in a process graph.
///
/// # Examples
///
/// ```
/// use sopflow_core::identifier::Id;
///
/// let task_id = Id::new("Task_2");
/// assert_eq!(task_id, "Task_2");
///
/// let flow_id = Id::numbered("Flow", 7);
/// assert_eq!(flow_id.as_str(), "Flow_7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Creates an `Id` of the form `<prefix>_<counter>`.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Kind prefix such as `Task` or `Flow`.
    /// * `counter` - Monotonic counter value owned by the caller.
    pub fn numbered(prefix: &str, counter: usize) -> Self {
        Self(format!("{prefix}_{counter}"))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates a derived identifier by appending `suffix` after an underscore.
    ///
    /// Used for diagram-interchange elements that mirror a semantic element.
    ///
    /// ```
    /// use sopflow_core::identifier::Id;
    ///
    /// let id = Id::new("Task_2");
    /// assert_eq!(id.with_suffix("di"), "Task_2_di");
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}_{suffix}", self.0))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
