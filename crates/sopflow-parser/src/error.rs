//! Error and diagnostic system for the sopflow decoder.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, the path of the
//! offending element, an optional source span and help text. Multiple
//! diagnostics are wrapped in [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use sopflow_parser::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::error("element has no `type` field")
//!     .with_code(ErrorCode::E200)
//!     .with_path("elements[3]")
//!     .with_help("set `type` to either \"step\" or \"decision\"");
//!
//! assert_eq!(diag.path(), Some("elements[3]"));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use severity::Severity;
