//! # Sopflow Parser
//!
//! Decoder for the structured output of the SOP analysis service. The
//! service replies with a JSON document describing the procedure as a tree
//! of steps and decisions; this crate turns that reply into a
//! [`Procedure`], or into a [`ParseError`] naming every offending element.
//!
//! ## Usage
//!
//! ```
//! # use sopflow_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{
//!         "title": "Password Reset",
//!         "elements": [
//!             {"type": "step", "text": "Verify caller identity"},
//!             {"type": "step", "text": "Send reset link"}
//!         ]
//!     }"#;
//!
//!     let procedure = parse(source)?;
//!     assert_eq!(procedure.title(), "Password Reset");
//!     assert_eq!(procedure.elements().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;

mod decode;
mod path;
mod span;

pub use decode::DEFAULT_TITLE;
pub use span::Span;

use log::{debug, trace};

use sopflow_core::procedure::Procedure;

use error::{Diagnostic, ErrorCode, ParseError};

/// Parse an analysis document into a procedure tree.
///
/// # Arguments
///
/// * `source` - JSON text of the analysis reply. Use [`strip_code_fences`]
///   first if the reply may be wrapped in a Markdown fence.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not JSON, when the root is not an
/// object, or when any element is structurally malformed. All structural
/// problems found in the document are reported together.
pub fn parse(source: &str) -> Result<Procedure, ParseError> {
    let value: serde_json::Value = serde_json::from_str(source).map_err(|err| {
        let span = Span::from_line_column(source, err.line(), err.column());
        Diagnostic::error(format!("invalid JSON: {err}"))
            .with_code(ErrorCode::E100)
            .with_span(span)
    })?;

    let procedure = decode::decode_procedure(&value)?;

    debug!(
        title = procedure.title(),
        elements = procedure.elements().len(),
        decisions = procedure.decision_count();
        "Analysis document decoded"
    );
    trace!(procedure:?; "Decoded procedure");

    Ok(procedure)
}

/// Removes a Markdown code fence wrapping the whole reply, if present.
///
/// Analysis services sometimes answer with ```` ```json ... ``` ```` even
/// when asked for raw JSON. The opening fence line (including any language
/// tag) and a closing fence line are dropped; anything else is returned
/// trimmed but otherwise unchanged.
///
/// ```
/// # use sopflow_parser::strip_code_fences;
/// let reply = "```json\n{\"title\": \"T\"}\n```";
/// assert_eq!(strip_code_fences(reply), "{\"title\": \"T\"}");
/// assert_eq!(strip_code_fences("  {}  "), "{}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => "",
    };
    let body = body.trim_end();
    let body = match body.rfind('\n') {
        Some(newline) if body[newline + 1..].trim() == "```" => &body[..newline],
        None if body.trim() == "```" => "",
        _ => body,
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_with_language_tag() {
        let reply = "```json\n{\"elements\": []}\n```\n";
        assert_eq!(strip_code_fences(reply), "{\"elements\": []}");
    }

    #[test]
    fn test_strip_fence_without_closing() {
        let reply = "```\n{\"elements\": []}";
        assert_eq!(strip_code_fences(reply), "{\"elements\": []}");
    }

    #[test]
    fn test_strip_unfenced_passthrough() {
        assert_eq!(strip_code_fences("\n{\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_only() {
        assert_eq!(strip_code_fences("```"), "");
        assert_eq!(strip_code_fences("```json\n```"), "");
    }

    #[test]
    fn test_invalid_json_has_span() {
        let err = parse("{\"title\": }").unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        let span = diag.span().expect("syntax errors carry a span");
        assert_eq!(span.start(), 10);
    }
}
