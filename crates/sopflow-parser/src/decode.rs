//! Walks a decoded JSON value into a [`Procedure`].
//!
//! Missing optional fields fall back to their defaults. A missing or unknown
//! element `type`, a decision without its nested structure, and any field
//! holding the wrong JSON type are reported as errors with the element path.

use serde_json::{Map, Value};

use sopflow_core::procedure::{Branch, Decision, Element, Procedure};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    path::Path,
};

/// Title used when the document does not carry one.
pub const DEFAULT_TITLE: &str = "Untitled SOP";

const STEP_TYPE: &str = "step";
const DECISION_TYPE: &str = "decision";

/// Decodes the root JSON value of an analysis document.
pub(crate) fn decode_procedure(value: &Value) -> Result<Procedure, ParseError> {
    let Some(root) = value.as_object() else {
        return Err(Diagnostic::error(format!(
            "analysis document must be a JSON object, found {}",
            json_kind(value)
        ))
        .with_code(ErrorCode::E101)
        .with_help("expected {\"title\": ..., \"elements\": [...]}")
        .into());
    };

    let mut decoder = Decoder::default();
    let path = Path::root();
    let title = decoder
        .string_field(root, "title", &path)
        .unwrap_or(DEFAULT_TITLE)
        .to_string();
    let elements = decoder.elements(root, "elements", &path);

    decoder.collector.finish()?;
    Ok(Procedure::new(title).with_elements(elements))
}

#[derive(Default)]
struct Decoder {
    collector: DiagnosticCollector,
}

impl Decoder {
    /// Decodes the array field `key` of `object` as a list of elements.
    fn elements(&mut self, object: &Map<String, Value>, key: &str, path: &Path) -> Vec<Element> {
        let list_path = path.field(key);
        self.array_field(object, key, path)
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| self.element(item, &list_path.index(idx)))
            .collect()
    }

    fn element(&mut self, value: &Value, path: &Path) -> Option<Element> {
        let Some(object) = value.as_object() else {
            self.collector.emit(
                Diagnostic::error(format!("element must be an object, found {}", json_kind(value)))
                    .with_code(ErrorCode::E204)
                    .with_path(path.to_string()),
            );
            return None;
        };

        let text = self.string_field(object, "text", path).unwrap_or_default();

        let kind = match object.get("type") {
            None | Some(Value::Null) => {
                self.collector.emit(
                    Diagnostic::error("element has no `type` field")
                        .with_code(ErrorCode::E200)
                        .with_path(path.to_string())
                        .with_help("set `type` to either \"step\" or \"decision\""),
                );
                return None;
            }
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => {
                self.emit_wrong_type(&path.field("type"), "a string", other);
                return None;
            }
        };

        match kind {
            STEP_TYPE => {
                if object.contains_key("decision") {
                    self.collector.emit(
                        Diagnostic::warning("step element carries a `decision` object; it is ignored")
                            .with_path(path.to_string()),
                    );
                }
                Some(Element::step(text))
            }
            DECISION_TYPE => self
                .decision(object, text, path)
                .map(Element::decision),
            unknown => {
                self.collector.emit(
                    Diagnostic::error(format!("unknown element type `{unknown}`"))
                        .with_code(ErrorCode::E201)
                        .with_path(path.field("type").to_string())
                        .with_help("`type` must be \"step\" or \"decision\""),
                );
                None
            }
        }
    }

    fn decision(
        &mut self,
        element: &Map<String, Value>,
        text: &str,
        path: &Path,
    ) -> Option<Decision> {
        let decision_path = path.field("decision");
        let object = match element.get("decision") {
            Some(Value::Object(object)) => object,
            None | Some(Value::Null) => {
                self.collector.emit(
                    Diagnostic::error("decision element has no `decision` object")
                        .with_code(ErrorCode::E202)
                        .with_path(path.to_string())
                        .with_help("add {\"question\": ..., \"branches\": [...]}"),
                );
                return None;
            }
            Some(other) => {
                self.emit_wrong_type(&decision_path, "an object", other);
                return None;
            }
        };

        let question = self
            .string_field(object, "question", &decision_path)
            .unwrap_or(text);
        let mut decision = Decision::new(question);

        let branches_path = decision_path.field("branches");
        for (idx, item) in self
            .array_field(object, "branches", &decision_path)
            .iter()
            .enumerate()
        {
            if let Some(branch) = self.branch(item, &branches_path.index(idx)) {
                decision = decision.with_branch(branch);
            }
        }

        Some(decision)
    }

    fn branch(&mut self, value: &Value, path: &Path) -> Option<Branch> {
        let Some(object) = value.as_object() else {
            self.emit_wrong_type(path, "an object", value);
            return None;
        };

        let label = self
            .string_field(object, "condition_label", path)
            .unwrap_or_default()
            .to_string();
        let steps = self.elements(object, "steps", path);
        Some(Branch::new(label, steps))
    }

    /// Reads an optional string field. Wrong types are reported and treated as absent.
    fn string_field<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        path: &Path,
    ) -> Option<&'v str> {
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.as_str()),
            Some(other) => {
                self.emit_wrong_type(&path.field(key), "a string", other);
                None
            }
        }
    }

    /// Reads an optional array field. Wrong types are reported and treated as empty.
    fn array_field<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        path: &Path,
    ) -> &'v [Value] {
        match object.get(key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => {
                self.emit_wrong_type(&path.field(key), "an array", other);
                &[]
            }
        }
    }

    fn emit_wrong_type(&mut self, path: &Path, expected: &str, found: &Value) {
        self.collector.emit(
            Diagnostic::error(format!("expected {expected}, found {}", json_kind(found)))
                .with_code(ErrorCode::E203)
                .with_path(path.to_string()),
        );
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
