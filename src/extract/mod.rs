//! Structured-output extraction from free-form model text.
//!
//! Models routinely wrap their JSON in prose, markdown fences, or preambles
//! despite instructions. The recovery contract here is deliberately simple:
//! take the substring from the first `{` to the last `}` (inclusive) and
//! parse it as a JSON object. This is a best-effort heuristic, not a
//! guaranteed-correct parse: an output carrying more than one object, or
//! stray braces outside the object, produces an unparseable candidate.
//! Callers treat failures as recoverable and keep their last-known-good
//! state.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::FileMap;

/// Extraction failures. Both variants are recoverable: the caller's stored
/// state is never touched on failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No `{` or no `}` anywhere in the model output.
    #[error("no structured data found in model output")]
    NoStructuredDataFound,
    /// The brace-delimited substring did not parse as the expected mapping.
    /// The detail is safe to surface to the caller for debuggability.
    #[error("malformed structured data: {0}")]
    MalformedData(String),
}

/// Extract the brace-delimited substring of `text` and parse it as a JSON
/// object. Pure function, no side effects.
pub fn extract_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let text = text.trim();
    let first = text.find('{').ok_or(ExtractError::NoStructuredDataFound)?;
    let last = text.rfind('}').ok_or(ExtractError::NoStructuredDataFound)?;
    if last < first {
        return Err(ExtractError::NoStructuredDataFound);
    }

    let candidate = &text[first..=last];
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExtractError::MalformedData(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(ExtractError::MalformedData(e.to_string())),
    }
}

/// Extract a complete file mapping (path -> full file text) from model
/// output. Every value must be a plain string; anything else is malformed.
pub fn extract_file_map(text: &str) -> Result<FileMap, ExtractError> {
    let object = extract_object(text)?;
    let mut files = FileMap::new();
    for (path, value) in object {
        match value {
            Value::String(content) => {
                files.insert(path, content);
            }
            other => {
                return Err(ExtractError::MalformedData(format!(
                    "file {:?} has non-string content ({})",
                    path,
                    json_type_name(&other)
                )));
            }
        }
    }
    Ok(files)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_embedded_in_prose() {
        let text = r#"Sure! Here is the project you asked for:

{"/App.js": "export default function App() {}", "/index.js": "import App from './App';"}

Let me know if you need anything else."#;

        let files = extract_file_map(text).expect("extraction failed");
        assert_eq!(files.len(), 2);
        assert_eq!(files["/App.js"], "export default function App() {}");
    }

    #[test]
    fn extracts_object_wrapped_in_markdown_fence() {
        let text = "```json\n{\"/App.js\": \"content\"}\n```";
        let files = extract_file_map(text).expect("extraction failed");
        assert_eq!(files["/App.js"], "content");
    }

    #[test]
    fn equivalent_to_direct_parse_for_clean_json() {
        let json = r#"{"/a.js": "a", "/b.js": "b"}"#;
        let direct: FileMap = serde_json::from_str(json).unwrap();
        let extracted = extract_file_map(&format!("noise before {} noise after", json)).unwrap();
        assert_eq!(direct, extracted);
    }

    #[test]
    fn missing_open_brace_is_no_structured_data() {
        let err = extract_file_map("no json here}").unwrap_err();
        assert!(matches!(err, ExtractError::NoStructuredDataFound));
    }

    #[test]
    fn missing_close_brace_is_no_structured_data() {
        let err = extract_file_map("{\"/App.js\": \"oops").unwrap_err();
        assert!(matches!(err, ExtractError::NoStructuredDataFound));
    }

    #[test]
    fn braces_in_wrong_order_is_no_structured_data() {
        let err = extract_file_map("} backwards {").unwrap_err();
        assert!(matches!(err, ExtractError::NoStructuredDataFound));
    }

    #[test]
    fn invalid_json_between_braces_is_malformed() {
        let err = extract_file_map("{this is not json}").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedData(_)));
    }

    #[test]
    fn two_objects_in_one_output_is_malformed() {
        // Known fragility: the scan spans from the first `{` to the last `}`,
        // so two separate objects produce an unparseable candidate.
        let err = extract_file_map(r#"{"/a.js": "a"} and also {"/b.js": "b"}"#).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedData(_)));
    }

    #[test]
    fn non_string_file_content_is_malformed() {
        let err = extract_file_map(r#"{"/App.js": 42}"#).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedData(_)));
    }

    #[test]
    fn object_values_pass_through_extract_object() {
        let map = extract_object(r#"{"code_quality": 8, "feedback": "ok"}"#).unwrap();
        assert_eq!(map["code_quality"], 8);
        assert_eq!(map["feedback"], "ok");
    }
}
