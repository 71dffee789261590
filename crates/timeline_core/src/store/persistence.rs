//! JSON load/save for the document file.
//!
//! # Invariants
//! - Parsing never fails: malformed input degrades to an empty document.
//! - Missing or `null` top-level sections are backfilled with empty values.
//! - Groups come back sorted by `position` at every level.
//! - Output is pretty-printed with 2-space indentation.

use crate::model::document::Document;
use crate::model::group::{find_duplicate_id, sort_forest};
use log::warn;
use serde_json::{json, Map, Value};

/// Result of parsing one document text.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub document: Document,
    /// Sections that were missing and filled with defaults.
    pub backfilled: Vec<&'static str>,
    /// Why the input was replaced by an empty document, if it was.
    pub fallback: Option<String>,
}

pub(crate) fn parse_document(text: &str) -> ParsedDocument {
    let (mut object, mut fallback) = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => (object, None),
        Ok(other) => (
            Map::new(),
            Some(format!("top-level value is {}", json_kind(&other))),
        ),
        Err(err) => (Map::new(), Some(format!("parse error: {err}"))),
    };

    let backfilled = backfill_sections(&mut object);

    let mut document = match serde_json::from_value::<Document>(Value::Object(object)) {
        Ok(document) => document,
        Err(err) => {
            fallback.get_or_insert_with(|| format!("structural error: {err}"));
            Document::default()
        }
    };
    sort_forest(&mut document.groups);

    if let Some(id) = find_duplicate_id(&document.groups) {
        warn!("event=document_load module=store status=warn reason=duplicate_group_id id={id}");
    }

    ParsedDocument {
        document,
        backfilled,
        fallback,
    }
}

pub(crate) fn serialize_document(document: &Document) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    Ok(text)
}

fn backfill_sections(object: &mut Map<String, Value>) -> Vec<&'static str> {
    let mut backfilled = Vec::new();
    for section in Document::SECTIONS {
        let missing = matches!(object.get(section), None | Some(Value::Null));
        if missing {
            object.insert(section.to_string(), empty_section(section));
            backfilled.push(section);
        }
    }
    backfilled
}

fn empty_section(section: &str) -> Value {
    match section {
        "groups" | "items" => json!([]),
        _ => json!({}),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_document, serialize_document};
    use crate::model::document::Document;

    #[test]
    fn garbage_input_degrades_to_empty_document() {
        let parsed = parse_document("{not json");
        assert_eq!(parsed.document, Document::default());
        assert!(parsed.fallback.unwrap().starts_with("parse error"));
        assert_eq!(parsed.backfilled.len(), 6);
    }

    #[test]
    fn non_object_input_degrades_to_empty_document() {
        let parsed = parse_document("[1, 2, 3]");
        assert_eq!(parsed.document, Document::default());
        assert_eq!(parsed.fallback.as_deref(), Some("top-level value is array"));
    }

    #[test]
    fn structural_error_degrades_to_empty_document() {
        let parsed = parse_document(r#"{"groups": [{"name": "no id"}], "items": []}"#);
        assert_eq!(parsed.document, Document::default());
        assert!(parsed.fallback.unwrap().starts_with("structural error"));
    }

    #[test]
    fn missing_and_null_sections_are_backfilled() {
        let parsed = parse_document(r#"{"items": [], "eras": null}"#);
        assert!(parsed.fallback.is_none());
        assert_eq!(
            parsed.backfilled,
            vec!["configuration", "groups", "item_categories", "eras", "markers"]
        );
    }

    #[test]
    fn serialized_output_uses_two_space_indent() {
        let text = serialize_document(&Document::default()).unwrap();
        assert!(text.contains("\n  \"configuration\": {"));
        assert!(text.ends_with("}\n"));
    }
}
