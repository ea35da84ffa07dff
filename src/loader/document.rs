//! Reading native catalog documents: JSON with `//` line comments.

use camino::Utf8Path;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::catalog_errors::CatalogError;
use crate::values::FieldMap;

/// A string literal (kept) or a `//` comment up to the end of the line (removed).
static STRING_OR_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|//[^\r\n]*"#).expect("Failed to compile comment regex")
});

/// Remove `//` comments lying outside string literals. Line structure is preserved.
pub fn strip_line_comments(text: &str) -> String {
    STRING_OR_COMMENT
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            if matched.starts_with('"') {
                matched.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Parse catalog text into its top-level object.
///
/// Return
/// ----------
/// * the object, a [`CatalogError::DocumentSyntax`] locating a JSON error, or
///   "Solar system file is empty." for an empty object or a non-object document
pub fn parse_document(text: &str, file: &str) -> Result<FieldMap, CatalogError> {
    let stripped = strip_line_comments(text);
    let value: Value =
        serde_json::from_str(&stripped).map_err(|e| CatalogError::DocumentSyntax {
            file: file.to_string(),
            line: e.line(),
            message: syntax_message(&e),
        })?;

    match value {
        Value::Object(map) if !map.is_empty() => Ok(map),
        _ => Err(CatalogError::invalid("Solar system file is empty.")),
    }
}

/// serde_json appends the location to its message; the location is reported separately.
fn syntax_message(error: &serde_json::Error) -> String {
    let full = error.to_string();
    match full.rsplit_once(" at line ") {
        Some((message, _)) => message.to_string(),
        None => full,
    }
}

pub fn read_document(path: &Utf8Path) -> Result<FieldMap, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text, path.as_str())
}

#[cfg(test)]
mod document_test {
    use super::*;

    #[test]
    fn test_comments_outside_strings_are_stripped() {
        let text = "{ // header\n  \"url\": \"http://example.com\", // trailing\n  \"n\": 1\n}";
        let map = parse_document(text, "a.json").unwrap();
        assert_eq!(map["url"], Value::from("http://example.com"));
        assert_eq!(map["n"], Value::from(1));

        let escaped = strip_line_comments(r#"{"q": "say \"//hi\""} // gone"#);
        assert_eq!(escaped.trim_end(), r#"{"q": "say \"//hi\""}"#);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let text = "{\n  \"version\": \"1.0\",\n  \"items\": [ 1, ]\n}";
        match parse_document(text, "bad.json") {
            Err(CatalogError::DocumentSyntax { file, line, .. }) => {
                assert_eq!(file, "bad.json");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_empty_documents() {
        let empty = Err(CatalogError::invalid("Solar system file is empty."));
        assert_eq!(parse_document("{}", "e.json"), empty);
        assert_eq!(parse_document("[1, 2]", "e.json"), empty);
    }
}
