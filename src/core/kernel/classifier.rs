use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const TRUNCATE_AT: usize = 50;

fn title_pattern() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"(?s)<title.*?>([^<]+)</title>").expect("valid title regex"))
}

/// A rule applied to a JSON-decoded error body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyRule {
    /// `{"<key>": "..."}` returns the string under `key`
    Field(String),
    /// `["<tag>", code, "message"]` returns the element at `index`
    Tagged { tag: String, index: usize },
}

impl ClassifyRule {
    pub fn field(key: &str) -> Self {
        Self::Field(key.to_string())
    }

    fn apply(&self, value: &Value) -> Option<String> {
        match (self, value) {
            (Self::Field(key), Value::Object(map)) => map.get(key).map(value_text),
            (Self::Tagged { tag, index }, Value::Array(items)) => {
                match items.first() {
                    Some(Value::String(first)) if first == tag => items.get(*index).map(value_text),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Turns a failed response body into a human readable message.
///
/// Structured bodies are matched against the rules in order; anything else
/// falls back to the raw text, the HTML `<title>`, or a truncated excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassifier {
    rules: Vec<ClassifyRule>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(vec![
            ClassifyRule::field("message"),
            ClassifyRule::Tagged {
                tag: "error".to_string(),
                index: 2,
            },
        ])
    }
}

impl ErrorClassifier {
    pub fn new(rules: Vec<ClassifyRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassifyRule] {
        &self.rules
    }

    pub fn classify(&self, raw: &[u8], content_type: Option<&str>) -> String {
        let text = String::from_utf8_lossy(raw);
        let looks_like_html = content_type.is_some_and(|ct| ct.contains("text/html"));

        if !looks_like_html {
            if let Ok(value) = serde_json::from_slice::<Value>(raw) {
                return self
                    .rules
                    .iter()
                    .find_map(|rule| rule.apply(&value))
                    .unwrap_or_else(|| text.into_owned());
            }
        }

        // Probably an error page from a proxy in front of the exchange
        if let Some(title) = title_pattern().captures(&text).and_then(|c| c.get(1)) {
            return format!("HTML: {}", title.as_str());
        }

        truncate(&text)
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > TRUNCATE_AT {
        let head: String = text.chars().take(TRUNCATE_AT).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify(br#"{"message":"Nonce is too small."}"#, None),
            "Nonce is too small."
        );
    }

    #[test]
    fn test_error_tuple() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify(br#"["error", 20060, "maintenance"]"#, None),
            "maintenance"
        );
    }

    #[test]
    fn test_unrecognized_json_is_returned_raw() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify(br#"{"newformat": true}"#, None),
            r#"{"newformat": true}"#
        );
        assert_eq!(classifier.classify(br#"["ok", 1]"#, None), r#"["ok", 1]"#);
    }

    #[test]
    fn test_html_title() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify(b"blah <title>Invalid Request</title> blah", None),
            "HTML: Invalid Request"
        );
    }

    #[test]
    fn test_html_content_type_skips_json() {
        let classifier = ErrorClassifier::default();
        assert_eq!(
            classifier.classify(b"<html><title>502 Bad Gateway</title></html>", Some("text/html; charset=utf-8")),
            "HTML: 502 Bad Gateway"
        );
    }

    #[test]
    fn test_long_plain_text_is_truncated() {
        let classifier = ErrorClassifier::default();
        let text = "x".repeat(80);
        let message = classifier.classify(text.as_bytes(), None);
        assert_eq!(message, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_short_plain_text_is_kept() {
        let classifier = ErrorClassifier::default();
        assert_eq!(classifier.classify(b"allelse", None), "allelse");
        let exact = "y".repeat(50);
        assert_eq!(classifier.classify(exact.as_bytes(), None), exact);
    }

    #[test]
    fn test_custom_rule_order() {
        let classifier = ErrorClassifier::new(vec![
            ClassifyRule::field("msg"),
            ClassifyRule::field("message"),
        ]);
        assert_eq!(
            classifier.classify(br#"{"code":-1121,"msg":"Invalid symbol.","message":"other"}"#, None),
            "Invalid symbol."
        );
    }
}
