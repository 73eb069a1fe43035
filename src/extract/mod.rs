//! Structured-document extraction from LLM responses.
//!
//! Model replies embed their payload in many ways: a fenced ```` ```json ````
//! block, a bare object inside prose, an escaped JSON string, a YAML OpenAPI
//! document, or JSON with trailing commas. [`extract_document`] runs an
//! ordered cascade of [`strategies`] and returns the first document found, or
//! every document found when asked to, falling back to the original text.
//!
//! ```
//! use agentry::extract::{Document, ExtractOptions, extract_document};
//!
//! let reply = "Sure!\n```json\n{\"status\": \"ok\"}\n```";
//! let doc = extract_document(reply, &ExtractOptions::default());
//! assert_eq!(doc.as_object().unwrap()["status"], "ok");
//!
//! let doc = extract_document("no structure here", &ExtractOptions::default());
//! assert_eq!(doc, Document::Text("no structure here".to_string()));
//! ```

mod heuristics;
pub mod strategies;

pub use heuristics::{Object, fenced_blocks, looks_like_json, looks_like_yaml};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strategies::STRATEGIES;
use tracing::{debug, trace};

/// Result of extracting a document from text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// A single structured document
    Object(Object),
    /// Every document found, when multiple results were requested
    Many(Vec<Object>),
    /// The original text, when nothing structured was found
    Text(String),
}

impl Document {
    /// The single document, if this is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Document::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The fallback text, if extraction found nothing.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Document::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Document::Text(_))
    }

    /// True for an empty object, an empty list, or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Document::Object(map) => map.is_empty(),
            Document::Many(items) => items.is_empty(),
            Document::Text(text) => text.is_empty(),
        }
    }

    /// All structured documents; fallback text yields none.
    pub fn into_objects(self) -> Vec<Object> {
        match self {
            Document::Object(map) => vec![map],
            Document::Many(items) => items,
            Document::Text(_) => Vec::new(),
        }
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Document::Object(map) => Value::Object(map),
            Document::Many(items) => Value::Array(items.into_iter().map(Value::Object).collect()),
            Document::Text(text) => Value::String(text),
        }
    }
}

/// Options controlling [`extract_document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Return the original text when nothing is found (otherwise `{}`)
    pub fallback_to_text: bool,
    /// Return every document found instead of the first
    pub allow_multiple: bool,
    /// Prefer the first document containing any of these keys
    pub preferred_keys: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            fallback_to_text: true,
            allow_multiple: false,
            preferred_keys: Vec::new(),
        }
    }
}

impl ExtractOptions {
    /// Enable or disable the textual fallback.
    pub fn with_fallback_to_text(mut self, fallback: bool) -> Self {
        self.fallback_to_text = fallback;
        self
    }

    /// Enable or disable returning every document found.
    pub fn with_allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// Set the preferred keys.
    pub fn with_preferred_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    fn collects_all(&self) -> bool {
        self.allow_multiple || !self.preferred_keys.is_empty()
    }

    fn fallback(&self, text: &str) -> Document {
        if self.fallback_to_text {
            Document::Text(text.to_string())
        } else {
            Document::Object(Object::new())
        }
    }
}

/// Extract a structured document from free-form text.
///
/// Strategies run in order and the first document found wins. With
/// `allow_multiple` or `preferred_keys` set, every strategy runs and all
/// candidates are collected in strategy order; the first candidate holding a
/// preferred key is returned, otherwise the first candidate (or, with
/// `allow_multiple`, all distinct candidates). Never fails.
pub fn extract_document(text: &str, options: &ExtractOptions) -> Document {
    let text = text.trim();
    if text.is_empty() {
        return options.fallback(text);
    }

    let collect_all = options.collects_all();
    let mut found: Vec<Object> = Vec::new();

    for strategy in &STRATEGIES {
        let candidates = (strategy.run)(text);
        if candidates.is_empty() {
            trace!(strategy = strategy.name, "no document");
            continue;
        }

        debug!(
            strategy = strategy.name,
            count = candidates.len(),
            "recovered document"
        );

        if !collect_all {
            if let Some(first) = candidates.into_iter().next() {
                return Document::Object(first);
            }
            continue;
        }
        found.extend(candidates);
    }

    if found.is_empty() {
        debug!(len = text.len(), "no structured document found");
        return options.fallback(text);
    }

    if !options.preferred_keys.is_empty() {
        let preferred = found.iter().position(|candidate| {
            options
                .preferred_keys
                .iter()
                .any(|key| candidate.contains_key(key))
        });
        if let Some(index) = preferred {
            return Document::Object(found.swap_remove(index));
        }
        debug!(keys = ?options.preferred_keys, "no candidate holds a preferred key");
    }

    if options.allow_multiple {
        Document::Many(distinct(found))
    } else {
        Document::Object(found.swap_remove(0))
    }
}

fn distinct(found: Vec<Object>) -> Vec<Object> {
    let mut unique: Vec<Object> = Vec::with_capacity(found.len());
    for candidate in found {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Extract a YAML mapping from text.
///
/// Fenced `yaml`/`yml`/untagged blocks are tried first, then the whole text.
pub fn extract_yaml(text: &str) -> Option<Object> {
    fenced_blocks(text)
        .into_iter()
        .filter(|block| block.is_tagged(&["yaml", "yml"]))
        .find_map(|block| heuristics::try_parse_yaml(block.body))
        .or_else(|| heuristics::try_parse_yaml(text))
}

/// Extract a document, wrapping a textual fallback as `{"content": text}`.
pub fn extract_structured(text: &str) -> Object {
    match extract_document(text, &ExtractOptions::default()) {
        Document::Object(map) => map,
        Document::Many(items) => items.into_iter().next().unwrap_or_default(),
        Document::Text(text) => {
            let mut map = Object::new();
            map.insert("content".to_string(), Value::String(text));
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Document {
        Document::Object(value.as_object().unwrap().clone())
    }

    fn extract(text: &str) -> Document {
        extract_document(text, &ExtractOptions::default())
    }

    #[test]
    fn test_pretty_printed_document_is_unchanged() {
        let original = json!({
            "title": "Checkout",
            "rules": [{"id": "BR-001", "severity": "high"}],
            "nested": {"deep": {"value": 1.5}},
        });
        let text = serde_json::to_string_pretty(&original).unwrap();
        assert_eq!(extract(&text), obj(original));
    }

    #[test]
    fn test_fenced_json() {
        assert_eq!(extract("```json\n{\"a\":1}\n```"), obj(json!({"a": 1})));
    }

    #[test]
    fn test_fenced_yaml_openapi() {
        let doc = extract("```yaml\nopenapi: 3.0.0\ninfo:\n  title: X\n```");
        let map = doc.as_object().unwrap();
        assert_eq!(map["openapi"], "3.0.0");
        assert_eq!(map["info"]["title"], "X");
    }

    #[test]
    fn test_trailing_comma_repair() {
        assert_eq!(
            extract(r#"{"a": 1, "b": 2,}"#),
            obj(json!({"a": 1, "b": 2}))
        );
    }

    #[test]
    fn test_prose_fallback() {
        assert_eq!(
            extract("just some prose"),
            Document::Text("just some prose".to_string())
        );
        let strict = ExtractOptions::default().with_fallback_to_text(false);
        assert_eq!(
            extract_document("just some prose", &strict),
            Document::Object(Object::new())
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract("   \n "), Document::Text(String::new()));
        let strict = ExtractOptions::default().with_fallback_to_text(false);
        assert_eq!(extract_document("", &strict), Document::Object(Object::new()));
    }

    #[test]
    fn test_fallback_returns_trimmed_text() {
        assert_eq!(extract("  hello  "), Document::Text("hello".to_string()));
    }

    #[test]
    fn test_preferred_key_wins_over_earlier_candidate() {
        let text = r#"Summary: {"summary": "two endpoints"}
Spec follows: {"openapi_spec": "x"}"#;
        let options = ExtractOptions::default().with_preferred_keys(["openapi_spec"]);
        let doc = extract_document(text, &options);
        assert_eq!(doc, obj(json!({"openapi_spec": "x"})));
    }

    #[test]
    fn test_preferred_key_searches_later_strategies() {
        let text = "```json\n{\"notes\": []}\n```\nalso \"{\\\"openapi_spec\\\": \\\"x\\\"}\"";
        let options = ExtractOptions::default().with_preferred_keys(["openapi_spec"]);
        let doc = extract_document(text, &options);
        assert_eq!(doc, obj(json!({"openapi_spec": "x"})));
    }

    #[test]
    fn test_preferred_key_missing_returns_first() {
        let text = r#"{"a": 1} and {"bb": 22}"#;
        let options = ExtractOptions::default().with_preferred_keys(["zzz"]);
        assert_eq!(extract_document(text, &options), obj(json!({"bb": 22})));
    }

    #[test]
    fn test_without_preference_first_strategy_wins() {
        let text = "```json\n{\"fenced\": true}\n```\n{\"loose\": true, \"longer\": 1}";
        assert_eq!(extract(text), obj(json!({"fenced": true})));
    }

    #[test]
    fn test_allow_multiple_collects_distinct() {
        let text = "```json\n{\"a\": 1}\n```\nthen {\"b\": 2}";
        let options = ExtractOptions::default().with_allow_multiple(true);
        match extract_document(text, &options) {
            Document::Many(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0]["a"], 1);
                assert_eq!(items[1]["b"], 2);
            }
            other => panic!("Expected Many, got {:?}", other),
        }
    }

    #[test]
    fn test_allow_multiple_nothing_found() {
        let options = ExtractOptions::default().with_allow_multiple(true);
        assert!(extract_document("nothing", &options).is_text());
    }

    #[test]
    fn test_json_in_prose() {
        let text = "I analysed the rules. Here is the result: {\"issues\": [{\"line\": 3}]} Let me know!";
        assert_eq!(extract(text), obj(json!({"issues": [{"line": 3}]})));
    }

    #[test]
    fn test_scalar_json_is_rejected() {
        assert_eq!(extract("42"), Document::Text("42".to_string()));
    }

    #[test]
    fn test_bare_openapi_yaml() {
        let text = "openapi: 3.0.0\ninfo:\n  title: Orders\n  version: 1.0.0\npaths: {}\n";
        let doc = extract(text);
        assert_eq!(doc.as_object().unwrap()["info"]["title"], "Orders");
    }

    #[test]
    fn test_escaped_json_string() {
        let text = r#"The model said: "{\"status\": \"done\"}""#;
        assert_eq!(extract(text), obj(json!({"status": "done"})));
    }

    #[test]
    fn test_extract_yaml() {
        let text = "Spec:\n```yml\nname: svc\nport: 8080\n```";
        let map = extract_yaml(text).unwrap();
        assert_eq!(map["port"], 8080);
        assert!(extract_yaml("plain words").is_none());
    }

    #[test]
    fn test_extract_structured_wraps_text() {
        let map = extract_structured("no json");
        assert_eq!(Value::Object(map), json!({"content": "no json"}));
        let map = extract_structured(r#"{"k": "v"}"#);
        assert_eq!(Value::Object(map), json!({"k": "v"}));
    }

    #[test]
    fn test_stray_quote_does_not_hide_later_object() {
        let text = r#"The panel {5" wide} is fine. Result: {"a": 1}"#;
        assert_eq!(extract(text), obj(json!({"a": 1})));
    }

    #[test]
    fn test_document_accessors() {
        let text = Document::Text("prose".to_string());
        assert_eq!(text.as_text(), Some("prose"));
        assert!(text.as_object().is_none());
        assert!(text.clone().into_objects().is_empty());

        let single = obj(json!({"a": 1}));
        assert_eq!(single.as_text(), None);
        assert_eq!(single.into_objects().len(), 1);

        let many = Document::Many(vec![Object::new(), Object::new()]);
        assert!(!many.is_text());
        assert_eq!(many.into_objects().len(), 2);
    }

    #[test]
    fn test_document_serializes_untagged() {
        assert_eq!(
            serde_json::to_value(obj(json!({"a": 1}))).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            serde_json::to_value(Document::Text("t".into())).unwrap(),
            json!("t")
        );
        assert_eq!(
            Document::Many(vec![Object::new()]).into_value(),
            json!([{}])
        );
    }
}
