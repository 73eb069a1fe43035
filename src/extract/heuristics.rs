//! Parsing primitives and shape heuristics shared by the extraction strategies.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// A structured document recovered from text.
pub type Object = Map<String, Value>;

static TRAILING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

static YAML_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-Za-z_][\w.-]*\s*:(\s|$)").unwrap());

static FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());

static FENCE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+.-]*$").unwrap());

/// How far into a block to look for an `openapi:` header.
const OPENAPI_HEADER_WINDOW: usize = 100;

/// How many leading lines to inspect for `key:` patterns.
const YAML_PROBE_LINES: usize = 5;

/// Accept a decoded value as a document.
///
/// Objects are accepted as-is. A non-empty array whose first element is an
/// object yields that element. Everything else is rejected.
fn accept(value: Value) -> Option<Object> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

/// Strictly parse text as a JSON document.
pub fn try_parse_json(text: &str) -> Option<Object> {
    let text = text.trim().trim_start_matches('\u{feff}').trim_start();
    if text.is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(text).ok().and_then(accept)
}

/// Parse text as a YAML document.
pub fn try_parse_yaml(text: &str) -> Option<Object> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .ok()
        .map(yaml_to_json)
        .and_then(accept)
}

/// Convert a YAML value into a JSON value.
///
/// Non-string mapping keys (status codes in OpenAPI `responses`, for
/// instance) are rendered as strings; tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        other => match yaml_to_json(other) {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }
}

/// Check if text looks like it might be JSON.
///
/// It must start with `{` or `[`, have balanced brace and bracket counts,
/// and contain a `:` or `"`.
pub fn looks_like_json(text: &str) -> bool {
    let text = text.trim();
    if !(text.starts_with('{') || text.starts_with('[')) {
        return false;
    }

    let count = |c: char| text.chars().filter(|&ch| ch == c).count();
    if count('{') != count('}') || count('[') != count(']') {
        return false;
    }

    text.contains(':') || text.contains('"')
}

/// Check if text looks like a YAML mapping.
///
/// True when the text starts with `---`, mentions `openapi:` near the top,
/// or at least two of its first lines are `key:` entries.
pub fn looks_like_yaml(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if text.starts_with("---") {
        return true;
    }

    let head: String = text.chars().take(OPENAPI_HEADER_WINDOW).collect();
    if head.to_lowercase().contains("openapi:") {
        return true;
    }

    text.lines()
        .take(YAML_PROBE_LINES)
        .filter(|line| YAML_KEY_REGEX.is_match(line))
        .count()
        >= 2
}

/// Remove commas that directly precede a closing brace or bracket.
pub fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_REGEX.replace_all(text, "$1").into_owned()
}

/// A fenced code block: its language tag (empty when untagged) and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    pub tag: String,
    pub body: &'a str,
}

impl FencedBlock<'_> {
    /// Whether the block is untagged or tagged with one of `tags`.
    pub fn is_tagged(&self, tags: &[&str]) -> bool {
        self.tag.is_empty() || tags.contains(&self.tag.as_str())
    }
}

/// Find all triple-backtick fenced blocks in text.
///
/// The first line of a block is its language tag when it is a single word;
/// otherwise the block is untagged and the whole inner text is the body.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    FENCE_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|inner| split_fence(inner.as_str()))
        .collect()
}

fn split_fence(inner: &str) -> FencedBlock<'_> {
    let (first_line, rest) = match inner.find('\n') {
        Some(pos) => (&inner[..pos], &inner[pos + 1..]),
        None => (inner, ""),
    };
    let candidate = first_line.trim();

    if FENCE_TAG_REGEX.is_match(candidate) {
        FencedBlock {
            tag: candidate.to_lowercase(),
            body: rest.trim(),
        }
    } else {
        FencedBlock {
            tag: String::new(),
            body: inner.trim(),
        }
    }
}

/// Byte ranges of balanced `{...}` spans, in order of their opening brace.
///
/// Spans nest: an inner object appears after the object that contains it,
/// and among spans sharing an opening brace the longest comes first. The text
/// is scanned twice, once skipping braces inside string literals and once
/// ignoring quotes, so a stray `"` in prose cannot hide the objects after it.
pub fn brace_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = scan_spans(text, true);
    spans.extend(scan_spans(text, false));

    spans.sort_by_key(|&(start, end)| (start, std::cmp::Reverse(end)));
    spans.dedup();
    spans
}

fn scan_spans(text: &str, track_strings: bool) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if track_strings && !open.is_empty() => in_string = true,
            '{' => open.push(i),
            '}' => {
                if let Some(start) = open.pop() {
                    spans.push((start, i + 1));
                }
            }
            _ => {}
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_parse_json_object() {
        let map = try_parse_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(map["a"], 1);
    }

    #[test]
    fn test_try_parse_json_strips_bom() {
        assert!(try_parse_json("\u{feff}{\"a\": 1}").is_some());
    }

    #[test]
    fn test_try_parse_json_array_uses_first_object() {
        let map = try_parse_json(r#"[{"a": 1}, {"b": 2}]"#).unwrap();
        assert_eq!(map["a"], 1);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_try_parse_json_rejects_scalars() {
        assert!(try_parse_json("42").is_none());
        assert!(try_parse_json(r#""a string""#).is_none());
        assert!(try_parse_json("[]").is_none());
        assert!(try_parse_json("[1, 2]").is_none());
        assert!(try_parse_json("null").is_none());
    }

    #[test]
    fn test_try_parse_yaml_mapping() {
        let map = try_parse_yaml("openapi: 3.0.0\ninfo:\n  title: X\n").unwrap();
        assert_eq!(map["openapi"], "3.0.0");
        assert_eq!(map["info"]["title"], "X");
    }

    #[test]
    fn test_try_parse_yaml_integer_keys() {
        let map = try_parse_yaml("responses:\n  200:\n    description: OK\n").unwrap();
        assert_eq!(map["responses"]["200"]["description"], "OK");
    }

    #[test]
    fn test_try_parse_yaml_rejects_scalar() {
        assert!(try_parse_yaml("just words").is_none());
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json(r#"{"a": 1}"#));
        assert!(looks_like_json(r#"["a"]"#));
        assert!(!looks_like_json("def main():"));
        assert!(!looks_like_json(r#"{"a": {"b": 1}"#));
        assert!(!looks_like_json("{}"));
    }

    #[test]
    fn test_looks_like_yaml() {
        assert!(looks_like_yaml("---\nfoo"));
        assert!(looks_like_yaml("# API\nopenapi: 3.0.0"));
        assert!(looks_like_yaml("name: x\nversion: 1\n"));
        assert!(!looks_like_yaml("name: x\nand then prose\nmore prose"));
        assert!(!looks_like_yaml("fn main() {}"));
    }

    #[test]
    fn test_looks_like_yaml_only_probes_leading_lines() {
        let text = "a\nb\nc\nd\ne\nkey: 1\nother: 2\n";
        assert!(!looks_like_yaml(text));
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": [1, 2,], "b": 2,}"#),
            r#"{"a": [1, 2], "b": 2}"#
        );
        assert_eq!(strip_trailing_commas("{\"a\": 1,\n}"), "{\"a\": 1\n}");
    }

    #[test]
    fn test_fenced_blocks_tags() {
        let text = "intro\n```json\n{\"a\": 1}\n```\nmid\n```\nplain\n```\n```Python\nprint(1)\n```";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].tag, "json");
        assert_eq!(blocks[0].body, "{\"a\": 1}");
        assert_eq!(blocks[1].tag, "");
        assert_eq!(blocks[1].body, "plain");
        assert_eq!(blocks[2].tag, "python");
        assert!(!blocks[2].is_tagged(&["json", "yaml", "yml"]));
    }

    #[test]
    fn test_fenced_block_single_line() {
        let blocks = fenced_blocks("```{\"a\": 1}```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag, "");
        assert_eq!(blocks[0].body, "{\"a\": 1}");
    }

    #[test]
    fn test_brace_spans_nested() {
        let text = r#"x {"a": {"b": 1}} y {"c": 2}"#;
        let spans: Vec<&str> = brace_spans(text).iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(
            spans,
            vec![r#"{"a": {"b": 1}}"#, r#"{"b": 1}"#, r#"{"c": 2}"#]
        );
    }

    #[test]
    fn test_brace_spans_ignore_braces_in_strings() {
        let text = r#"{"a": "}{"}"#;
        let spans = brace_spans(text);
        assert_eq!(spans[0], (0, text.len()));
    }

    #[test]
    fn test_brace_spans_survive_stray_quote() {
        let text = r#"The panel {5" wide} is fine. Result: {"a": 1}"#;
        let spans: Vec<&str> = brace_spans(text).iter().map(|&(s, e)| &text[s..e]).collect();
        assert!(spans.contains(&r#"{"a": 1}"#));
        assert!(spans.contains(&r#"{5" wide}"#));
    }

    #[test]
    fn test_brace_spans_unbalanced() {
        assert!(brace_spans("} {").is_empty());
        assert_eq!(brace_spans("{ {}").len(), 1);
    }
}
