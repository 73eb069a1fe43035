//! The ordered extraction strategies.
//!
//! Each strategy is a pure function from the (trimmed) response text to the
//! documents it can recover, in the order it finds them. Strategies never
//! fail: a strategy that finds nothing returns an empty list.

use super::heuristics::{
    Object, brace_spans, fenced_blocks, looks_like_json, looks_like_yaml, strip_trailing_commas,
    try_parse_json, try_parse_yaml,
};
use regex::Regex;
use std::sync::LazyLock;

// A JSON string literal, escapes included.
static STRING_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).unwrap());

/// A named extraction strategy.
#[derive(Debug, Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub run: fn(&str) -> Vec<Object>,
}

/// All strategies, in the order they are tried.
pub const STRATEGIES: [Strategy; 8] = [
    Strategy {
        name: "data_fences",
        run: data_fences,
    },
    Strategy {
        name: "any_fence",
        run: any_fence,
    },
    Strategy {
        name: "brace_spans",
        run: balanced_objects,
    },
    Strategy {
        name: "whole_text",
        run: whole_text,
    },
    Strategy {
        name: "yaml_document",
        run: yaml_document,
    },
    Strategy {
        name: "escaped_string",
        run: escaped_string,
    },
    Strategy {
        name: "trailing_commas",
        run: trailing_commas,
    },
    Strategy {
        name: "outer_braces",
        run: outer_braces,
    },
];

const DATA_TAGS: [&str; 3] = ["json", "yaml", "yml"];

/// Fenced blocks tagged `json`/`yaml`/`yml` or untagged.
///
/// JSON first; YAML when the body looks like YAML.
pub fn data_fences(text: &str) -> Vec<Object> {
    fenced_blocks(text)
        .into_iter()
        .filter(|block| block.is_tagged(&DATA_TAGS))
        .filter_map(|block| {
            try_parse_json(block.body).or_else(|| {
                if looks_like_yaml(block.body) {
                    try_parse_yaml(block.body)
                } else {
                    None
                }
            })
        })
        .collect()
}

/// Every fenced block regardless of tag, gated by shape heuristics.
pub fn any_fence(text: &str) -> Vec<Object> {
    fenced_blocks(text)
        .into_iter()
        .filter_map(|block| {
            if looks_like_json(block.body) {
                try_parse_json(block.body)
            } else if looks_like_yaml(block.body) {
                try_parse_yaml(block.body)
            } else {
                None
            }
        })
        .collect()
}

/// Balanced `{...}` spans anywhere in the text, longest first.
///
/// Spans nested inside a span that already parsed are not tried again.
/// Empty objects are skipped.
pub fn balanced_objects(text: &str) -> Vec<Object> {
    let mut parsed: Vec<(usize, usize, Object)> = Vec::new();

    for (start, end) in brace_spans(text) {
        let inside_parsed = parsed.iter().any(|&(s, e, _)| s <= start && end <= e);
        if inside_parsed {
            continue;
        }
        if let Some(object) = try_parse_json(&text[start..end])
            && !object.is_empty()
        {
            parsed.push((start, end, object));
        }
    }

    // Stable: equal lengths keep text order
    parsed.sort_by_key(|&(start, end, _)| std::cmp::Reverse(end - start));
    parsed.into_iter().map(|(_, _, object)| object).collect()
}

/// The entire text as one JSON document.
pub fn whole_text(text: &str) -> Vec<Object> {
    try_parse_json(text).into_iter().collect()
}

/// The entire text as YAML, when it carries an `openapi:` header or starts
/// with a document marker.
pub fn yaml_document(text: &str) -> Vec<Object> {
    if !(text.to_lowercase().contains("openapi:") || text.starts_with("---")) {
        return Vec::new();
    }
    try_parse_yaml(text).into_iter().collect()
}

/// JSON carried inside a quoted, escaped string: `"{\"key\": 1}"`.
pub fn escaped_string(text: &str) -> Vec<Object> {
    STRING_LITERAL_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|literal| literal.contains('{') && literal.contains('}'))
        .filter_map(|literal| serde_json::from_str::<String>(literal).ok())
        .filter_map(|unescaped| try_parse_json(&unescaped))
        .collect()
}

/// The entire text after removing trailing commas.
pub fn trailing_commas(text: &str) -> Vec<Object> {
    try_parse_json(&strip_trailing_commas(text))
        .into_iter()
        .collect()
}

/// Everything from the first `{` to the last `}`.
pub fn outer_braces(text: &str) -> Vec<Object> {
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => {
            try_parse_json(&text[first..=last]).into_iter().collect()
        }
        _ => Vec::new(),
    }
}
