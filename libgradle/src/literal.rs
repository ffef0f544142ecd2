//! Value classification, duplicate-key folding and array literals.

use crate::scanner::{Cursor, ARRAY_END, ARRAY_START};
use crate::value::{Document, Value};

/// Remove one pair of matching wrapping quotes (`"…"` or `'…'`).
///
/// Mismatched or one-sided quoting is left untouched.
pub fn trim_wrapping_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Turn raw value text into a [`Value`].
///
/// Quotes are stripped first; only the bare tokens `true` and `false` become
/// booleans. Numbers stay text.
pub fn classify(raw: &str) -> Value {
    match trim_wrapping_quotes(raw.trim()) {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        text => Value::Text(text.to_string()),
    }
}

/// Insert a value, folding repeated keys into a sequence.
///
/// The first repeat turns the value into a two-element sequence; later
/// repeats append to it.
pub fn add_value(doc: &mut Document, key: String, value: Value) {
    match doc.get_mut(&key) {
        None => {
            doc.insert(key, value);
        }
        Some(Value::Sequence(items)) => items.push(value),
        Some(existing) => {
            let previous = std::mem::replace(existing, Value::Sequence(Vec::new()));
            *existing = Value::Sequence(vec![previous, value]);
        }
    }
}

/// Read a bracketed, comma-separated list starting at `[`.
///
/// Nested brackets are not supported: the list ends at the first `]`.
/// Elements are trimmed and quote-stripped but never coerced.
pub fn parse_array(cursor: &mut Cursor<'_>) -> Vec<Value> {
    let mut raw = String::new();
    if cursor.peek() == Some(ARRAY_START) {
        cursor.bump();
    }
    while let Some(c) = cursor.peek() {
        cursor.bump();
        if c == ARRAY_END {
            break;
        }
        raw.push(c);
    }
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|item| Value::Text(trim_wrapping_quotes(item.trim()).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    #[test]
    fn test_trim_wrapping_quotes() {
        assert_eq!(trim_wrapping_quotes("\"value\""), "value");
        assert_eq!(trim_wrapping_quotes("'value'"), "value");
        assert_eq!(trim_wrapping_quotes("value"), "value");
        assert_eq!(trim_wrapping_quotes("\"value'"), "\"value'");
        assert_eq!(trim_wrapping_quotes("\"value"), "\"value");
        assert_eq!(trim_wrapping_quotes("\""), "\"");
        assert_eq!(trim_wrapping_quotes("''"), "");
        assert_eq!(trim_wrapping_quotes("\"\"a\"\""), "\"a\"");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("true"), Value::Boolean(true));
        assert_eq!(classify("'false'"), Value::Boolean(false));
        assert_eq!(classify("42"), Value::from("42"));
        assert_eq!(classify("  \"a b\"  "), Value::from("a b"));
        assert_eq!(classify("True"), Value::from("True"));
    }

    #[test]
    fn test_add_value_folds_duplicates() {
        let mut doc = Document::new();
        add_value(&mut doc, "k".into(), "a".into());
        assert_eq!(doc["k"], Value::from("a"));
        add_value(&mut doc, "k".into(), "b".into());
        assert_eq!(doc["k"], Value::Sequence(vec!["a".into(), "b".into()]));
        add_value(&mut doc, "k".into(), "c".into());
        assert_eq!(
            doc["k"],
            Value::Sequence(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    fn array(src: &str) -> (Vec<Value>, String) {
        let chars: Vec<char> = src.chars().collect();
        let mut cursor = Cursor::new(&chars, &ParseOptions::default());
        let items = parse_array(&mut cursor);
        (items, chars[cursor.pos()..].iter().collect())
    }

    #[test]
    fn test_parse_array() {
        let (items, rest) = array("[\"a\", 'b' , c]\nnext");
        assert_eq!(items, vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(rest, "\nnext");
    }

    #[test]
    fn test_parse_array_multiline() {
        let (items, _) = array("[\n  'x',\n  'y'\n]");
        assert_eq!(items, vec!["x".into(), "y".into()]);
    }

    #[test]
    fn test_parse_array_keeps_boolean_text() {
        let (items, _) = array("[true, 'false']");
        assert_eq!(items, vec!["true".into(), "false".into()]);
    }

    #[test]
    fn test_parse_empty_array() {
        let (items, _) = array("[ ]");
        assert!(items.is_empty());
    }
}
