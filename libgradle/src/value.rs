//! Document model produced by the parser.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One parsed scope: keys in the order they first appeared.
pub type Document = IndexMap<String, Value>;

/// Attribute/value pairs of an `exclude` line, e.g. `group` and `module`.
pub type ExcludeRule = BTreeMap<String, String>;

/// A parsed value.
#[derive(Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Opaque text, quote-stripped.
    Text(String),
    /// `true` or `false` literal.
    Boolean(bool),
    /// Repeated key or array literal.
    Sequence(Vec<Value>),
    /// Nested block.
    Document(Document),
    /// Body of a `dependencies` block.
    DependencyList(Vec<DependencyDeclaration>),
    /// Body of a `repositories` block.
    RepositoryList(Vec<RepositoryEntry>),
}

/// A single dependency declaration such as `compile 'g:a:v'`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    pub group: String,
    pub name: String,
    pub version: String,
    /// Configuration keyword the declaration used (`compile`, `testImplementation`, ...).
    pub kind: String,
    pub excludes: Vec<ExcludeRule>,
}

/// One entry of a `repositories` block.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepositoryEntry {
    #[serde(rename = "type")]
    pub typ: String,
    pub data: RepositoryData,
}

/// Payload of a repository entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RepositoryData {
    /// Bare call such as `mavenCentral()`.
    Unknown { name: String },
    /// Block body or inline value of a named repository.
    Entry(Value),
}

impl RepositoryEntry {
    /// Entry for a bare call with no body.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            typ: "unknown".to_string(),
            data: RepositoryData::Unknown { name: name.into() },
        }
    }

    /// Entry for a named repository with a value.
    pub fn named(typ: impl Into<String>, data: Value) -> Self {
        Self {
            typ: typ.into(),
            data: RepositoryData::Entry(data),
        }
    }
}

impl Value {
    /// Returns `true` for empty text, the value a bare call leaves behind.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Returns the boolean value if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested document if this is a `Document`.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns the declarations if this is a `DependencyList`.
    pub fn as_dependencies(&self) -> Option<&[DependencyDeclaration]> {
        match self {
            Value::DependencyList(deps) => Some(deps),
            _ => None,
        }
    }

    /// Returns the entries if this is a `RepositoryList`.
    pub fn as_repositories(&self) -> Option<&[RepositoryEntry]> {
        match self {
            Value::RepositoryList(repos) => Some(repos),
            _ => None,
        }
    }
}

/// Recursively union `incoming` into `base`.
///
/// Keys present on one side only are copied. When both sides hold a
/// document the merge recurses; otherwise the incoming value replaces the
/// existing one in place, keeping the key's original position.
pub fn deep_merge(base: &mut Document, incoming: Document) {
    for (key, value) in incoming {
        match value {
            Value::Document(nested) => match base.get_mut(&key) {
                Some(Value::Document(existing)) => deep_merge(existing, nested),
                _ => {
                    base.insert(key, Value::Document(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Document(doc) => f.debug_map().entries(doc).finish(),
            Value::DependencyList(deps) => f.debug_list().entries(deps).finish(),
            Value::RepositoryList(repos) => f.debug_list().entries(repos).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

impl From<Vec<DependencyDeclaration>> for Value {
    fn from(deps: Vec<DependencyDeclaration>) -> Self {
        Value::DependencyList(deps)
    }
}

impl From<Vec<RepositoryEntry>> for Value {
    fn from(repos: Vec<RepositoryEntry>) -> Self {
        Value::RepositoryList(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_deep_merge_disjoint_keys() {
        let mut base = doc(&[("x", "1".into())]);
        deep_merge(&mut base, doc(&[("y", "2".into())]));
        assert_eq!(base, doc(&[("x", "1".into()), ("y", "2".into())]));
    }

    #[test]
    fn test_deep_merge_recurses_and_overrides() {
        let mut base = doc(&[
            ("a", doc(&[("x", "1".into()), ("z", "old".into())]).into()),
            ("flag", true.into()),
        ]);
        let incoming = doc(&[
            ("a", doc(&[("y", "2".into()), ("z", "new".into())]).into()),
            ("flag", false.into()),
        ]);
        deep_merge(&mut base, incoming);

        let a = base["a"].as_document().unwrap();
        assert_eq!(a["x"], Value::from("1"));
        assert_eq!(a["y"], Value::from("2"));
        assert_eq!(a["z"], Value::from("new"));
        assert_eq!(base["flag"], Value::Boolean(false));
        // Overridden keys keep their first position.
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["x", "z", "y"]);
    }

    #[test]
    fn test_deep_merge_document_replaces_scalar() {
        let mut base = doc(&[("a", "text".into())]);
        deep_merge(&mut base, doc(&[("a", doc(&[("b", "c".into())]).into())]));
        assert!(base["a"].as_document().is_some());
    }

    #[test]
    fn test_is_empty_text() {
        assert!(Value::from("").is_empty_text());
        assert!(!Value::from("x").is_empty_text());
        assert!(!Value::Document(Document::new()).is_empty_text());
    }
}
