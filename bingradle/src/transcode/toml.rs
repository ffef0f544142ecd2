//! TOML transcoding.
//!
//! Mapping from a parsed script to TOML:
//!   - Value::Text            -> TOML string
//!   - Value::Boolean         -> TOML boolean
//!   - Value::Sequence        -> TOML array
//!   - Value::Document        -> TOML table (inline table inside arrays)
//!   - Value::DependencyList  -> array of inline tables
//!   - Value::RepositoryList  -> array of inline tables with `type` and `data`
//!
//! Keys keep their source order. Keys that are not bare TOML keys, such as
//! `vectorDrawables.useSupportLibrary`, are quoted by the emitter.

use libgradle::{DependencyDeclaration, Document, RepositoryData, RepositoryEntry, Value};
use toml_edit::{Array, DocumentMut, Formatted, InlineTable, Item, Table};

/// Encode a document as TOML text.
pub fn encode(doc: &Document) -> Result<String, String> {
    let mut out = DocumentMut::new();
    for (key, item) in document_to_table(doc).iter() {
        out[key] = item.clone();
    }
    Ok(out.to_string())
}

fn document_to_table(doc: &Document) -> Table {
    let mut table = Table::new();
    for (key, value) in doc {
        let item = match value {
            Value::Document(nested) => Item::Table(document_to_table(nested)),
            other => Item::Value(value_to_toml(other)),
        };
        table.insert(key, item);
    }
    table
}

fn value_to_toml(value: &Value) -> toml_edit::Value {
    match value {
        Value::Text(s) => toml_edit::Value::String(Formatted::new(s.clone())),
        Value::Boolean(b) => toml_edit::Value::Boolean(Formatted::new(*b)),
        Value::Sequence(items) => {
            toml_edit::Value::Array(items.iter().map(value_to_toml).collect::<Array>())
        }
        Value::Document(doc) => toml_edit::Value::InlineTable(document_to_inline(doc)),
        Value::DependencyList(deps) => {
            toml_edit::Value::Array(deps.iter().map(dependency_to_toml).collect::<Array>())
        }
        Value::RepositoryList(repos) => {
            toml_edit::Value::Array(repos.iter().map(repository_to_toml).collect::<Array>())
        }
    }
}

fn document_to_inline(doc: &Document) -> InlineTable {
    let mut table = InlineTable::new();
    for (key, value) in doc {
        table.insert(key, value_to_toml(value));
    }
    table
}

fn dependency_to_toml(dep: &DependencyDeclaration) -> toml_edit::Value {
    let mut table = InlineTable::new();
    table.insert("group", dep.group.as_str().into());
    table.insert("name", dep.name.as_str().into());
    table.insert("version", dep.version.as_str().into());
    table.insert("kind", dep.kind.as_str().into());
    let excludes = dep
        .excludes
        .iter()
        .map(|rule| {
            let mut t = InlineTable::new();
            for (k, v) in rule {
                t.insert(k, v.as_str().into());
            }
            toml_edit::Value::InlineTable(t)
        })
        .collect::<Array>();
    table.insert("excludes", toml_edit::Value::Array(excludes));
    toml_edit::Value::InlineTable(table)
}

fn repository_to_toml(repo: &RepositoryEntry) -> toml_edit::Value {
    let mut table = InlineTable::new();
    table.insert("type", repo.typ.as_str().into());
    let data = match &repo.data {
        RepositoryData::Unknown { name } => {
            let mut t = InlineTable::new();
            t.insert("name", name.as_str().into());
            toml_edit::Value::InlineTable(t)
        }
        RepositoryData::Entry(value) => value_to_toml(value),
    };
    table.insert("data", data);
    toml_edit::Value::InlineTable(table)
}
