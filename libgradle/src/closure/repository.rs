//! `repositories { ... }` interpreter.

use super::ClosureInterpreter;
use crate::error::Result;
use crate::parser::{parse_scope, ScopeMode};
use crate::scanner::Cursor;
use crate::value::{RepositoryEntry, Value};
use tracing::trace;

pub struct Repositories;

impl ClosureInterpreter for Repositories {
    fn interpret(&self, cursor: &mut Cursor<'_>, _mode: ScopeMode) -> Result<Value> {
        let body = parse_scope(cursor, ScopeMode::REPOSITORIES)?;
        let mut entries = Vec::with_capacity(body.len());
        for (key, value) in body {
            match value {
                Value::Sequence(items) => {
                    entries.extend(items.into_iter().map(|item| entry(&key, item)))
                }
                value => entries.push(entry(&key, value)),
            }
        }
        trace!(count = entries.len(), "parsed repository block");
        Ok(Value::RepositoryList(entries))
    }
}

/// A bare call leaves an empty value and becomes an `unknown` entry.
fn entry(key: &str, value: Value) -> RepositoryEntry {
    if value.is_empty_text() {
        RepositoryEntry::unknown(key)
    } else {
        RepositoryEntry::named(key, value)
    }
}
