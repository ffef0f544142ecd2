//! Closure interpreters.
//!
//! Every block body is handed to an interpreter picked by the block's key.
//! Most blocks become nested documents; `dependencies` and `repositories`
//! are translated into typed records.

mod dependency;
mod repository;

pub use dependency::Dependencies;
pub use repository::Repositories;

use crate::error::Result;
use crate::parser::{parse_scope, ScopeMode};
use crate::scanner::Cursor;
use crate::value::Value;

/// Turns the body of a block into a value.
pub trait ClosureInterpreter: Sync {
    /// Consume a block body whose `{` has already been read, through the
    /// matching `}` or end of input.
    fn interpret(&self, cursor: &mut Cursor<'_>, mode: ScopeMode) -> Result<Value>;
}

/// Default interpreter: the body is an ordinary nested scope.
pub struct NestedDocument;

impl ClosureInterpreter for NestedDocument {
    fn interpret(&self, cursor: &mut Cursor<'_>, mode: ScopeMode) -> Result<Value> {
        parse_scope(cursor, mode.nested()).map(Value::Document)
    }
}

static INTERPRETERS: &[(&str, &dyn ClosureInterpreter)] = &[
    ("dependencies", &Dependencies),
    ("repositories", &Repositories),
];

/// Interpreter registered for a block key.
pub fn interpreter_for(key: &str) -> &'static dyn ClosureInterpreter {
    INTERPRETERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, interpreter)| *interpreter)
        .unwrap_or(&NestedDocument)
}
