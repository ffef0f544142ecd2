//! Structural parser.
//!
//! A single forward scan over the script. Each logical line yields at most
//! one key/value pair; `{` recurses into a nested scope (or a closure
//! interpreter for recognised block keys) and `}` returns to the caller.
//! Anything the parser does not understand is kept as opaque text.

use crate::closure;
use crate::error::Result;
use crate::literal::{add_value, classify, parse_array};
use crate::scanner::{
    is_delimiter, is_inline_whitespace, is_line_break, CommentStep, Cursor, ARRAY_START,
    BLOCK_END, BLOCK_START, CALL_START,
};
use crate::skip::{
    construct_for, definition_name, skip_alternative, skip_call, skip_conditional, Construct,
};
use crate::value::{deep_merge, Document, Value};
use std::mem;
use tracing::trace;

/// What happens when a block key recurs within one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRepeat {
    /// Deep-merge the new block into the earlier one.
    Merge,
    /// Keep every occurrence, folding them into a sequence.
    Fold,
}

/// How a scope treats calls, empty values and repeated blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeMode {
    /// Keep `name(...)` at key position as literal text instead of skipping it.
    pub keep_calls: bool,
    /// Record keys whose value is empty, such as bare calls.
    pub keep_empty: bool,
    pub repeated_blocks: BlockRepeat,
}

impl ScopeMode {
    /// Ordinary build script scope.
    pub const DOCUMENT: ScopeMode = ScopeMode {
        keep_calls: false,
        keep_empty: false,
        repeated_blocks: BlockRepeat::Merge,
    };

    /// Body of a `repositories` block, where bare calls are the entries.
    pub const REPOSITORIES: ScopeMode = ScopeMode {
        keep_calls: true,
        keep_empty: true,
        repeated_blocks: BlockRepeat::Fold,
    };

    /// Mode for a block nested inside this scope.
    pub fn nested(self) -> ScopeMode {
        ScopeMode {
            repeated_blocks: BlockRepeat::Merge,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    /// Collecting the key.
    #[default]
    Key,
    /// Collecting the value text.
    Value,
    /// The line produced its result; ignore the rest of it.
    Done,
}

/// Per-line accumulator.
#[derive(Debug, Default)]
struct Line {
    key: String,
    token: String,
    stage: Stage,
    at_line_start: bool,
}

impl Line {
    fn new() -> Self {
        Self {
            at_line_start: true,
            ..Self::default()
        }
    }

    fn reset(&mut self) {
        *self = Line::new();
    }

    /// Store the pending pair, if any, and start a new line.
    fn finish(&mut self, doc: &mut Document, mode: ScopeMode) {
        let (key, raw) = match self.stage {
            Stage::Key => (mem::take(&mut self.token), String::new()),
            Stage::Value => (mem::take(&mut self.key), mem::take(&mut self.token)),
            Stage::Done => (String::new(), String::new()),
        };
        if !key.is_empty() && (mode.keep_empty || !raw.trim().is_empty()) {
            add_value(doc, key, classify(&raw));
        }
        self.reset();
    }
}

/// Parse one scope up to end of input or its closing `}`.
///
/// The cursor starts just past the scope's `{` (or at the start of input)
/// and is left just past the closing `}`.
pub fn parse_scope(cursor: &mut Cursor<'_>, mode: ScopeMode) -> Result<Document> {
    let mut doc = Document::new();
    let mut line = Line::new();

    loop {
        match cursor.filter_comment() {
            CommentStep::Swallowed => continue,
            CommentStep::Closed => {
                line.reset();
                continue;
            }
            CommentStep::Outside => {}
        }
        let Some(c) = cursor.peek() else {
            break;
        };

        if line.at_line_start {
            if is_inline_whitespace(c) {
                cursor.bump();
                continue;
            }
            line.at_line_start = false;
            if cursor.try_open_comment() {
                continue;
            }
        }

        if is_line_break(c) {
            cursor.bump();
            line.finish(&mut doc, mode);
            continue;
        }

        if c == BLOCK_END {
            cursor.bump();
            line.finish(&mut doc, mode);
            if cursor.depth() == 0 {
                trace!("ignoring unmatched closing brace");
                continue;
            }
            return Ok(doc);
        }

        if line.stage == Stage::Done {
            cursor.bump();
            continue;
        }

        if c == BLOCK_START {
            if line.stage == Stage::Key && construct_for(&line.token) == Some(Construct::Alternative)
            {
                skip_alternative(cursor);
                line.stage = Stage::Done;
                continue;
            }
            let key = match line.stage {
                Stage::Key => mem::take(&mut line.token),
                _ => {
                    line.token.clear();
                    mem::take(&mut line.key)
                }
            };
            cursor.bump();
            let value = parse_block(cursor, &key, mode)?;
            if key.is_empty() {
                trace!("dropping block without a key");
            } else {
                insert_block(&mut doc, key, value, mode);
            }
            line.stage = Stage::Done;
            continue;
        }

        if line.stage == Stage::Key {
            if c == CALL_START {
                if construct_for(&line.token) == Some(Construct::Conditional) {
                    skip_conditional(cursor);
                    line.stage = Stage::Done;
                    continue;
                }
                if !mode.keep_calls {
                    let start = cursor.pos();
                    skip_call(cursor);
                    let call = cursor.text_since(start);
                    let mark = cursor.pos();
                    cursor.skip_inline_whitespace();
                    if cursor.peek() == Some(BLOCK_START) {
                        // `name(args) {` keeps the call as the block key.
                        line.token.push_str(call.trim_end());
                    } else {
                        trace!(call = %line.token, "skipping standalone call");
                        cursor.reset_to(mark);
                        line.token.clear();
                    }
                    continue;
                }
            } else if is_delimiter(c) {
                if line.token.is_empty() {
                    cursor.bump();
                    continue;
                }
                match construct_for(&line.token) {
                    Some(Construct::Conditional) => {
                        skip_conditional(cursor);
                        line.stage = Stage::Done;
                    }
                    Some(Construct::Alternative) => {
                        skip_alternative(cursor);
                        line.stage = Stage::Done;
                    }
                    Some(Construct::Definition) => {
                        line.token.clear();
                        match definition_name(cursor) {
                            Some(name) => {
                                line.key = name;
                                line.stage = Stage::Value;
                            }
                            None => line.stage = Stage::Done,
                        }
                    }
                    None => {
                        line.key = mem::take(&mut line.token);
                        line.stage = Stage::Value;
                        cursor.bump();
                    }
                }
                continue;
            }
        } else if line.token.is_empty() {
            if is_delimiter(c) {
                cursor.bump();
                continue;
            }
            if c == ARRAY_START {
                let items = parse_array(cursor);
                let key = mem::take(&mut line.key);
                if !key.is_empty() {
                    add_value(&mut doc, key, Value::Sequence(items));
                }
                line.stage = Stage::Done;
                continue;
            }
        }

        line.token.push(c);
        cursor.bump();
    }

    line.finish(&mut doc, mode);
    Ok(doc)
}

/// Parse a block body through the interpreter registered for its key.
fn parse_block(cursor: &mut Cursor<'_>, key: &str, mode: ScopeMode) -> Result<Value> {
    cursor.enter_block()?;
    trace!(key, depth = cursor.depth(), "entering block");
    let value = closure::interpreter_for(key).interpret(cursor, mode);
    cursor.leave_block();
    value
}

/// Store a block's value, combining it with an earlier block of the same key.
fn insert_block(doc: &mut Document, key: String, value: Value, mode: ScopeMode) {
    if mode.repeated_blocks == BlockRepeat::Fold {
        add_value(doc, key, value);
        return;
    }
    match value {
        Value::Document(incoming) => match doc.get_mut(&key) {
            Some(Value::Document(existing)) => {
                trace!(key = %key, "merging repeated block");
                deep_merge(existing, incoming);
            }
            _ => {
                doc.insert(key, Value::Document(incoming));
            }
        },
        Value::DependencyList(more) => match doc.get_mut(&key) {
            Some(Value::DependencyList(existing)) => existing.extend(more),
            _ => {
                doc.insert(key, Value::DependencyList(more));
            }
        },
        Value::RepositoryList(more) => match doc.get_mut(&key) {
            Some(Value::RepositoryList(existing)) => existing.extend(more),
            _ => {
                doc.insert(key, Value::RepositoryList(more));
            }
        },
        value => {
            doc.insert(key, value);
        }
    }
}
