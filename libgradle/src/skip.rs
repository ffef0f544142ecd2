//! Skip handlers for syntax that carries no structural meaning.
//!
//! Conditionals, standalone calls and method definitions are recognised by
//! their keyword and delimiter shape and discarded wholesale. Nothing inside
//! them is evaluated or retained.

use crate::scanner::{
    is_identifier_char, is_inline_whitespace, is_line_break, CommentStep, Cursor, BLOCK_END,
    BLOCK_START, CALL_END, CALL_START,
};
use tracing::trace;

/// A keyword-introduced construct the parser ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// `if (test) body`, with any `else` chain.
    Conditional,
    /// An `else` that did not directly follow a skipped conditional.
    Alternative,
    /// `def name = value` or `def name(args) { body }`.
    Definition,
}

/// Look up the construct a key token introduces.
pub fn construct_for(token: &str) -> Option<Construct> {
    match token {
        "if" => Some(Construct::Conditional),
        "else" => Some(Construct::Alternative),
        "def" => Some(Construct::Definition),
        _ => None,
    }
}

/// Skip a parenthesised call starting at the next non-blank character.
///
/// Leaves the cursor just past the matching `)`. Returns `false` when no
/// `(` follows or the input ends before the parentheses balance.
pub fn skip_call(cursor: &mut Cursor<'_>) -> bool {
    cursor.skip_inline_whitespace();
    if cursor.peek() != Some(CALL_START) {
        return false;
    }
    skip_balanced(cursor, CALL_START, CALL_END)
}

/// Walks skipped text the way the parser reads it.
///
/// Comments open only at the start of a logical line, and delimiters inside
/// `'..'` or `".."` literals do not count. A literal left open ends at the
/// line break.
#[derive(Debug, Default)]
struct SkipScan {
    quote: Option<char>,
    at_line_start: bool,
}

impl SkipScan {
    /// Move past comment and literal text to the next structural character,
    /// which is returned without being consumed.
    fn next_code(&mut self, cursor: &mut Cursor<'_>) -> Option<char> {
        loop {
            match cursor.filter_comment() {
                CommentStep::Swallowed => continue,
                CommentStep::Closed => {
                    self.at_line_start = true;
                    continue;
                }
                CommentStep::Outside => {}
            }
            let c = cursor.peek()?;
            if let Some(quote) = self.quote {
                if is_line_break(c) {
                    self.quote = None;
                    return Some(c);
                }
                cursor.bump();
                if c == '\\' {
                    cursor.bump();
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }
            if self.at_line_start {
                if is_inline_whitespace(c) {
                    cursor.bump();
                    continue;
                }
                self.at_line_start = false;
                if cursor.try_open_comment() {
                    continue;
                }
            }
            if c == '\'' || c == '"' {
                self.quote = Some(c);
                cursor.bump();
                continue;
            }
            return Some(c);
        }
    }

    /// Consume a character returned by `next_code`.
    fn consume(&mut self, cursor: &mut Cursor<'_>, c: char) {
        cursor.bump();
        if is_line_break(c) {
            self.at_line_start = true;
        }
    }
}

/// Skip from an opening delimiter to just past its match.
fn skip_balanced(cursor: &mut Cursor<'_>, open: char, close: char) -> bool {
    let mut scan = SkipScan::default();
    let mut depth = 0usize;
    while let Some(c) = scan.next_code(cursor) {
        scan.consume(cursor, c);
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return true;
            }
        }
    }
    false
}

/// Skip a single unbraced statement up to (not including) its line break.
///
/// A `}` that would close an enclosing block also ends the statement and is
/// left for the caller.
fn skip_statement(cursor: &mut Cursor<'_>) {
    let mut scan = SkipScan::default();
    let mut depth = 0usize;
    while let Some(c) = scan.next_code(cursor) {
        match c {
            c if is_line_break(c) && depth == 0 => return,
            BLOCK_END if depth == 0 => return,
            BLOCK_START | CALL_START => depth += 1,
            BLOCK_END | CALL_END => depth = depth.saturating_sub(1),
            _ => {}
        }
        scan.consume(cursor, c);
    }
}

/// Skip blank lines and whole-line comments.
fn skip_blank_and_comments(cursor: &mut Cursor<'_>) {
    loop {
        cursor.skip_whitespace();
        if !cursor.try_open_comment() {
            return;
        }
        while cursor.filter_comment() == CommentStep::Swallowed {}
    }
}

/// Skip the body of a conditional branch: a braced block or one statement.
fn skip_body(cursor: &mut Cursor<'_>) {
    skip_blank_and_comments(cursor);
    match cursor.peek() {
        Some(BLOCK_START) => {
            skip_balanced(cursor, BLOCK_START, BLOCK_END);
        }
        Some(_) => skip_statement(cursor),
        None => {}
    }
}

/// Consume `keyword` if it is the next word, otherwise leave the cursor.
fn eat_keyword(cursor: &mut Cursor<'_>, keyword: &str) -> bool {
    let len = keyword.chars().count();
    if cursor.starts_with(keyword) && !matches!(cursor.peek_at(len), Some(c) if is_identifier_char(c))
    {
        for _ in 0..len {
            cursor.bump();
        }
        return true;
    }
    false
}

/// Skip a conditional whose `if` keyword has just been read.
///
/// Skips the parenthesised test, then the braced body or the single
/// following statement, then any `else if` / `else` branches.
pub fn skip_conditional(cursor: &mut Cursor<'_>) {
    let start = cursor.pos();
    loop {
        skip_call(cursor);
        skip_body(cursor);

        let mark = cursor.pos();
        cursor.skip_whitespace();
        if !eat_keyword(cursor, "else") {
            cursor.reset_to(mark);
            break;
        }
        cursor.skip_whitespace();
        if eat_keyword(cursor, "if") {
            continue;
        }
        skip_body(cursor);
        break;
    }
    trace!(start, end = cursor.pos(), "skipped conditional");
}

/// Skip an `else` found at key position, whose keyword has just been read.
pub fn skip_alternative(cursor: &mut Cursor<'_>) {
    cursor.skip_whitespace();
    if eat_keyword(cursor, "if") {
        skip_conditional(cursor);
    } else {
        skip_body(cursor);
    }
}

/// Skip a method definition from its parameter list through its body.
///
/// When the signature is not followed by `{` only the signature is skipped.
pub fn skip_definition(cursor: &mut Cursor<'_>) {
    let start = cursor.pos();
    skip_call(cursor);
    let mark = cursor.pos();
    cursor.skip_whitespace();
    if cursor.peek() == Some(BLOCK_START) {
        skip_balanced(cursor, BLOCK_START, BLOCK_END);
    } else {
        cursor.reset_to(mark);
    }
    trace!(start, end = cursor.pos(), "skipped definition");
}

/// Resolve a `def` declaration whose keyword has just been read.
///
/// For `def [Type] name = value` returns `Some(name)` with the cursor just
/// past the `=`. For `def name(args) { .. }` skips the whole definition and
/// returns `None`. A declaration without `=` ends at the line break.
pub fn definition_name(cursor: &mut Cursor<'_>) -> Option<String> {
    let mut text = String::new();
    while let Some(c) = cursor.peek() {
        if c == '=' {
            cursor.bump();
            break;
        }
        if c == CALL_START {
            skip_definition(cursor);
            return None;
        }
        if is_line_break(c) || c == BLOCK_START || c == BLOCK_END {
            break;
        }
        text.push(c);
        cursor.bump();
    }
    Some(text.split_whitespace().last().unwrap_or("").to_string())
}
