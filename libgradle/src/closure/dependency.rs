//! `dependencies { ... }` interpreter.
//!
//! The body is split into statements, one declaration keyword each, and
//! every statement's dependency notation is matched against a small set of
//! coordinate grammars.

use super::ClosureInterpreter;
use crate::error::Result;
use crate::literal::trim_wrapping_quotes;
use crate::parser::ScopeMode;
use crate::scanner::{is_inline_whitespace, is_line_break, CommentStep, Cursor};
use crate::value::{DependencyDeclaration, ExcludeRule, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::trace;

/// `group:artifact:version`, where the version may be a Maven range or a
/// `${...}` interpolation.
static GAV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w.-]+):([\w.-]+):([\w\[\](){}$,+.-]+)").unwrap());

static KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+").unwrap());

static PROJECT_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"project\([^)]*\)").unwrap());

static MAP_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Keywords that start control flow rather than a declaration.
const IGNORED_KEYWORDS: &[&str] = &["if", "else", "def", "for"];

pub struct Dependencies;

impl ClosureInterpreter for Dependencies {
    fn interpret(&self, cursor: &mut Cursor<'_>, _mode: ScopeMode) -> Result<Value> {
        let declarations: Vec<DependencyDeclaration> = collect_statements(cursor)
            .iter()
            .flat_map(|statement| declarations(statement))
            .collect();
        trace!(count = declarations.len(), "parsed dependency block");
        Ok(Value::DependencyList(declarations))
    }
}

/// Split a block body into statements, consuming its closing `}`.
///
/// A statement ends at a line break outside brackets unless the line ends
/// with a comma. Brackets inside quotes do not count, so version ranges such
/// as `'[2.1,3.0['` stay balanced. Comments at line start are dropped.
fn collect_statements(cursor: &mut Cursor<'_>) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut at_line_start = true;

    loop {
        match cursor.filter_comment() {
            CommentStep::Swallowed => continue,
            CommentStep::Closed => {
                at_line_start = true;
                continue;
            }
            CommentStep::Outside => {}
        }
        let Some(c) = cursor.peek() else {
            break;
        };
        if at_line_start {
            if is_inline_whitespace(c) {
                cursor.bump();
                continue;
            }
            at_line_start = false;
            if cursor.try_open_comment() {
                continue;
            }
        }
        cursor.bump();
        if let Some(q) = quote {
            if is_line_break(c) {
                quote = None;
            } else {
                if c == q {
                    quote = None;
                }
                current.push(c);
                continue;
            }
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '{' | '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            '}' if depth == 0 => {
                push_statement(&mut statements, &mut current);
                return statements;
            }
            '}' | ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if is_line_break(c) => {
                at_line_start = true;
                if depth == 0 && !current.trim_end().ends_with(',') {
                    push_statement(&mut statements, &mut current);
                } else {
                    current.push('\n');
                }
            }
            c => current.push(c),
        }
    }
    push_statement(&mut statements, &mut current);
    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

/// Coordinates found in a dependency notation, before the keyword is attached.
#[derive(Debug, Default, PartialEq)]
struct Coordinates {
    group: String,
    name: String,
    version: String,
}

/// Declarations produced by one statement.
fn declarations(statement: &str) -> Vec<DependencyDeclaration> {
    let Some(keyword) = KEYWORD.find(statement) else {
        trace!(statement, "dependency statement without keyword");
        return Vec::new();
    };
    let kind = keyword.as_str();
    if IGNORED_KEYWORDS.contains(&kind) {
        trace!(kind, "skipping control statement in dependencies");
        return Vec::new();
    }
    let (args, block) = split_trailing_block(&statement[keyword.end()..]);
    let spec = strip_wrapping_parens(args.trim()).trim();
    if spec.is_empty() {
        return Vec::new();
    }
    let excludes = block.map(exclude_rules).unwrap_or_default();

    coordinates(spec)
        .into_iter()
        .map(|c| DependencyDeclaration {
            group: c.group,
            name: c.name,
            version: c.version,
            kind: kind.to_string(),
            excludes: excludes.clone(),
        })
        .collect()
}

/// Classify a dependency notation, trying each grammar in priority order.
fn coordinates(spec: &str) -> Vec<Coordinates> {
    let items = split_arguments(spec);
    let per_item: Option<Vec<Coordinates>> = items.iter().map(|item| gav(item)).collect();
    if let Some(all) = per_item.filter(|all| !all.is_empty()) {
        return all;
    }
    if let Some(found) = gav(spec) {
        return vec![found];
    }
    if spec.contains("project(") {
        let name = PROJECT_CALL
            .find(spec)
            .map_or(spec, |m| m.as_str())
            .to_string();
        return vec![Coordinates {
            name,
            ..Coordinates::default()
        }];
    }
    let mut map = parse_map_notation(spec);
    if let Some(name) = map.remove("name") {
        return vec![Coordinates {
            group: map.remove("group").unwrap_or_default(),
            name,
            version: map.remove("version").unwrap_or_default(),
        }];
    }
    vec![Coordinates {
        name: trim_wrapping_quotes(spec).to_string(),
        ..Coordinates::default()
    }]
}

fn gav(text: &str) -> Option<Coordinates> {
    let caps = GAV.captures(trim_wrapping_quotes(text.trim()))?;
    Some(Coordinates {
        group: caps[1].to_string(),
        name: caps[2].to_string(),
        version: caps[3].to_string(),
    })
}

/// Split `args { body }` at the first top-level `{` outside quotes.
fn split_trailing_block(text: &str) -> (&str, Option<&str>) {
    let mut quote = None;
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, '{') if depth == 0 => {
                let body = &text[i + 1..];
                let body = body.strip_suffix('}').unwrap_or(body);
                return (&text[..i], Some(body));
            }
            _ => {}
        }
    }
    (text, None)
}

/// Remove one pair of parentheses wrapping the whole text.
fn strip_wrapping_parens(text: &str) -> &str {
    if !text.starts_with('(') || !text.ends_with(')') {
        return text;
    }
    let mut depth = 0usize;
    let mut quote = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return if i == text.len() - 1 {
                        &text[1..i]
                    } else {
                        text
                    };
                }
            }
            _ => {}
        }
    }
    text
}

/// Split on commas outside quotes and brackets.
fn split_arguments(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                items.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() || !items.is_empty() {
        items.push(last);
    }
    items
}

/// Parse `key: value, key: value` named arguments.
///
/// Values are trimmed and lose one level of quoting. Items that are not of
/// the `identifier: value` shape are ignored.
fn parse_map_notation(text: &str) -> BTreeMap<String, String> {
    split_arguments(text)
        .into_iter()
        .filter_map(|item| {
            let (key, value) = item.split_once(':')?;
            let key = key.trim();
            MAP_KEY.is_match(key).then(|| {
                (
                    key.to_string(),
                    trim_wrapping_quotes(value.trim()).to_string(),
                )
            })
        })
        .collect()
}

/// `exclude group: 'g', module: 'm'` lines of a declaration's block.
fn exclude_rules(body: &str) -> Vec<ExcludeRule> {
    body.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("exclude")?;
            if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
                return None;
            }
            let rule = parse_map_notation(strip_wrapping_parens(rest.trim()));
            (!rule.is_empty()).then_some(rule)
        })
        .collect()
}
