//! Scanner primitives: the shared cursor, character classes and the comment
//! filter.
//!
//! One [`Cursor`] is created per top-level parse and threaded by mutable
//! reference through every recursive call, so the scan position only ever
//! moves forward and is never duplicated between nested scopes.

use crate::error::{ParseContext, ParseError, Result};
use crate::options::ParseOptions;

pub const BLOCK_START: char = '{';
pub const BLOCK_END: char = '}';
pub const ARRAY_START: char = '[';
pub const ARRAY_END: char = ']';
pub const CALL_START: char = '(';
pub const CALL_END: char = ')';

/// Space or tab.
pub fn is_inline_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

pub fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub fn is_whitespace(c: char) -> bool {
    is_inline_whitespace(c) || is_line_break(c)
}

/// Characters that end a key: whitespace or `=`.
pub fn is_delimiter(c: char) -> bool {
    is_inline_whitespace(c) || c == '='
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// State of the comment filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Idle,
    InLineComment,
    InBlockComment,
}

/// Outcome of offering the current character to the comment filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStep {
    /// Not in a comment; the character is left for the caller.
    Outside,
    /// The character was comment text and has been consumed.
    Swallowed,
    /// A block comment just closed; scanning resumes as at line start.
    Closed,
}

#[derive(Debug, Default)]
struct CommentFilter {
    state: CommentState,
    last: Option<char>,
}

/// Scan position plus the per-parse state that travels with it.
pub struct Cursor<'src> {
    src: &'src [char],
    pos: usize,
    comment: CommentFilter,
    depth: usize,
    max_depth: usize,
    ctx: ParseContext,
}

impl<'src> Cursor<'src> {
    pub fn new(src: &'src [char], options: &ParseOptions) -> Self {
        Self {
            src,
            pos: 0,
            comment: CommentFilter::default(),
            depth: 0,
            max_depth: options.max_depth,
            ctx: ParseContext::new(options.filename.as_deref()),
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    pub fn bump(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind to a position recorded by [`Cursor::pos`] during lookahead.
    pub fn reset_to(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    pub fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for c in s.chars() {
            if self.src.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Text between an earlier position and the cursor.
    pub fn text_since(&self, start: usize) -> String {
        self.src[start.min(self.pos)..self.pos].iter().collect()
    }

    /// Skip spaces and tabs.
    pub fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if is_inline_whitespace(c)) {
            self.pos += 1;
        }
    }

    /// Skip spaces, tabs and line breaks.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if is_whitespace(c)) {
            self.pos += 1;
        }
    }

    // =========================================================================
    // Comment filter
    // =========================================================================

    #[cfg(test)]
    fn comment_state(&self) -> CommentState {
        self.comment.state
    }

    /// Enter a comment if `//` or `/*` starts at the cursor.
    ///
    /// Only meaningful at the start of a logical line; callers check that.
    pub fn try_open_comment(&mut self) -> bool {
        let state = if self.starts_with("//") {
            CommentState::InLineComment
        } else if self.starts_with("/*") {
            CommentState::InBlockComment
        } else {
            return false;
        };
        self.comment = CommentFilter { state, last: None };
        self.pos += 2;
        true
    }

    /// Offer the current character to the comment filter.
    ///
    /// A line comment ends at a line break, which is left unconsumed so the
    /// caller still sees the end of the line.
    pub fn filter_comment(&mut self) -> CommentStep {
        let Some(c) = self.peek() else {
            return CommentStep::Outside;
        };
        match self.comment.state {
            CommentState::Idle => CommentStep::Outside,
            CommentState::InLineComment => {
                if is_line_break(c) {
                    self.comment = CommentFilter::default();
                    CommentStep::Outside
                } else {
                    self.pos += 1;
                    CommentStep::Swallowed
                }
            }
            CommentState::InBlockComment => {
                self.pos += 1;
                if self.comment.last == Some('*') && c == '/' {
                    self.comment = CommentFilter::default();
                    CommentStep::Closed
                } else {
                    self.comment.last = Some(c);
                    CommentStep::Swallowed
                }
            }
        }
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    /// Account for a block about to be parsed.
    pub fn enter_block(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            let (line, col) = self.location();
            return Err(ParseError::NestingTooDeep(self.max_depth, String::new())
                .with_location(&self.ctx, line, col));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Zero-based line and column of the cursor.
    pub fn location(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for &c in &self.src[..self.pos.min(self.src.len())] {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_character_classes() {
        assert!(is_delimiter(' '));
        assert!(is_delimiter('\t'));
        assert!(is_delimiter('='));
        assert!(!is_delimiter('\n'));
        assert!(is_line_break('\r'));
        assert!(is_whitespace('\n'));
        assert!(!is_whitespace('x'));
    }

    #[test]
    fn test_line_comment_leaves_line_break() {
        let src = chars("// note\nx");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        assert!(cursor.try_open_comment());
        while cursor.filter_comment() == CommentStep::Swallowed {}
        assert_eq!(cursor.comment_state(), CommentState::Idle);
        assert_eq!(cursor.peek(), Some('\n'));
    }

    #[test]
    fn test_block_comment_closes_after_terminator() {
        let src = chars("/* a\n * b */x");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        assert!(cursor.try_open_comment());
        let mut step = cursor.filter_comment();
        while step == CommentStep::Swallowed {
            step = cursor.filter_comment();
        }
        assert_eq!(step, CommentStep::Closed);
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn test_empty_block_comment() {
        let src = chars("/**/x");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        assert!(cursor.try_open_comment());
        assert_eq!(cursor.filter_comment(), CommentStep::Swallowed);
        assert_eq!(cursor.filter_comment(), CommentStep::Closed);
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn test_unterminated_block_comment_swallows_to_end() {
        let src = chars("/* open\nb 2");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        assert!(cursor.try_open_comment());
        while cursor.filter_comment() == CommentStep::Swallowed {}
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.comment_state(), CommentState::InBlockComment);
    }

    #[test]
    fn test_no_comment_opener() {
        let src = chars("/x");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        assert!(!cursor.try_open_comment());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let src = chars("a {");
        let options = ParseOptions::default().with_max_depth(1);
        let mut cursor = Cursor::new(&src, &options);
        assert!(cursor.enter_block().is_ok());
        assert!(matches!(
            cursor.enter_block(),
            Err(ParseError::NestingTooDeep(1, _))
        ));
        cursor.leave_block();
        assert_eq!(cursor.depth(), 0);
    }

    #[test]
    fn test_location() {
        let src = chars("ab\ncd");
        let mut cursor = Cursor::new(&src, &ParseOptions::default());
        for _ in 0..4 {
            cursor.bump();
        }
        assert_eq!(cursor.location(), (1, 1));
    }
}
