//! Character-level cursor over MISP source text.

use misp_types::{ParseError, Position, SourceFile};

/// Characters treated as whitespace between atoms.
pub(crate) const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Cursor over the characters of a [`SourceFile`].
///
/// Tracks line and column as it advances; [`Cursor::backtrack`] restores a
/// previously taken [`Cursor::position`] exactly.
pub struct Cursor<'src> {
    source: &'src SourceFile,
    chars: Vec<char>,
    /// Current character offset into `chars`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'src SourceFile) -> Self {
        Self {
            source,
            chars: source.source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn source(&self) -> &'src SourceFile {
        self.source
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// `true` when the next character satisfies `pred`.
    pub fn next_is(&self, pred: impl FnOnce(char) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.col)
    }

    /// Rewind to a position previously returned by [`Cursor::position`].
    pub fn backtrack(&mut self, to: Position) {
        self.pos = to.offset;
        self.line = to.line;
        self.col = to.column;
    }

    /// The characters between `from` and the current position.
    pub fn text_since(&self, from: Position) -> String {
        self.chars[from.offset..self.pos].iter().collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and `;` line comments.
    pub fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if WHITESPACE.contains(&ch) {
                self.advance();
            } else if ch == ';' {
                while self.next_is(|c| c != '\n') {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────

    /// An error at the current position.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(message, self.position())
    }

    pub fn error_at(&self, message: impl Into<String>, position: Position) -> ParseError {
        ParseError::new(self.source, message, position)
    }
}
