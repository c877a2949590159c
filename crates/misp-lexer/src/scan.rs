//! Lexeme scanners for number, string and token literals.

use misp_types::ParseError;

use crate::cursor::{Cursor, WHITESPACE};

/// A scanned leaf literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Nil,
    Integer(i32),
    Decimal(f32),
    String(String),
    Token(String),
}

/// Characters that end a token.
fn ends_token(ch: char) -> bool {
    WHITESPACE.contains(&ch) || matches!(ch, '.' | '(' | ')')
}

/// Characters allowed straight after a number or string literal.
fn ends_literal(ch: char) -> bool {
    WHITESPACE.contains(&ch) || matches!(ch, '.' | ')')
}

impl Cursor<'_> {
    /// `true` if the next character can begin a number (or a lone `-` token).
    pub fn at_number_start(&self) -> bool {
        self.next_is(|c| c.is_ascii_digit() || c == '-')
    }

    /// `true` if the next character opens a string literal.
    pub fn at_string_start(&self) -> bool {
        self.peek() == Some('"')
    }

    // ─────────────────────────────────────────────────────────────
    // Numbers
    // ─────────────────────────────────────────────────────────────

    /// Scan `-?digits(.digits)?`.
    ///
    /// A `-` that is not followed by a digit is rescanned as a token, so the
    /// subtraction builtin's name lexes normally.
    pub fn scan_number(&mut self) -> Result<Lexeme, ParseError> {
        let start = self.position();
        if self.peek() == Some('-') {
            self.advance();
            if !self.next_is(|c| c.is_ascii_digit()) {
                self.backtrack(start);
                return Ok(self.scan_token());
            }
        }

        while self.next_is(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut decimal = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            decimal = true;
            self.advance();
            while self.next_is(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.text_since(start);
        if !self.at_end() && !self.next_is(ends_literal) {
            return Err(self.error("Expected end of token"));
        }

        if decimal {
            text.parse::<f32>()
                .map(Lexeme::Decimal)
                .map_err(|_| self.error_at(format!("Malformed decimal literal '{text}'"), start))
        } else {
            text.parse::<i32>()
                .map(Lexeme::Integer)
                .map_err(|_| self.error_at(format!("Integer literal '{text}' out of range"), start))
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Strings
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting at its opening `"`.
    ///
    /// Only `\n` and `\\` escapes exist.
    pub fn scan_string(&mut self) -> Result<Lexeme, ParseError> {
        self.advance();
        let mut buf = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("Unexpected end of input in string literal")),
                Some('"') => break,
                Some('\\') => {
                    let escape = self.position();
                    match self.advance() {
                        Some('n') => buf.push('\n'),
                        Some('\\') => buf.push('\\'),
                        Some(other) => {
                            return Err(self.error_at(
                                format!("Unknown escape sequence '\\{other}'"),
                                escape,
                            ))
                        }
                        None => {
                            return Err(self.error("Unexpected end of input in escape sequence"))
                        }
                    }
                }
                Some(ch) => buf.push(ch),
            }
        }

        if !self.at_end() && !self.next_is(ends_literal) {
            return Err(self.error("Expected end of token"));
        }
        Ok(Lexeme::String(buf))
    }

    // ─────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────

    /// Scan a token up to whitespace, `.`, `(` or `)`. `nil` scans as [`Lexeme::Nil`].
    ///
    /// May return an empty token; the caller decides whether that is an error.
    pub fn scan_token(&mut self) -> Lexeme {
        let start = self.position();
        while self.next_is(|c| !ends_token(c)) {
            self.advance();
        }
        let text = self.text_since(start);
        if text == "nil" {
            Lexeme::Nil
        } else {
            Lexeme::Token(text)
        }
    }
}
