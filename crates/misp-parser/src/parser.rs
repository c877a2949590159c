//! Recursive-descent parser: source text to a single atom tree.

use misp_lexer::{Cursor, Lexeme};
use misp_types::{Atom, Heap, Modifier, ParseError, Position, Record, SourceFile};

use crate::member::join_member;

/// The MISP parser.
///
/// Drives a [`Cursor`] directly and stops at the first fault. Record
/// literals are allocated into the supplied [`Heap`] as they are parsed.
pub struct Parser<'src, 'h> {
    cursor: Cursor<'src>,
    heap: &'h mut Heap,
}

impl<'src, 'h> Parser<'src, 'h> {
    pub fn new(source: &'src SourceFile, heap: &'h mut Heap) -> Self {
        Self {
            cursor: Cursor::new(source),
            heap,
        }
    }

    /// Parse the whole input as exactly one atom.
    ///
    /// Surrounding whitespace and comments are allowed; anything else left
    /// over after the atom is an error.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(mut self) -> Result<Atom, ParseError> {
        self.cursor.skip_trivia();
        if self.cursor.at_end() {
            return Err(self.cursor.error("Unexpected end of input"));
        }
        let atom = self.parse_atom()?;
        self.cursor.skip_trivia();
        if !self.cursor.at_end() {
            return Err(self.cursor.error("Did not consume all input"));
        }
        Ok(atom)
    }

    // ── Atoms ─────────────────────────────────────────────────────────────────

    fn parse_atom(&mut self) -> Result<Atom, ParseError> {
        self.cursor.skip_trivia();

        let modifier = match self.cursor.peek().and_then(Modifier::from_prefix) {
            Some(modifier) => {
                self.cursor.advance();
                modifier
            }
            None => Modifier::None,
        };

        let start = self.cursor.position();
        let Some(next) = self.cursor.peek() else {
            return Err(self.cursor.error("Unexpected end of input"));
        };

        let atom = match next {
            '(' => self.parse_list()?,
            '[' => {
                if modifier != Modifier::None {
                    return Err(self.cursor.error("Modifiers not allowed on record"));
                }
                self.parse_record()?
            }
            ')' | ']' => {
                return Err(self.cursor.error(format!("Unexpected '{next}'")));
            }
            _ => {
                let lexeme = if self.cursor.at_string_start() {
                    self.cursor.scan_string()?
                } else if self.cursor.at_number_start() {
                    self.cursor.scan_number()?
                } else {
                    self.cursor.scan_token()
                };
                if modifier != Modifier::None
                    && matches!(
                        lexeme,
                        Lexeme::Integer(_) | Lexeme::Decimal(_) | Lexeme::String(_)
                    )
                {
                    return Err(self
                        .cursor
                        .error_at("Modifiers not allowed on literals", start));
                }
                self.leaf(lexeme, start)?
            }
        };

        self.cursor.skip_trivia();
        let atom = if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            let rhs_start = self.cursor.position();
            let rhs = self.parse_atom()?;
            if rhs.modifier == Modifier::Expand {
                return Err(self
                    .cursor
                    .error_at("Modifier illegal in this context", rhs_start));
            }
            join_member(atom, rhs)
        } else {
            atom
        };

        Ok(atom.with_modifier(modifier))
    }

    fn leaf(&self, lexeme: Lexeme, start: Position) -> Result<Atom, ParseError> {
        Ok(match lexeme {
            Lexeme::Nil => Atom::nil(),
            Lexeme::Integer(v) => Atom::integer(v),
            Lexeme::Decimal(v) => Atom::decimal(v),
            Lexeme::String(s) => Atom::string(s),
            Lexeme::Token(t) if t.is_empty() => {
                return Err(self.cursor.error_at("Expected an atom", start));
            }
            Lexeme::Token(t) => Atom::token(t),
        })
    }

    // ── Lists ─────────────────────────────────────────────────────────────────

    fn parse_list(&mut self) -> Result<Atom, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance();
        let mut items = Vec::new();
        loop {
            self.cursor.skip_trivia();
            match self.cursor.peek() {
                None => return Err(self.cursor.error_at("Unterminated list", open)),
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => items.push(self.parse_atom()?),
            }
        }
        Ok(Atom::list(items))
    }

    // ── Records ───────────────────────────────────────────────────────────────

    /// `[(name value) ...]`, producing a literal record. Pair values are
    /// stored unevaluated; a later name overwrites an earlier one.
    fn parse_record(&mut self) -> Result<Atom, ParseError> {
        let open = self.cursor.position();
        self.cursor.advance();
        let mut record = Record::literal();
        loop {
            self.cursor.skip_trivia();
            match self.cursor.peek() {
                None => return Err(self.cursor.error_at("Unterminated record", open)),
                Some(']') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    let pair_start = self.cursor.position();
                    let pair = self.parse_atom()?;
                    let Some(items) = pair.as_list() else {
                        return Err(self
                            .cursor
                            .error_at("Expected list inside record", pair_start));
                    };
                    let [name, value] = items else {
                        return Err(self.cursor.error_at(
                            "Malformed record: each entry must be a (name value) pair",
                            pair_start,
                        ));
                    };
                    let Some(name) = name.as_token().or_else(|| name.as_str()) else {
                        return Err(self.cursor.error_at(
                            "Malformed record: entry name must be a token or string",
                            pair_start,
                        ));
                    };
                    record.insert(name, value.clone());
                }
            }
        }
        Ok(Atom::record(self.heap.alloc_record(record)))
    }
}

/// Parse `text` as an anonymous source.
pub fn parse(text: &str, heap: &mut Heap) -> Result<Atom, ParseError> {
    let source = SourceFile::anonymous(text);
    Parser::new(&source, heap).parse()
}
