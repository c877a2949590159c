//! MISP lexer: a character cursor plus scanners for leaf literals.
//!
//! MISP's grammar is small enough that the parser drives the cursor
//! directly instead of consuming a token stream.

pub mod cursor;
pub mod scan;

pub use cursor::Cursor;
pub use scan::Lexeme;
