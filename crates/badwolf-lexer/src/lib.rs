//! The BQL lexer (spec §4.1): a state machine of functions turning BQL text
//! into a finite token sequence ending with `Eof`, plus the bounded channel
//! that streams tokens to the parser concurrently with lexing (§5).

mod cursor;
mod keyword;
mod lexer;
mod stream;
mod token;

pub use keyword::Keyword;
pub use lexer::Lexer;
pub use stream::{spawn_lexer, LexerConfig};
pub use token::{Position, Symbol, Token, TokenKind};
