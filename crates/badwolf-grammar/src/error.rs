use thiserror::Error;

use crate::Symbol;

/// Grammar-mismatch and grammar-construction errors (spec §4.2, §7). A
/// `Grammar` that fails validation at construction never reaches the parser,
/// so a caller only ever sees `NotLeftFactored` while building the static
/// grammar table, not mid-parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not consume token {token:?} in production {symbol}")]
    UnexpectedToken { symbol: Symbol, token: String },

    #[error("grammar for symbol {symbol} is not left-factored: {reason}")]
    NotLeftFactored { symbol: Symbol, reason: &'static str },

    #[error("grammar references unknown symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("lookahead peek({requested}) out of range (k={k})")]
    LookaheadOutOfRange { requested: usize, k: usize },
}
