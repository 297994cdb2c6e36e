use smol_str::SmolStr;

use crate::Symbol;

/// One element of a clause: either a terminal (a token kind the lexer can
/// produce) or a reference to another non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<K> {
    Terminal(K),
    NonTerminal(Symbol),
}

/// What `ProcessedElement` (§4.2) actually consumed: a matched terminal
/// (its kind and raw text) or a marker that a sub-symbol has just finished
/// parsing.
#[derive(Debug, Clone)]
pub enum ConsumedElement<K> {
    Terminal(K, SmolStr),
    NonTerminal(Symbol),
}

/// Implemented for whatever token type the lexer hands the parser, so the
/// grammar/parser crates stay generic over it instead of hard-coding
/// `badwolf_lexer::Token`.
pub trait TerminalToken<K> {
    fn kind(&self) -> K;
    fn text(&self) -> SmolStr;
}
