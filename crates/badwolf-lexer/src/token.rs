use smol_str::SmolStr;

use crate::keyword::Keyword;

/// Punctuation terminals (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Dot,
    Semicolon,
    Comma,
    Lt,
    Gt,
    Eq,
}

impl Symbol {
    pub fn ch(&self) -> char {
        match self {
            Symbol::LBrace => '{',
            Symbol::RBrace => '}',
            Symbol::LParen => '(',
            Symbol::RParen => ')',
            Symbol::Dot => '.',
            Symbol::Semicolon => ';',
            Symbol::Comma => ',',
            Symbol::Lt => '<',
            Symbol::Gt => '>',
            Symbol::Eq => '=',
        }
    }
}

/// The kind of a lexed token. Raw-text kinds (`Node`, `BlankNode`,
/// `Predicate`, `Literal`) carry their exact source slice; downstream value
/// parsing into the typed model (`badwolf-model`) happens in the semantic
/// layer, not in the lexer (spec §1: literal parsing detail is not core to
/// the lexer's contract).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    /// `?binding_name`, text excludes the leading `?`.
    Variable,
    /// `/type<id>`, escapes uninterpreted.
    Node,
    /// `_:label`.
    BlankNode,
    /// Any alphabetic word that is not a reserved keyword, e.g. a `FILTER`
    /// function name (`latest`, `isTemporal`, `isImmutable`) — those names
    /// are not part of the closed keyword list (§4.1).
    Word,
    /// `"id"@[]`, `"id"@[t]`, or `"id"@[lo,hi]`.
    Predicate,
    /// `"value"^^type:kind`.
    Literal,
    Error,
    Eof,
}

/// A single lexical position, 1-based line and column (§4.1 error format
/// `[lexer:<line>:<col>] <reason>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub error_msg: Option<SmolStr>,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, pos: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            error_msg: None,
            pos,
        }
    }

    pub fn error(msg: impl Into<SmolStr>, pos: Position) -> Self {
        Self {
            kind: TokenKind::Error,
            text: SmolStr::default(),
            error_msg: Some(msg.into()),
            pos,
        }
    }

    pub fn eof(pos: Position) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: SmolStr::default(),
            error_msg: None,
            pos,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error)
    }

    /// The `"[lexer:<line>:<col>] <reason>"` message an `Error` token carries.
    pub fn error_message(&self) -> Option<String> {
        self.error_msg
            .as_ref()
            .map(|reason| format!("[lexer:{}:{}] {}", self.pos.line, self.pos.col, reason))
    }
}
