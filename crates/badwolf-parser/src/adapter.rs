use badwolf_grammar::TerminalToken;
use badwolf_lexer::{Token, TokenKind};
use smol_str::SmolStr;

impl TerminalToken<TokenKind> for Token {
    fn kind(&self) -> TokenKind {
        self.kind.clone()
    }

    fn text(&self) -> SmolStr {
        self.text.clone()
    }
}
