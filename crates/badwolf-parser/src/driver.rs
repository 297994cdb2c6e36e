use async_recursion::async_recursion;
use badwolf_grammar::{ConsumedElement, Element, Grammar, LookaheadBuffer, Symbol, TerminalToken};
use tokio::sync::mpsc;

use crate::error::DriverError;

/// Runs the grammar's `START` symbol against a token stream, invoking the
/// clause/element hooks along the way (§4.2). `Tok` is whatever the lexer
/// hands over (`badwolf_lexer::Token`); `K` is its kind; `B` is the
/// statement/builder the hooks populate; `E` is the hook error type.
pub struct Parser<'g, Tok, K, B, E> {
    grammar: &'g Grammar<K, B, E>,
    lookahead: LookaheadBuffer<Tok>,
    last: Option<Tok>,
}

impl<'g, Tok, K, B, E> Parser<'g, Tok, K, B, E>
where
    Tok: Clone + TerminalToken<K>,
    K: PartialEq + Clone + std::fmt::Debug,
{
    pub fn new(grammar: &'g Grammar<K, B, E>, k: usize) -> Self {
        Self {
            grammar,
            lookahead: LookaheadBuffer::new(k),
            last: None,
        }
    }

    /// The single top-level operation (§4.2): `Parse(token_stream, builder)`.
    pub async fn parse(
        grammar: &'g Grammar<K, B, E>,
        mut rx: mpsc::Receiver<Tok>,
        builder: &mut B,
        k: usize,
    ) -> Result<(), DriverError<E>> {
        let mut parser = Self::new(grammar, k);
        parser.fill(&mut rx, 1).await?;
        parser.consume(&mut rx, grammar.start(), builder).await?;
        Ok(())
    }

    async fn fill(&mut self, rx: &mut mpsc::Receiver<Tok>, n: usize) -> Result<(), DriverError<E>> {
        while !self.lookahead.is_filled(n) {
            let tok = match rx.recv().await {
                Some(tok) => tok,
                None => self
                    .last
                    .clone()
                    .expect("lexer always sends at least one (EOF/error) token before closing"),
            };
            self.last = Some(tok.clone());
            self.lookahead.push(tok);
        }
        Ok(())
    }

    #[async_recursion(?Send)]
    async fn consume(
        &mut self,
        rx: &mut mpsc::Receiver<Tok>,
        symbol: Symbol,
        builder: &mut B,
    ) -> Result<(), DriverError<E>> {
        self.fill(rx, 1).await?;
        let current_kind = self.lookahead.current().map_err(DriverError::Grammar)?.kind();
        let clause = self.grammar.select_clause(symbol, Some(&current_kind))?;
        self.expect(rx, symbol, clause, builder).await
    }

    #[async_recursion(?Send)]
    async fn expect(
        &mut self,
        rx: &mut mpsc::Receiver<Tok>,
        symbol: Symbol,
        clause: &'g badwolf_grammar::Clause<K, B, E>,
        builder: &mut B,
    ) -> Result<(), DriverError<E>> {
        if let Some(hook) = clause.hooks.on_start {
            hook(builder, symbol).map_err(DriverError::Hook)?;
        }

        for element in &clause.elements {
            let consumed = match element {
                Element::Terminal(expected) => {
                    self.fill(rx, 1).await?;
                    let tok = self.lookahead.consume().expect("just filled to 1");
                    let actual = tok.kind();
                    if &actual != expected {
                        return Err(DriverError::Grammar(
                            badwolf_grammar::ParseError::UnexpectedToken {
                                symbol,
                                token: format!("{actual:?}"),
                            },
                        ));
                    }
                    let text = tok.text();
                    ConsumedElement::Terminal(actual, text)
                }
                Element::NonTerminal(sub_symbol) => {
                    let sub_symbol = *sub_symbol;
                    self.consume(rx, sub_symbol, builder).await?;
                    ConsumedElement::NonTerminal(sub_symbol)
                }
            };

            if let Some(hook) = clause.hooks.on_element {
                hook(builder, &consumed).map_err(DriverError::Hook)?;
            }
        }

        if let Some(hook) = clause.hooks.on_end {
            hook(builder, symbol).map_err(DriverError::Hook)?;
        }

        Ok(())
    }
}
