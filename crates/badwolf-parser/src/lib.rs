//! A generic recursive-descent driver over a `badwolf_grammar::Grammar`
//! (spec §4.2): pulls tokens off an async channel, selects clauses by one
//! token of look-ahead, and fires the grammar's hooks as it goes. This crate
//! knows nothing about BQL; `adapter.rs` is the only place that wires in
//! `badwolf_lexer::Token`.

mod adapter;
mod driver;
mod error;

pub use driver::Parser;
pub use error::DriverError;

#[cfg(test)]
mod tests {
    use badwolf_grammar::{Clause, ConsumedElement, Element, Grammar, Hooks};
    use tokio::sync::mpsc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Kind {
        A,
        B,
        Eof,
    }

    #[derive(Clone)]
    struct Tok(Kind);

    impl badwolf_grammar::TerminalToken<Kind> for Tok {
        fn kind(&self) -> Kind {
            self.0.clone()
        }

        fn text(&self) -> smol_str::SmolStr {
            match self.0 {
                Kind::A => "a".into(),
                Kind::B => "b".into(),
                Kind::Eof => "".into(),
            }
        }
    }

    #[derive(Debug, Default)]
    struct Builder {
        seen: Vec<String>,
    }

    #[derive(Debug)]
    struct HookErr;

    fn on_element(builder: &mut Builder, elem: &ConsumedElement<Kind>) -> Result<(), HookErr> {
        if let ConsumedElement::Terminal(kind, text) = elem {
            builder.seen.push(format!("{kind:?}:{text}"));
        }
        Ok(())
    }

    /// `S -> A S | B | eps`, left-factored on one token of look-ahead.
    fn test_grammar() -> Grammar<Kind, Builder, HookErr> {
        Grammar::new(
            "S",
            [(
                "S",
                vec![
                    Clause::new(vec![Element::Terminal(Kind::A), Element::NonTerminal("S")])
                        .with_hooks(Hooks {
                            on_start: None,
                            on_element: Some(on_element),
                            on_end: None,
                        }),
                    Clause::new(vec![Element::Terminal(Kind::B)]).with_hooks(Hooks {
                        on_start: None,
                        on_element: Some(on_element),
                        on_end: None,
                    }),
                    Clause::new(vec![]),
                ],
            )],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn drives_a_small_left_recursive_free_grammar() {
        let grammar = test_grammar();
        let (tx, rx) = mpsc::channel(8);
        for k in [Kind::A, Kind::A, Kind::B, Kind::Eof] {
            tx.send(Tok(k)).await.unwrap();
        }
        drop(tx);

        let mut builder = Builder::default();
        Parser::parse(&grammar, rx, &mut builder, 1).await.unwrap();

        assert_eq!(builder.seen, vec!["A:a", "A:a", "B:b"]);
    }

    #[tokio::test]
    async fn epsilon_clause_accepts_an_empty_tail() {
        let grammar = test_grammar();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Tok(Kind::Eof)).await.unwrap();
        drop(tx);

        let mut builder = Builder::default();
        Parser::parse(&grammar, rx, &mut builder, 1).await.unwrap();

        assert!(builder.seen.is_empty());
    }

    #[tokio::test]
    async fn unexpected_token_is_reported_as_a_grammar_error() {
        let grammar = test_grammar();
        let (tx, rx) = mpsc::channel(8);
        tx.send(Tok(Kind::Eof)).await.unwrap();
        drop(tx);

        // `Eof` matches neither `A` nor `B` and the grammar has an epsilon
        // fallback, so drive a grammar without one to force the error path.
        let strict = Grammar::<Kind, Builder, HookErr>::new(
            "S",
            [("S", vec![Clause::new(vec![Element::Terminal(Kind::A)])])],
        )
        .unwrap();

        let mut builder = Builder::default();
        let err = Parser::parse(&strict, rx, &mut builder, 1).await.unwrap_err();
        assert!(matches!(err, DriverError::Grammar(_)));
        let _ = grammar;
    }
}
