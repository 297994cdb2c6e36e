use std::collections::BTreeMap;

use badwolf_helpers::IndexMap;

use crate::element::Element;
use crate::error::ParseError;
use crate::hooks::Hooks;
use crate::Symbol;

/// One alternative production for a non-terminal: an ordered list of
/// elements (empty means ε) plus the hooks invoked while parsing it.
pub struct Clause<K, B, E> {
    pub elements: Vec<Element<K>>,
    pub hooks: Hooks<K, B, E>,
}

impl<K, B, E> Clause<K, B, E> {
    pub fn new(elements: Vec<Element<K>>) -> Self {
        Self {
            elements,
            hooks: Hooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks<K, B, E>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn is_epsilon(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A non-terminal's clauses, plus a precomputed index from leading terminal
/// to the one non-ε clause it selects (left-factoring guarantees this index
/// is unambiguous).
struct Production<K, B, E> {
    clauses: Vec<Clause<K, B, E>>,
    epsilon_index: Option<usize>,
}

/// The grammar as data (§4.2, §9): a map from non-terminal to its
/// left-factored clauses. Validated once at construction, then immutable.
pub struct Grammar<K, B, E> {
    start: Symbol,
    productions: BTreeMap<Symbol, Production<K, B, E>>,
}

impl<K, B, E> Grammar<K, B, E>
where
    K: PartialEq + Clone + std::fmt::Debug,
{
    /// Builds and validates a grammar. A production list is left-factored
    /// iff at most one of its clauses is ε and every non-ε clause's first
    /// element is a terminal (never a non-terminal) — this is exactly what
    /// lets `select_clause` dispatch on one token of look-ahead.
    pub fn new(
        start: Symbol,
        productions: impl IntoIterator<Item = (Symbol, Vec<Clause<K, B, E>>)>,
    ) -> Result<Self, ParseError> {
        let mut built: BTreeMap<Symbol, Production<K, B, E>> = BTreeMap::new();

        for (symbol, clauses) in productions {
            let mut epsilon_index = None;
            for (idx, clause) in clauses.iter().enumerate() {
                if clause.is_epsilon() {
                    if epsilon_index.is_some() {
                        return Err(ParseError::NotLeftFactored {
                            symbol,
                            reason: "more than one epsilon clause",
                        });
                    }
                    epsilon_index = Some(idx);
                } else if matches!(clause.elements[0], Element::NonTerminal(_)) {
                    return Err(ParseError::NotLeftFactored {
                        symbol,
                        reason: "a non-epsilon clause's first element is a non-terminal",
                    });
                }
            }
            built.insert(
                symbol,
                Production {
                    clauses,
                    epsilon_index,
                },
            );
        }

        let grammar = Self {
            start,
            productions: built,
        };

        if !grammar.productions.contains_key(start) {
            return Err(ParseError::UnknownSymbol(start));
        }
        grammar.validate_references()?;
        Ok(grammar)
    }

    fn validate_references(&self) -> Result<(), ParseError> {
        for production in self.productions.values() {
            for clause in &production.clauses {
                for element in &clause.elements {
                    if let Element::NonTerminal(sym) = element {
                        if !self.productions.contains_key(sym) {
                            return Err(ParseError::UnknownSymbol(sym));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn start(&self) -> Symbol {
        self.start
    }

    /// Selects the clause whose leading terminal matches `current`, falling
    /// back to the ε clause if present (§4.2 `consume`).
    pub fn select_clause(
        &self,
        symbol: Symbol,
        current: Option<&K>,
    ) -> Result<&Clause<K, B, E>, ParseError> {
        let production = self
            .productions
            .get(symbol)
            .ok_or(ParseError::UnknownSymbol(symbol))?;

        if let Some(current) = current {
            for clause in &production.clauses {
                if let Some(Element::Terminal(expected)) = clause.elements.first() {
                    if expected == current {
                        return Ok(clause);
                    }
                }
            }
        }

        if let Some(idx) = production.epsilon_index {
            return Ok(&production.clauses[idx]);
        }

        Err(ParseError::UnexpectedToken {
            symbol,
            token: format!("{current:?}"),
        })
    }

    pub fn clauses(&self, symbol: Symbol) -> Option<&[Clause<K, B, E>]> {
        self.productions.get(symbol).map(|p| p.clauses.as_slice())
    }

    pub fn symbols(&self) -> IndexMap<Symbol, ()> {
        self.productions.keys().map(|s| (*s, ())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum T {
        A,
        B,
    }

    struct Builder;
    #[derive(Debug)]
    struct Err_;

    #[test]
    fn rejects_two_epsilon_clauses() {
        let result = Grammar::<T, Builder, Err_>::new(
            "S",
            [("S", vec![Clause::new(vec![]), Clause::new(vec![])])],
        );
        assert!(matches!(
            result,
            Err(ParseError::NotLeftFactored { symbol: "S", .. })
        ));
    }

    #[test]
    fn rejects_nonterminal_first_in_nonepsilon_clause() {
        let result = Grammar::<T, Builder, Err_>::new(
            "S",
            [
                ("S", vec![Clause::new(vec![Element::NonTerminal("X")])]),
                ("X", vec![Clause::new(vec![Element::Terminal(T::A)])]),
            ],
        );
        assert!(matches!(result, Err(ParseError::NotLeftFactored { .. })));
    }

    #[test]
    fn selects_matching_clause_or_falls_back_to_epsilon() {
        let grammar = Grammar::<T, Builder, Err_>::new(
            "S",
            [(
                "S",
                vec![
                    Clause::new(vec![Element::Terminal(T::A)]),
                    Clause::new(vec![]),
                ],
            )],
        )
        .unwrap();

        assert!(grammar.select_clause("S", Some(&T::A)).unwrap().elements.len() == 1);
        assert!(grammar.select_clause("S", Some(&T::B)).unwrap().is_epsilon());
        assert!(grammar.select_clause("S", None).unwrap().is_epsilon());
    }
}
