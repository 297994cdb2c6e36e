use badwolf_model::{Literal, Node, Predicate, PredicateBound};
use smol_str::SmolStr;

/// A lexed `Variable` token's text excludes the leading `?` (§4.1); every
/// binding name stored on `Statement` re-adds it so row/column keys read the
/// same way the query spelled them.
pub(crate) fn binding_name(text: &str) -> SmolStr {
    format!("?{text}").into()
}

/// One value a clause position can hold before query time (§9 design note:
/// "nil-as-value for optional positions").
#[derive(Debug, Clone, PartialEq)]
pub enum BoundTerm {
    Node(Node),
    Predicate(Predicate),
    PredicateBound(PredicateBound),
    Literal(Literal),
    /// `_:label`, a per-statement reification placeholder (CONSTRUCT only).
    BlankNode(SmolStr),
}

/// A clause position: either a literal term fixed at parse time, or a query
/// variable resolved against the store at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Bound(BoundTerm),
    Var(SmolStr),
}

impl Term {
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Term::Var(name) => Some(name),
            Term::Bound(_) => None,
        }
    }
}

/// The aliases a position can export into the result row (§3.3, §9). Not
/// every field applies to every position — subject never sets `at_alias`,
/// only a node object sets `type_alias` — the grammar accepts all four
/// keyword forms uniformly and the planner ignores one that doesn't apply
/// to the resolved value (§4.4.4 skippable-vs-fatal misuse).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSet {
    pub value_binding: Option<SmolStr>,
    pub type_alias: Option<SmolStr>,
    pub id_alias: Option<SmolStr>,
    pub at_alias: Option<SmolStr>,
}

/// `latest`/`isTemporal`/`isImmutable` (§4.4.3d).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFn {
    Latest,
    IsTemporal,
    IsImmutable,
}

impl FilterFn {
    /// Matches case-insensitively (§4.4.3d: `latest`/`isTemporal`/`isImmutable`
    /// are recognized regardless of casing).
    pub fn lookup(name: &str) -> Option<FilterFn> {
        match name.to_ascii_lowercase().as_str() {
            "latest" => Some(FilterFn::Latest),
            "istemporal" => Some(FilterFn::IsTemporal),
            "isimmutable" => Some(FilterFn::IsImmutable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub function: FilterFn,
    pub binding: SmolStr,
}
