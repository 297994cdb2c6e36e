use smol_str::SmolStr;
use thiserror::Error;

/// `SemanticError` (spec §7): raised by parser hooks while a `Statement` is
/// being built, and by the final clause-end validation pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    #[error("invalid node literal {text:?}: {reason}")]
    InvalidNode { text: SmolStr, reason: String },

    #[error("invalid predicate literal {text:?}: {reason}")]
    InvalidPredicate { text: SmolStr, reason: String },

    #[error("invalid literal {text:?}: {reason}")]
    InvalidLiteral { text: SmolStr, reason: String },

    #[error("duplicate graph {0:?} in one graph list")]
    DuplicateGraph(SmolStr),

    #[error("projected binding {0:?} is neither aggregated nor in GROUP BY")]
    UngroupedProjection(SmolStr),

    #[error("ORDER BY references unknown binding {0:?}")]
    UnknownOrderBinding(SmolStr),

    #[error("HAVING references unknown binding {0:?}")]
    UnknownHavingBinding(SmolStr),

    #[error("filter function applied twice to binding {0:?}")]
    DuplicateFilter(SmolStr),

    #[error("filter applied to unknown binding {0:?}")]
    UnknownFilterBinding(SmolStr),

    #[error("unknown filter function {0:?}")]
    UnknownFilterFunction(SmolStr),

    #[error("INSERT/DELETE DATA triple has an unbound {position}")]
    UnboundDataTriple { position: &'static str },

    #[error("internal parser state error: {0}")]
    Internal(&'static str),
}
