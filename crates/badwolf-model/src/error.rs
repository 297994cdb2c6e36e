use thiserror::Error;

/// Errors raised constructing or parsing model values: types, ids, nodes,
/// predicates, literals, time anchors, and triples.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("invalid type {text:?}: {reason}")]
    InvalidType { text: String, reason: &'static str },

    #[error("invalid id {text:?}: {reason}")]
    InvalidId { text: String, reason: &'static str },

    #[error("invalid node {text:?}: {reason}")]
    InvalidNode { text: String, reason: &'static str },

    #[error("invalid predicate {text:?}: {reason}")]
    InvalidPredicate { text: String, reason: &'static str },

    #[error("invalid literal {text:?}: {reason}")]
    InvalidLiteral { text: String, reason: &'static str },

    #[error("invalid time anchor {text:?}: {reason}")]
    InvalidTimeAnchor { text: String, reason: &'static str },

    #[error("invalid triple {text:?}: {reason}")]
    InvalidTriple { text: String, reason: &'static str },

    #[error("literal exceeds bounded builder maximum length of {max} bytes")]
    LiteralTooLarge { max: usize },
}
