use std::fmt;

use crate::error::ModelError;
use crate::literal::Literal;
use crate::node::Node;
use crate::predicate::Predicate;

/// The object position of a triple: a node, a predicate (reification), or a
/// literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Node(Node),
    Predicate(Predicate),
    Literal(Literal),
}

impl Object {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Object::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Object::Predicate(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let text = text.trim();
        if text.starts_with('/') {
            return Ok(Object::Node(Node::parse(text)?));
        }
        if text.starts_with('"') && text.contains("@[") {
            return Ok(Object::Predicate(Predicate::parse(text)?));
        }
        if text.starts_with('"') && text.contains("^^type:") {
            let (value, kind) = split_literal(text)?;
            return Ok(Object::Literal(Literal::parse(&value, &kind)?));
        }
        Err(ModelError::InvalidTriple {
            text: text.to_string(),
            reason: "object must be a node, predicate, or literal",
        })
    }
}

fn split_literal(text: &str) -> Result<(String, String), ModelError> {
    let invalid = || ModelError::InvalidLiteral {
        text: text.to_string(),
        reason: "expected \"value\"^^type:kind",
    };
    let rest = text.strip_prefix('"').ok_or_else(invalid)?;
    let close = rest.rfind("\"^^type:").ok_or_else(invalid)?;
    let value = rest[..close].to_string();
    let kind = rest[close + "\"^^type:".len()..].to_string();
    Ok((value, kind))
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Node(n) => write!(f, "{n}"),
            Object::Predicate(p) => write!(f, "{p}"),
            Object::Literal(l) => write!(f, "{l}"),
        }
    }
}
