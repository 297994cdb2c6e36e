use std::fmt;

use smol_str::SmolStr;

use crate::error::ModelError;

/// A tagged literal value. Exactly one variant is ever populated — no
/// reflection, no type erasure.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Text(SmolStr),
    Blob(Vec<u8>),
}

impl Literal {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "bool",
            Literal::Int64(_) => "int64",
            Literal::Float64(_) => "float64",
            Literal::Text(_) => "text",
            Literal::Blob(_) => "blob",
        }
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Literal::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Literal::Float64(v) => Some(*v),
            Literal::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Int64(_) | Literal::Float64(_))
    }

    /// Parse the value portion of `"<value>"^^type:<kind>`, given the already
    /// split `value` and `kind` strings.
    pub fn parse(value: &str, kind: &str) -> Result<Self, ModelError> {
        let err = |reason: &'static str| ModelError::InvalidLiteral {
            text: format!("\"{value}\"^^type:{kind}"),
            reason,
        };
        match kind {
            "bool" => match value {
                "true" => Ok(Literal::Bool(true)),
                "false" => Ok(Literal::Bool(false)),
                _ => Err(err("bool literal must be 'true' or 'false'")),
            },
            "int64" => value
                .parse::<i64>()
                .map(Literal::Int64)
                .map_err(|_| err("not a valid int64")),
            "float64" => value
                .parse::<f64>()
                .map(Literal::Float64)
                .map_err(|_| err("not a valid float64")),
            "text" => Ok(Literal::Text(SmolStr::new(value))),
            "blob" => {
                let bytes = hex_decode(value).ok_or_else(|| err("not valid hex-encoded blob"))?;
                Ok(Literal::Blob(bytes))
            }
            _ => Err(err("unknown literal type kind")),
        }
    }
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "\"{v}\"^^type:bool"),
            Literal::Int64(v) => write!(f, "\"{v}\"^^type:int64"),
            Literal::Float64(v) => write!(f, "\"{v}\"^^type:float64"),
            Literal::Text(v) => write!(f, "\"{v}\"^^type:text"),
            Literal::Blob(v) => write!(f, "\"{}\"^^type:blob", hex_encode(v)),
        }
    }
}

/// Rejects text/blob literals exceeding a configured maximum byte length
/// (§3.1). Immutable once built; reused across many literal constructions.
#[derive(Debug, Clone, Copy)]
pub struct BoundedBuilder {
    max_len: usize,
}

impl BoundedBuilder {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn build(&self, literal: Literal) -> Result<Literal, ModelError> {
        let len = match &literal {
            Literal::Text(t) => t.len(),
            Literal::Blob(b) => b.len(),
            _ => return Ok(literal),
        };
        if len > self.max_len {
            return Err(ModelError::LiteralTooLarge { max: self.max_len });
        }
        Ok(literal)
    }
}

impl Default for BoundedBuilder {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_each_kind() {
        assert_eq!(Literal::parse("true", "bool").unwrap(), Literal::Bool(true));
        assert_eq!(Literal::parse("42", "int64").unwrap(), Literal::Int64(42));
        assert_eq!(
            Literal::parse("3.5", "float64").unwrap(),
            Literal::Float64(3.5)
        );
        assert_eq!(
            Literal::parse("hi", "text").unwrap(),
            Literal::Text("hi".into())
        );
        assert_eq!(Literal::Int64(174).to_string(), "\"174\"^^type:int64");
    }

    #[test]
    fn bounded_builder_rejects_oversized_text() {
        let builder = BoundedBuilder::new(3);
        assert!(builder.build(Literal::Text("hi".into())).is_ok());
        assert!(builder.build(Literal::Text("toolong".into())).is_err());
    }
}
