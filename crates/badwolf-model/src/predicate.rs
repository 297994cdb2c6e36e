use std::fmt;

use crate::error::ModelError;
use crate::id::Id;
use crate::time::TimeAnchor;

/// An immutable (timeless) or temporal predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Immutable(Id),
    Temporal(Id, TimeAnchorKey),
}

/// `TimeAnchor` wrapper with `Eq`/`Hash` for use inside `Predicate`, since
/// `chrono::DateTime` gives us those already — kept as a distinct alias so a
/// reader sees why a `TimeAnchor` is usable as a hash-map key here.
pub type TimeAnchorKey = TimeAnchor;

impl Predicate {
    pub fn id(&self) -> &Id {
        match self {
            Predicate::Immutable(id) => id,
            Predicate::Temporal(id, _) => id,
        }
    }

    pub fn anchor(&self) -> Option<&TimeAnchor> {
        match self {
            Predicate::Immutable(_) => None,
            Predicate::Temporal(_, anchor) => Some(anchor),
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Predicate::Temporal(..))
    }

    pub fn is_immutable(&self) -> bool {
        matches!(self, Predicate::Immutable(..))
    }

    /// Parse `"ID"@[]` or `"ID"@[RFC3339Nano]`.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let (id_text, bracket) = split_predicate(text)?;
        let id = Id::new(id_text).map_err(|_| invalid(text))?;
        if bracket.is_empty() {
            return Ok(Predicate::Immutable(id));
        }
        let anchor = TimeAnchor::parse(bracket).map_err(|_| invalid(text))?;
        Ok(Predicate::Temporal(id, anchor))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Immutable(id) => write!(f, "\"{id}\"@[]"),
            Predicate::Temporal(id, anchor) => write!(f, "\"{id}\"@[{anchor}]"),
        }
    }
}

/// `(ID, lowerOpt, upperOpt)` — used only in queries to bound a temporal
/// predicate lookup; printed `"ID"@[lo,hi]` with either bound omissible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredicateBound {
    id: Id,
    lower: Option<TimeAnchor>,
    upper: Option<TimeAnchor>,
}

impl PredicateBound {
    pub fn new(id: Id, lower: Option<TimeAnchor>, upper: Option<TimeAnchor>) -> Self {
        Self { id, lower, upper }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn lower(&self) -> Option<&TimeAnchor> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&TimeAnchor> {
        self.upper.as_ref()
    }

    /// Parse `"ID"@[]`, `"ID"@[t]`, `"ID"@[lo,]`, `"ID"@[,hi]`, `"ID"@[lo,hi]`.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let (id_text, bracket) = split_predicate(text)?;
        let id = Id::new(id_text).map_err(|_| invalid(text))?;
        if bracket.is_empty() {
            return Ok(Self::new(id, None, None));
        }
        if let Some(comma) = bracket.find(',') {
            let lo_text = bracket[..comma].trim();
            let hi_text = bracket[comma + 1..].trim();
            let lower = if lo_text.is_empty() {
                None
            } else {
                Some(TimeAnchor::parse(lo_text).map_err(|_| invalid(text))?)
            };
            let upper = if hi_text.is_empty() {
                None
            } else {
                Some(TimeAnchor::parse(hi_text).map_err(|_| invalid(text))?)
            };
            Ok(Self::new(id, lower, upper))
        } else {
            let anchor = TimeAnchor::parse(bracket.trim()).map_err(|_| invalid(text))?;
            Ok(Self::new(id, Some(anchor), Some(anchor)))
        }
    }
}

impl fmt::Display for PredicateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lower.map(|a| a.to_string()).unwrap_or_default();
        let hi = self.upper.map(|a| a.to_string()).unwrap_or_default();
        write!(f, "\"{}\"@[{},{}]", self.id, lo, hi)
    }
}

fn invalid(text: &str) -> ModelError {
    ModelError::InvalidPredicate {
        text: text.to_string(),
        reason: "expected \"ID\"@[] / \"ID\"@[RFC3339Nano] / \"ID\"@[lo,hi]",
    }
}

fn split_predicate(text: &str) -> Result<(&str, &str), ModelError> {
    let text = text.trim();
    let rest = text.strip_prefix('"').ok_or_else(|| invalid(text))?;
    let close_quote = rest.find('"').ok_or_else(|| invalid(text))?;
    let id_text = &rest[..close_quote];
    let rest = &rest[close_quote + 1..];
    let rest = rest.strip_prefix("@[").ok_or_else(|| invalid(text))?;
    let rest = rest.strip_suffix(']').ok_or_else(|| invalid(text))?;
    Ok((id_text, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_immutable_and_temporal() {
        let imm = Predicate::parse("\"parent_of\"@[]").unwrap();
        assert_eq!(imm.to_string(), "\"parent_of\"@[]");

        let text = "\"bought\"@[2016-01-01T00:00:00.000000000-08:00]";
        let temp = Predicate::parse(text).unwrap();
        assert_eq!(temp.to_string(), text);
    }

    #[test]
    fn bound_with_one_sided_omission() {
        let bound = PredicateBound::parse("\"bought\"@[2016-02-01T00:00:00-08:00,]").unwrap();
        assert!(bound.lower().is_some());
        assert!(bound.upper().is_none());
    }
}
