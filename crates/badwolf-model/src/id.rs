use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::ModelError;

/// An opaque node identifier. Must not contain `<` or `>`, since those
/// delimit a node's printed form `Type<ID>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(SmolStr);

impl Id {
    pub fn new(text: impl Into<SmolStr>) -> Result<Self, ModelError> {
        let text = text.into();
        if text.contains('<') || text.contains('>') {
            return Err(ModelError::InvalidId {
                text: text.to_string(),
                reason: "must not contain '<' or '>'",
            });
        }
        Ok(Self(text))
    }

    pub fn text(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for Id {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::new(s)
    }
}
