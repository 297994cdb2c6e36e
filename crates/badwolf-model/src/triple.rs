use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::node::Node;
use crate::object::Object;
use crate::predicate::Predicate;

/// `(Subject, Predicate, Object)`. Canonical textual form is
/// `Subject\tPredicate\tObject` (§3.2, §6.3); parsing is the inverse of
/// printing for every valid triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Predicate,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Node, predicate: Predicate, object: Object) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.subject, self.predicate, self.object)
    }
}

impl FromStr for Triple {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidTriple {
            text: s.to_string(),
            reason: "expected Subject\\tPredicate\\tObject",
        };
        let mut parts = s.splitn(3, '\t');
        let subject_text = parts.next().ok_or_else(invalid)?;
        let predicate_text = parts.next().ok_or_else(invalid)?;
        let object_text = parts.next().ok_or_else(invalid)?;

        let subject = Node::parse(subject_text)?;
        let predicate = Predicate::parse(predicate_text)?;
        let object = Object::parse(object_text)?;
        Ok(Triple::new(subject, predicate, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_node_object() {
        let text = "/u<joe>\t\"parent_of\"@[]\t/u<mary>";
        let triple: Triple = text.parse().unwrap();
        assert_eq!(triple.to_string(), text);
    }

    #[test]
    fn round_trips_temporal_predicate_and_literal_object() {
        let text = "/u<alice>\t\"height_cm\"@[]\t\"174\"^^type:int64";
        let triple: Triple = text.parse().unwrap();
        assert_eq!(triple.to_string(), text);
        assert_eq!(triple.object.as_literal().unwrap().as_int64(), Some(174));
    }
}
