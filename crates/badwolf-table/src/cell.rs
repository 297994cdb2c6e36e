use std::cmp::Ordering;

use badwolf_model::{Literal, Node, Predicate, TimeAnchor};
use smol_str::SmolStr;

use crate::error::TableError;

/// At most one of `{Node, Predicate, Literal, text, TimeAnchor}` is populated
/// (§3.4); `Null` is the empty cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Node(Node),
    Predicate(Predicate),
    Literal(Literal),
    Text(SmolStr),
    TimeAnchor(TimeAnchor),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Node(_) => "node",
            Cell::Predicate(_) => "predicate",
            Cell::Literal(_) => "literal",
            Cell::Text(_) => "text",
            Cell::TimeAnchor(_) => "time anchor",
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Cell::Literal(Literal::Int64(v)) => Some(*v as f64),
            Cell::Literal(Literal::Float64(v)) => Some(*v),
            _ => None,
        }
    }

    fn text_key(&self) -> Option<String> {
        match self {
            Cell::Node(n) => Some(n.to_string()),
            Cell::Literal(Literal::Text(s)) => Some(s.to_string()),
            Cell::Text(s) => Some(s.to_string()),
            _ => None,
        }
    }

    /// `EQ` from HAVING/FILTER (§4.4.3e): deep equality within the same
    /// cell type. Comparing across incompatible types is always `false`,
    /// never an error (only ordering comparisons are type-fatal).
    pub fn eq_cell(&self, other: &Cell) -> bool {
        self == other
    }

    /// `LT`/`GT` ordering (§4.4.3e): lexicographic text for node/literal
    /// text cells, numeric for numeric literals, instant for time anchors.
    /// A type mismatch (e.g. node vs integer) is fatal.
    pub fn compare(&self, other: &Cell) -> Result<Ordering, TableError> {
        match (self, other) {
            (Cell::Null, Cell::Null) => return Ok(Ordering::Equal),
            (Cell::Null, _) => return Ok(Ordering::Less),
            (_, Cell::Null) => return Ok(Ordering::Greater),
            _ => {}
        }
        if let (Some(a), Some(b)) = (self.numeric(), other.numeric()) {
            return Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal));
        }
        if let (Cell::TimeAnchor(a), Cell::TimeAnchor(b)) = (self, other) {
            return Ok(a.cmp(b));
        }
        if let (Some(a), Some(b)) = (self.text_key(), other.text_key()) {
            return Ok(a.cmp(&b));
        }
        Err(TableError::TypeMismatch {
            left: self.type_name(),
            right: other.type_name(),
        })
    }
}

impl From<Node> for Cell {
    fn from(n: Node) -> Self {
        Cell::Node(n)
    }
}

impl From<Predicate> for Cell {
    fn from(p: Predicate) -> Self {
        Cell::Predicate(p)
    }
}

impl From<Literal> for Cell {
    fn from(l: Literal) -> Self {
        Cell::Literal(l)
    }
}

impl From<TimeAnchor> for Cell {
    fn from(t: TimeAnchor) -> Self {
        Cell::TimeAnchor(t)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn numeric_cells_compare_numerically() {
        let a = Cell::Literal(Literal::Int64(174));
        let b = Cell::Literal(Literal::Int64(151));
        assert_eq!(a.compare(&b).unwrap(), Ordering::Greater);
    }

    #[test]
    fn incompatible_types_are_a_fatal_mismatch() {
        let node = Cell::Node(Node::from_str("/u<joe>").unwrap());
        let num = Cell::Literal(Literal::Int64(1));
        assert!(matches!(
            node.compare(&num),
            Err(TableError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn null_is_its_own_kind() {
        assert!(Cell::Null.is_null());
        assert!(!Cell::Literal(Literal::Bool(false)).is_null());
    }
}
