use badwolf_model::{Literal, Node, Predicate, TimeAnchor};
use badwolf_table::{Cell, Row, TableError};
use smol_str::SmolStr;

/// One operand of a `HAVING` comparison: a binding name or a constant
/// (§4.3). Resolved against a row at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Binding(SmolStr),
    Node(Node),
    Predicate(Predicate),
    Literal(Literal),
    TimeAnchor(TimeAnchor),
}

impl Operand {
    fn resolve(&self, row: &Row) -> Cell {
        match self {
            Operand::Binding(name) => row.get(name),
            Operand::Node(n) => Cell::Node(n.clone()),
            Operand::Predicate(p) => Cell::Predicate(p.clone()),
            Operand::Literal(l) => Cell::Literal(l.clone()),
            Operand::TimeAnchor(t) => Cell::TimeAnchor(*t),
        }
    }
}

/// `HAVING`'s expression tree (§4.3): `AND OR NOT EQ LT GT` over operands
/// that are bindings, node/literal constants, or temporal/predicate
/// constants.
#[derive(Debug, Clone, PartialEq)]
pub enum HavingExpr {
    And(Box<HavingExpr>, Box<HavingExpr>),
    Or(Box<HavingExpr>, Box<HavingExpr>),
    Not(Box<HavingExpr>),
    Eq(Operand, Operand),
    Lt(Operand, Operand),
    Gt(Operand, Operand),
}

impl HavingExpr {
    /// Evaluates the tree over one row; a type mismatch in an ordering
    /// comparison is fatal, matching Table's own comparator (§4.4.3e).
    pub fn eval(&self, row: &Row) -> Result<bool, TableError> {
        match self {
            HavingExpr::And(a, b) => Ok(a.eval(row)? && b.eval(row)?),
            HavingExpr::Or(a, b) => Ok(a.eval(row)? || b.eval(row)?),
            HavingExpr::Not(a) => Ok(!a.eval(row)?),
            HavingExpr::Eq(a, b) => Ok(a.resolve(row).eq_cell(&b.resolve(row))),
            HavingExpr::Lt(a, b) => Ok(a.resolve(row).compare(&b.resolve(row))?.is_lt()),
            HavingExpr::Gt(a, b) => Ok(a.resolve(row).compare(&b.resolve(row))?.is_gt()),
        }
    }

    /// Every binding name this expression references, for validation
    /// against the post-projection result (§4.3).
    pub fn bindings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            HavingExpr::And(a, b) | HavingExpr::Or(a, b) => {
                a.collect_bindings(out);
                b.collect_bindings(out);
            }
            HavingExpr::Not(a) => a.collect_bindings(out),
            HavingExpr::Eq(a, b) | HavingExpr::Lt(a, b) | HavingExpr::Gt(a, b) => {
                if let Operand::Binding(name) = a {
                    out.push(name);
                }
                if let Operand::Binding(name) = b {
                    out.push(name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn gt_over_int_literals_matches_the_height_scenario() {
        let expr = HavingExpr::Gt(
            Operand::Binding("?h".into()),
            Operand::Literal(Literal::Int64(160)),
        );
        let row = Row::new().with("?h", Cell::Literal(Literal::Int64(174)));
        assert!(expr.eval(&row).unwrap());
        let row = Row::new().with("?h", Cell::Literal(Literal::Int64(151)));
        assert!(!expr.eval(&row).unwrap());
    }

    #[test]
    fn bindings_collects_every_operand_name() {
        let expr = HavingExpr::And(
            Box::new(HavingExpr::Gt(
                Operand::Binding("?h".into()),
                Operand::Literal(Literal::Int64(0)),
            )),
            Box::new(HavingExpr::Eq(
                Operand::Binding("?s".into()),
                Operand::Binding("?t".into()),
            )),
        );
        assert_eq!(expr.bindings(), vec!["?h", "?s", "?t"]);
    }
}
