use badwolf_model::{Node, Object, Predicate, Triple};
use badwolf_semantic::{ExtractionSet, GraphClause, Term};
use badwolf_table::{Cell, Row};
use smol_str::SmolStr;

/// One resolved triple position, so extraction can be written once instead of
/// three times with the subject/predicate/object cases inlined.
enum Position<'a> {
    Subject(&'a Node),
    Predicate(&'a Predicate),
    Object(&'a Object),
}

impl Position<'_> {
    fn cell(&self) -> Cell {
        match self {
            Position::Subject(node) => Cell::Node((*node).clone()),
            Position::Predicate(pred) => Cell::Predicate((*pred).clone()),
            Position::Object(Object::Node(node)) => Cell::Node(node.clone()),
            Position::Object(Object::Predicate(pred)) => Cell::Predicate(pred.clone()),
            Position::Object(Object::Literal(lit)) => Cell::Literal(lit.clone()),
        }
    }

    /// The node this position resolves to, if any (subject is always one; an
    /// object is one only in a reification template).
    fn as_node(&self) -> Option<&Node> {
        match self {
            Position::Subject(node) => Some(node),
            Position::Object(Object::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// The predicate this position resolves to, if any (the predicate
    /// position, or an object holding a reified predicate).
    fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Position::Predicate(pred) => Some(pred),
            Position::Object(Object::Predicate(pred)) => Some(pred),
            _ => None,
        }
    }
}

/// Converts one matched triple into the row it contributes for this clause
/// (§4.4.4). `None` means the triple is silently dropped: either two
/// positions bound the same variable to unequal values, or an alias asked
/// for a facet its resolved value doesn't have and the clause isn't
/// `OPTIONAL`.
pub(crate) fn triple_to_row(clause: &GraphClause, triple: &Triple) -> Option<Row> {
    let mut row = Row::new();
    let ok = apply_position(&mut row, clause.subject.as_ref(), &clause.subject_extraction, Position::Subject(&triple.subject), clause.optional)
        && apply_position(
            &mut row,
            clause.predicate.as_ref(),
            &clause.predicate_extraction,
            Position::Predicate(&triple.predicate),
            clause.optional,
        )
        && apply_position(&mut row, clause.object.as_ref(), &clause.object_extraction, Position::Object(&triple.object), clause.optional);
    ok.then_some(row)
}

fn apply_position(row: &mut Row, term: Option<&Term>, extraction: &ExtractionSet, position: Position<'_>, optional: bool) -> bool {
    if let Some(Term::Var(name)) = term {
        if !bind(row, name, position.cell()) {
            return false;
        }
    }

    if let Some(alias) = &extraction.value_binding {
        if !bind(row, alias, position.cell()) {
            return false;
        }
    }

    if let Some(alias) = &extraction.type_alias {
        match position.as_node() {
            Some(node) => {
                if !bind(row, alias, Cell::Text(SmolStr::new(node.node_type().text()))) {
                    return false;
                }
            }
            None => {
                if !fill_or_reject(row, alias, optional) {
                    return false;
                }
            }
        }
    }

    if let Some(alias) = &extraction.id_alias {
        let id_text: Option<SmolStr> = position
            .as_node()
            .map(|node| SmolStr::new(node.id().text()))
            .or_else(|| position.as_predicate().map(|pred| SmolStr::new(pred.id().text())));
        match id_text {
            Some(text) => {
                if !bind(row, alias, Cell::Text(text)) {
                    return false;
                }
            }
            None => {
                if !fill_or_reject(row, alias, optional) {
                    return false;
                }
            }
        }
    }

    if let Some(alias) = &extraction.at_alias {
        match position.as_predicate().and_then(Predicate::anchor) {
            Some(anchor) => {
                if !bind(row, alias, Cell::TimeAnchor(*anchor)) {
                    return false;
                }
            }
            None => {
                if !fill_or_reject(row, alias, optional) {
                    return false;
                }
            }
        }
    }

    true
}

/// Sets `binding` to `cell`, unless it is already set to a *different* cell
/// (§4.4.4: a binding reused by two positions of one clause discards the row
/// unless both agree).
fn bind(row: &mut Row, binding: &SmolStr, cell: Cell) -> bool {
    if row.contains(binding) {
        row.get(binding).eq_cell(&cell)
    } else {
        row.set(binding.clone(), cell);
        true
    }
}

/// An alias asked for a facet the resolved value doesn't carry (§4.4.4): an
/// `OPTIONAL` clause still keeps the row with `NULL` there, anything else
/// drops the triple.
fn fill_or_reject(row: &mut Row, alias: &SmolStr, optional: bool) -> bool {
    if optional {
        row.set(alias.clone(), Cell::Null);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use badwolf_model::{Literal, Predicate};
    use pretty_assertions::assert_eq;

    use super::*;

    fn node(text: &str) -> Node {
        Node::parse(text).unwrap()
    }

    fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
        Triple::new(node(subject), Predicate::parse(predicate).unwrap(), Object::parse(object).unwrap())
    }

    #[test]
    fn plain_variables_bind_their_position() {
        let clause = GraphClause {
            subject: Some(Term::Var("?p".into())),
            predicate: Some(Term::Var("?r".into())),
            object: Some(Term::Var("?o".into())),
            ..GraphClause::default()
        };
        let t = triple("/Person<joe>", "\"parent_of\"@[]", "/Person<amy>");
        let row = triple_to_row(&clause, &t).expect("row must convert");
        assert_eq!(row.get("?p"), Cell::Node(node("/Person<joe>")));
        assert_eq!(row.get("?o"), Cell::Node(node("/Person<amy>")));
    }

    #[test]
    fn conflicting_reuse_of_one_binding_drops_the_row() {
        let clause = GraphClause {
            subject: Some(Term::Var("?x".into())),
            object: Some(Term::Var("?x".into())),
            ..GraphClause::default()
        };
        let t = triple("/Person<joe>", "\"parent_of\"@[]", "/Person<amy>");
        assert!(triple_to_row(&clause, &t).is_none());
    }

    #[test]
    fn type_alias_on_a_non_node_object_is_skipped_unless_optional() {
        let mut clause = GraphClause {
            object: Some(Term::Var("?o".into())),
            object_extraction: ExtractionSet { type_alias: Some("?t".into()), ..ExtractionSet::default() },
            ..GraphClause::default()
        };
        let t = triple("/Person<joe>", "\"age\"@[]", "\"30\"^^type:int64");
        assert!(triple_to_row(&clause, &t).is_none());

        clause.optional = true;
        let row = triple_to_row(&clause, &t).expect("optional clause keeps the row");
        assert_eq!(row.get("?t"), Cell::Null);
        assert_eq!(row.get("?o"), Cell::Literal(Literal::Int64(30)));
    }

    #[test]
    fn at_alias_reads_a_temporal_predicates_anchor() {
        let clause = GraphClause {
            predicate: Some(Term::Var("?r".into())),
            predicate_extraction: ExtractionSet { at_alias: Some("?t".into()), ..ExtractionSet::default() },
            ..GraphClause::default()
        };
        let t = triple("/Person<joe>", "\"parent_of\"@[2024-01-01T00:00:00Z]", "/Person<amy>");
        let row = triple_to_row(&clause, &t).expect("row must convert");
        assert!(!row.get("?t").is_null());
    }
}
