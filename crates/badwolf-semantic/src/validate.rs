use badwolf_helpers::IndexSet;
use smol_str::SmolStr;

use crate::error::SemanticError;
use crate::statement::{GraphClause, Statement};
use crate::term::{FilterFn, Term};

/// The clause-end validation pass (§4.3): everything here needs the whole
/// `Statement`, not just the field a single hook just populated, so it runs
/// once after `Parser::parse` returns rather than as another hook.
pub(crate) fn validate(stmt: &Statement) -> Result<(), SemanticError> {
    log::trace!("validating {:?} statement, {} clauses", stmt.kind, stmt.clauses.len());
    let bindings = clause_bindings(&stmt.clauses);
    let result = validate_filters(&stmt.clauses, &bindings)
        .and_then(|()| validate_having(stmt, &bindings))
        .and_then(|()| validate_group_by(stmt))
        .and_then(|()| validate_order_by(stmt));
    if let Err(ref err) = result {
        log::debug!("statement rejected at validation: {err}");
    }
    result
}

/// Every binding name a `WHERE` clause can populate: subject/predicate/object
/// variables plus their extraction aliases.
fn clause_bindings(clauses: &[GraphClause]) -> IndexSet<SmolStr> {
    let mut out = IndexSet::default();
    for clause in clauses {
        if let Some(Term::Var(name)) = &clause.subject {
            out.insert(name.clone());
        }
        if let Some(Term::Var(name)) = &clause.predicate {
            out.insert(name.clone());
        }
        if let Some(Term::Var(name)) = &clause.object {
            out.insert(name.clone());
        }
        for extraction in [&clause.subject_extraction, &clause.predicate_extraction, &clause.object_extraction] {
            out.extend(extraction.value_binding.clone());
            out.extend(extraction.type_alias.clone());
            out.extend(extraction.id_alias.clone());
            out.extend(extraction.at_alias.clone());
        }
    }
    out
}

/// `latest`/`isTemporal`/`isImmutable` may each only apply once to a given
/// binding (§4.4.3d: "the same argument symbol must not be filtered twice by
/// `latest`"), and every filtered binding must actually be produced by a
/// clause.
fn validate_filters(clauses: &[GraphClause], bindings: &IndexSet<SmolStr>) -> Result<(), SemanticError> {
    let mut seen: IndexSet<(FilterFn, SmolStr)> = IndexSet::default();
    for clause in clauses {
        for call in &clause.filters {
            if !bindings.contains(&call.binding) {
                return Err(SemanticError::UnknownFilterBinding(call.binding.clone()));
            }
            if !seen.insert((call.function, call.binding.clone())) {
                return Err(SemanticError::DuplicateFilter(call.binding.clone()));
            }
        }
    }
    Ok(())
}

fn validate_having(stmt: &Statement, bindings: &IndexSet<SmolStr>) -> Result<(), SemanticError> {
    let Some(having) = &stmt.having else {
        return Ok(());
    };
    let projected = projected_output_names(stmt);
    for name in having.bindings() {
        if !bindings.contains(name) && !projected.contains(name) {
            return Err(SemanticError::UnknownHavingBinding(name.into()));
        }
    }
    Ok(())
}

fn projected_output_names(stmt: &Statement) -> IndexSet<SmolStr> {
    stmt.projection.iter().map(|item| item.output_name()).collect()
}

/// Any non-aggregated projected binding must be in `GROUP BY`, and grouping
/// applies the moment any projection item carries an aggregation even
/// without an explicit `GROUP BY` clause (one implicit group over the whole
/// table, §4.4.3f).
fn validate_group_by(stmt: &Statement) -> Result<(), SemanticError> {
    let grouping_applies = !stmt.group_by.is_empty() || stmt.projection.iter().any(|item| item.aggregation.is_some());
    if !grouping_applies {
        return Ok(());
    }
    for item in &stmt.projection {
        if item.aggregation.is_none() && !stmt.group_by.contains(&item.binding) {
            return Err(SemanticError::UngroupedProjection(item.binding.clone()));
        }
    }
    Ok(())
}

/// `ORDER BY` bindings must exist in the post-projection result (§4.3):
/// either a projected output name/alias, a `GROUP BY` key, or — when no
/// grouping or projection constrains the row shape at all — any binding the
/// clauses themselves produce.
fn validate_order_by(stmt: &Statement) -> Result<(), SemanticError> {
    if stmt.order_by.is_empty() {
        return Ok(());
    }
    let projected = projected_output_names(stmt);
    let clause_bound = clause_bindings(&stmt.clauses);
    for (binding, _) in &stmt.order_by {
        let known = projected.contains(binding) || stmt.group_by.contains(binding) || clause_bound.contains(binding);
        if !known {
            return Err(SemanticError::UnknownOrderBinding(binding.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use badwolf_table::{AggregationKind, Direction};

    use super::*;
    use crate::statement::{Kind, ProjectionItem};

    fn clause_with_var(binding: &str) -> GraphClause {
        GraphClause {
            subject: Some(Term::Var(binding.into())),
            ..GraphClause::default()
        }
    }

    #[test]
    fn ungrouped_projection_is_rejected_when_another_item_is_aggregated() {
        let mut stmt = Statement::new(Kind::Query);
        stmt.projection = vec![
            ProjectionItem { binding: "?dept".into(), alias: None, aggregation: None },
            ProjectionItem {
                binding: "?p".into(),
                alias: Some("?n".into()),
                aggregation: Some(AggregationKind::Count),
            },
        ];
        assert_eq!(
            validate_group_by(&stmt),
            Err(SemanticError::UngroupedProjection("?dept".into()))
        );

        stmt.group_by = vec!["?dept".into()];
        assert_eq!(validate_group_by(&stmt), Ok(()));
    }

    #[test]
    fn order_by_accepts_a_projection_alias() {
        let mut stmt = Statement::new(Kind::Query);
        stmt.projection = vec![ProjectionItem { binding: "?p".into(), alias: Some("?n".into()), aggregation: None }];
        stmt.order_by = vec![("?n".into(), Direction::Asc)];
        assert_eq!(validate_order_by(&stmt), Ok(()));
    }

    #[test]
    fn order_by_rejects_an_unknown_binding() {
        let mut stmt = Statement::new(Kind::Query);
        stmt.order_by = vec![("?ghost".into(), Direction::Asc)];
        assert_eq!(
            validate_order_by(&stmt),
            Err(SemanticError::UnknownOrderBinding("?ghost".into()))
        );
    }

    #[test]
    fn duplicate_latest_filter_on_the_same_binding_is_rejected() {
        let mut clause = clause_with_var("?m");
        clause.filters = vec![
            crate::term::FilterCall { function: FilterFn::Latest, binding: "?m".into() },
            crate::term::FilterCall { function: FilterFn::Latest, binding: "?m".into() },
        ];
        let bindings = clause_bindings(std::slice::from_ref(&clause));
        assert_eq!(
            validate_filters(std::slice::from_ref(&clause), &bindings),
            Err(SemanticError::DuplicateFilter("?m".into()))
        );
    }

    #[test]
    fn filter_on_an_unbound_symbol_is_rejected() {
        let mut clause = clause_with_var("?m");
        clause.filters = vec![crate::term::FilterCall { function: FilterFn::Latest, binding: "?ghost".into() }];
        let bindings = clause_bindings(std::slice::from_ref(&clause));
        assert_eq!(
            validate_filters(std::slice::from_ref(&clause), &bindings),
            Err(SemanticError::UnknownFilterBinding("?ghost".into()))
        );
    }
}
