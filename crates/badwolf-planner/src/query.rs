use std::cmp::Reverse;
use std::sync::Arc;

use badwolf_semantic::{GraphClause, Statement, Term};
use badwolf_store::{Graph, Store};
use badwolf_table::{Aggregation, Direction, Table};
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;
use crate::fetch::{clause_lookup_options, fetch_clause_table};
use crate::filter::apply_filters;
use crate::graph_id::graph_id;

const CHAN_SIZE: usize = 10;

/// Resolves a statement's (first) `FROM` graph and runs its `WHERE` clauses
/// through stages (a)-(d) — ordering, fetch/join, and per-clause `FILTER` —
/// producing the raw binding table `CONSTRUCT`/`DECONSTRUCT` instantiate
/// templates over and a `SELECT` continues aggregating/sorting/projecting.
/// `limit_if_sole_clause` lets a single-clause query push its `LIMIT` into
/// the fetch (§4.4.3b); `CONSTRUCT`/`DECONSTRUCT` never do this since their
/// templates, not the binding table, define what gets limited.
pub(crate) async fn evaluate_where(
    store: &Arc<dyn Store>,
    stmt: &Statement,
    cancel: &CancellationToken,
    limit_if_sole_clause: Option<usize>,
) -> Result<(Arc<dyn Graph>, Table), ExecError> {
    let graph_name = stmt.input_graphs.first().ok_or(ExecError::UnrecognisedClause("statement has no FROM graph"))?;
    let graph = store.graph(graph_id(graph_name)).await?;

    let window = (stmt.lower_bound, stmt.upper_bound);
    let push_limit = limit_if_sole_clause.is_some() && stmt.clauses.len() == 1;

    let mut acc: Option<Table> = None;
    for clause in order_clauses(&stmt.clauses) {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        let max_elements = if push_limit { limit_if_sole_clause } else { None };
        let options = clause_lookup_options(clause, window, max_elements);
        let fetched = fetch_clause_table(&graph, clause, options, CHAN_SIZE, cancel).await?;
        let joined = match acc.take() {
            None => fetched,
            Some(prev) => {
                log::trace!("incorporating clause into {} accumulated row(s)", prev.len());
                incorporate(prev, fetched, clause.optional)
            }
        };
        acc = Some(apply_filters(joined, &clause.filters)?);
    }
    let table = acc.unwrap_or_else(|| Table::new(Vec::<SmolStr>::new()));
    Ok((graph, table))
}

/// Runs a `SELECT` statement end to end (§4.4.3, stages a through h).
pub(crate) async fn plan_query(store: &Arc<dyn Store>, stmt: &Statement, cancel: &CancellationToken) -> Result<Table, ExecError> {
    let grouping_applies = !stmt.group_by.is_empty() || stmt.projection.iter().any(|item| item.aggregation.is_some());
    // LIMIT only pushes down to the fetch when there's exactly one clause and
    // nothing downstream (HAVING, GROUP BY, ORDER BY) could need more rows
    // than the final result keeps (§4.4.3b).
    let push_limit = (!grouping_applies && stmt.having.is_none() && stmt.order_by.is_empty()).then_some(stmt.limit).flatten();
    let (_graph, mut table) = evaluate_where(store, stmt, cancel, push_limit).await?;

    if let Some(having) = &stmt.having {
        table = table.filter(|row| having.eval(row))?;
    }

    if grouping_applies {
        let aggregations: Vec<Aggregation> = stmt
            .projection
            .iter()
            .filter_map(|item| item.aggregation.clone().map(|kind| Aggregation::new(item.binding.clone(), kind, item.output_name())))
            .collect();
        log::debug!("grouping {} row(s) by {} key(s)", table.len(), stmt.group_by.len());
        table = table.group_by(&stmt.group_by, &aggregations)?;
    }

    if !stmt.order_by.is_empty() {
        let directions: Vec<(SmolStr, Direction)> = stmt.order_by.iter().map(|(name, dir)| (resolve_order_binding(stmt, name), *dir)).collect();
        table = table.sort_by(&directions)?;
    }

    let projection: Vec<(SmolStr, SmolStr)> = stmt
        .projection
        .iter()
        .map(|item| {
            let source = if item.aggregation.is_some() { item.output_name() } else { item.binding.clone() };
            (source, item.output_name())
        })
        .collect();
    table = table.project(&projection);

    if let Some(limit) = stmt.limit {
        table = table.limit(limit);
    }

    Ok(table)
}

/// Stage (a): most-specific clause first (most literal positions, ties
/// broken by fewest bindings, ties after that by source order).
fn order_clauses(clauses: &[GraphClause]) -> Vec<&GraphClause> {
    let mut indexed: Vec<(usize, &GraphClause)> = clauses.iter().enumerate().collect();
    indexed.sort_by_key(|(idx, clause)| (Reverse(literal_count(clause)), binding_count(clause), *idx));
    indexed.into_iter().map(|(_, clause)| clause).collect()
}

fn literal_count(clause: &GraphClause) -> usize {
    [&clause.subject, &clause.predicate, &clause.object].into_iter().filter(|t| matches!(t, Some(Term::Bound(_)))).count()
}

fn binding_count(clause: &GraphClause) -> usize {
    [&clause.subject, &clause.predicate, &clause.object].into_iter().filter(|t| matches!(t, Some(Term::Var(_)))).count()
}

/// Stage (c): assign on the first clause, cartesian product on disjoint
/// bindings, otherwise an equi-join — outer for `OPTIONAL`, inner otherwise.
fn incorporate(acc: Table, next: Table, optional: bool) -> Table {
    let shares_a_binding = acc.columns().iter().any(|c| next.columns().contains(c));
    if !shares_a_binding {
        acc.dot_product(&next)
    } else if optional {
        acc.left_optional_join(&next)
    } else {
        acc.inner_join(&next)
    }
}

/// `ORDER BY` runs before the final projection (stage g before stage h), so
/// an alias it names has to resolve back to whatever column already carries
/// that value in the pre-projection table.
fn resolve_order_binding(stmt: &Statement, name: &SmolStr) -> SmolStr {
    stmt.projection
        .iter()
        .find(|item| item.output_name() == *name)
        .map(|item| if item.aggregation.is_some() { item.output_name() } else { item.binding.clone() })
        .unwrap_or_else(|| name.clone())
}
