use std::sync::Arc;

use badwolf_helpers::IndexMap;
use badwolf_model::{BlankNodeGenerator, Id, Node, Object, Predicate, Triple};
use badwolf_semantic::{BoundTerm, ConstructTemplate, Kind, Statement, Term};
use badwolf_store::Store;
use badwolf_table::{Cell, Row};
use futures::future::join_all;
use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;

use crate::error::{join_errors, ExecError};
use crate::graph_id::graph_id;
use crate::query::evaluate_where;

/// Runs `CONSTRUCT`/`DECONSTRUCT` (§4.4.5): evaluate the `WHERE` pattern into
/// a binding table, then instantiate every template against every row. A
/// `CONSTRUCT` over a temporal pair also emits the pair's reification triples
/// (`_subject`/`_predicate`/`_object`, anchored at the pair's own time); a
/// `DECONSTRUCT` only ever instantiates the bare template triples.
pub(crate) async fn run(store: &Arc<dyn Store>, stmt: &Statement, cancel: &CancellationToken) -> Result<(), ExecError> {
    let (_graph, table) = evaluate_where(store, stmt, cancel, None).await?;

    let blanks = BlankNodeGenerator::new();
    let mut triples = Vec::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let mut labels: IndexMap<SmolStr, Node> = IndexMap::default();
        for template in &stmt.construct_templates {
            instantiate(template, row, row_idx as u64, &blanks, &mut labels, stmt.kind, &mut triples)?;
        }
    }
    log::debug!("{} row(s) instantiated into {} triple(s)", table.len(), triples.len());

    let results = join_all(stmt.output_graphs.iter().map(|binding| {
        let store = Arc::clone(store);
        let id = graph_id(binding).to_string();
        let triples = triples.clone();
        let kind = stmt.kind;
        async move {
            let graph = store.graph(&id).await?;
            match kind {
                Kind::Construct => graph.add_triples(&triples).await.map_err(ExecError::from),
                Kind::Deconstruct => graph.remove_triples(&triples).await.map_err(ExecError::from),
                _ => unreachable!("executor only dispatches CONSTRUCT/DECONSTRUCT statements here"),
            }
        }
    }))
    .await;

    join_errors(results.into_iter().filter_map(Result::err).collect())
}

fn instantiate(
    template: &ConstructTemplate,
    row: &Row,
    row_scope: u64,
    blanks: &BlankNodeGenerator,
    labels: &mut IndexMap<SmolStr, Node>,
    kind: Kind,
    out: &mut Vec<Triple>,
) -> Result<(), ExecError> {
    let subject_term = template.subject.as_ref().ok_or(ExecError::UnrecognisedClause("CONSTRUCT template has no subject"))?;
    let subject = resolve_node(subject_term, row, row_scope, blanks, labels)?;

    for (pred_term, obj_term) in &template.pairs {
        let predicate = resolve_predicate(pred_term, row)?;
        let object = resolve_object(obj_term, row, row_scope, blanks, labels)?;
        out.push(Triple::new(subject.clone(), predicate.clone(), object.clone()));

        if kind == Kind::Construct && predicate.is_temporal() {
            let bn = blanks.mint(row_scope);
            let anchor = *predicate.anchor().expect("is_temporal implies an anchor");
            out.push(Triple::new(bn.clone(), reification_predicate("_subject", anchor), Object::Node(subject.clone())));
            out.push(Triple::new(bn.clone(), reification_predicate("_predicate", anchor), Object::Predicate(predicate.clone())));
            out.push(Triple::new(bn, reification_predicate("_object", anchor), object));
        }
    }
    Ok(())
}

fn reification_predicate(id: &'static str, anchor: badwolf_model::TimeAnchor) -> Predicate {
    Predicate::Temporal(Id::new(id).expect("reification ids never contain '<' or '>'"), anchor)
}

fn resolve_node(term: &Term, row: &Row, row_scope: u64, blanks: &BlankNodeGenerator, labels: &mut IndexMap<SmolStr, Node>) -> Result<Node, ExecError> {
    match term {
        Term::Bound(BoundTerm::Node(n)) => Ok(n.clone()),
        Term::Bound(BoundTerm::BlankNode(label)) => Ok(resolve_blank(label, row_scope, blanks, labels)),
        Term::Var(name) => match row.get(name) {
            Cell::Node(n) => Ok(n),
            _ => Err(ExecError::UnrecognisedClause("CONSTRUCT subject binding did not resolve to a node")),
        },
        Term::Bound(_) => Err(ExecError::UnrecognisedClause("CONSTRUCT subject must be a node, blank node, or node-valued binding")),
    }
}

fn resolve_predicate(term: &Term, row: &Row) -> Result<Predicate, ExecError> {
    match term {
        Term::Bound(BoundTerm::Predicate(p)) => Ok(p.clone()),
        Term::Var(name) => match row.get(name) {
            Cell::Predicate(p) => Ok(p),
            _ => Err(ExecError::UnrecognisedClause("CONSTRUCT pair predicate binding did not resolve to a predicate")),
        },
        Term::Bound(_) => Err(ExecError::UnrecognisedClause("CONSTRUCT pair predicate must be a predicate or predicate-valued binding")),
    }
}

fn resolve_object(term: &Term, row: &Row, row_scope: u64, blanks: &BlankNodeGenerator, labels: &mut IndexMap<SmolStr, Node>) -> Result<Object, ExecError> {
    match term {
        Term::Bound(BoundTerm::Node(n)) => Ok(Object::Node(n.clone())),
        Term::Bound(BoundTerm::Predicate(p)) => Ok(Object::Predicate(p.clone())),
        Term::Bound(BoundTerm::Literal(l)) => Ok(Object::Literal(l.clone())),
        Term::Bound(BoundTerm::BlankNode(label)) => Ok(Object::Node(resolve_blank(label, row_scope, blanks, labels))),
        Term::Var(name) => match row.get(name) {
            Cell::Node(n) => Ok(Object::Node(n)),
            Cell::Predicate(p) => Ok(Object::Predicate(p)),
            Cell::Literal(l) => Ok(Object::Literal(l)),
            _ => Err(ExecError::UnrecognisedClause("CONSTRUCT pair object binding did not resolve to a node, predicate, or literal")),
        },
        Term::Bound(BoundTerm::PredicateBound(_)) => Err(ExecError::UnrecognisedClause("CONSTRUCT pair object cannot be a predicate-bound range")),
    }
}

/// A `_:label` is scoped to one result row: repeated references within a row
/// resolve to the same minted node, across rows they're always disjoint
/// (§4.4.5, §9).
fn resolve_blank(label: &SmolStr, row_scope: u64, blanks: &BlankNodeGenerator, labels: &mut IndexMap<SmolStr, Node>) -> Node {
    labels.entry(label.clone()).or_insert_with(|| blanks.mint(row_scope)).clone()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use badwolf_semantic::{ExtractionSet, GraphClause};
    use badwolf_store_memory::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn node(text: &str) -> Node {
        Node::parse(text).unwrap()
    }

    #[tokio::test]
    async fn construct_reifies_a_temporal_pair_and_keeps_immutable_pairs_bare() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let source = store.new_graph("src").await.unwrap();
        store.new_graph("dst").await.unwrap();
        source
            .add_triples(&[Triple::new(node("/Person<joe>"), Predicate::parse("\"bought\"@[2024-01-01T00:00:00Z]").unwrap(), Object::parse("/Item<bike>").unwrap())])
            .await
            .unwrap();

        let mut stmt = Statement::new(Kind::Construct);
        stmt.input_graphs = vec!["?src".into()];
        stmt.output_graphs = vec!["?dst".into()];
        stmt.clauses = vec![GraphClause {
            subject: Some(Term::Var("?s".into())),
            predicate: Some(Term::Var("?p".into())),
            object: Some(Term::Var("?o".into())),
            subject_extraction: ExtractionSet::default(),
            predicate_extraction: ExtractionSet::default(),
            object_extraction: ExtractionSet::default(),
            optional: false,
            filters: Vec::new(),
        }];
        stmt.construct_templates = vec![ConstructTemplate {
            subject: Some(Term::Var("?s".into())),
            pairs: vec![(Term::Var("?p".into()), Term::Var("?o".into()))],
        }];

        run(&store, &stmt, &CancellationToken::new()).await.unwrap();
        let dst = store.graph("dst").await.unwrap();
        assert!(dst.exist(&Triple::new(node("/Person<joe>"), Predicate::parse("\"bought\"@[2024-01-01T00:00:00Z]").unwrap(), Object::parse("/Item<bike>").unwrap())).await.unwrap());

        // three reification triples plus the explicit one, all sharing the predicate's own anchor.
        let mut names = Vec::new();
        let (tx, mut rx) = tokio::sync::mpsc::channel(16);
        dst.triples(Default::default(), tx, CancellationToken::new()).await.unwrap();
        while let Some(t) = rx.recv().await {
            names.push(t);
        }
        assert_eq!(names.len(), 4);
    }
}
