use std::sync::Arc;

use badwolf_model::{in_bounds, merge_bounds, Node, Object, Predicate, TimeAnchor, Triple};
use badwolf_semantic::{BoundTerm, GraphClause, Term};
use badwolf_store::{Graph, LookupOptions, StoreError};
use badwolf_table::Table;
use smol_str::SmolStr;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;
use crate::row_convert::triple_to_row;

/// The literal values known for a clause's positions at plan time, ignoring
/// any `Var` position and any `PredicateBound` (a range isn't a single known
/// value a store call can take, §4.4.3b).
struct KnownLiterals {
    subject: Option<Node>,
    predicate: Option<Predicate>,
    object: Option<Object>,
}

fn known_literals(clause: &GraphClause) -> KnownLiterals {
    KnownLiterals {
        subject: match &clause.subject {
            Some(Term::Bound(BoundTerm::Node(n))) => Some(n.clone()),
            _ => None,
        },
        predicate: match &clause.predicate {
            Some(Term::Bound(BoundTerm::Predicate(p))) => Some(p.clone()),
            _ => None,
        },
        object: match &clause.object {
            Some(Term::Bound(BoundTerm::Node(n))) => Some(Object::Node(n.clone())),
            Some(Term::Bound(BoundTerm::Predicate(p))) => Some(Object::Predicate(p.clone())),
            Some(Term::Bound(BoundTerm::Literal(l))) => Some(Object::Literal(l.clone())),
            _ => None,
        },
    }
}

/// The window a `PredicateBound` range (`"id"@[lo,hi]`) contributes, narrowed
/// against the statement-level `WITHIN` window before dispatch (§4.4.3i: the
/// global window tightens `LookupOptions`, it is never a post-filter).
pub(crate) fn clause_lookup_options(clause: &GraphClause, stmt_window: (Option<TimeAnchor>, Option<TimeAnchor>), max_elements: Option<usize>) -> LookupOptions {
    let inline = match &clause.predicate {
        Some(Term::Bound(BoundTerm::PredicateBound(pb))) => (pb.lower().copied(), pb.upper().copied()),
        _ => (None, None),
    };
    let (lower, upper) = merge_bounds(stmt_window, inline);
    let mut options = LookupOptions::unbounded().with_window(lower, upper);
    if let Some(max) = max_elements {
        options = options.with_max_elements(max);
    }
    options
}

/// Verifies a candidate triple truly satisfies every literal position a
/// clause names (§4.4.3b's "bound verification"): some dispatch branches
/// (e.g. `TriplesForSubject`) only guarantee one position matched, so
/// whichever positions weren't used to pick the store call must still be
/// checked here.
fn matches_clause(clause: &GraphClause, triple: &Triple) -> bool {
    term_matches_node(&clause.subject, &triple.subject) && term_matches_predicate(&clause.predicate, &triple.predicate) && term_matches_object(&clause.object, &triple.object)
}

fn term_matches_node(term: &Option<Term>, node: &Node) -> bool {
    match term {
        Some(Term::Bound(BoundTerm::Node(n))) => n == node,
        Some(Term::Bound(_)) => false,
        _ => true,
    }
}

fn term_matches_predicate(term: &Option<Term>, predicate: &Predicate) -> bool {
    match term {
        Some(Term::Bound(BoundTerm::Predicate(p))) => p == predicate,
        Some(Term::Bound(BoundTerm::PredicateBound(pb))) => {
            pb.id() == predicate.id() && predicate.anchor().is_some_and(|anchor| in_bounds(anchor, pb.lower(), pb.upper()))
        }
        Some(Term::Bound(_)) => false,
        _ => true,
    }
}

fn term_matches_object(term: &Option<Term>, object: &Object) -> bool {
    match term {
        Some(Term::Bound(BoundTerm::Node(n))) => matches!(object, Object::Node(o) if o == n),
        Some(Term::Bound(BoundTerm::Literal(l))) => matches!(object, Object::Literal(o) if o == l),
        Some(Term::Bound(BoundTerm::Predicate(p))) => matches!(object, Object::Predicate(o) if o == p),
        Some(Term::Bound(BoundTerm::PredicateBound(pb))) => {
            matches!(object, Object::Predicate(o) if o.id() == pb.id() && o.anchor().is_some_and(|anchor| in_bounds(anchor, pb.lower(), pb.upper())))
        }
        Some(Term::Bound(BoundTerm::BlankNode(_))) => false,
        _ => true,
    }
}

async fn join_producer(handle: JoinHandle<Result<(), StoreError>>) -> Result<(), ExecError> {
    handle.await.map_err(|e| ExecError::Joined(e.to_string()))??;
    Ok(())
}

/// Runs one clause's producer/consumer pair (§5): the producer streams
/// whichever store call stage (b) picked into a bounded channel, the
/// consumer verifies, converts (§4.4.4), and accumulates a fresh `Table` one
/// row at a time.
pub(crate) async fn fetch_clause_table(graph: &Arc<dyn Graph>, clause: &GraphClause, options: LookupOptions, chan_size: usize, cancel: &CancellationToken) -> Result<Table, ExecError> {
    let known = known_literals(clause);
    log::trace!(
        "dispatching clause (subject_known={}, predicate_known={}, object_known={})",
        known.subject.is_some(),
        known.predicate.is_some(),
        known.object.is_some()
    );
    let mut table = Table::new(Vec::<SmolStr>::new());

    macro_rules! consume {
        ($rx:expr, |$item:ident| $to_triple:expr) => {{
            let mut rx = $rx;
            while let Some($item) = rx.recv().await {
                if cancel.is_cancelled() {
                    return Err(ExecError::Cancelled);
                }
                let triple: Triple = $to_triple;
                if matches_clause(clause, &triple) {
                    if let Some(row) = triple_to_row(clause, &triple) {
                        table.add_row(row);
                    }
                }
            }
        }};
    }

    match (known.subject, known.predicate, known.object) {
        (Some(s), Some(p), Some(o)) => {
            let triple = Triple::new(s, p, o);
            if graph.exist(&triple).await? && matches_clause(clause, &triple) {
                if let Some(row) = triple_to_row(clause, &triple) {
                    table.add_row(row);
                }
            }
        }
        (Some(s), Some(p), None) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (s2, p2, cancel) = (s.clone(), p.clone(), cancel.clone());
                tokio::spawn(async move { graph.objects(&s2, &p2, options, tx, cancel).await })
            };
            consume!(rx, |object| Triple::new(s.clone(), p.clone(), object));
            join_producer(handle).await?;
        }
        (Some(s), None, Some(o)) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (s2, o2, cancel) = (s.clone(), o.clone(), cancel.clone());
                tokio::spawn(async move { graph.predicates_for_subject_and_object(&s2, &o2, options, tx, cancel).await })
            };
            consume!(rx, |predicate| Triple::new(s.clone(), predicate, o.clone()));
            join_producer(handle).await?;
        }
        (None, Some(p), Some(o)) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (p2, o2, cancel) = (p.clone(), o.clone(), cancel.clone());
                tokio::spawn(async move { graph.subjects(&p2, &o2, options, tx, cancel).await })
            };
            consume!(rx, |subject| Triple::new(subject, p.clone(), o.clone()));
            join_producer(handle).await?;
        }
        (Some(s), None, None) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (s2, cancel) = (s.clone(), cancel.clone());
                tokio::spawn(async move { graph.triples_for_subject(&s2, options, tx, cancel).await })
            };
            consume!(rx, |triple| triple);
            join_producer(handle).await?;
        }
        (None, Some(p), None) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (p2, cancel) = (p.clone(), cancel.clone());
                tokio::spawn(async move { graph.triples_for_predicate(&p2, options, tx, cancel).await })
            };
            consume!(rx, |triple| triple);
            join_producer(handle).await?;
        }
        (None, None, Some(o)) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let (o2, cancel) = (o.clone(), cancel.clone());
                tokio::spawn(async move { graph.triples_for_object(&o2, options, tx, cancel).await })
            };
            consume!(rx, |triple| triple);
            join_producer(handle).await?;
        }
        (None, None, None) => {
            let (tx, rx) = mpsc::channel(chan_size);
            let handle = {
                let graph = Arc::clone(graph);
                let cancel = cancel.clone();
                tokio::spawn(async move { graph.triples(options, tx, cancel).await })
            };
            consume!(rx, |triple| triple);
            join_producer(handle).await?;
        }
    }
    log::debug!("clause fetch produced {} row(s)", table.len());
    Ok(table)
}
