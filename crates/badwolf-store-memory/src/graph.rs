use async_trait::async_trait;
use badwolf_model::{in_bounds, Node, Object, Predicate, Triple};
use badwolf_store::{Graph, LookupOptions, StoreError};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

/// A graph held entirely in memory: triples live in an insertion-ordered
/// `Vec` guarded by one lock, since `Object` carries an `f64` literal variant
/// and is not `Hash` (no hash-indexed storage is possible without losing
/// exact float equality).
pub struct MemoryGraph {
    id: String,
    triples: RwLock<Vec<Triple>>,
}

impl MemoryGraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            triples: RwLock::new(Vec::new()),
        }
    }

    /// Streams every triple matching `extract`, windowed by `options` (§6.2,
    /// §4.4.3i) and bounded by `options.max_elements`, stopping early on
    /// cancellation (§5) or a closed receiver.
    async fn stream_matches<T>(
        &self,
        options: LookupOptions,
        out: mpsc::Sender<T>,
        cancel: CancellationToken,
        mut extract: impl FnMut(&Triple) -> Option<T>,
    ) -> Result<(), StoreError> {
        let snapshot = self.triples.read().await.clone();
        let mut sent = 0usize;
        for triple in &snapshot {
            if cancel.is_cancelled() {
                return Err(StoreError::Cancelled);
            }
            if !in_window(&triple.predicate, &options) {
                continue;
            }
            let Some(value) = extract(triple) else {
                continue;
            };
            if out.send(value).await.is_err() {
                break;
            }
            sent += 1;
            if options.max_elements.is_some_and(|max| sent >= max) {
                break;
            }
        }
        Ok(())
    }
}

/// A temporal predicate's anchor must fall within the window; an immutable
/// predicate has no anchor and is never excluded by one (§3.2).
fn in_window(predicate: &Predicate, options: &LookupOptions) -> bool {
    match predicate.anchor() {
        Some(anchor) => in_bounds(anchor, options.lower_anchor.as_ref(), options.upper_anchor.as_ref()),
        None => true,
    }
}

#[async_trait]
impl Graph for MemoryGraph {
    fn id(&self) -> &str {
        &self.id
    }

    async fn add_triples(&self, triples: &[Triple]) -> Result<(), StoreError> {
        let mut store = self.triples.write().await;
        for triple in triples {
            if !store.contains(triple) {
                store.push(triple.clone());
            }
        }
        Ok(())
    }

    async fn remove_triples(&self, triples: &[Triple]) -> Result<(), StoreError> {
        let mut store = self.triples.write().await;
        store.retain(|existing| !triples.contains(existing));
        Ok(())
    }

    async fn exist(&self, triple: &Triple) -> Result<bool, StoreError> {
        Ok(self.triples.read().await.contains(triple))
    }

    async fn triples(
        &self,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| Some(t.clone())).await
    }

    async fn triples_for_subject(
        &self,
        subject: &Node,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| (&t.subject == subject).then(|| t.clone()))
            .await
    }

    async fn triples_for_predicate(
        &self,
        predicate: &Predicate,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| (&t.predicate == predicate).then(|| t.clone()))
            .await
    }

    async fn triples_for_object(
        &self,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| (&t.object == object).then(|| t.clone()))
            .await
    }

    async fn objects(
        &self,
        subject: &Node,
        predicate: &Predicate,
        options: LookupOptions,
        out: mpsc::Sender<Object>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| {
            (&t.subject == subject && &t.predicate == predicate).then(|| t.object.clone())
        })
        .await
    }

    async fn subjects(
        &self,
        predicate: &Predicate,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Node>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| {
            (&t.predicate == predicate && &t.object == object).then(|| t.subject.clone())
        })
        .await
    }

    async fn predicates_for_subject_and_object(
        &self,
        subject: &Node,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Predicate>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError> {
        self.stream_matches(options, out, cancel, |t| {
            (&t.subject == subject && &t.object == object).then(|| t.predicate.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use badwolf_model::{Id, Type};
    use tokio::sync::mpsc;

    use super::*;

    fn node(id: &str) -> Node {
        Node::new(Type::new("/u").unwrap(), Id::new(id).unwrap())
    }

    fn predicate(id: &str) -> Predicate {
        Predicate::Immutable(Id::new(id).unwrap())
    }

    async fn drain<T>(mut rx: mpsc::Receiver<T>) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(v) = rx.recv().await {
            out.push(v);
        }
        out
    }

    #[tokio::test]
    async fn add_is_idempotent_and_exist_reports_membership() {
        let graph = MemoryGraph::new("test");
        let triple = Triple::new(node("joe"), predicate("parent_of"), Object::Node(node("amy")));
        graph.add_triples(&[triple.clone(), triple.clone()]).await.unwrap();
        assert!(graph.exist(&triple).await.unwrap());
        assert_eq!(graph.triples.read().await.len(), 1);
    }

    #[tokio::test]
    async fn remove_drops_matching_triples_only() {
        let graph = MemoryGraph::new("test");
        let a = Triple::new(node("joe"), predicate("parent_of"), Object::Node(node("amy")));
        let b = Triple::new(node("joe"), predicate("parent_of"), Object::Node(node("sam")));
        graph.add_triples(&[a.clone(), b.clone()]).await.unwrap();
        graph.remove_triples(&[a.clone()]).await.unwrap();
        assert!(!graph.exist(&a).await.unwrap());
        assert!(graph.exist(&b).await.unwrap());
    }

    #[tokio::test]
    async fn triples_for_subject_filters_by_subject() {
        let graph = MemoryGraph::new("test");
        let joe_triple = Triple::new(node("joe"), predicate("parent_of"), Object::Node(node("amy")));
        let amy_triple = Triple::new(node("amy"), predicate("parent_of"), Object::Node(node("sam")));
        graph.add_triples(&[joe_triple.clone(), amy_triple]).await.unwrap();

        let (tx, rx) = mpsc::channel(4);
        graph
            .triples_for_subject(&node("joe"), LookupOptions::unbounded(), tx, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(drain(rx).await, vec![joe_triple]);
    }

    #[tokio::test]
    async fn max_elements_truncates_the_stream() {
        let graph = MemoryGraph::new("test");
        for n in 0..5 {
            graph
                .add_triples(&[Triple::new(
                    node("joe"),
                    predicate("knows"),
                    Object::Node(node(&format!("p{n}"))),
                )])
                .await
                .unwrap();
        }
        let (tx, rx) = mpsc::channel(16);
        graph
            .triples(LookupOptions::unbounded().with_max_elements(2), tx, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(drain(rx).await.len(), 2);
    }

    #[tokio::test]
    async fn cancellation_stops_the_stream_with_an_error() {
        let graph = MemoryGraph::new("test");
        graph
            .add_triples(&[Triple::new(node("joe"), predicate("knows"), Object::Node(node("amy")))])
            .await
            .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, _rx) = mpsc::channel(4);
        let err = graph.triples(LookupOptions::unbounded(), tx, cancel).await.unwrap_err();
        assert_eq!(err, StoreError::Cancelled);
    }
}
