use std::sync::Arc;

use badwolf_semantic::{Kind, Statement};
use badwolf_store::Store;
use futures::future::join_all;

use crate::error::{join_errors, ExecError};
use crate::graph_id::graph_id;

/// Runs `INSERT`/`DELETE` (§4.4.2): the statement's literal `data_triples`
/// are applied to every `output_graphs` entry concurrently.
pub(crate) async fn run(store: &Arc<dyn Store>, stmt: &Statement) -> Result<(), ExecError> {
    let results = join_all(stmt.output_graphs.iter().map(|binding| {
        let store = Arc::clone(store);
        let id = graph_id(binding).to_string();
        let triples = stmt.data_triples.clone();
        let kind = stmt.kind;
        async move {
            let graph = store.graph(&id).await?;
            match kind {
                Kind::Insert => graph.add_triples(&triples).await.map_err(ExecError::from),
                Kind::Delete => graph.remove_triples(&triples).await.map_err(ExecError::from),
                _ => unreachable!("executor only dispatches INSERT/DELETE statements here"),
            }
        }
    }))
    .await;

    join_errors(results.into_iter().filter_map(Result::err).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use badwolf_model::{Node, Predicate, Triple};
    use badwolf_store::Store;
    use badwolf_store_memory::MemoryStore;

    use super::*;

    fn triple() -> Triple {
        Triple::new(Node::parse("/Person<joe>").unwrap(), Predicate::parse("\"parent_of\"@[]").unwrap(), badwolf_model::Object::parse("/Person<amy>").unwrap())
    }

    #[tokio::test]
    async fn insert_adds_into_every_output_graph() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        store.new_graph("g").await.unwrap();

        let mut stmt = Statement::new(Kind::Insert);
        stmt.output_graphs = vec!["?g".into()];
        stmt.data_triples = vec![triple()];

        run(&store, &stmt).await.unwrap();
        let graph = store.graph("g").await.unwrap();
        assert!(graph.exist(&triple()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_from_every_output_graph() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let graph = store.new_graph("g").await.unwrap();
        graph.add_triples(&[triple()]).await.unwrap();

        let mut stmt = Statement::new(Kind::Delete);
        stmt.output_graphs = vec!["?g".into()];
        stmt.data_triples = vec![triple()];

        run(&store, &stmt).await.unwrap();
        assert!(!graph.exist(&triple()).await.unwrap());
    }
}
