use std::sync::Arc;

use badwolf_semantic::{Kind, Statement};
use badwolf_store::Store;
use futures::future::join_all;

use crate::error::{join_errors, ExecError};
use crate::graph_id::graph_id;

/// Runs `CREATE`/`DROP` (§4.4.1): one sub-operation per `graph_bindings`
/// entry, run concurrently, with every failure reported together rather than
/// stopping at the first one.
pub(crate) async fn run(store: &Arc<dyn Store>, stmt: &Statement) -> Result<(), ExecError> {
    let results = join_all(stmt.graph_bindings.iter().map(|binding| {
        let store = Arc::clone(store);
        let id = graph_id(binding).to_string();
        async move {
            match stmt.kind {
                Kind::Create => store.new_graph(&id).await.map(|_| ()).map_err(ExecError::from),
                Kind::Drop => store.delete_graph(&id).await.map_err(ExecError::from),
                _ => unreachable!("executor only dispatches CREATE/DROP statements here"),
            }
        }
    }))
    .await;

    join_errors(results.into_iter().filter_map(Result::err).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use badwolf_store::Store;
    use badwolf_store_memory::MemoryStore;

    use super::*;

    fn stmt(kind: Kind, bindings: &[&str]) -> Statement {
        let mut s = Statement::new(kind);
        s.graph_bindings = bindings.iter().map(|b| (*b).into()).collect();
        s
    }

    #[tokio::test]
    async fn create_makes_every_named_graph() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        run(&store, &stmt(Kind::Create, &["?a", "?b"])).await.unwrap();
        assert!(store.graph("a").await.is_ok());
        assert!(store.graph("b").await.is_ok());
    }

    #[tokio::test]
    async fn drop_on_an_unknown_graph_reports_an_error() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let err = run(&store, &stmt(Kind::Drop, &["?missing"])).await.unwrap_err();
        assert!(matches!(err, ExecError::Store(_)));
    }
}
