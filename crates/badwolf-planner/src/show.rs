use std::sync::Arc;

use badwolf_store::Store;
use badwolf_table::{Cell, Row, Table};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

const GRAPH_BINDING: &str = "?graph";

/// Runs `SHOW GRAPHS` (§4.4.6): one `?graph` row per graph the store knows.
pub(crate) async fn run(store: &Arc<dyn Store>, cancel: &CancellationToken) -> Result<Table, ExecError> {
    let (tx, mut rx) = mpsc::channel(10);
    let handle = {
        let store = Arc::clone(store);
        let cancel = cancel.clone();
        tokio::spawn(async move { store.graph_names(tx, cancel).await })
    };

    let mut table = Table::new([GRAPH_BINDING]);
    while let Some(name) = rx.recv().await {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        table.add_row(Row::new().with(GRAPH_BINDING, Cell::Text(name.into())));
    }
    handle.await.map_err(|e| ExecError::Joined(e.to_string()))??;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use badwolf_store_memory::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn lists_every_graph_once() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        store.new_graph("a").await.unwrap();
        store.new_graph("b").await.unwrap();

        let table = run(&store, &CancellationToken::new()).await.unwrap();
        assert_eq!(table.len(), 2);
        let mut names: Vec<String> = table
            .rows()
            .iter()
            .map(|r| match r.get(GRAPH_BINDING) {
                Cell::Text(s) => s.to_string(),
                other => panic!("expected a text cell, got {other:?}"),
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
