use std::sync::Arc;

use async_trait::async_trait;
use badwolf_helpers::IndexMap;
use badwolf_store::{Graph, Store, StoreError};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

use crate::graph::MemoryGraph;

/// A process-local `Store`: every graph lives in one `IndexMap` guarded by a
/// single lock (spec: "expected but not the hard part" — no sharding, no
/// persistence).
#[derive(Default)]
pub struct MemoryStore {
    graphs: RwLock<IndexMap<String, Arc<MemoryGraph>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn new_graph(&self, id: &str) -> Result<Arc<dyn Graph>, StoreError> {
        let mut graphs = self.graphs.write().await;
        if graphs.contains_key(id) {
            return Err(StoreError::GraphExists(id.to_string()));
        }
        let graph = Arc::new(MemoryGraph::new(id));
        graphs.insert(id.to_string(), Arc::clone(&graph));
        Ok(graph as Arc<dyn Graph>)
    }

    async fn graph(&self, id: &str) -> Result<Arc<dyn Graph>, StoreError> {
        self.graphs
            .read()
            .await
            .get(id)
            .cloned()
            .map(|graph| graph as Arc<dyn Graph>)
            .ok_or_else(|| StoreError::GraphNotFound(id.to_string()))
    }

    async fn delete_graph(&self, id: &str) -> Result<(), StoreError> {
        let mut graphs = self.graphs.write().await;
        graphs
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::GraphNotFound(id.to_string()))
    }

    async fn graph_names(&self, out: mpsc::Sender<String>, cancel: CancellationToken) -> Result<(), StoreError> {
        let names: Vec<String> = self.graphs.read().await.keys().cloned().collect();
        for name in names {
            if cancel.is_cancelled() {
                return Err(StoreError::Cancelled);
            }
            if out.send(name).await.is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn new_graph_rejects_a_duplicate_id() {
        let store = MemoryStore::new();
        store.new_graph("test").await.unwrap();
        assert_eq!(
            store.new_graph("test").await.unwrap_err(),
            StoreError::GraphExists("test".into())
        );
    }

    #[tokio::test]
    async fn graph_reports_not_found_before_creation() {
        let store = MemoryStore::new();
        assert_eq!(store.graph("test").await.unwrap_err(), StoreError::GraphNotFound("test".into()));
    }

    #[tokio::test]
    async fn delete_graph_removes_it_and_graph_names_reflects_the_change() {
        let store = MemoryStore::new();
        store.new_graph("a").await.unwrap();
        store.new_graph("b").await.unwrap();
        store.delete_graph("a").await.unwrap();

        let (tx, rx) = mpsc::channel(4);
        store.graph_names(tx, CancellationToken::new()).await.unwrap();
        let mut names = Vec::new();
        let mut rx = rx;
        while let Some(n) = rx.recv().await {
            names.push(n);
        }
        assert_eq!(names, vec!["b".to_string()]);
    }
}
