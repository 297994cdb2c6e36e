use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::graph::Graph;

/// A named collection of temporal graphs (§6.2). Graph identifiers are the
/// binding text a `CREATE`/`DROP`/`FROM`/`INTO`/`IN` clause names, minus the
/// leading `?` that only exists inside BQL source.
#[async_trait]
pub trait Store: Send + Sync {
    async fn new_graph(&self, id: &str) -> Result<Arc<dyn Graph>, StoreError>;

    async fn graph(&self, id: &str) -> Result<Arc<dyn Graph>, StoreError>;

    async fn delete_graph(&self, id: &str) -> Result<(), StoreError>;

    async fn graph_names(
        &self,
        out: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;
}
