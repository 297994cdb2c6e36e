use async_trait::async_trait;
use badwolf_model::{Node, Object, Predicate, Triple};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::options::LookupOptions;

/// One temporal graph's triple store (§6.2). Every streaming method closes
/// `out` on completion or error (§6.2) and must stop producing and drain
/// nothing further once `cancel` fires (§5): the caller owns draining its own
/// receiver.
#[async_trait]
pub trait Graph: Send + Sync {
    fn id(&self) -> &str;

    async fn add_triples(&self, triples: &[Triple]) -> Result<(), StoreError>;

    async fn remove_triples(&self, triples: &[Triple]) -> Result<(), StoreError>;

    async fn exist(&self, triple: &Triple) -> Result<bool, StoreError>;

    async fn triples(
        &self,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn triples_for_subject(
        &self,
        subject: &Node,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn triples_for_predicate(
        &self,
        predicate: &Predicate,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn triples_for_object(
        &self,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Triple>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn objects(
        &self,
        subject: &Node,
        predicate: &Predicate,
        options: LookupOptions,
        out: mpsc::Sender<Object>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn subjects(
        &self,
        predicate: &Predicate,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Node>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;

    async fn predicates_for_subject_and_object(
        &self,
        subject: &Node,
        object: &Object,
        options: LookupOptions,
        out: mpsc::Sender<Predicate>,
        cancel: CancellationToken,
    ) -> Result<(), StoreError>;
}
