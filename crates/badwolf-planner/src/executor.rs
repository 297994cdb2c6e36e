use std::sync::Arc;

use badwolf_semantic::{Kind, Statement};
use badwolf_store::Store;
use badwolf_table::Table;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;
use crate::{construct, create_drop, insert_delete, query, show};

/// Runs a parsed, validated `Statement` against a `Store` (§4.4, §6). One
/// `Executor` is cheap to keep around: it holds nothing beyond the store
/// handle itself.
pub struct Executor {
    store: Arc<dyn Store>,
}

impl Executor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Runs `statement` to completion. A `SELECT` (or `CONSTRUCT`/
    /// `DECONSTRUCT`, which still go through the `WHERE` pipeline) returns its
    /// result table; every other statement kind returns an empty table.
    pub async fn execute(&self, statement: &Statement, cancel: CancellationToken) -> Result<Table, ExecError> {
        match statement.kind {
            Kind::Query => query::plan_query(&self.store, statement, &cancel).await,
            Kind::Insert | Kind::Delete => {
                insert_delete::run(&self.store, statement).await?;
                Ok(Table::new(Vec::<smol_str::SmolStr>::new()))
            }
            Kind::Create | Kind::Drop => {
                create_drop::run(&self.store, statement).await?;
                Ok(Table::new(Vec::<smol_str::SmolStr>::new()))
            }
            Kind::Construct | Kind::Deconstruct => {
                construct::run(&self.store, statement, &cancel).await?;
                Ok(Table::new(Vec::<smol_str::SmolStr>::new()))
            }
            Kind::Show => show::run(&self.store, &cancel).await,
        }
    }
}
