//! The `Store`/`Graph` contract the planner is written against (spec §6.2).
//! This crate is a trait library only — `badwolf-store-memory` is the
//! reference implementation; a durable backend is free to implement the same
//! traits without the planner changing at all.

mod error;
mod graph;
mod options;
mod store;

pub use error::StoreError;
pub use graph::Graph;
pub use options::{FilterOptions, LookupOptions};
pub use store::Store;
