//! Executes a parsed `Statement` against a `Store` (§4.4): the clause
//! fetch/join/filter pipeline behind `SELECT`, plus `CREATE`/`DROP`,
//! `INSERT`/`DELETE`, `CONSTRUCT`/`DECONSTRUCT`, and `SHOW GRAPHS`.

mod construct;
mod create_drop;
mod error;
mod executor;
mod fetch;
mod filter;
mod graph_id;
mod insert_delete;
mod query;
mod row_convert;
mod show;

pub use error::ExecError;
pub use executor::Executor;
