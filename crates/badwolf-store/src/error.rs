use thiserror::Error;

/// Errors a `Store`/`Graph` implementation reports back to the planner
/// (spec §7): wrapped and propagated unchanged, never reinterpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("graph {0:?} already exists")]
    GraphExists(String),

    #[error("graph {0:?} not found")]
    GraphNotFound(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("store backend error: {0}")]
    Backend(String),
}
