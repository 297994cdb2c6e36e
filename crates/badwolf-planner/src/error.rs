use badwolf_store::StoreError;
use badwolf_table::TableError;
use thiserror::Error;

/// `ExecError` (spec §7): everything a plan can fail with once a `Statement`
/// has already parsed and validated cleanly.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("execution cancelled")]
    Cancelled,

    #[error("plan has an unrecognised clause shape: {0}")]
    UnrecognisedClause(&'static str),

    #[error("{0}")]
    Joined(String),
}

/// Folds a batch of fallible sub-operations (one `CREATE`/`DROP` per graph
/// binding, one `AddTriples`/`RemoveTriples` per output graph) into a single
/// error that names every failure, per §4.4.1/§4.4.2's "errors are
/// accumulated and reported together".
pub(crate) fn join_errors(errors: Vec<ExecError>) -> Result<(), ExecError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.into_iter().next().expect("len checked above")),
        _ => Err(ExecError::Joined(errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))),
    }
}
