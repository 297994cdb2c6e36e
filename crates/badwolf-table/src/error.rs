use thiserror::Error;

/// `ExecError` variants that originate inside table operations (spec §7):
/// unrecognised shapes, numeric overflow, comparison type mismatches.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("cannot compare {left} with {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("unknown binding {0:?} in {1}")]
    UnknownBinding(smol_str::SmolStr, &'static str),

    #[error("numeric overflow summing {binding:?}")]
    SumOverflow { binding: smol_str::SmolStr },

    #[error("SUM({binding:?}) over a non-numeric cell")]
    SumNotNumeric { binding: smol_str::SmolStr },
}
