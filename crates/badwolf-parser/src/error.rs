use std::fmt;

use badwolf_grammar::ParseError;

/// Unifies grammar-mismatch errors with semantic hook errors into one
/// `Result` the driver can propagate (§4.2, §7). Hand-written rather than
/// `#[derive(thiserror::Error)]`: thiserror's generic-field bound inference
/// is unreliable once the hook error type `E` is itself a type parameter.
#[derive(Debug)]
pub enum DriverError<E> {
    Grammar(ParseError),
    Hook(E),
}

impl<E: fmt::Display> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Grammar(e) => write!(f, "{e}"),
            DriverError::Hook(e) => write!(f, "{e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for DriverError<E> {}

impl<E> From<ParseError> for DriverError<E> {
    fn from(e: ParseError) -> Self {
        DriverError::Grammar(e)
    }
}
