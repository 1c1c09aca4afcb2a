use crate::providers::transip::TransipError;
use thiserror::Error;

/// Failure of a provider operation.
///
/// The registrar client's error is carried unchanged; the variant only says
/// at which step it happened.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository setup failed: {0}")]
    Setup(#[source] TransipError),

    #[error("Repository call failed: {0}")]
    Repository(#[source] TransipError),
}

impl Error {
    pub fn cause(&self) -> &TransipError {
        match self {
            Error::Setup(e) | Error::Repository(e) => e,
        }
    }

    pub fn into_cause(self) -> TransipError {
        match self {
            Error::Setup(e) | Error::Repository(e) => e,
        }
    }
}
