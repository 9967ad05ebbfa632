//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::application::annotate::{AnnotatedError, BoxError};
use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Failure of a gist operation, annotated with where it happened.
    #[error("{0}")]
    Annotated(#[from] AnnotatedError),

    #[error("file not found in gist {gist}: {file}")]
    FileNotFound { gist: String, file: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl ApplicationError {
    /// Find the first error of type `T` in this error or its cause chain.
    pub fn find<T: std::error::Error + 'static>(&self) -> Option<&T> {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
