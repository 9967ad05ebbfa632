//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => infra_exit_code(e),
        }
    }
}

fn infra_exit_code(e: &InfraError) -> i32 {
    match e {
        InfraError::Io { .. } => exitcode::IOERR,
        InfraError::Gh { .. } => exitcode::UNAVAILABLE,
        InfraError::Application(app) => app_exit_code(app),
    }
}

fn app_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::FileNotFound { .. } => exitcode::NOINPUT,
        ApplicationError::Domain(_) => exitcode::DATAERR,
        ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
        ApplicationError::Annotated(annotated) => {
            // annotated chains carry the real failure as their innermost cause
            if let Some(app) = annotated.find_cause::<ApplicationError>() {
                app_exit_code(app)
            } else if let Some(infra) = annotated.find_cause::<InfraError>() {
                infra_exit_code(infra)
            } else if annotated.find_cause::<DomainError>().is_some()
                || annotated.find_cause::<serde_json::Error>().is_some()
                || annotated.find_cause::<url::ParseError>().is_some()
                || annotated.find_cause::<std::num::ParseIntError>().is_some()
            {
                exitcode::DATAERR
            } else {
                exitcode::SOFTWARE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AnnotatedError;

    #[test]
    fn test_gh_failure_maps_to_unavailable() {
        let gh = InfraError::Gh {
            message: "HTTP 401".into(),
            exit_code: Some(1),
        };
        let err: CliError = ApplicationError::from(AnnotatedError::wrap(gh, "failed to list")).into();
        assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    }

    #[test]
    fn test_parse_failure_maps_to_dataerr() {
        let err: CliError =
            ApplicationError::from(AnnotatedError::wrap(DomainError::EmptyInput, "bad output"))
                .into();
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn test_missing_file_maps_to_noinput() {
        let missing = ApplicationError::FileNotFound {
            gist: "abc".into(),
            file: "x.md".into(),
        };
        let err: CliError = ApplicationError::from(AnnotatedError::wrap(missing, "file not found")).into();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
        assert_eq!(CliError::InvalidArgs("x".into()).exit_code(), exitcode::USAGE);
    }

    #[test]
    fn test_plain_annotated_error_is_software() {
        let err: CliError = ApplicationError::from(AnnotatedError::msg("boom")).into();
        assert_eq!(err.exit_code(), exitcode::SOFTWARE);
    }
}
