//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are raised while decoding `gh` output or validating gist identifiers.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("empty line")]
    EmptyInput,

    #[error("missing number of chunks: {fields}\ngiven line: {line:?}")]
    MalformedRecord { fields: usize, line: String },

    #[error("failed to parse {field} from: {raw:?}: {reason}")]
    FieldParse {
        field: &'static str,
        raw: String,
        reason: String,
    },

    #[error("failed to parse gist info from: {input:?}: {source}")]
    ListParse {
        input: String,
        #[source]
        source: Box<DomainError>,
    },

    #[error("invalid gist ID: {0:?}")]
    InvalidGistId(String),

    #[error("invalid gist URL {url}: {reason}")]
    InvalidGistUrl { url: String, reason: String },
}

impl DomainError {
    pub(crate) fn field(field: &'static str, raw: &str, reason: impl ToString) -> Self {
        Self::FieldParse {
            field,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}
