//! Domain layer: gist records, parsers and identifiers
//!
//! This layer is independent of external concerns (no process spawning, no config loading).

pub mod entities;
pub mod error;
pub mod gist_info;
pub mod sanitize;

pub use entities::*;
pub use error::DomainError;
pub use gist_info::{parse_gist_list, GistInfo};
pub use sanitize::sanitize_gist_id;
