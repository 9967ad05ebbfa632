//! Application layer: gist services and error annotation
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod annotate;
pub mod error;
pub mod services;

pub use annotate::{Annotate, AnnotatedError, Annotator};
pub use error::{ApplicationError, ApplicationResult};
