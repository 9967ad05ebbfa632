//! gisty: manage GitHub gists by driving the `gh` CLI
//!
//! Layers (inner to outer):
//! - `domain`: records, parsers and domain errors (no I/O)
//! - `application`: gist service and error annotation
//! - `infrastructure`: command runner and dependency wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::annotate::{
    position_annotation_enabled, set_position_annotation, wrap_if_err, Annotate, AnnotatedError,
    Annotator,
};
pub use application::services::GistService;
pub use domain::{parse_gist_list, sanitize_gist_id, GistInfo};
