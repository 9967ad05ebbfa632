//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CommandRunner)
//! but are themselves concrete structs, not traits.

mod gist;

pub use gist::{
    CapturedIo, CloneArgs, CreateArgs, GistService, ListArgs, UpdateArgs, SYNC_SUCCESS_PREFIX,
};
