//! Common types for xapi-db-load backends.
//!
//! This crate provides the [`Backend`] trait every destination implements,
//! the shared error type and the command-line arguments common to all
//! backends. Concrete backends live in the `load-backend-*` crates.

pub mod args;
mod backend;
mod error;
mod kind;

pub use args::CommonLoadArgs;
pub use backend::Backend;
pub use error::BackendError;
pub use kind::BackendKind;
pub use xapi_generator::{CourseBlock, CourseOverview, QueryTargets, Statement, UserProfile};
