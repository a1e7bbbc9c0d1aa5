//! # tabula-core
//!
//! Foundation crate for the tabula SQL construction library. Provides the
//! [`SyntaxError`](error::SyntaxError) compile-failure type shared by every
//! building operation, and [`logging`] helpers for installing a tracing
//! subscriber.

pub mod error;
pub mod logging;

pub use error::{BuildResult, SyntaxError};
