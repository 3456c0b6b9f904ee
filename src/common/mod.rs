//! Common utilities shared across the runner

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{ClientError, Error, Result};
