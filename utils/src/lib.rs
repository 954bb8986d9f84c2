//! Shared utilities for the Vota governance workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
