//! Logging setup.
//!
//! Centralizes `env_logger` initialization behind the `log` facade.

mod init;

pub use init::{LoggingConfig, default_filter, init_logging};
