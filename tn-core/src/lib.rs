//! Tinode Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other local store crates:
//! - Application configuration (database location, logging)
//! - Global error type covering every failure category of the store
//! - Structured logging with tracing
//! - Platform directory resolution
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{TnError, TnResult};
pub use logging::init_logging;
