//! # polysql-core
//!
//! Error types, settings, and logging setup shared by every polysql crate.
//! This crate has no dependency on the builder crates and is the foundation
//! for all of them.
//!
//! ## Modules
//!
//! - [`error`] - Error type and result alias
//! - [`settings`] - Builder and database settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{PolySqlError, PolySqlResult};
pub use settings::{BuilderSettings, DatabaseSettings, Settings};
