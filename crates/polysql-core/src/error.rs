//! Core error type for polysql.
//!
//! This module provides the [`PolySqlError`] enum shared by the builder, the
//! dialect rules, and the configuration layer. Builders are pure, so every
//! error is deterministic for a given input and is meant to be propagated to
//! the caller as-is.

use thiserror::Error;

/// The primary error type for polysql.
///
/// # Examples
///
/// ```
/// use polysql_core::error::PolySqlError;
///
/// let err = PolySqlError::UnsupportedOperation("LIKE is not supported by Sphinx.".into());
/// assert_eq!(err.category(), "build");
/// assert!(err.is_unsupported());
/// ```
#[derive(Error, Debug)]
pub enum PolySqlError {
    // ── Build errors ─────────────────────────────────────────────────

    /// The selected dialect cannot express the requested construct.
    #[error("Not supported: {0}")]
    UnsupportedOperation(String),

    /// The builder input is structurally inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A driver, DSN, connection alias, or settings value is not recognized.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ── Serialization ────────────────────────────────────────────────

    /// Settings could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// A settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PolySqlError {
    /// Returns a short, stable name for the error family.
    ///
    /// - `UnsupportedOperation`, `InvalidArgument` -> `"build"`
    /// - `InvalidConfiguration` -> `"configuration"`
    /// - `Serialization`, `Io` -> `"io"`
    pub const fn category(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation(_) | Self::InvalidArgument(_) => "build",
            Self::InvalidConfiguration(_) => "configuration",
            Self::Serialization(_) | Self::Io(_) => "io",
        }
    }

    /// Returns `true` for [`PolySqlError::UnsupportedOperation`].
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }

    /// Shorthand for an unsupported construct on a named dialect.
    pub fn unsupported(what: impl std::fmt::Display, dialect: impl std::fmt::Display) -> Self {
        Self::UnsupportedOperation(format!("{what} is not supported by {dialect}."))
    }
}

/// A convenience type alias for `Result<T, PolySqlError>`.
pub type PolySqlResult<T> = Result<T, PolySqlError>;
