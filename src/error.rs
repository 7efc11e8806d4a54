//! Unified error types for chatpulse.
//!
//! This module provides a single [`ChatpulseError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular crates
//! like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Per-message problems (a malformed timestamp, an unreadable record) are not
//! errors at all: the parser skips those records and keeps going. Errors are
//! reserved for things the caller must fix — a missing input file, a broken
//! category pattern in the configuration, invalid JSON.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatpulse operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use chatpulse::error::Result;
/// use chatpulse::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatpulseError>;

/// The error type for all chatpulse operations.
///
/// This enum represents all possible errors that can occur when using
/// chatpulse. Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatpulseError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    ///
    /// This can occur when reading a configuration file or writing an
    /// output document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured category or significance pattern failed to compile.
    ///
    /// Raised once, at [`Analyzer::new`](crate::analysis::Analyzer::new)
    /// time. Pattern problems are never surfaced per message.
    #[error("Invalid pattern for '{name}': {source}")]
    InvalidPattern {
        /// The category or pattern-table entry that failed to compile
        name: String,
        /// The underlying regex compile error
        #[source]
        source: regex::Error,
    },

    /// The configuration is structurally unusable.
    ///
    /// This occurs when:
    /// - The tracked-sender list is empty
    /// - A referenced category name does not exist in the category table
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatpulseError {
    /// Creates a pattern-compilation error for a named table entry.
    pub fn invalid_pattern(name: impl Into<String>, source: regex::Error) -> Self {
        ChatpulseError::InvalidPattern {
            name: name.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatpulseError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatpulseError::Io(_))
    }

    /// Returns `true` if this is a JSON error.
    pub fn is_json(&self) -> bool {
        matches!(self, ChatpulseError::Json(_))
    }

    /// Returns `true` if this is a pattern-compilation error.
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, ChatpulseError::InvalidPattern { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChatpulseError::InvalidConfig { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
