//! Common error infrastructure for delver-core.
//!
//! Domain errors live next to the code that produces them (`GenerationError`
//! in [`crate::map`], `InventoryError` in [`crate::state`], `GameplayError` in
//! [`crate::engine`]). They all implement [`GameError`] so drivers can classify
//! them uniformly.
//!
//! # Propagation
//!
//! - Gameplay failures are caught where they are detected, turned into a
//!   message-log line, and leave the state untouched.
//! - Only generation failures are allowed to abort an operation, because a
//!   broken map cannot be played.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: inventory full, tool too soft
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: entity not found, target out of bounds
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the operation cannot produce a usable result.
    ///
    /// Examples: generated cave is disconnected, placement search exhausted
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or an unusable result.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all delver-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization and for asserting on failures in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
