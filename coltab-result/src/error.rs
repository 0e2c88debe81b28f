use std::io;
use thiserror::Error;

/// Unified error type for all coltab operations.
///
/// Errors propagate upward through the call stack using the `?` operator.
/// Cursor-level code additionally latches itself into an exhausted state
/// after raising a storage error, so a failed cursor cannot be reused.
///
/// `Error` is `Send + Sync`, so errors can cross thread boundaries (domain
/// accumulation may observe a writer running on another thread).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error raised by the physical batch storage.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error during columnar serialization or deserialization.
    ///
    /// Raised by the Arrow-backed store when a sealed batch cannot be
    /// converted to or from its IPC representation.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter.
    ///
    /// Covers configuration errors (zero chunk size, empty schemas,
    /// projection indices outside the schema) and contract misuse that is
    /// detectable at construction time. These are reported before any data
    /// is written and are recoverable by fixing the input.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// A batch index outside the written batch sequence.
    #[error("Batch not found")]
    NotFound,

    /// A typed accessor was invoked against a column of a different type.
    ///
    /// Values are never silently coerced; the mismatch is reported at the
    /// accessor (or adapter-construction) site.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A cursor was advanced or read past its last row.
    ///
    /// This is a programming-contract violation: callers are expected to
    /// consult `can_fwd()` before advancing.
    #[error("cursor exhausted")]
    CursorExhausted,

    /// An operation was attempted on a closed writer or store.
    #[error("already closed")]
    Closed,

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation; it signals a
    /// violated invariant inside the coltab crates.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a [`Error::TypeMismatch`] from static type names.
    #[inline]
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    /// Create an [`Error::InvalidArgumentError`] from any displayable value.
    #[inline]
    pub fn invalid_argument<M: std::fmt::Display>(msg: M) -> Self {
        Error::InvalidArgumentError(msg.to_string())
    }
}
