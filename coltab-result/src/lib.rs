//! Error types and result definitions for the coltab table store.
//!
//! This crate provides the unified error type ([`Error`]) and result type
//! alias ([`Result<T>`]) used throughout the coltab crates. All operations
//! that can fail return `Result<T>`, where the error variant carries enough
//! context to diagnose what went wrong.
//!
//! # Error Categories
//!
//! - **I/O errors** ([`Error::Io`]): failures in the physical batch storage
//! - **Columnar format errors** ([`Error::Arrow`]): Arrow serialization issues
//! - **Lookup failures** ([`Error::NotFound`]): batch indices outside the
//!   written sequence
//! - **User input errors** ([`Error::InvalidArgumentError`]): bad
//!   configurations, schema mismatches, out-of-range column selections
//! - **Type errors** ([`Error::TypeMismatch`]): typed accessors invoked
//!   against a column of a different type
//! - **Cursor contract violations** ([`Error::CursorExhausted`]): advancing
//!   or reading a cursor past its last row
//! - **Session misuse** ([`Error::Closed`]): writing through a closed writer
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
