//! Core types and utilities for vitalsync.
//!
//! This crate provides the foundational types used throughout the vitalsync
//! service:
//!
//! - **Identity**: the validated [`Username`] that names a tenant, their
//!   database role, and their private database
//! - **Error types**: common error definitions shared across crates
//!
//! # Example
//!
//! ```
//! use vitalsync_core::Username;
//!
//! let username = Username::new("alice").unwrap();
//! assert_eq!(username.as_str(), "alice");
//!
//! // Identifier-breaking names are rejected at the boundary.
//! assert!(Username::new("alice\"; DROP TABLE x").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod username;

pub use error::{CoreError, Result};
pub use username::{Username, UsernameError, MAX_USERNAME_LEN};
