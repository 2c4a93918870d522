//! Encrypted session tokens for vitalsync.
//!
//! This crate implements the stateless session credential used by the sync
//! pipeline. A login issues a token; every sync request resolves it back to
//! a username. No session state is kept server-side: the token itself is the
//! session, made tamper-evident by AES-256-GCM.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Gateway        │────▶│  SessionCodec    │
//! │   (HTTP)         │     │  (trait)         │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                          ┌────────▼─────────┐
//!                          │  AesGcmCodec     │
//!                          │  (AES-256-GCM)   │
//!                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vitalsync_auth::{AesGcmCodec, SessionCodec};
//! use vitalsync_core::Username;
//!
//! let codec = AesGcmCodec::new(b"very very secretvery very secret").unwrap();
//! let username = Username::new("alice").unwrap();
//!
//! let token = codec.issue(&username).unwrap();
//! assert_eq!(codec.resolve(&token).unwrap(), username);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod error;

pub use codec::{AesGcmCodec, SessionCodec, NONCE_LEN, SESSION_KEY_LEN, TAG_LEN};
pub use error::{AuthError, Result};

#[cfg(any(test, feature = "test-utils"))]
pub use codec::PlainCodec;
