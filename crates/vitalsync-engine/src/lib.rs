//! Sync orchestration and tenant provisioning.
//!
//! This crate sits between the HTTP gateway and the storage layer. It owns
//! the two operations of the service: [`SyncService::login`], which
//! authenticates or provisions a tenant and issues a session token, and
//! [`SyncService::sync`], which persists a batch of records into the
//! tenant's private database.
//!
//! [`SyncService::login`]: crate::service::SyncService::login
//! [`SyncService::sync`]: crate::service::SyncService::sync

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod error;
pub mod service;
pub mod sync;

pub use error::{EngineError, Result};
pub use service::SyncService;
