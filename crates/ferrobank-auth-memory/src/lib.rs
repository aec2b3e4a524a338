//! In-memory storage backend for the Ferrobank auth subsystem.
//!
//! Implements the storage traits from `ferrobank-auth` on top of
//! `RwLock`-guarded maps. Suitable for tests, development and
//! single-process deployments; durable backends implement the same traits
//! against a database.
//!
//! The token store is where the concurrency contract matters: revocation
//! is a conditional update under the write lock, so refresh rotation stays
//! linearizable per token and `revoke_all_by_user` is atomic with respect
//! to lookups.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ferrobank_auth_memory::{InMemoryClientStorage, InMemoryTokenStorage, InMemoryUserStorage};
//!
//! let users = Arc::new(InMemoryUserStorage::new());
//! let clients = Arc::new(InMemoryClientStorage::new());
//! let tokens = Arc::new(InMemoryTokenStorage::new());
//! ```

pub mod client;
pub mod token;
pub mod user;

pub use client::InMemoryClientStorage;
pub use token::InMemoryTokenStorage;
pub use user::InMemoryUserStorage;
