//! # kvmodel Store
//!
//! Store client trait and implementations for kvmodel.
//!
//! This crate defines the narrow interface kvmodel expects from a remote
//! key-value store: hash multi-field reads and writes, plain key
//! get/set/delete/rename, an atomic counter increment, and a cursor-based
//! pattern scan over the keyspace.
//!
//! ## Design Principles
//!
//! - Clients are handed to the entity layer explicitly (dependency
//!   injection) - there is no ambient global connection
//! - All values are strings at the storage boundary
//! - Clients must be `Send + Sync` for shared access
//! - No multi-key transactions; every operation is independent
//!
//! ## Available Clients
//!
//! - [`InMemoryStore`] - for tests and ephemeral data
//!
//! ## Example
//!
//! ```rust
//! use kvmodel_store::{InMemoryStore, StoreClient};
//!
//! let store = InMemoryStore::new();
//! store.set("user:1:1_a@x.com", "1").unwrap();
//! assert_eq!(store.get("user:1:1_a@x.com").unwrap().as_deref(), Some("1"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
mod memory;
mod pattern;

pub use client::{ScanPage, StoreClient};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use pattern::glob_match;
