//! # kvmodel Testkit
//!
//! Test utilities for kvmodel.
//!
//! This crate provides:
//! - A canonical test schema (the `user` kind) with indexed, plain,
//!   and hidden fields plus a read mutator
//! - Store setup and seeding helpers
//! - Tracing initialization for tests
//!
//! Cross-crate integration tests live in this crate's `tests/`
//! directory.
//!
//! ## Usage
//!
//! ```rust
//! use kvmodel_testkit::{user_store, sample_user};
//!
//! let store = user_store();
//! let user = store.create(&sample_user("Kenyon Haliwell", "a@x.com")).unwrap();
//! assert_eq!(user.id(), Some(1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;

pub use fixtures::*;
