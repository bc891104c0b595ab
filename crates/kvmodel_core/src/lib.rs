//! # kvmodel Core
//!
//! Record-style access to entities stored in a remote key-value store,
//! with secondary-index lookup by arbitrary combinations of declared
//! fields, including prefix/wildcard matching - without a dedicated
//! index data structure.
//!
//! This crate provides:
//! - [`Schema`] - the explicit per-kind field descriptor (indexed,
//!   plain, hidden fields and read mutators)
//! - [`key`] - the index-key codec: deterministic key derivation from
//!   field values, and wildcard search patterns
//! - [`scan`] - the cursor-driven key scanner
//! - [`EntityStore`] - CRUD operations that keep the secondary index
//!   consistent with the hash records
//! - [`Entity`] and [`Collection`] - the result types
//!
//! ## Key layout
//!
//! ```text
//! users                               per-kind id counter
//! user:1                              hash record {id: 1, name: ...}
//! user:1:1_a@x.com_kenyon+haliwell    index entry, value = "1"
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use kvmodel_core::{EntityStore, FieldSelection, Schema, SearchOutcome};
//! use kvmodel_store::InMemoryStore;
//!
//! let schema = Schema::builder("user")
//!     .indexed(["id", "email", "name"])
//!     .plain(["address"])
//!     .build()?;
//! let store = EntityStore::new(InMemoryStore::new(), schema);
//!
//! let user = store.create(&[("name".into(), "Kenyon Haliwell".into())].into())?;
//! match store.search_by_wildcard(&[("name".into(), "Kenyon*".into())].into(), FieldSelection::All)? {
//!     SearchOutcome::One(found) => assert_eq!(found.id(), user.id()),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod entity;
mod error;
pub mod id;
pub mod key;
pub mod scan;
mod schema;
mod store;

pub use collection::Collection;
pub use entity::Entity;
pub use error::{CoreError, CoreResult};
pub use schema::{FieldSelection, Schema, SchemaBuilder};
pub use store::{EntityStore, SearchOutcome};
