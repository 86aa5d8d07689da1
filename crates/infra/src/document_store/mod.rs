//! Hosted document database boundary.
//!
//! Defines the operations the storefront consumes from the document store
//! plus an in-memory implementation for tests/dev.

pub mod in_memory;
pub mod query;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{
    Document, DocumentStore, DocumentStoreError, FieldFilter, ListQuery, Page, Patch, SortBy,
    SortDirection,
};
