//! Infrastructure layer: document store adapters, typed repositories, the
//! reference-data cache, order administration and configuration.

pub mod cache;
pub mod config;
pub mod document_store;
pub mod order_service;
pub mod repository;
pub mod seed;

pub use cache::{CacheConfig, ReferenceCache, ReferenceSource};
pub use config::AppConfig;
pub use document_store::{DocumentStore, DocumentStoreError, InMemoryDocumentStore};
pub use order_service::{Executed, OrderAdminService};
pub use repository::{CustomerRepository, DocumentReferenceSource, OrderFilter, OrderRepository, PageOf};
