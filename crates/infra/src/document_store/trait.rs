use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use storefront_core::DomainError;

/// A raw document as returned by the hosted store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: JsonValue,
}

/// Partial update: top-level fields to overwrite.
pub type Patch = JsonMap<String, JsonValue>;

/// Equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: JsonValue,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub field: String,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parameters of a `list_documents` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// All filters must match.
    pub filters: Vec<FieldFilter>,
    pub sort: Option<SortBy>,
    /// Opaque continuation token from a previous `Page`.
    pub page_token: Option<String>,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            page_token: None,
            page_size: 50,
        }
    }
}

impl ListQuery {
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: SortBy) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page_token: Option<String>, page_size: u32) -> Self {
        self.page_token = page_token;
        self.page_size = page_size;
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    /// `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Document store operation error.
///
/// Infrastructure failures, as opposed to domain errors. Converted into
/// `DomainError` at the repository boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentStoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document '{collection}/{id}' not found")]
    NotFound { collection: String, id: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl From<DocumentStoreError> for DomainError {
    fn from(value: DocumentStoreError) -> Self {
        match value {
            DocumentStoreError::Unavailable(msg) => DomainError::UpstreamUnavailable(msg),
            DocumentStoreError::NotFound { .. } => DomainError::NotFound,
            DocumentStoreError::InvalidQuery(msg) => DomainError::Validation(msg),
        }
    }
}

/// Hosted document database, reduced to the operations the storefront needs.
///
/// Implementations must:
/// - return `Ok(None)` from `get_document` for a missing document
/// - apply all `filters` before sorting and paginating
/// - merge `patch` fields into an existing document only (`NotFound` otherwise)
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, DocumentStoreError>;

    async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Page, DocumentStoreError>;

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> Result<(), DocumentStoreError>;

    /// Create or replace a whole document.
    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        data: JsonValue,
    ) -> Result<(), DocumentStoreError>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, DocumentStoreError> {
        (**self).get_document(collection, id).await
    }

    async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Page, DocumentStoreError> {
        (**self).list_documents(collection, query).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> Result<(), DocumentStoreError> {
        (**self).update_document(collection, id, patch).await
    }

    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        data: JsonValue,
    ) -> Result<(), DocumentStoreError> {
        (**self).put_document(collection, id, data).await
    }
}
