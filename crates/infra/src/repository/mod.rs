//! Typed access to the document store.
//!
//! Every document is decoded into an explicit schema on read. Anything that
//! does not decode fails with `SchemaMismatch` instead of being passed on.

pub mod customers;
pub mod orders;
pub mod reference;

pub use customers::CustomerRepository;
pub use orders::{OrderFilter, OrderRepository};
pub use reference::DocumentReferenceSource;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use storefront_core::{DomainError, DomainResult};

use crate::document_store::{Document, DocumentStore, ListQuery};

pub mod collections {
    pub const ORDERS: &str = "orders";
    pub const USERS: &str = "users";
    pub const ADDRESSES: &str = "addresses";
    pub const CATEGORIES: &str = "categories";
    pub const SUBCATEGORIES: &str = "subcategories";
    pub const BRANDS: &str = "brands";
    pub const SLIDES: &str = "slides";
    pub const SETTINGS: &str = "settings";
}

/// A page of decoded records.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Decode a raw document into `T`.
///
/// The document id is injected as `id` when the payload does not carry one;
/// when it does, the two must agree.
pub fn decode<T: DeserializeOwned>(collection: &str, doc: Document) -> DomainResult<T> {
    let Document { id, data } = doc;

    let JsonValue::Object(mut fields) = data else {
        return Err(DomainError::schema_mismatch(
            collection,
            format!("document '{id}' is not an object"),
        ));
    };

    match fields.get("id") {
        None => {
            fields.insert("id".to_string(), JsonValue::String(id.clone()));
        }
        Some(JsonValue::String(inner)) if *inner == id => {}
        Some(other) => {
            return Err(DomainError::schema_mismatch(
                collection,
                format!("document '{id}' carries a different id {other}"),
            ));
        }
    }

    serde_json::from_value(JsonValue::Object(fields)).map_err(|e| {
        tracing::warn!(collection, document_id = %id, error = %e, "document failed schema validation");
        DomainError::schema_mismatch(collection, format!("document '{id}': {e}"))
    })
}

/// Read every page of a listing.
pub(crate) async fn list_all<D: DocumentStore + ?Sized>(
    store: &D,
    collection: &str,
    query: ListQuery,
) -> DomainResult<Vec<Document>> {
    let mut query = query;
    let mut out = Vec::new();
    loop {
        let page = store.list_documents(collection, &query).await?;
        out.extend(page.documents);
        match page.next_page_token {
            Some(token) => query.page_token = Some(token),
            None => return Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        id: String,
        name: String,
    }

    fn doc(id: &str, data: JsonValue) -> Document {
        Document {
            id: id.to_string(),
            data,
        }
    }

    #[test]
    fn injects_document_id() {
        let named: Named = decode("brands", doc("b1", json!({ "name": "Acme" }))).unwrap();
        assert_eq!(named.id, "b1");
        assert_eq!(named.name, "Acme");
    }

    #[test]
    fn missing_field_is_a_schema_mismatch() {
        let err = decode::<Named>("brands", doc("b1", json!({ "title": "Acme" }))).unwrap_err();
        assert!(matches!(err, DomainError::SchemaMismatch { ref collection, .. } if collection == "brands"));
    }

    #[test]
    fn conflicting_inner_id_is_a_schema_mismatch() {
        let err = decode::<Named>("brands", doc("b1", json!({ "id": "b2", "name": "x" }))).unwrap_err();
        assert!(matches!(err, DomainError::SchemaMismatch { .. }));
    }

    #[test]
    fn non_object_is_a_schema_mismatch() {
        let err = decode::<Named>("brands", doc("b1", json!([1, 2]))).unwrap_err();
        assert!(matches!(err, DomainError::SchemaMismatch { .. }));
    }
}
