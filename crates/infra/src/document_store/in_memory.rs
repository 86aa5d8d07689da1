use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::Value as JsonValue;

use super::query::run_query;
use super::r#trait::{Document, DocumentStore, DocumentStoreError, ListQuery, Page, Patch};

type Collection = BTreeMap<String, JsonValue>;

/// In-memory document store.
///
/// Intended for tests/dev. `set_available(false)` makes every call fail with
/// `Unavailable`, which is how upstream outages are simulated.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    available: AtomicBool,
    reads: AtomicU64,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            reads: AtomicU64::new(0),
        }
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `get_document` + `list_documents` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), DocumentStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DocumentStoreError::Unavailable("in-memory store switched off".to_string()))
        }
    }

    fn poisoned() -> DocumentStoreError {
        DocumentStoreError::Unavailable("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, DocumentStoreError> {
        self.ensure_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Page, DocumentStoreError> {
        self.ensure_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let docs: Vec<Document> = {
            let collections = self.collections.read().map_err(|_| Self::poisoned())?;
            collections
                .get(collection)
                .map(|c| {
                    c.iter()
                        .map(|(id, data)| Document {
                            id: id.clone(),
                            data: data.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        run_query(docs, query)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> Result<(), DocumentStoreError> {
        self.ensure_available()?;

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let not_found = || DocumentStoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let data = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(not_found)?;

        let JsonValue::Object(fields) = data else {
            return Err(DocumentStoreError::InvalidQuery(format!(
                "document '{collection}/{id}' is not an object"
            )));
        };
        for (key, value) in patch {
            fields.insert(key, value);
        }
        Ok(())
    }

    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        data: JsonValue,
    ) -> Result<(), DocumentStoreError> {
        self.ensure_available()?;

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }
}
