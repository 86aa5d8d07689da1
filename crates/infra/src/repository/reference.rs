use storefront_catalog::{
    Brand, Category, ReferenceData, ReferenceKind, ShippingConfig, Slide, StoreInfo, Subcategory,
};
use storefront_core::{DomainError, DomainResult};

use super::{collections, decode, list_all};
use crate::cache::ReferenceSource;
use crate::document_store::{DocumentStore, ListQuery, SortBy};

/// Loads reference data straight from the document store.
///
/// Collections are read in full (every page). Settings are singleton
/// documents in `settings`, keyed by the kind name.
#[derive(Debug, Clone)]
pub struct DocumentReferenceSource<D> {
    store: D,
}

impl<D> DocumentReferenceSource<D>
where
    D: DocumentStore,
{
    pub fn new(store: D) -> Self {
        Self { store }
    }

    async fn collection<T>(&self, collection: &str, sort: SortBy) -> DomainResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let docs = list_all(&self.store, collection, ListQuery::default().sort(sort)).await?;
        docs.into_iter().map(|doc| decode(collection, doc)).collect()
    }

    async fn setting<T>(&self, key: &str) -> DomainResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let doc = self
            .store
            .get_document(collections::SETTINGS, key)
            .await?
            .ok_or(DomainError::NotFound)?;
        decode(collections::SETTINGS, doc)
    }
}

#[async_trait::async_trait]
impl<D> ReferenceSource for DocumentReferenceSource<D>
where
    D: DocumentStore,
{
    async fn fetch(&self, kind: ReferenceKind) -> DomainResult<ReferenceData> {
        let data = match kind {
            ReferenceKind::Categories => ReferenceData::Categories(
                self.collection::<Category>(collections::CATEGORIES, SortBy::asc("position"))
                    .await?,
            ),
            ReferenceKind::Subcategories => ReferenceData::Subcategories(
                self.collection::<Subcategory>(collections::SUBCATEGORIES, SortBy::asc("name"))
                    .await?,
            ),
            ReferenceKind::Brands => ReferenceData::Brands(
                self.collection::<Brand>(collections::BRANDS, SortBy::asc("name"))
                    .await?,
            ),
            ReferenceKind::Slides => ReferenceData::Slides(
                self.collection::<Slide>(collections::SLIDES, SortBy::asc("position"))
                    .await?,
            ),
            ReferenceKind::Info => ReferenceData::Info(self.setting::<StoreInfo>(kind.as_str()).await?),
            ReferenceKind::Shipping => {
                let shipping: ShippingConfig = self.setting(kind.as_str()).await?;
                shipping
                    .validate()
                    .map_err(|e| DomainError::schema_mismatch(collections::SETTINGS, e.to_string()))?;
                ReferenceData::Shipping(shipping)
            }
        };

        tracing::debug!(kind = %kind, "reference data loaded from document store");
        Ok(data)
    }
}
