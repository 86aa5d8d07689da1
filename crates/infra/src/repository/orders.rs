use serde_json::Value as JsonValue;

use storefront_core::{AggregateRoot, CustomerId, DomainError, DomainResult, OrderId};
use storefront_orders::{Order, OrderStatus};
use storefront_orders::order::OrderRecord;

use super::{PageOf, collections, decode};
use crate::document_store::{DocumentStore, FieldFilter, ListQuery, Patch, SortBy};

/// Admin/customer listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<CustomerId>,
}

impl OrderFilter {
    pub fn by_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            customer_id: None,
        }
    }

    pub fn by_customer(customer_id: CustomerId) -> Self {
        Self {
            status: None,
            customer_id: Some(customer_id),
        }
    }

    fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::default().sort(SortBy::desc("created_at"));
        if let Some(status) = self.status {
            query = query.filter(FieldFilter::eq("status", status.as_str()));
        }
        if let Some(customer_id) = self.customer_id {
            query = query.filter(FieldFilter::eq("customer_id", customer_id.to_string()));
        }
        query
    }
}

/// Typed access to the `orders` collection.
#[derive(Debug, Clone)]
pub struct OrderRepository<D> {
    store: D,
}

impl<D> OrderRepository<D>
where
    D: DocumentStore,
{
    pub fn new(store: D) -> Self {
        Self { store }
    }

    pub async fn get(&self, order_id: OrderId) -> DomainResult<Order> {
        let doc = self
            .store
            .get_document(collections::ORDERS, &order_id.to_string())
            .await?
            .ok_or(DomainError::NotFound)?;

        Ok(Self::rehydrate(decode(collections::ORDERS, doc)?))
    }

    /// Newest first.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        page_token: Option<String>,
        page_size: u32,
    ) -> DomainResult<PageOf<Order>> {
        let query = filter.to_query().page(page_token, page_size);
        let page = self.store.list_documents(collections::ORDERS, &query).await?;

        let items = page
            .documents
            .into_iter()
            .map(|doc| decode::<OrderRecord>(collections::ORDERS, doc).map(Self::rehydrate))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PageOf {
            items,
            next_page_token: page.next_page_token,
        })
    }

    /// Write the fields the lifecycle owns. Nothing else on the document is
    /// touched.
    pub async fn save_lifecycle(&self, order: &Order) -> DomainResult<()> {
        let mut patch = Patch::new();
        patch.insert(
            "status".to_string(),
            JsonValue::String(order.status().as_str().to_string()),
        );
        patch.insert(
            "tracking_number".to_string(),
            order
                .tracking_number()
                .map(|t| JsonValue::String(t.to_string()))
                .unwrap_or(JsonValue::Null),
        );
        patch.insert(
            "updated_at".to_string(),
            JsonValue::String(order.updated_at().to_rfc3339()),
        );

        self.store
            .update_document(collections::ORDERS, &order.id().to_string(), patch)
            .await?;
        Ok(())
    }

    /// Insert or replace a full order document (checkout import, fixtures).
    pub async fn put(&self, record: &OrderRecord) -> DomainResult<()> {
        let data = serde_json::to_value(record)
            .map_err(|e| DomainError::schema_mismatch(collections::ORDERS, e.to_string()))?;
        self.store
            .put_document(collections::ORDERS, &record.id.to_string(), data)
            .await?;
        Ok(())
    }

    fn rehydrate(record: OrderRecord) -> Order {
        let order = Order::from_record(record);
        if let Some((stored, computed)) = order.total_mismatch() {
            tracing::warn!(
                order_id = %order.id(),
                stored = %stored,
                computed = %computed,
                "stored order total disagrees with line items; serving recomputed total"
            );
        }
        order
    }
}
