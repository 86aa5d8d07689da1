use storefront_core::{CustomerId, DomainError, DomainResult};
use storefront_customers::{Address, Customer};

use super::{PageOf, collections, decode, list_all};
use crate::document_store::{Document, DocumentStore, FieldFilter, ListQuery, SortBy};

/// Read access to customer profiles (`users`) and their saved `addresses`.
#[derive(Debug, Clone)]
pub struct CustomerRepository<D> {
    store: D,
}

impl<D> CustomerRepository<D>
where
    D: DocumentStore,
{
    pub fn new(store: D) -> Self {
        Self { store }
    }

    pub async fn get(&self, customer_id: CustomerId) -> DomainResult<Customer> {
        let doc = self
            .store
            .get_document(collections::USERS, &customer_id.to_string())
            .await?
            .ok_or(DomainError::NotFound)?;

        decode_customer(doc)
    }

    /// Customers by sign-up date, newest first.
    pub async fn list(&self, page_token: Option<String>, page_size: u32) -> DomainResult<PageOf<Customer>> {
        let query = ListQuery::default()
            .sort(SortBy::desc("created_at"))
            .page(page_token, page_size);
        let page = self.store.list_documents(collections::USERS, &query).await?;

        let items = page
            .documents
            .into_iter()
            .map(decode_customer)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PageOf {
            items,
            next_page_token: page.next_page_token,
        })
    }

    /// Every saved address of a customer. An address that fails validation
    /// fails the whole read.
    pub async fn addresses_for(&self, customer_id: CustomerId) -> DomainResult<Vec<Address>> {
        let query = ListQuery::default()
            .filter(FieldFilter::eq("customer_id", customer_id.to_string()))
            .sort(SortBy::asc("name"));
        let docs = list_all(&self.store, collections::ADDRESSES, query).await?;

        docs.into_iter()
            .map(|doc| {
                let address: Address = decode(collections::ADDRESSES, doc)?;
                address.validate().map_err(|e| {
                    DomainError::schema_mismatch(collections::ADDRESSES, format!("address {}: {e}", address.id))
                })?;
                Ok(address)
            })
            .collect()
    }
}

fn decode_customer(doc: Document) -> DomainResult<Customer> {
    let customer: Customer = decode(collections::USERS, doc)?;
    customer.validate().map_err(|e| {
        DomainError::schema_mismatch(collections::USERS, format!("customer {}: {e}", customer.id))
    })?;
    Ok(customer)
}
