use std::sync::Arc;

use storefront_infra::{
    AppConfig, CustomerRepository, DocumentReferenceSource, DocumentStore, OrderAdminService,
    OrderRepository, ReferenceCache,
};

pub type SharedStore = Arc<dyn DocumentStore>;

/// Everything the handlers need, shared across requests.
pub struct AppServices {
    pub config: AppConfig,
    pub orders: OrderRepository<SharedStore>,
    pub order_admin: OrderAdminService<SharedStore>,
    pub customers: CustomerRepository<SharedStore>,
    pub reference: ReferenceCache<DocumentReferenceSource<SharedStore>>,
}

impl AppServices {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        let reference = ReferenceCache::new(
            DocumentReferenceSource::new(store.clone()),
            config.cache.clone(),
        );

        Self {
            orders: OrderRepository::new(store.clone()),
            order_admin: OrderAdminService::new(store.clone()),
            customers: CustomerRepository::new(store),
            reference,
            config,
        }
    }
}
