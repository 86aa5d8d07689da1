//! Demo data for local development.

use serde_json::{Value as JsonValue, json};

use storefront_core::DomainResult;

use crate::document_store::DocumentStore;
use crate::repository::collections;

fn reference_documents() -> Vec<(&'static str, &'static str, JsonValue)> {
    vec![
        (collections::CATEGORIES, "kitchen", json!({ "name": "Kitchen", "slug": "kitchen", "position": 1 })),
        (collections::CATEGORIES, "garden", json!({ "name": "Garden", "slug": "garden", "position": 2 })),
        (collections::CATEGORIES, "office", json!({ "name": "Office", "slug": "office", "position": 3 })),
        (collections::SUBCATEGORIES, "mugs", json!({ "category_id": "kitchen", "name": "Mugs", "slug": "mugs" })),
        (collections::SUBCATEGORIES, "knives", json!({ "category_id": "kitchen", "name": "Knives", "slug": "knives" })),
        (collections::SUBCATEGORIES, "planters", json!({ "category_id": "garden", "name": "Planters", "slug": "planters" })),
        (collections::SUBCATEGORIES, "desks", json!({ "category_id": "office", "name": "Desks", "slug": "desks" })),
        (collections::BRANDS, "acme", json!({ "name": "Acme" })),
        (collections::BRANDS, "northwind", json!({ "name": "Northwind", "logo": "/img/brands/northwind.png" })),
        (
            collections::SLIDES,
            "spring-sale",
            json!({ "title": "Spring sale", "image": "/img/slides/spring.jpg", "link": "/sale", "position": 1 }),
        ),
        (
            collections::SLIDES,
            "new-arrivals",
            json!({ "title": "New arrivals", "image": "/img/slides/new.jpg", "position": 2 }),
        ),
        (
            collections::SETTINGS,
            "info",
            json!({
                "name": "Demo Store",
                "contact_email": "hello@demo-store.test",
                "contact_phone": "+1 555 0100",
                "opening_hours": "Mon-Fri 9:00-17:00"
            }),
        ),
        (
            collections::SETTINGS,
            "shipping",
            json!({ "standard_price": 499, "free_shipping_threshold": 5000 }),
        ),
    ]
}

/// Write the demo catalog and store settings. Existing documents with the
/// same ids are replaced.
pub async fn seed_demo_data<D>(store: &D) -> DomainResult<()>
where
    D: DocumentStore + ?Sized,
{
    let documents = reference_documents();
    let count = documents.len();
    for (collection, id, data) in documents {
        store.put_document(collection, id, data).await?;
    }
    tracing::info!(documents = count, "demo reference data seeded");
    Ok(())
}
