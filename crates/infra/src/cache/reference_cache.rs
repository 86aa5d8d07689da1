use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use storefront_catalog::{
    Brand, Category, ReferenceData, ReferenceKind, ShippingConfig, Slide, StoreInfo, Subcategory,
};
use storefront_core::{DomainError, DomainResult};

use super::coalesce::FetchCoalescer;

/// Backing loader for reference data.
#[async_trait::async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch(&self, kind: ReferenceKind) -> DomainResult<ReferenceData>;
}

#[async_trait::async_trait]
impl<S> ReferenceSource for Arc<S>
where
    S: ReferenceSource + ?Sized,
{
    async fn fetch(&self, kind: ReferenceKind) -> DomainResult<ReferenceData> {
        (**self).fetch(kind).await
    }
}

pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(120);
pub const DEFAULT_SETTINGS_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    ttls: HashMap<ReferenceKind, Duration>,
    /// Serve the last good value when a refetch fails.
    pub serve_stale_on_error: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TTL, DEFAULT_SETTINGS_TTL)
    }
}

impl CacheConfig {
    /// One TTL for collection kinds, another for store settings.
    pub fn new(catalog_ttl: Duration, settings_ttl: Duration) -> Self {
        let ttls = ReferenceKind::ALL
            .into_iter()
            .map(|kind| {
                let ttl = if kind.is_setting() { settings_ttl } else { catalog_ttl };
                (kind, ttl)
            })
            .collect();

        Self {
            ttls,
            serve_stale_on_error: false,
        }
    }

    pub fn with_ttl(mut self, kind: ReferenceKind, ttl: Duration) -> Self {
        self.ttls.insert(kind, ttl);
        self
    }

    pub fn with_serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    pub fn ttl_for(&self, kind: ReferenceKind) -> Duration {
        self.ttls.get(&kind).copied().unwrap_or(DEFAULT_CATALOG_TTL)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<ReferenceData>,
    fetched_at: Instant,
}

type FetchOutcome = DomainResult<Arc<ReferenceData>>;

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<ReferenceKind, CacheEntry>,
    /// Bumped by every `refresh`; a load only stores if it is unchanged.
    generations: HashMap<ReferenceKind, u64>,
}

impl Slots {
    fn generation(&self, kind: ReferenceKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }
}

/// Time-boxed memo of reference data, one slot per kind.
///
/// A value younger than its kind's TTL is served as is. A miss or an expired
/// value triggers one fetch per kind, shared by every concurrent caller. A
/// failed fetch never overwrites the slot, and a fetch that started before a
/// `refresh` never overwrites what the refresh stored.
pub struct ReferenceCache<S> {
    source: S,
    config: CacheConfig,
    slots: RwLock<Slots>,
    coalescer: FetchCoalescer<ReferenceKind, FetchOutcome>,
    fetches: AtomicU64,
}

impl<S> ReferenceCache<S>
where
    S: ReferenceSource,
{
    pub fn new(source: S, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            slots: RwLock::new(Slots::default()),
            coalescer: FetchCoalescer::new(),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of calls made to the source so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub async fn get(&self, kind: ReferenceKind) -> DomainResult<Arc<ReferenceData>> {
        if let Some(value) = self.fresh(kind).await {
            tracing::trace!(kind = %kind, "reference cache hit");
            return Ok(value);
        }

        self.coalescer
            .run(kind, || async move {
                // Another flight may have filled the slot since the first check.
                if let Some(value) = self.fresh(kind).await {
                    return Ok(value);
                }
                tracing::debug!(kind = %kind, "reference cache miss");
                let generation = self.slots.read().await.generation(kind);
                self.load(kind, generation, self.config.serve_stale_on_error)
                    .await
            })
            .await
    }

    /// Fetch now and overwrite the slot, whatever its age.
    pub async fn refresh(&self, kind: ReferenceKind) -> DomainResult<Arc<ReferenceData>> {
        tracing::info!(kind = %kind, "reference cache refresh requested");
        let generation = {
            let mut slots = self.slots.write().await;
            let generation = slots.generations.entry(kind).or_default();
            *generation += 1;
            *generation
        };
        self.load(kind, generation, false).await
    }

    /// Drop every cached value.
    pub async fn clear(&self) {
        self.slots.write().await.entries.clear();
    }

    pub async fn categories(&self) -> DomainResult<Vec<Category>> {
        self.typed(ReferenceKind::Categories, |d| d.as_categories().map(<[_]>::to_vec))
            .await
    }

    pub async fn subcategories(&self) -> DomainResult<Vec<Subcategory>> {
        self.typed(ReferenceKind::Subcategories, |d| d.as_subcategories().map(<[_]>::to_vec))
            .await
    }

    pub async fn brands(&self) -> DomainResult<Vec<Brand>> {
        self.typed(ReferenceKind::Brands, |d| d.as_brands().map(<[_]>::to_vec))
            .await
    }

    pub async fn slides(&self) -> DomainResult<Vec<Slide>> {
        self.typed(ReferenceKind::Slides, |d| d.as_slides().map(<[_]>::to_vec))
            .await
    }

    pub async fn store_info(&self) -> DomainResult<StoreInfo> {
        self.typed(ReferenceKind::Info, |d| d.as_info().cloned()).await
    }

    pub async fn shipping(&self) -> DomainResult<ShippingConfig> {
        self.typed(ReferenceKind::Shipping, |d| d.as_shipping().cloned())
            .await
    }

    async fn typed<T>(
        &self,
        kind: ReferenceKind,
        project: impl FnOnce(&ReferenceData) -> Option<T>,
    ) -> DomainResult<T> {
        let data = self.get(kind).await?;
        project(&data).ok_or_else(|| {
            DomainError::schema_mismatch(kind.as_str(), format!("cached value is {}", data.kind()))
        })
    }

    async fn fresh(&self, kind: ReferenceKind) -> Option<Arc<ReferenceData>> {
        let slots = self.slots.read().await;
        let entry = slots.entries.get(&kind)?;
        (entry.fetched_at.elapsed() < self.config.ttl_for(kind)).then(|| entry.value.clone())
    }

    async fn load(&self, kind: ReferenceKind, generation: u64, allow_stale: bool) -> FetchOutcome {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();

        let fetched = self.source.fetch(kind).await.and_then(|data| {
            if data.kind() == kind {
                Ok(data)
            } else {
                Err(DomainError::schema_mismatch(
                    kind.as_str(),
                    format!("source returned {} data", data.kind()),
                ))
            }
        });

        match fetched {
            Ok(data) => {
                let value = Arc::new(data);
                let mut slots = self.slots.write().await;
                if slots.generation(kind) == generation {
                    slots.entries.insert(
                        kind,
                        CacheEntry {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                } else {
                    tracing::debug!(kind = %kind, "reference fetch superseded by a refresh; not stored");
                }
                drop(slots);
                tracing::debug!(
                    kind = %kind,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "reference data fetched"
                );
                Ok(value)
            }
            Err(err) => {
                if allow_stale {
                    if let Some(entry) = self.slots.read().await.entries.get(&kind) {
                        tracing::warn!(kind = %kind, error = %err, "reference fetch failed; serving stale value");
                        return Ok(entry.value.clone());
                    }
                }
                tracing::warn!(kind = %kind, error = %err, "reference fetch failed");
                Err(err)
            }
        }
    }
}
