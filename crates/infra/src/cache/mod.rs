//! Process-wide reference data cache with per-kind TTLs and single-flight
//! loading.

pub mod coalesce;
pub mod reference_cache;

pub use coalesce::FetchCoalescer;
pub use reference_cache::{CacheConfig, ReferenceCache, ReferenceSource};
