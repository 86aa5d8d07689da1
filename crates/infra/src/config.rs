//! Process configuration read from the environment.

use std::time::Duration;

use crate::cache::CacheConfig;
use crate::cache::reference_cache::{DEFAULT_CATALOG_TTL, DEFAULT_SETTINGS_TTL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub cache: CacheConfig,
    /// Page size used when a listing request does not ask for one.
    pub default_page_size: u32,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cache: CacheConfig::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("STOREFRONT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            });

        let catalog_ttl = parse_or(&lookup, "STOREFRONT_CATALOG_TTL_SECS", DEFAULT_CATALOG_TTL.as_secs());
        let settings_ttl = parse_or(&lookup, "STOREFRONT_SETTINGS_TTL_SECS", DEFAULT_SETTINGS_TTL.as_secs());
        let serve_stale = parse_or(&lookup, "STOREFRONT_SERVE_STALE_ON_ERROR", false);

        let mut default_page_size = parse_or(&lookup, "STOREFRONT_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if default_page_size == 0 || default_page_size > MAX_PAGE_SIZE {
            tracing::warn!(
                value = default_page_size,
                max = MAX_PAGE_SIZE,
                "STOREFRONT_PAGE_SIZE out of range; using default"
            );
            default_page_size = DEFAULT_PAGE_SIZE;
        }

        Self {
            bind_addr,
            jwt_secret,
            cache: CacheConfig::new(Duration::from_secs(catalog_ttl), Duration::from_secs(settings_ttl))
                .with_serve_stale_on_error(serve_stale),
            default_page_size,
            seed_demo_data: parse_or(&lookup, "STOREFRONT_SEED_DEMO_DATA", false),
        }
    }

    /// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        match requested {
            None | Some(0) => self.default_page_size,
            Some(n) => n.min(MAX_PAGE_SIZE),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: core::str::FromStr + Copy + core::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "invalid configuration value; using default");
            default
        }),
    }
}
