//! Settings backends - direct storage access and the cache-fronted variant

mod cache;
mod database;
mod factory;

pub use cache::{CacheBackend, DEFAULT_CACHE_TTL};
pub use database::DatabaseBackend;
pub use factory::BackendFactory;
