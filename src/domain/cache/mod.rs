//! Cache domain - TTL cache abstraction used by the cache-fronted backend

mod key;
mod repository;

pub use key::{CacheKeyGenerator, DEFAULT_KEY_PREFIX, PrefixKeyGenerator};
pub use repository::{Cache, CacheExt, MAX_CACHE_TTL};

#[cfg(test)]
pub use repository::mock::MockCache;
