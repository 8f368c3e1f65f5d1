//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] is the raw key/value capability backed by Redis;
//! [`TransactionCache`] layers the ledger's key families and TTLs on top and
//! never lets a cache failure reach the caller.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;
mod transaction_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};
pub use transaction_cache::{
    TransactionCache, TransactionCacheInterface, TransactionCacheParameters,
    DEFAULT_RECORD_TTL, DEFAULT_TOTAL_COUNT_TTL,
};
