//! Dependency injection module using Shaku.
//!
//! `LedgerModule` wires the connection pool, the unit-of-work factory, the
//! Redis cache and the transaction service into one container. Runtime values
//! (the live pools, TTLs, the write mode) are passed in as component parameters.

use ledger_config::{AppConfig, RedisConfig};
use ledger_core::{LedgerError, LedgerResult};
use ledger_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlUnitOfWorkFactory,
    MySqlUnitOfWorkFactoryParameters, UnitOfWorkFactory,
};
use ledger_service::{
    CacheInterface, RedisCacheService, RedisCacheServiceParameters, TransactionCache,
    TransactionCacheInterface, TransactionCacheParameters, TransactionIdGenerator,
    TransactionService, TransactionServiceImpl, TransactionServiceImplParameters,
};
use shaku::{module, HasComponent};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::info;

module! {
    pub LedgerModule {
        components = [
            DatabasePool,
            MySqlUnitOfWorkFactory,
            RedisCacheService,
            TransactionCache,
            TransactionServiceImpl,
        ],
        providers = [],
    }
}

/// Creates the Redis pool, or `None` when caching is disabled.
pub fn create_redis_pool(config: &RedisConfig) -> LedgerResult<Option<Arc<deadpool_redis::Pool>>> {
    if !config.enabled {
        info!("Redis cache disabled");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| LedgerError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!("Redis cache pool created for {}", config.url);
    Ok(Some(Arc::new(pool)))
}

/// Builds the module around already created pools.
pub fn build_module(
    config: &AppConfig,
    db_pool: MySqlPool,
    cache_pool: Option<Arc<deadpool_redis::Pool>>,
) -> LedgerModule {
    LedgerModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool: db_pool })
        .with_component_parameters::<MySqlUnitOfWorkFactory>(MySqlUnitOfWorkFactoryParameters {
            transactional: config.database.transactional_writes,
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<TransactionCache>(TransactionCacheParameters {
            total_count_ttl: config.cache.total_count_ttl(),
            record_ttl: config.cache.record_ttl(),
        })
        .with_component_parameters::<TransactionServiceImpl>(TransactionServiceImplParameters {
            id_generator: Arc::new(TransactionIdGenerator::default()),
        })
        .build()
}

/// Connects the database and Redis pools and builds the module.
pub async fn build_ledger_module(config: &AppConfig) -> LedgerResult<Arc<LedgerModule>> {
    let db_pool = DatabasePool::new(&config.database).await?;
    let cache_pool = create_redis_pool(&config.redis)?;

    if !config.database.transactional_writes {
        info!("Writes run in auto-commit mode; cache invalidation is immediate");
    }

    Ok(Arc::new(build_module(config, db_pool.inner().clone(), cache_pool)))
}

/// Resolves the components the server needs from a module.
pub trait LedgerResolver {
    /// Resolves the transaction workflow engine.
    fn transaction_service(&self) -> Arc<dyn TransactionService>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl LedgerResolver for LedgerModule {
    fn transaction_service(&self) -> Arc<dyn TransactionService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}
