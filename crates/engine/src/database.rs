//! Database handle
//!
//! `Database` owns the sharded store and the transaction manager. All entity
//! and recipe operations go through [`Database::transaction`].

use crate::config::LarderConfig;
use larder_concurrency::{TransactionContext, TransactionManager};
use larder_core::LarderResult;
use larder_storage::ShardedStore;
use std::path::Path;
use std::sync::Arc;

/// Embedded graph database
pub struct Database {
    store: Arc<ShardedStore>,
    manager: TransactionManager,
    config: LarderConfig,
}

impl Database {
    /// Open an in-memory database with `config`
    ///
    /// # Errors
    ///
    /// `LarderError::Config` if the configuration is out of range.
    pub fn open(config: LarderConfig) -> LarderResult<Arc<Self>> {
        config.validate()?;
        let store = Arc::new(ShardedStore::with_capacity(config.initial_capacity));
        let manager = TransactionManager::new(store.clone(), config.conflict_detection);
        tracing::debug!(
            target: "larder::db",
            conflict_detection = config.conflict_detection,
            initial_capacity = config.initial_capacity,
            "database opened"
        );
        Ok(Arc::new(Database {
            store,
            manager,
            config,
        }))
    }

    /// Open with configuration read from a `larder.toml` file
    pub fn open_with_config_file(path: &Path) -> LarderResult<Arc<Self>> {
        Self::open(LarderConfig::from_file(path)?)
    }

    /// Open with the default configuration
    pub fn in_memory() -> Arc<Self> {
        let config = LarderConfig::default();
        let store = Arc::new(ShardedStore::with_capacity(config.initial_capacity));
        let manager = TransactionManager::new(store.clone(), config.conflict_detection);
        Arc::new(Database {
            store,
            manager,
            config,
        })
    }

    /// Execute a transaction with the given closure
    ///
    /// The closure's writes become visible together when it returns `Ok`.
    /// If it returns `Err` nothing is written and the error is passed through;
    /// if the commit conflicts with a concurrent one, a store error is
    /// returned and nothing is written.
    ///
    /// Transactions must not be nested.
    ///
    /// # Example
    /// ```text
    /// let food = db.transaction(|txn| foods.create_in(txn, Food::new("rice")))?;
    /// ```
    pub fn transaction<F, T>(&self, f: F) -> LarderResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> LarderResult<T>,
    {
        self.manager.run(f)
    }

    /// Active configuration
    pub fn config(&self) -> &LarderConfig {
        &self.config
    }

    /// Underlying store
    pub fn storage(&self) -> &Arc<ShardedStore> {
        &self.store
    }

    /// Latest committed version
    pub fn version(&self) -> u64 {
        self.store.version()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}
