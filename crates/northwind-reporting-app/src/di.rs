//! Dependency injection module using Shaku.
//!
//! Only the database side is component-managed: the pool and the procedure
//! store that leases from it. HTTP clients are built directly from
//! configuration.

use northwind_config::DatabaseConfig;
use northwind_core::{module, HasComponent, NorthwindResult};
use northwind_dao::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlProcedureStore,
    ProcedureStore,
};
use std::sync::Arc;

module! {
    pub StoreModule {
        components = [
            DatabasePool,
            MySqlProcedureStore,
        ],
        providers = [],
    }
}

/// Connects to the database and builds the store module around the pool.
pub async fn build_store_module(config: &DatabaseConfig) -> NorthwindResult<Arc<StoreModule>> {
    let pool = DatabasePool::new(config).await?;

    let module = StoreModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: pool.inner().clone(),
        })
        .build();

    Ok(Arc::new(module))
}

impl StoreModule {
    #[must_use]
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn ProcedureStore> {
        self.resolve()
    }
}

impl std::fmt::Debug for StoreModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreModule").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_database_url() {
        let config = DatabaseConfig {
            url: String::new(),
            ..DatabaseConfig::default()
        };
        let err = build_store_module(&config).await.unwrap_err();
        assert_eq!(err.error_code(), "MISSING_ARGUMENT");
    }
}
