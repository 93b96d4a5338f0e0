//! DAO factory.
//!
//! The single indirection point between callers and a concrete backing
//! store. Every DAO handed out by one factory shares its store binding.

use crate::dao::{
    EmployeeDao, ProductCategoryDao, ProductDao, SqlEmployeeDao, SqlProductCategoryDao,
    SqlProductDao,
};
use crate::pictures::{CategoryPictures, EmployeePhotos};
use crate::pool::DatabasePool;
use crate::store::{MySqlProcedureStore, ProcedureStore};
use northwind_config::DatabaseConfig;
use northwind_core::NorthwindResult;
use std::sync::Arc;
use tracing::info;

/// Hands out DAOs bound to one procedure store.
#[derive(Clone)]
pub struct DaoFactory {
    store: Arc<dyn ProcedureStore>,
}

impl DaoFactory {
    /// Binds a factory to an existing store.
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>) -> Self {
        Self { store }
    }

    /// Opens a MySQL pool from `config` and binds a factory to it.
    ///
    /// An empty connection URL fails with `MissingArgument("database.url")`.
    pub async fn connect(config: &DatabaseConfig) -> NorthwindResult<Self> {
        let pool = DatabasePool::new(config).await?;
        info!("DAO factory bound to MySQL procedure store");
        Ok(Self::new(Arc::new(MySqlProcedureStore::new(Arc::new(pool)))))
    }

    /// The shared store binding.
    #[must_use]
    pub fn store(&self) -> Arc<dyn ProcedureStore> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn product_dao(&self) -> Arc<dyn ProductDao> {
        Arc::new(SqlProductDao::new(self.store()))
    }

    #[must_use]
    pub fn product_category_dao(&self) -> Arc<dyn ProductCategoryDao> {
        Arc::new(SqlProductCategoryDao::new(self.store()))
    }

    #[must_use]
    pub fn employee_dao(&self) -> Arc<dyn EmployeeDao> {
        Arc::new(SqlEmployeeDao::new(self.store()))
    }

    #[must_use]
    pub fn category_pictures(&self) -> CategoryPictures {
        CategoryPictures::new(self.product_category_dao())
    }

    #[must_use]
    pub fn employee_photos(&self) -> EmployeePhotos {
        EmployeePhotos::new(self.employee_dao())
    }
}

impl std::fmt::Debug for DaoFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoFactory").finish_non_exhaustive()
    }
}
