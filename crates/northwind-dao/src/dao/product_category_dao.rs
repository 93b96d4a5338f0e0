//! ProductCategoryDao trait.

use super::EntityStream;
use async_trait::async_trait;
use northwind_core::{CategoryId, Interface, Lookup, NorthwindResult, ProductCategory};

/// Data access for `Categories`.
#[async_trait]
pub trait ProductCategoryDao: Interface + Send + Sync {
    /// Inserts a category, ignoring its id. Returns the affected-row count.
    async fn insert(&self, category: &ProductCategory) -> NorthwindResult<u64>;

    /// Deletes a category. Returns `true` if a row was removed.
    async fn delete(&self, id: CategoryId) -> NorthwindResult<bool>;

    /// Finds a category by id.
    async fn find(&self, id: CategoryId) -> NorthwindResult<Lookup<ProductCategory>>;

    /// Updates the category addressed by `category.id`.
    async fn update(&self, category: &ProductCategory) -> NorthwindResult<bool>;

    fn select_all(&self) -> EntityStream<ProductCategory>;

    fn select_paged(&self, offset: i64, limit: i64)
        -> NorthwindResult<EntityStream<ProductCategory>>;

    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<ProductCategory>>;
}
