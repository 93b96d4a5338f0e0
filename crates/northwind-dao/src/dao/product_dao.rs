//! ProductDao trait.

use super::EntityStream;
use async_trait::async_trait;
use northwind_core::{CategoryId, Interface, Lookup, NorthwindResult, Product, ProductId};

/// Data access for `Products`.
///
/// Identifier arguments must be positive and paging bounds non-negative;
/// violations fail with `InvalidArgument` before the store is touched.
#[async_trait]
pub trait ProductDao: Interface + Send + Sync {
    /// Inserts a product, ignoring its id. Returns the affected-row count.
    async fn insert(&self, product: &Product) -> NorthwindResult<u64>;

    /// Deletes a product. Returns `true` if a row was removed.
    async fn delete(&self, id: ProductId) -> NorthwindResult<bool>;

    /// Finds a product by id.
    async fn find(&self, id: ProductId) -> NorthwindResult<Lookup<Product>>;

    /// Updates the product addressed by `product.id`. Returns `true` if a row changed.
    async fn update(&self, product: &Product) -> NorthwindResult<bool>;

    /// Streams every product.
    fn select_all(&self) -> EntityStream<Product>;

    /// Streams at most `limit` products, skipping the first `offset`.
    fn select_paged(&self, offset: i64, limit: i64) -> NorthwindResult<EntityStream<Product>>;

    /// Streams products whose name equals any of `names` under the column collation
    /// (`utf8mb4_unicode_ci`, so case-insensitive).
    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<Product>>;

    /// Streams products belonging to any of `category_ids`.
    fn select_by_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> NorthwindResult<EntityStream<Product>>;

    /// Counts all products.
    async fn count(&self) -> NorthwindResult<u64>;

    /// Counts products in one category.
    async fn count_by_category(&self, category_id: CategoryId) -> NorthwindResult<u64>;
}
