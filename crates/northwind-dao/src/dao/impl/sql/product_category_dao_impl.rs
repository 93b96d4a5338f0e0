//! Stored-procedure product category DAO.

use super::{list_call, paged_call, stream_rows};
use crate::dao::{EntityStream, ProductCategoryDao};
use crate::store::{first_row, ProcedureCall, ProcedureStore, SqlType, StoreRow};
use async_trait::async_trait;
use northwind_core::{
    require_positive_id, CategoryId, EntityKind, EntityNotFound, Lookup, NorthwindResult,
    ProductCategory, ValidateExt,
};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Category DAO over the `*_Category` / `*_Categories` procedures.
#[derive(Component, Clone)]
#[shaku(interface = ProductCategoryDao)]
pub struct SqlProductCategoryDao {
    #[shaku(inject)]
    store: Arc<dyn ProcedureStore>,
}

impl SqlProductCategoryDao {
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for SqlProductCategoryDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlProductCategoryDao").finish_non_exhaustive()
    }
}

fn bind_columns(call: ProcedureCall, category: &ProductCategory) -> ProcedureCall {
    call.param("CategoryName", SqlType::NVarChar(15), category.name.as_str())
        .nullable("Description", SqlType::NText, category.description.as_deref())
        .nullable("Picture", SqlType::Image, category.picture.as_deref())
}

fn category_from_row(row: &StoreRow) -> NorthwindResult<ProductCategory> {
    Ok(ProductCategory {
        id: CategoryId::new(row.get("CategoryID")?),
        name: row.get("CategoryName")?,
        description: row.get_opt("Description")?,
        picture: row.get_opt("Picture")?,
    })
}

#[async_trait]
impl ProductCategoryDao for SqlProductCategoryDao {
    async fn insert(&self, category: &ProductCategory) -> NorthwindResult<u64> {
        category.validate_fields("category")?;
        debug!("Inserting category: {}", category.name);

        let call = bind_columns(ProcedureCall::new("Insert_Category"), category);
        self.store.execute(call).await
    }

    async fn delete(&self, id: CategoryId) -> NorthwindResult<bool> {
        require_positive_id("category_id", id.get())?;
        debug!("Deleting category: {}", id);

        let call = ProcedureCall::new("Delete_Category").param("CategoryID", SqlType::Int, id);
        Ok(self.store.execute(call).await? > 0)
    }

    async fn find(&self, id: CategoryId) -> NorthwindResult<Lookup<ProductCategory>> {
        require_positive_id("category_id", id.get())?;
        debug!("Finding category by id: {}", id);

        let call = ProcedureCall::new("Get_Category_By_Id").param("CategoryID", SqlType::Int, id);
        let Some(row) = first_row(self.store.query(call)).await? else {
            return Ok(Lookup::NotFound(EntityNotFound::new(
                EntityKind::ProductCategory,
                id.get(),
            )));
        };
        category_from_row(&row).map(Lookup::Found)
    }

    async fn update(&self, category: &ProductCategory) -> NorthwindResult<bool> {
        require_positive_id("category.id", category.id.get())?;
        category.validate_fields("category")?;
        debug!("Updating category: {}", category.id);

        let call = bind_columns(ProcedureCall::new("Update_Category"), category).param(
            "CategoryID",
            SqlType::Int,
            category.id,
        );
        Ok(self.store.execute(call).await? > 0)
    }

    fn select_all(&self) -> EntityStream<ProductCategory> {
        debug!("Selecting all categories");
        stream_rows(
            self.store.as_ref(),
            Some(ProcedureCall::new("Get_Categories")),
            category_from_row,
        )
    }

    fn select_paged(
        &self,
        offset: i64,
        limit: i64,
    ) -> NorthwindResult<EntityStream<ProductCategory>> {
        let call = paged_call("Get_Categories_With_Limit", offset, limit)?;
        debug!(offset, limit, "Selecting categories page");
        Ok(stream_rows(self.store.as_ref(), call, category_from_row))
    }

    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<ProductCategory>> {
        let call = list_call("Get_Categories_By_Names", "Names", "category_names", names)?;
        debug!("Selecting categories by names: {:?}", names);
        Ok(stream_rows(self.store.as_ref(), Some(call), category_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProcedureStore;
    use futures::TryStreamExt;

    async fn seeded() -> (Arc<FakeProcedureStore>, SqlProductCategoryDao) {
        let store = Arc::new(FakeProcedureStore::new());
        let dao = SqlProductCategoryDao::new(store.clone());
        for (name, description) in [
            ("Beverages", "Soft drinks, coffees, teas, beers, and ales"),
            ("Condiments", "Sweet and savory sauces, relishes, spreads, and seasonings"),
            ("Seafood", "Seaweed and fish"),
        ] {
            dao.insert(&ProductCategory::new(name).with_description(description))
                .await
                .unwrap();
        }
        store.clear_calls();
        (store, dao)
    }

    #[tokio::test]
    async fn test_absent_picture_is_bound_as_null() {
        let (store, dao) = seeded().await;
        dao.insert(&ProductCategory::new("Produce")).await.unwrap();

        let call = store.calls().pop().unwrap();
        assert_eq!(call.name(), "Insert_Category");
        let picture = call.parameter("Picture").unwrap();
        assert!(picture.nullable);
        assert!(picture.value.is_null());
        assert_eq!(picture.sql_type, SqlType::Image);
    }

    #[tokio::test]
    async fn test_find_maps_nullable_columns() {
        let (_, dao) = seeded().await;
        dao.insert(&ProductCategory::new("Produce")).await.unwrap();

        let produce = dao.find(CategoryId::new(4)).await.unwrap().into_result().unwrap();
        assert_eq!(produce.name, "Produce");
        assert_eq!(produce.description, None);
        assert_eq!(produce.picture, None);
    }

    #[tokio::test]
    async fn test_find_missing_category() {
        let (_, dao) = seeded().await;
        let err = dao
            .find(CategoryId::new(12))
            .await
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Product category with id 12 not found");
    }

    #[tokio::test]
    async fn test_update_picture() {
        let (_, dao) = seeded().await;

        let mut seafood = dao.find(CategoryId::new(3)).await.unwrap().found().unwrap();
        seafood.picture = Some(vec![0x42, 0x4D, 0x01]);
        assert!(dao.update(&seafood).await.unwrap());

        let stored = dao.find(CategoryId::new(3)).await.unwrap().found().unwrap();
        assert_eq!(stored.picture.as_deref(), Some(&[0x42_u8, 0x4D, 0x01][..]));
    }

    #[tokio::test]
    async fn test_update_requires_positive_id() {
        let (store, dao) = seeded().await;
        for id in [0, -5] {
            let mut category = ProductCategory::new("Grains");
            category.id = CategoryId::new(id);
            assert!(dao.update(&category).await.unwrap_err().is_invalid_argument());
        }
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_paging_and_names() {
        let (_, dao) = seeded().await;

        let page: Vec<_> = dao.select_paged(1, 1).unwrap().try_collect().await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Condiments");

        let found: Vec<_> = dao
            .select_by_names(&["Seafood".to_string(), "Dairy Products".to_string()])
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, CategoryId::new(3));
    }
}
