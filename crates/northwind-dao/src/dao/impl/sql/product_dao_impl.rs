//! Stored-procedure product DAO.

use super::{list_call, paged_call, stream_rows};
use crate::dao::{EntityStream, ProductDao};
use crate::store::{count_of, first_row, ProcedureCall, ProcedureStore, SqlType, StoreRow};
use async_trait::async_trait;
use northwind_core::{
    require_positive_id, CategoryId, EntityKind, EntityNotFound, Lookup, NorthwindResult, Product,
    ProductId, SupplierId, ValidateExt,
};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Product DAO over the `*_Product` / `*_Products` procedures.
#[derive(Component, Clone)]
#[shaku(interface = ProductDao)]
pub struct SqlProductDao {
    #[shaku(inject)]
    store: Arc<dyn ProcedureStore>,
}

impl SqlProductDao {
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for SqlProductDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlProductDao").finish_non_exhaustive()
    }
}

/// Binds the column parameters shared by insert and update, in procedure order.
fn bind_columns(call: ProcedureCall, product: &Product) -> ProcedureCall {
    call.param("ProductName", SqlType::NVarChar(40), product.name.as_str())
        .nullable("SupplierID", SqlType::Int, product.supplier_id)
        .nullable("CategoryID", SqlType::Int, product.category_id)
        .nullable(
            "QuantityPerUnit",
            SqlType::NVarChar(20),
            product.quantity_per_unit.as_deref(),
        )
        .nullable("UnitPrice", SqlType::Money, product.unit_price)
        .nullable("UnitsInStock", SqlType::SmallInt, product.units_in_stock)
        .nullable("UnitsOnOrder", SqlType::SmallInt, product.units_on_order)
        .nullable("ReorderLevel", SqlType::SmallInt, product.reorder_level)
        .param("Discontinued", SqlType::Bit, product.discontinued)
}

fn product_from_row(row: &StoreRow) -> NorthwindResult<Product> {
    Ok(Product {
        id: ProductId::new(row.get("ProductID")?),
        name: row.get("ProductName")?,
        supplier_id: row.get_opt("SupplierID")?.map(SupplierId::new),
        category_id: row.get_opt("CategoryID")?.map(CategoryId::new),
        quantity_per_unit: row.get_opt("QuantityPerUnit")?,
        unit_price: row.get_opt("UnitPrice")?,
        units_in_stock: row.get_opt("UnitsInStock")?,
        units_on_order: row.get_opt("UnitsOnOrder")?,
        reorder_level: row.get_opt("ReorderLevel")?,
        discontinued: row.get("Discontinued")?,
    })
}

#[async_trait]
impl ProductDao for SqlProductDao {
    async fn insert(&self, product: &Product) -> NorthwindResult<u64> {
        product.validate_fields("product")?;
        debug!("Inserting product: {}", product.name);

        let call = bind_columns(ProcedureCall::new("Insert_Product"), product);
        self.store.execute(call).await
    }

    async fn delete(&self, id: ProductId) -> NorthwindResult<bool> {
        require_positive_id("product_id", id.get())?;
        debug!("Deleting product: {}", id);

        let call = ProcedureCall::new("Delete_Product").param("ProductID", SqlType::Int, id);
        Ok(self.store.execute(call).await? > 0)
    }

    async fn find(&self, id: ProductId) -> NorthwindResult<Lookup<Product>> {
        require_positive_id("product_id", id.get())?;
        debug!("Finding product by id: {}", id);

        let call = ProcedureCall::new("Get_Product_By_Id").param("ProductID", SqlType::Int, id);
        let Some(row) = first_row(self.store.query(call)).await? else {
            return Ok(Lookup::NotFound(EntityNotFound::new(EntityKind::Product, id.get())));
        };
        product_from_row(&row).map(Lookup::Found)
    }

    async fn update(&self, product: &Product) -> NorthwindResult<bool> {
        require_positive_id("product.id", product.id.get())?;
        product.validate_fields("product")?;
        debug!("Updating product: {}", product.id);

        let call = bind_columns(ProcedureCall::new("Update_Product"), product).param(
            "ProductID",
            SqlType::Int,
            product.id,
        );
        Ok(self.store.execute(call).await? > 0)
    }

    fn select_all(&self) -> EntityStream<Product> {
        debug!("Selecting all products");
        stream_rows(
            self.store.as_ref(),
            Some(ProcedureCall::new("Get_Products")),
            product_from_row,
        )
    }

    fn select_paged(&self, offset: i64, limit: i64) -> NorthwindResult<EntityStream<Product>> {
        let call = paged_call("Get_Products_With_Limit", offset, limit)?;
        debug!(offset, limit, "Selecting products page");
        Ok(stream_rows(self.store.as_ref(), call, product_from_row))
    }

    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<Product>> {
        let call = list_call("Get_Products_By_Names", "Names", "product_names", names)?;
        debug!("Selecting products by names: {:?}", names);
        Ok(stream_rows(self.store.as_ref(), Some(call), product_from_row))
    }

    fn select_by_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> NorthwindResult<EntityStream<Product>> {
        let call = list_call(
            "Get_Products_By_Categories",
            "CategoryIDs",
            "category_ids",
            category_ids,
        )?;
        debug!("Selecting products by categories: {:?}", category_ids);
        Ok(stream_rows(self.store.as_ref(), Some(call), product_from_row))
    }

    async fn count(&self) -> NorthwindResult<u64> {
        debug!("Counting products");
        count_of(
            self.store.query(ProcedureCall::new("Get_Products_Count")),
            "ProductCount",
        )
        .await
    }

    async fn count_by_category(&self, category_id: CategoryId) -> NorthwindResult<u64> {
        require_positive_id("category_id", category_id.get())?;
        debug!("Counting products in category: {}", category_id);

        let call = ProcedureCall::new("Get_Products_Count_By_Category").param(
            "CategoryID",
            SqlType::Int,
            category_id,
        );
        count_of(self.store.query(call), "ProductCount").await
    }
}
