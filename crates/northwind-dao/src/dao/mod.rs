//! DAO (Data Access Object) layer.
//!
//! One interface per entity kind. Every operation is a self-contained
//! lease, execute, stream cycle; no DAO holds query state between calls.
//! Implementations are organized by backing technology under `impl/`.

pub mod employee_dao;
pub mod r#impl;
pub mod product_category_dao;
pub mod product_dao;

use futures::stream::BoxStream;
use northwind_core::NorthwindResult;

pub use employee_dao::EmployeeDao;
pub use product_category_dao::ProductCategoryDao;
pub use product_dao::ProductDao;
pub use r#impl::{SqlEmployeeDao, SqlProductCategoryDao, SqlProductDao};

/// Lazy, forward-only, non-restartable sequence of transfer objects.
///
/// Rows are fetched as the consumer advances; dropping the stream early
/// releases the underlying connection without reading the rest.
pub type EntityStream<T> = BoxStream<'static, NorthwindResult<T>>;
