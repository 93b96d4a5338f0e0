//! EmployeeDao trait.

use super::EntityStream;
use async_trait::async_trait;
use northwind_core::{Employee, EmployeeId, Interface, Lookup, NorthwindResult};

/// Data access for `Employees`.
///
/// An employee's name, for [`EmployeeDao::select_by_names`], is the last name.
#[async_trait]
pub trait EmployeeDao: Interface + Send + Sync {
    async fn insert(&self, employee: &Employee) -> NorthwindResult<u64>;

    async fn delete(&self, id: EmployeeId) -> NorthwindResult<bool>;

    async fn find(&self, id: EmployeeId) -> NorthwindResult<Lookup<Employee>>;

    async fn update(&self, employee: &Employee) -> NorthwindResult<bool>;

    fn select_all(&self) -> EntityStream<Employee>;

    fn select_paged(&self, offset: i64, limit: i64) -> NorthwindResult<EntityStream<Employee>>;

    fn select_by_names(&self, names: &[String]) -> NorthwindResult<EntityStream<Employee>>;
}
