//! DAO implementations.
//!
//! Trait definitions live in the parent `dao/` module. Implementations are
//! organized by technology.

pub mod sql;

pub use sql::{SqlEmployeeDao, SqlProductCategoryDao, SqlProductDao};
