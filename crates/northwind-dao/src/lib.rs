//! # Northwind DAO
//!
//! Stored-procedure data access for the Northwind database.
//!
//! ```text
//! Report / service code
//!   ↓  DaoFactory                 (one store binding, many DAOs)
//!   ↓  Arc<dyn ProductDao> ...    (DAO interface)
//! SqlProductDao ...               (DAO impl, builds ProcedureCalls)
//!   ↓  Arc<dyn ProcedureStore>
//! MySqlProcedureStore             (CALL over a leased pool connection)
//!   ↓
//! MySQL
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   store/                        ← ProcedureStore seam, calls, rows
//!   dao/
//!     product_dao.rs              ← ProductDao trait
//!     product_category_dao.rs     ← ProductCategoryDao trait
//!     employee_dao.rs             ← EmployeeDao trait
//!     impl/sql/                   ← stored-procedure implementations
//!   factory.rs                    ← DaoFactory
//!   pictures.rs                   ← category pictures, employee photos
//!   pool.rs                       ← MySQL connection pool
//! ```

pub mod dao;
pub mod factory;
pub mod pictures;
pub mod pool;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dao::*;
pub use factory::DaoFactory;
pub use pictures::{strip_ole_header, CategoryPictures, EmployeePhotos};
pub use pool::*;
pub use store::{MySqlProcedureStore, ProcedureCall, ProcedureStore, StoreRow};
