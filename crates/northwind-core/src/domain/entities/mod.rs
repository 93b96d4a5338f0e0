//! Transfer objects.

mod employee;
mod product;
mod product_category;

pub use employee::Employee;
pub use product::Product;
pub use product_category::ProductCategory;
