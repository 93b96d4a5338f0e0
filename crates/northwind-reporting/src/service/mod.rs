//! Report service implementations.

mod odata;
mod sql;

pub use odata::ODataProductReportService;
pub use sql::SqlProductReportService;
