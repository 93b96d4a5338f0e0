//! Stored-procedure DAO implementations.
//!
//! Parameter names match the column they feed. Text widths mirror the
//! Northwind schema and are checked on the transfer object before binding.

mod employee_dao_impl;
mod product_category_dao_impl;
mod product_dao_impl;

pub use employee_dao_impl::SqlEmployeeDao;
pub use product_category_dao_impl::SqlProductCategoryDao;
pub use product_dao_impl::SqlProductDao;

use crate::dao::EntityStream;
use crate::store::{json_list, map_rows, ProcedureCall, ProcedureStore, SqlType, StoreRow};
use futures::{stream, StreamExt};
use northwind_core::{require_non_empty, NorthwindResult, OffsetLimit};

/// Builds the `(Offset, RowCount)` call for a paged select.
///
/// Returns `None` for an empty window, which needs no round trip.
fn paged_call(procedure: &'static str, offset: i64, limit: i64) -> NorthwindResult<Option<ProcedureCall>> {
    let window = OffsetLimit::try_new(offset, limit)?;
    if window.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        ProcedureCall::new(procedure)
            .param("Offset", SqlType::Int, window.offset())
            .param("RowCount", SqlType::Int, window.limit()),
    ))
}

/// Builds a call taking one JSON array argument.
fn list_call<T: serde::Serialize>(
    procedure: &'static str,
    parameter: &'static str,
    argument: &str,
    items: &[T],
) -> NorthwindResult<ProcedureCall> {
    require_non_empty(argument, items)?;
    Ok(ProcedureCall::new(procedure).param(parameter, SqlType::NText, json_list(items)?))
}

/// Runs `call` if present and maps each row; an absent call is an empty stream.
fn stream_rows<T, F>(store: &dyn ProcedureStore, call: Option<ProcedureCall>, map: F) -> EntityStream<T>
where
    T: Send + 'static,
    F: Fn(&StoreRow) -> NorthwindResult<T> + Send + 'static,
{
    match call {
        Some(call) => map_rows(store.query(call), map),
        None => stream::empty().boxed(),
    }
}
