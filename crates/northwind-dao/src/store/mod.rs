//! Stored-procedure execution seam.
//!
//! DAOs never talk to a driver directly. They build a [`ProcedureCall`]
//! and hand it to a [`ProcedureStore`], which leases a connection for that
//! one command and gives it back when the command completes, fails, or its
//! row stream is dropped.

mod mysql;
mod procedure;
mod row;

pub use mysql::MySqlProcedureStore;
pub use procedure::{ProcedureCall, SqlParameter, SqlType, SqlValue};
pub use row::{FromSqlValue, StoreRow};

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use northwind_core::{Interface, NorthwindError, NorthwindResult};

/// Lazily produced result rows. Dropping the stream releases its lease.
pub type RowStream = BoxStream<'static, NorthwindResult<StoreRow>>;

/// Executes stored procedures against a backing store.
#[async_trait]
pub trait ProcedureStore: Interface + Send + Sync {
    /// Runs a mutating procedure and returns the affected-row count.
    async fn execute(&self, call: ProcedureCall) -> NorthwindResult<u64>;

    /// Runs a row-returning procedure.
    ///
    /// Nothing is sent to the store until the stream is first polled, and
    /// rows are fetched only as the consumer advances.
    fn query(&self, call: ProcedureCall) -> RowStream;
}

/// Maps every row of `rows` with `map`, preserving order and laziness.
pub fn map_rows<T, F>(rows: RowStream, map: F) -> BoxStream<'static, NorthwindResult<T>>
where
    T: Send + 'static,
    F: Fn(&StoreRow) -> NorthwindResult<T> + Send + 'static,
{
    rows.map(move |row| row.and_then(|row| map(&row))).boxed()
}

/// Reads the first row, then drops the stream.
pub async fn first_row(mut rows: RowStream) -> NorthwindResult<Option<StoreRow>> {
    rows.try_next().await
}

/// Reads a single count column from the first row.
pub async fn count_of(rows: RowStream, column: &str) -> NorthwindResult<u64> {
    match first_row(rows).await? {
        Some(row) => row.get::<u64>(column),
        None => Err(NorthwindError::mapping(format!(
            "count procedure returned no rows (expected column '{column}')"
        ))),
    }
}

/// Encodes a list argument as a JSON array, the form list-taking procedures expect.
pub fn json_list<T: serde::Serialize>(items: &[T]) -> NorthwindResult<String> {
    Ok(serde_json::to_string(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn rows(values: &[i32]) -> RowStream {
        let rows: Vec<_> = values
            .iter()
            .map(|v| Ok(StoreRow::new().with("Value", *v)))
            .collect();
        stream::iter(rows).boxed()
    }

    #[tokio::test]
    async fn test_map_rows_preserves_order() {
        let mapped: Vec<i32> = map_rows(rows(&[3, 1, 2]), |row| row.get::<i32>("Value"))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(mapped, [3, 1, 2]);
    }

    #[tokio::test]
    async fn test_first_row_of_empty_stream() {
        assert!(first_row(rows(&[])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_of() {
        let count_rows = stream::iter([Ok(StoreRow::new().with("ProductCount", 77_i64))]).boxed();
        assert_eq!(count_of(count_rows, "ProductCount").await.unwrap(), 77);
        assert!(count_of(rows(&[]), "ProductCount").await.is_err());
    }

    #[test]
    fn test_json_list_escapes_names() {
        let names = vec!["Chai".to_string(), "Sir Rodney's \"Scones\"".to_string()];
        assert_eq!(
            json_list(&names).unwrap(),
            r#"["Chai","Sir Rodney's \"Scones\""]"#
        );
    }
}
