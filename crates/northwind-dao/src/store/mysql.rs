//! MySQL procedure store.

use super::{ProcedureCall, ProcedureStore, RowStream, SqlParameter, SqlType, SqlValue, StoreRow};
use crate::DatabasePoolInterface;
use async_stream::try_stream;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use futures::{Stream, TryStreamExt};
use northwind_core::{NorthwindError, NorthwindResult};
use rust_decimal::Decimal;
use shaku::Component;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo};
use std::sync::Arc;
use tracing::debug;

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Runs procedures with `CALL name(?, ...)` on leased pool connections.
#[derive(Component, Clone)]
#[shaku(interface = ProcedureStore)]
pub struct MySqlProcedureStore {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProcedureStore {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for MySqlProcedureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlProcedureStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProcedureStore for MySqlProcedureStore {
    async fn execute(&self, call: ProcedureCall) -> NorthwindResult<u64> {
        debug!("Executing {}", call);

        let statement = call_statement(&call);
        let (_, parameters) = call.into_parts();

        let mut conn = self.pool.inner().acquire().await?;
        let result = bind_all(sqlx::query(&statement), parameters)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    fn query(&self, call: ProcedureCall) -> RowStream {
        Box::pin(leased_rows(self.pool.inner().clone(), call))
    }
}

/// The lease lives inside the stream and goes back to the pool when the
/// stream is exhausted or dropped.
fn leased_rows(
    pool: MySqlPool,
    call: ProcedureCall,
) -> impl Stream<Item = NorthwindResult<StoreRow>> + Send + 'static {
    try_stream! {
        debug!("Querying {}", call);

        let statement = call_statement(&call);
        let (_, parameters) = call.into_parts();

        let mut conn = pool.acquire().await?;
        let mut rows = bind_all(sqlx::query(&statement), parameters).fetch(&mut *conn);

        while let Some(row) = rows.try_next().await? {
            yield convert_row(&row)?;
        }
    }
}

fn call_statement(call: &ProcedureCall) -> String {
    let placeholders = vec!["?"; call.parameters().len()].join(", ");
    format!("CALL {}({})", call.name(), placeholders)
}

fn bind_all(query: MySqlQuery<'_>, parameters: Vec<SqlParameter>) -> MySqlQuery<'_> {
    parameters.into_iter().fold(query, bind_parameter)
}

/// Binds one value. Nulls are bound with the Rust type matching the
/// parameter's declared SQL type so the server sees a typed null.
fn bind_parameter(query: MySqlQuery<'_>, parameter: SqlParameter) -> MySqlQuery<'_> {
    match parameter.value {
        SqlValue::Int(v) => query.bind(v),
        SqlValue::Bit(v) => query.bind(v),
        SqlValue::Money(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Binary(v) => query.bind(v),
        SqlValue::DateTime(v) => query.bind(v),
        SqlValue::Null => match parameter.sql_type {
            SqlType::Int | SqlType::SmallInt => query.bind(None::<i64>),
            SqlType::Bit => query.bind(None::<bool>),
            SqlType::Money => query.bind(None::<Decimal>),
            SqlType::NVarChar(_) | SqlType::NText => query.bind(None::<String>),
            SqlType::Image => query.bind(None::<Vec<u8>>),
            SqlType::DateTime => query.bind(None::<NaiveDateTime>),
        },
    }
}

fn convert_row(row: &MySqlRow) -> NorthwindResult<StoreRow> {
    let mut converted = StoreRow::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        converted.push(column.name(), value);
    }
    Ok(converted)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> NorthwindResult<SqlValue> {
    let value = match type_name {
        "NULL" => None,
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.map(SqlValue::Bit),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(index)?.map(SqlValue::Int)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)?
            .map(|v| {
                i64::try_from(v)
                    .map(SqlValue::Int)
                    .map_err(|_| NorthwindError::mapping(format!("column {index} overflows BIGINT")))
            })
            .transpose()?,
        "DECIMAL" => row.try_get::<Option<Decimal>, _>(index)?.map(SqlValue::Money),
        "FLOAT" | "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)?
            .map(|v| {
                Decimal::try_from(v)
                    .map(SqlValue::Money)
                    .map_err(|e| NorthwindError::mapping(format!("column {index}: {e}")))
            })
            .transpose()?,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            row.try_get::<Option<String>, _>(index)?.map(SqlValue::Text)
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            row.try_get::<Option<Vec<u8>>, _>(index)?.map(SqlValue::Binary)
        }
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(SqlValue::DateTime),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| SqlValue::DateTime(d.and_time(NaiveTime::MIN))),
        other => {
            return Err(NorthwindError::mapping(format!(
                "column {index} has unsupported type {other}"
            )))
        }
    };
    Ok(value.unwrap_or(SqlValue::Null))
}
