//! Result rows addressed by column name.

use super::SqlValue;
use chrono::NaiveDateTime;
use northwind_core::{NorthwindError, NorthwindResult};
use rust_decimal::Decimal;

/// Conversion from a column value into a Rust type.
///
/// Returns `None` when the value's kind cannot represent `Self`.
/// [`SqlValue::Null`] never converts; nullability is handled by
/// [`StoreRow::get_opt`].
pub trait FromSqlValue: Sized {
    /// Name used in mapping diagnostics.
    const EXPECTED: &'static str;

    fn from_sql_value(value: &SqlValue) -> Option<Self>;
}

impl FromSqlValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Bit(v) => Some(Self::from(*v)),
            _ => None,
        }
    }
}

impl FromSqlValue for i32 {
    const EXPECTED: &'static str = "int";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        i64::from_sql_value(value).and_then(|v| Self::try_from(v).ok())
    }
}

impl FromSqlValue for i16 {
    const EXPECTED: &'static str = "smallint";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        i64::from_sql_value(value).and_then(|v| Self::try_from(v).ok())
    }
}

impl FromSqlValue for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        i64::from_sql_value(value).and_then(|v| Self::try_from(v).ok())
    }
}

impl FromSqlValue for bool {
    const EXPECTED: &'static str = "bit";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bit(v) => Some(*v),
            SqlValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl FromSqlValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Money(v) => Some(*v),
            SqlValue::Int(v) => Some(Self::from(*v)),
            _ => None,
        }
    }
}

impl FromSqlValue for String {
    const EXPECTED: &'static str = "text";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromSqlValue for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Binary(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    const EXPECTED: &'static str = "datetime";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::DateTime(v) => Some(*v),
            _ => None,
        }
    }
}

/// One result row. Column lookup ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRow {
    columns: Vec<(String, SqlValue)>,
}

impl StoreRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Appends a column, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a column, or replaces it if already present.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(index) => self.columns[index].1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(column))
    }

    /// Raw value of a column.
    pub fn value(&self, column: &str) -> NorthwindResult<&SqlValue> {
        self.position(column)
            .map(|index| &self.columns[index].1)
            .ok_or_else(|| NorthwindError::mapping(format!("column '{column}' missing from result set")))
    }

    /// Reads a non-nullable column. A null marker is a mapping error.
    pub fn get<T: FromSqlValue>(&self, column: &str) -> NorthwindResult<T> {
        self.get_opt(column)?.ok_or_else(|| {
            NorthwindError::mapping(format!("column '{column}' is null but declared non-nullable"))
        })
    }

    /// Reads a nullable column; the null marker maps to `None`.
    pub fn get_opt<T: FromSqlValue>(&self, column: &str) -> NorthwindResult<Option<T>> {
        let value = self.value(column)?;
        if value.is_null() {
            return Ok(None);
        }
        T::from_sql_value(value).map(Some).ok_or_else(|| {
            NorthwindError::mapping(format!(
                "column '{column}' holds {} where {} was expected",
                value.kind(),
                T::EXPECTED
            ))
        })
    }
}
