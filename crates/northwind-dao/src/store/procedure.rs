//! Stored-procedure calls with typed, nullable-aware parameters.

use chrono::NaiveDateTime;
use northwind_core::{CategoryId, EmployeeId, ProductId, SupplierId};
use rust_decimal::Decimal;
use std::fmt;

/// Declared SQL type of a procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Int,
    SmallInt,
    Bit,
    Money,
    /// Unicode text with a maximum width in characters.
    NVarChar(u16),
    NText,
    Image,
    DateTime,
}

/// A value bound to a parameter or read from a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Bit(bool),
    Money(Decimal),
    Text(String),
    Binary(Vec<u8>),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Short name of the value's kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::Bit(_) => "bit",
            Self::Money(_) => "decimal",
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
            Self::DateTime(_) => "datetime",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bit(v) => write!(f, "{}", u8::from(*v)),
            Self::Money(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Binary(v) => write!(f, "<{} bytes>", v.len()),
            Self::DateTime(v) => write!(f, "'{v}'"),
        }
    }
}

macro_rules! sql_value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

sql_value_from! {
    i64 => |v| Self::Int(v),
    i32 => |v| Self::Int(i64::from(v)),
    i16 => |v| Self::Int(i64::from(v)),
    u32 => |v| Self::Int(i64::from(v)),
    bool => |v| Self::Bit(v),
    Decimal => |v| Self::Money(v),
    String => |v| Self::Text(v),
    &str => |v| Self::Text(v.to_string()),
    Vec<u8> => |v| Self::Binary(v),
    &[u8] => |v| Self::Binary(v.to_vec()),
    NaiveDateTime => |v| Self::DateTime(v),
    ProductId => |v| Self::Int(i64::from(v.get())),
    CategoryId => |v| Self::Int(i64::from(v.get())),
    EmployeeId => |v| Self::Int(i64::from(v.get())),
    SupplierId => |v| Self::Int(i64::from(v.get())),
}

/// One bound procedure parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlParameter {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub value: SqlValue,
}

/// A stored-procedure invocation.
///
/// Parameters are positional; the order they are added in is the order the
/// procedure declares them. Nullable parameters are always bound, with
/// [`SqlValue::Null`] standing in for an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCall {
    name: &'static str,
    parameters: Vec<SqlParameter>,
}

impl ProcedureCall {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parameters: Vec::new(),
        }
    }

    /// Binds a required parameter.
    #[must_use]
    pub fn param(mut self, name: &'static str, sql_type: SqlType, value: impl Into<SqlValue>) -> Self {
        self.parameters.push(SqlParameter {
            name,
            sql_type,
            nullable: false,
            value: value.into(),
        });
        self
    }

    /// Binds a nullable parameter, using the null marker when `value` is `None`.
    #[must_use]
    pub fn nullable<V: Into<SqlValue>>(
        mut self,
        name: &'static str,
        sql_type: SqlType,
        value: Option<V>,
    ) -> Self {
        self.parameters.push(SqlParameter {
            name,
            sql_type,
            nullable: true,
            value: value.map_or(SqlValue::Null, Into::into),
        });
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[SqlParameter] {
        &self.parameters
    }

    /// Looks a parameter up by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&SqlParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn into_parts(self) -> (&'static str, Vec<SqlParameter>) {
        (self.name, self.parameters)
    }
}

impl fmt::Display for ProcedureCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "@{}={}", parameter.name, parameter.value)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_keep_declaration_order() {
        let call = ProcedureCall::new("Update_Product")
            .param("ProductName", SqlType::NVarChar(40), "Chai")
            .nullable("UnitPrice", SqlType::Money, Some(Decimal::new(18, 0)))
            .param("ProductID", SqlType::Int, ProductId::new(1));

        let names: Vec<_> = call.parameters().iter().map(|p| p.name).collect();
        assert_eq!(names, ["ProductName", "UnitPrice", "ProductID"]);
    }

    #[test]
    fn test_absent_nullable_is_bound_as_null() {
        let call = ProcedureCall::new("Insert_Product")
            .nullable::<Decimal>("UnitPrice", SqlType::Money, None);

        let parameter = call.parameter("UnitPrice").unwrap();
        assert!(parameter.nullable);
        assert!(parameter.value.is_null());
        assert_eq!(parameter.sql_type, SqlType::Money);
    }

    #[test]
    fn test_display_hides_blob_contents() {
        let call = ProcedureCall::new("Insert_Category")
            .param("CategoryName", SqlType::NVarChar(15), "Seafood")
            .nullable::<&str>("Description", SqlType::NText, None)
            .nullable("Picture", SqlType::Image, Some(vec![1_u8, 2, 3]));

        assert_eq!(
            call.to_string(),
            "Insert_Category(@CategoryName='Seafood', @Description=NULL, @Picture=<3 bytes>)"
        );
    }

    #[test]
    fn test_typed_ids_convert_to_int() {
        assert_eq!(SqlValue::from(CategoryId::new(4)), SqlValue::Int(4));
        assert_eq!(SqlValue::from(true).to_string(), "1");
        assert_eq!(SqlValue::Null.kind(), "null");
    }
}
