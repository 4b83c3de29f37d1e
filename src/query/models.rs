use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::schema::models::DayOfWeek;
use crate::schema::SqlType;

/// A value bound into a query. Each variant maps onto one [`SqlType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i32),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(NaiveDateTime),
    Day(DayOfWeek),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Day(_) => "day",
        }
    }

    /// Whether this value can be bound to a column of `sql_type`. `Null` is
    /// handled separately since it depends on nullability.
    pub fn fits(&self, sql_type: SqlType) -> bool {
        matches!(
            (self, sql_type),
            (Value::Null, _)
                | (Value::Text(_), SqlType::Text)
                | (Value::Integer(_), SqlType::Integer)
                | (Value::Boolean(_), SqlType::Boolean)
                | (Value::Uuid(_), SqlType::Uuid)
                | (Value::Timestamp(_), SqlType::Timestamp)
                | (Value::Day(_), SqlType::Enum(crate::schema::DAY_ENUM))
        )
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl From<DayOfWeek> for Value {
    fn from(value: DayOfWeek) -> Self {
        Value::Day(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// `column = value`, or `column IS NULL` for [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}
