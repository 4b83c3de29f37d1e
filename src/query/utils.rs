use sqlx::{Postgres, QueryBuilder};

use crate::error::{Error, Result};
use crate::schema::{Column, Table};

use super::models::{Filter, Value};

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn checked_column(table: &'static Table, name: &str) -> Result<&'static Column> {
    table.column(name).ok_or_else(|| Error::UnknownColumn {
        table: table.name.to_string(),
        column: name.to_string(),
    })
}

pub fn check_value(table: &Table, column: &Column, value: &Value) -> Result<()> {
    if *value == Value::Null {
        if column.nullable {
            return Ok(());
        }
        return Err(Error::NullViolation {
            table: table.name.to_string(),
            column: column.name.to_string(),
        });
    }

    if !value.fits(column.sql_type) {
        return Err(Error::TypeMismatch {
            table: table.name.to_string(),
            column: column.name.to_string(),
            expected: column.sql_type,
            found: value.kind(),
        });
    }

    Ok(())
}

/// Looks up `name` on `table` and checks `value` against it.
pub fn checked_assignment(
    table: &'static Table,
    name: &str,
    value: Value,
) -> Result<(&'static str, Value)> {
    let column = checked_column(table, name)?;
    check_value(table, column, &value)?;
    Ok((column.name, value))
}

pub fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: Value) {
    match value {
        Value::Null => builder.push("NULL"),
        Value::Text(v) => builder.push_bind(v),
        Value::Integer(v) => builder.push_bind(v),
        Value::Boolean(v) => builder.push_bind(v),
        Value::Uuid(v) => builder.push_bind(v),
        Value::Timestamp(v) => builder.push_bind(v),
        Value::Day(v) => builder.push_bind(v),
    };
}

pub fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(quote_ident(filter.column));

        if filter.value == Value::Null {
            builder.push(" IS NULL");
        } else {
            builder.push(" = ");
            push_value(builder, filter.value.clone());
        }
    }
}
