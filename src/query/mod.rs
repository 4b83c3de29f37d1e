//! Schema-checked query builders.
//!
//! Table and column names are resolved against the [`Schema`](crate::schema::Schema)
//! the handle was built with before any SQL is produced. Values are always
//! bound as parameters.

pub mod models;
pub mod utils;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::schema::Table;
use models::Filter;
use utils::{checked_assignment, checked_column, push_filters, push_value, quote_ident};

pub use models::{Order, Value};

#[derive(Debug)]
pub struct Select<'db> {
    db: &'db Database,
    table: &'static Table,
    columns: Vec<&'static str>,
    filters: Vec<Filter>,
    order: Vec<(&'static str, Order)>,
    limit: Option<u32>,
}

impl<'db> Select<'db> {
    pub(crate) fn new(db: &'db Database, table: &'static Table) -> Self {
        Select {
            db,
            table,
            columns: table.column_names().collect(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Restricts the selected columns. All columns are selected by default.
    pub fn columns(mut self, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::EmptySelect(self.table.name.to_string()));
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            columns.push(checked_column(self.table, name)?.name);
        }
        self.columns = columns;
        Ok(self)
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let (column, value) = checked_assignment(self.table, column, value.into())?;
        self.filters.push(Filter { column, value });
        Ok(self)
    }

    pub fn order_by(mut self, column: &str, order: Order) -> Result<Self> {
        let column = checked_column(self.table, column)?;
        self.order.push((column.name, order));
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");

        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        builder.push(columns.join(", "));
        builder.push(" FROM ");
        builder.push(quote_ident(self.table.name));

        push_filters(&mut builder, &self.filters);

        for (i, (column, order)) in self.order.iter().enumerate() {
            builder.push(if i == 0 { " ORDER BY " } else { ", " });
            builder.push(quote_ident(column));
            builder.push(" ");
            builder.push(order.as_sql());
        }

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(limit));
        }

        builder
    }

    pub fn to_sql(&self) -> String {
        self.build().sql().to_string()
    }

    pub async fn fetch_all<T>(self) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.build();
        debug!(sql = builder.sql(), "select");
        let rows = builder
            .build_query_as::<T>()
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    pub async fn fetch_optional<T>(self) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.build();
        debug!(sql = builder.sql(), "select");
        let row = builder
            .build_query_as::<T>()
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row)
    }

    pub async fn fetch_one<T>(self) -> Result<T>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.build();
        debug!(sql = builder.sql(), "select");
        let row = builder
            .build_query_as::<T>()
            .fetch_one(self.db.pool())
            .await?;
        Ok(row)
    }
}

#[derive(Debug)]
pub struct Insert<'db> {
    db: &'db Database,
    table: &'static Table,
    values: Vec<(&'static str, Value)>,
    returning: bool,
}

impl<'db> Insert<'db> {
    pub(crate) fn new(db: &'db Database, table: &'static Table) -> Self {
        Insert {
            db,
            table,
            values: Vec::new(),
            returning: false,
        }
    }

    /// Sets `column`. Setting the same column twice keeps the last value.
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let (column, value) = checked_assignment(self.table, column, value.into())?;
        match self.values.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column, value)),
        }
        Ok(self)
    }

    pub fn returning_all(mut self) -> Self {
        self.returning = true;
        self
    }

    fn build(&self) -> Result<QueryBuilder<'static, Postgres>> {
        if self.values.is_empty() {
            return Err(Error::EmptyInsert(self.table.name.to_string()));
        }

        if let Some(missing) = self
            .table
            .columns
            .iter()
            .filter(|c| c.is_required())
            .find(|c| !self.values.iter().any(|(name, _)| *name == c.name))
        {
            return Err(Error::MissingColumn {
                table: self.table.name.to_string(),
                column: missing.name.to_string(),
            });
        }

        let mut builder = QueryBuilder::new("INSERT INTO ");
        builder.push(quote_ident(self.table.name));

        let columns: Vec<String> = self.values.iter().map(|(c, _)| quote_ident(c)).collect();
        builder.push(" (");
        builder.push(columns.join(", "));
        builder.push(") VALUES (");

        for (i, (_, value)) in self.values.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, value.clone());
        }
        builder.push(")");

        if self.returning {
            builder.push(" RETURNING *");
        }

        Ok(builder)
    }

    pub fn to_sql(&self) -> Result<String> {
        Ok(self.build()?.sql().to_string())
    }

    /// Runs the insert and returns the number of rows written.
    pub async fn execute(self) -> Result<u64> {
        let mut builder = self.build()?;
        debug!(sql = builder.sql(), "insert");
        let result = builder.build().execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }

    /// Runs the insert with `RETURNING *` and decodes the new row.
    pub async fn fetch_one<T>(self) -> Result<T>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let db = self.db;
        let mut builder = self.returning_all().build()?;
        debug!(sql = builder.sql(), "insert");
        let row = builder.build_query_as::<T>().fetch_one(db.pool()).await?;
        Ok(row)
    }
}

#[derive(Debug)]
pub struct Update<'db> {
    db: &'db Database,
    table: &'static Table,
    assignments: Vec<(&'static str, Value)>,
    filters: Vec<Filter>,
}

impl<'db> Update<'db> {
    pub(crate) fn new(db: &'db Database, table: &'static Table) -> Self {
        Update {
            db,
            table,
            assignments: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let (column, value) = checked_assignment(self.table, column, value.into())?;
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
        Ok(self)
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let (column, value) = checked_assignment(self.table, column, value.into())?;
        self.filters.push(Filter { column, value });
        Ok(self)
    }

    fn build(&self) -> Result<QueryBuilder<'static, Postgres>> {
        if self.assignments.is_empty() {
            return Err(Error::EmptyUpdate(self.table.name.to_string()));
        }

        let mut builder = QueryBuilder::new("UPDATE ");
        builder.push(quote_ident(self.table.name));
        builder.push(" SET ");

        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(quote_ident(column));
            builder.push(" = ");
            push_value(&mut builder, value.clone());
        }

        for column in self.table.columns.iter().filter(|c| c.refresh_on_update) {
            if self.assignments.iter().any(|(name, _)| *name == column.name) {
                continue;
            }
            builder.push(", ");
            builder.push(quote_ident(column.name));
            builder.push(" = now()");
        }

        push_filters(&mut builder, &self.filters);

        Ok(builder)
    }

    pub fn to_sql(&self) -> Result<String> {
        Ok(self.build()?.sql().to_string())
    }

    pub async fn execute(self) -> Result<u64> {
        let mut builder = self.build()?;
        debug!(sql = builder.sql(), "update");
        let result = builder.build().execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug)]
pub struct Delete<'db> {
    db: &'db Database,
    table: &'static Table,
    filters: Vec<Filter>,
}

impl<'db> Delete<'db> {
    pub(crate) fn new(db: &'db Database, table: &'static Table) -> Self {
        Delete {
            db,
            table,
            filters: Vec::new(),
        }
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let (column, value) = checked_assignment(self.table, column, value.into())?;
        self.filters.push(Filter { column, value });
        Ok(self)
    }

    fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("DELETE FROM ");
        builder.push(quote_ident(self.table.name));
        push_filters(&mut builder, &self.filters);
        builder
    }

    pub fn to_sql(&self) -> String {
        self.build().sql().to_string()
    }

    pub async fn execute(self) -> Result<u64> {
        let mut builder = self.build();
        debug!(sql = builder.sql(), "delete");
        let result = builder.build().execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }
}
