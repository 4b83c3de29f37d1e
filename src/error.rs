use thiserror::Error;

use crate::schema::SqlType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("environment variable {0} is empty")]
    EmptyEnv(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("column `{table}.{column}` expects {expected}, got {found}")]
    TypeMismatch {
        table: String,
        column: String,
        expected: SqlType,
        found: &'static str,
    },

    #[error("column `{table}.{column}` is not nullable")]
    NullViolation { table: String, column: String },

    #[error("insert into `{table}` is missing required column `{column}`")]
    MissingColumn { table: String, column: String },

    #[error("select from `{0}` has no columns")]
    EmptySelect(String),

    #[error("insert into `{0}` has no values")]
    EmptyInsert(String),

    #[error("update of `{0}` sets no columns")]
    EmptyUpdate(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
