//! PostgreSQL client bootstrap for Calendra.
//!
//! The connection string comes from `DATABASE_URL`. [`db::init`] builds a
//! lazily connected pool, binds it to the [`schema::CALENDRA`] descriptor and
//! keeps the resulting [`Database`] handle for the rest of the process.

pub mod config;
pub mod db;
pub mod error;
pub mod query;
pub mod schema;

pub use config::DatabaseConfig;
pub use db::Database;
pub use error::{Error, Result};
