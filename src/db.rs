use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::query::{Delete, Insert, Select, Update};
use crate::schema::{self, Schema, Table};

static DATABASE: OnceCell<Database> = OnceCell::const_new();

/// A connection pool bound to a schema descriptor.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    schema: &'static Schema,
}

impl Database {
    pub fn new(pool: PgPool, schema: &'static Schema) -> Self {
        Database { pool, schema }
    }

    /// Builds the pool without opening a connection. Connection errors show up
    /// on the first query.
    pub fn connect_lazy(config: &DatabaseConfig, schema: &'static Schema) -> Result<Self> {
        let options = config.connect_options()?;
        let pool = config.pool_options().connect_lazy_with(options.clone());

        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            max_connections = config.max_connections,
            "Database pool created"
        );

        Ok(Database::new(pool, schema))
    }

    /// Builds the pool and waits for the first connection.
    pub async fn connect(config: &DatabaseConfig, schema: &'static Schema) -> Result<Self> {
        let options = config.connect_options()?;
        let pool = config
            .pool_options()
            .connect_with(options.clone())
            .await
            .map_err(|e| {
                error!("Failed to connect to {}: {}", config.redacted_url(), e);
                Error::Database(e)
            })?;

        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            max_connections = config.max_connections,
            "Database pool connected"
        );

        Ok(Database::new(pool, schema))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn table(&self, name: &str) -> Result<&'static Table> {
        self.schema
            .table(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn select(&self, table: &str) -> Result<Select<'_>> {
        Ok(Select::new(self, self.table(table)?))
    }

    pub fn insert_into(&self, table: &str) -> Result<Insert<'_>> {
        Ok(Insert::new(self, self.table(table)?))
    }

    pub fn update(&self, table: &str) -> Result<Update<'_>> {
        Ok(Update::new(self, self.table(table)?))
    }

    pub fn delete_from(&self, table: &str) -> Result<Delete<'_>> {
        Ok(Delete::new(self, self.table(table)?))
    }

    /// Round-trips `SELECT 1` through the pool.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database pool closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Returns the process-wide handle, creating it from `DATABASE_URL` and the
/// Calendra schema on first use.
///
/// A failed attempt leaves nothing behind, so a later call can succeed once the
/// environment is fixed.
pub async fn init() -> Result<&'static Database> {
    DATABASE
        .get_or_try_init(|| async {
            let config = DatabaseConfig::from_env().inspect_err(|e| {
                error!("Invalid database configuration: {}", e);
            })?;
            Database::connect_lazy(&config, &schema::CALENDRA)
        })
        .await
}

/// The process-wide handle, if [`init`] has succeeded.
pub fn get() -> Option<&'static Database> {
    DATABASE.get()
}

/// Closes the process-wide pool. Does nothing if it was never created.
pub async fn shutdown() {
    if let Some(db) = DATABASE.get() {
        db.close().await;
    }
}
