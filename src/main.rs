use calendra_db::db;
use tracing::info;

#[tokio::main]
async fn main() -> calendra_db::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let database = db::init().await?;
    database.ping().await?;

    let tables: Vec<&str> = database.schema().table_names().collect();
    info!("Connected, schema tables: {}", tables.join(", "));

    db::shutdown().await;

    Ok(())
}
