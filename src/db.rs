use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const SCHEMA: &str = include_str!("../sql/schema.sql");

pub async fn connect_pg(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    tracing::info!("database schema ensured");

    Ok(pool)
}
