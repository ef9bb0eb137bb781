use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Creates the shared connection pool
pub async fn create_connection(
    database_url: &str,
    max_connections: u32,
    sql_logging: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(sql_logging)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(options).await
}
