use std::error::Error;

use database::db::create_connection;
use env_logger::Env;
use log::{error, info};
use migration::{Migrator, MigratorTrait};

use crate::{config::AppConfig, state::AppState, utils::shutdown::shutdown_signal};

mod config;
mod doc;
mod dtos;
mod error;
mod extract;
mod routes;
mod state;
mod utils;

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let db = create_connection(
        &config.database_url,
        config.database_max_connections,
        config.database_sql_log,
    )
    .await?;

    if config.run_migrations {
        info!("applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    let app = routes::router(AppState::new(db));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Running axum on http://{addr} (docs at /swagger-ui)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = AppConfig::load();

    let log_level = config
        .as_ref()
        .map(|config| config.log_level.clone())
        .unwrap_or_else(|_| "info".to_owned());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match config {
        Ok(config) => run(config).await,
        Err(err) => Err(err.into()),
    };

    if let Err(err) = result {
        error!("server failed: {err}");
        std::process::exit(1);
    }
}
