use std::error::Error;
use std::sync::Arc;

use log::{info, initialize_logger};

use shaker::config::{Settings, StoreKind};
use shaker::environment::{Config, Environment};
use shaker::repository::{self, memory::MemoryRepository, PgRecipeRepository};
use shaker::routes;
use shaker::service::{RecipeService, SafeRepository};
use shaker::urls::Urls;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;

    let logger = initialize_logger(settings.log_level);
    info!(logger, "Starting..."; "port" => settings.port, "store" => ?settings.store);
    let logger = Arc::new(logger);

    let (repository, pool) = match settings.store {
        StoreKind::Postgres => {
            info!(logger, "Creating database pool..."; "database" => &settings.database);
            let pool = repository::connect(
                &settings.connection_string,
                &settings.database,
                settings.max_connections,
            )
            .await?;

            let repository: Arc<SafeRepository> = Arc::new(PgRecipeRepository::new(pool.clone()));

            (repository, Some(pool))
        }
        StoreKind::Memory => {
            let repository: Arc<SafeRepository> = Arc::new(MemoryRepository::new());

            (repository, None)
        }
    };

    info!(logger, "Initializing store...");
    repository.initialize().await?;

    let service = Arc::new(RecipeService::new(
        logger.clone(),
        repository,
        settings.store_timeout,
    ));
    let urls = Arc::new(Urls::new(&settings.base_url)?);
    let config = Config::new(settings.log_bodies);
    let environment = Environment::new(logger.clone(), service, urls, config);

    let routes = routes::make_routes(environment, &settings.allowed_origins);

    let (address, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(([0, 0, 0, 0], settings.port), shutdown_signal())?;
    info!(logger, "Listening..."; "address" => %address);

    server.await;

    info!(logger, "Shutting down...");
    if let Some(pool) = pool {
        pool.close().await;
    }

    info!(logger, "Exiting gracefully...");

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = terminate.recv() => {},
            }
        }
        Err(_) => {
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
}
