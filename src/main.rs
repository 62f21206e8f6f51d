use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use user_admin_api::api::{self, AppState};
use user_admin_api::config::{Config, StoreKind};
use user_admin_api::domain::repositories::UserRepository;
use user_admin_api::infrastructure::database;
use user_admin_api::infrastructure::repositories::{
    InMemoryUserRepository, PostgresUserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("user_admin_api=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    let repository: Arc<dyn UserRepository> = match config.store {
        StoreKind::Postgres => {
            // Connect to database
            tracing::info!("Connecting to database...");
            let pool = database::connect(&config.database).await?;
            tracing::info!("Database connected successfully");

            if config.database.run_migrations {
                database::run_migrations(&pool).await?;
                tracing::info!("Migrations applied");
            }

            Arc::new(PostgresUserRepository::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory user store, data is lost on exit");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    // Build router
    let app = api::router(AppState::new(repository));

    // Start server
    let addr = config.socket_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
