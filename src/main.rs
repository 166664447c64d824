use gym_desk::api::create_routes;
use gym_desk::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use gym_desk::services::PricingService;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;

    let pool = database_config.create_pool().await?;
    run_migrations(&pool).await?;

    DatabaseSeeder::new(pool.clone()).seed_all().await?;

    // Load the pricing snapshot once before the first request needs it;
    // handlers read from memory afterwards.
    let pricing_service = PricingService::new(pool.clone());
    pricing_service.reload().await?;

    let app = create_routes(pool, pricing_service);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("gym-desk server starting on http://{address}");
    info!("Health check available at http://{address}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
