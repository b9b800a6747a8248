use storefront::{Config, Server, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env and logging
    setup_environment();

    tracing::info!("Pizzeria storefront starting...");

    // 2. Configuration
    let config = Config::from_env()?;

    // 3. HTTP server (opens the database, starts background tasks)
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
