//! Coffee shop server binary

use anyhow::{bail, Result};
use coffeeshop_server::{config::validate_config, Server, ServerConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    #[cfg(feature = "tracing")]
    coffeeshop_server::logging::init_logging(&config.logging)?;

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        bail!("{} configuration error(s)", errors.len());
    }

    info!(
        "Starting coffee shop server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let server = Server::new(config).await?;
    info!(address = %server.bind_address(), "Coffee shop server ready");
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
