use std::sync::Arc;

use http_cache_negotiate::logger::init_logger;
use http_cache_negotiate::prelude::*;
use http_cache_negotiate::{Config, Result};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    info!("Starting HTTP cache negotiation server");

    let config = Config::load()?;
    let cache = config.cache_config()?;
    info!("Cache-Control for /status: {}", compute_cache_header(&cache));

    let registry = Arc::new(build_registry(&config)?);

    let mut server = ApiServer::new(config.addr()?, registry);
    server.add_resource(Arc::new(
        StatusResource::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")).with_cache(cache),
    ));

    if let Err(e) = server.run_until(wait_for_shutdown()).await {
        error!("Server exited with error: {}", e);
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let mut builder = ProviderRegistry::builder().with_json_default()?;
    if let Some(content_type) = config.vendor_content_type() {
        builder = builder.register_provider(Arc::new(JsonProvider::with_content_type(content_type)))?;
    }
    Ok(builder.build())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
