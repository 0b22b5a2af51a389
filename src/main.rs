use terraform_provider_tidal::{init_logging, serve, TidalProvider};

// Release builds report the crate version; local builds report "dev".
#[cfg(debug_assertions)]
const VERSION: &str = "dev";
#[cfg(not(debug_assertions))]
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!(version = VERSION, "Starting TIDAL provider");
    serve(TidalProvider::new(VERSION)).await?;
    Ok(())
}
