use inmaps_router::adapters::inbound::serve_json_lines;
use inmaps_router::adapters::outbound::{
    init_console_logger, init_file_logger, FilesystemVenueSource,
};
use inmaps_router::application::RoutingService;
use inmaps_router::domains::DynLogger;
use inmaps_router::Config;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = Config::load_or_default(CONFIG_PATH).await?;

    // fast_log has to claim the `log` facade before tracing-subscriber does
    let logger: DynLogger = match &config.logging.file {
        Some(path) => match init_file_logger(path) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("{}; falling back to console logging", e);
                init_console_logger()
            }
        },
        None => init_console_logger(),
    };

    // Fails to bridge `log` when fast_log owns it; tracing output still works
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    info!("Starting inmaps-router");
    if let Some(e) = config_error {
        warn!("{:#}; using default configuration", e);
    }

    let source = FilesystemVenueSource::new(config.venue.data_dir.clone());
    info!(
        "Loading venue {} from {} (cell size {})",
        config.venue.data_file,
        source.base().display(),
        config.venue.cell_size
    );
    let service = RoutingService::load(
        &source,
        &config.venue.data_file,
        config.venue.cell_size,
        config.grid,
        logger.clone(),
    )?;

    logger.info("Routing service ready, reading requests from stdin");
    let stdin = BufReader::new(tokio::io::stdin());
    let handled = serve_json_lines(&service, stdin, tokio::io::stdout()).await?;
    info!("stdin closed after {} requests, shutting down", handled);

    Ok(())
}
