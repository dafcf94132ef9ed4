use deposit_scanner::{
    AppController, ConfigManager, DepositTables, LogOverlay, OllamaClient, ScreenCapture,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Structured logging. Use `RUST_LOG=debug` etc. to adjust.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_manager = ConfigManager::new().expect("Failed to initialize config manager");
    let config = config_manager.load_or_init();

    // The deposit tables are essential static data; refuse to start without them
    let tables = DepositTables::load().expect("Failed to build deposit tables");

    let capture = Arc::new(ScreenCapture::new().expect("Failed to initialize screen capture"));
    let recognizer =
        Arc::new(OllamaClient::new(&config.ocr).expect("Failed to create recognition client"));

    let controller = AppController::new(
        config_manager,
        config,
        tables,
        capture,
        recognizer,
        Arc::new(LogOverlay),
    );

    controller.toggle_continuous();
    tracing::info!("continuous scanning started, press Ctrl-C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }

    tracing::info!("shutting down");
    controller.shutdown().await;
    if let Err(e) = controller.save_config() {
        tracing::warn!(error = %e, "failed to save config on shutdown");
    }
}
