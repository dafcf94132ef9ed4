use crate::models::config::AppConfig;
use crate::models::ore_table::{DepositTables, OreRow};
use crate::models::region::CaptureRegion;
use crate::models::scan::StatusSnapshot;
use crate::services::config::ConfigManager;
use crate::services::ocr::TextRecognizer;
use crate::services::overlay::OverlaySurface;
use crate::services::scanner::{DepositScanner, ScannerShared};
use crate::services::screen_capture::CaptureProvider;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Orchestrating controller owning all application state
///
/// UI callbacks, hotkey handlers, and status frontends go through this
/// surface instead of touching module state; the scanner and overlay
/// ticker run underneath it with explicit handles.
pub struct AppController {
    config_manager: ConfigManager,
    tables: DepositTables,
    shared: Arc<ScannerShared>,
    scanner: Arc<DepositScanner>,
    surface: Arc<dyn OverlaySurface>,
}

impl AppController {
    /// Wire up shared state and collaborators, and start the overlay
    /// timeout ticker
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        config_manager: ConfigManager,
        config: AppConfig,
        tables: DepositTables,
        capture: Arc<dyn CaptureProvider>,
        recognizer: Arc<dyn TextRecognizer>,
        surface: Arc<dyn OverlaySurface>,
    ) -> Self {
        let shared = Arc::new(ScannerShared::new(config));
        let scanner = DepositScanner::new(
            Arc::clone(&shared),
            capture,
            recognizer,
            Arc::clone(&surface),
        );
        scanner.start_ticker();

        // Sync the overlay geometry with the configured region
        surface.set_region_bounds(&shared.config.read().region);

        Self {
            config_manager,
            tables,
            shared,
            scanner,
            surface,
        }
    }

    /// Manual single-shot scan
    pub async fn run_one_scan(&self) {
        self.scanner.run_one_scan().await;
    }

    /// Toggle continuous scanning; returns the new state
    pub fn toggle_continuous(&self) -> bool {
        self.scanner.toggle_continuous()
    }

    /// Toggle the capture-region border; returns the new visibility
    pub fn toggle_border(&self) -> bool {
        let was_visible = self.shared.border_visible.fetch_xor(true, Ordering::SeqCst);
        let visible = !was_visible;
        self.surface.set_border_visible(visible);
        visible
    }

    /// Update the capture region and push the new bounds to the overlay
    pub fn set_region(&self, region: CaptureRegion) {
        self.shared.config.write().region = region;
        self.surface.set_region_bounds(&region);
    }

    /// Update the overlay label color
    pub fn set_label_color(&self, color: &str) {
        self.shared.config.write().label_color = color.to_string();
    }

    /// Read-only snapshot for the status frontend
    pub fn status(&self) -> StatusSnapshot {
        let (region, label_color) = {
            let config = self.shared.config.read();
            (config.region, config.label_color.clone())
        };
        StatusSnapshot {
            region,
            label_color,
            last: self.shared.last_result.read().clone(),
        }
    }

    /// Ore table for a deposit type in a game region
    pub fn ore_table(&self, region: &str, deposit_type: &str) -> Option<&[OreRow]> {
        self.tables.ore_table(region, deposit_type)
    }

    /// Persist the current configuration
    pub fn save_config(&self) -> Result<(), String> {
        let config = self.shared.config.read().clone();
        self.config_manager.save(&config)
    }

    /// Stop and join the background tasks
    pub async fn shutdown(&self) {
        self.scanner.shutdown().await;
    }
}
