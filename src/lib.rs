pub mod controller;
pub mod models;
pub mod services;

pub use controller::AppController;
pub use models::config::AppConfig;
pub use models::ore_table::{DepositTables, OreRow, OreTier};
pub use models::region::CaptureRegion;
pub use models::scan::{DepositResolution, ScanResult, StatusSnapshot};
pub use services::config::ConfigManager;
pub use services::ocr::{extract_code, OllamaClient, TextRecognizer};
pub use services::overlay::{LogOverlay, OverlaySurface};
pub use services::resolver::lookup_deposit;
pub use services::scanner::DepositScanner;
pub use services::screen_capture::{CaptureProvider, ScreenCapture};
