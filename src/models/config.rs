use crate::models::region::CaptureRegion;
use serde::{Deserialize, Serialize};

fn default_label_color() -> String {
    "yellow".to_string()
}

/// Scan cadence and overlay timing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Seconds between scans in continuous mode
    pub interval_secs: u64,
    /// Seconds of inactivity before the overlay label is cleared
    pub label_timeout_secs: u64,
    /// Milliseconds between overlay timeout checks
    pub label_check_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            label_timeout_secs: 10,
            label_check_ms: 500,
        }
    }
}

/// Vision model recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcrConfig {
    pub base_url: String,
    pub model: String,
    pub prompt: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "qwen2.5vl:3b".to_string(),
            prompt: "Extract the numeric code shown in this image. Only return the code, no extra words."
                .to_string(),
        }
    }
}

/// Complete application configuration
///
/// Every field carries a serde default so configs written by older builds
/// (capture region and label color only) still parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub region: CaptureRegion,
    #[serde(default = "default_label_color")]
    pub label_color: String,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: CaptureRegion::default(),
            label_color: default_label_color(),
            scan: ScanConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}
