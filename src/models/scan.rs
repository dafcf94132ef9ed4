use crate::models::region::CaptureRegion;
use serde::{Deserialize, Serialize};

/// A deposit code resolved against the multiplier table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositResolution {
    pub name: String,
    pub key: String,
    pub rarity: String,
    pub base_code: u64,
    /// Number of deposits encoded in the scanned code (always >= 1)
    pub deposits: u64,
    pub category: String,
}

/// Outcome of the most recent scan
///
/// One logical instance exists process-wide; every scan overwrites it and
/// the overlay ticker and status snapshot read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScanResult {
    /// Normalized code extracted from the recognized text
    pub code: Option<String>,
    /// Raw matched token, uppercased
    pub code_raw: Option<String>,
    /// Resolution, if a base code divided the numeric suffix
    pub info: Option<DepositResolution>,
    /// Full text returned by the recognizer
    pub raw_text: String,
    /// RFC 3339 local timestamp of the scan
    pub scanned_at: Option<String>,
}

impl ScanResult {
    pub fn is_resolved(&self) -> bool {
        self.info.is_some()
    }
}

/// Read-only snapshot served to the status-reporting frontend
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusSnapshot {
    pub region: CaptureRegion,
    pub label_color: String,
    pub last: ScanResult,
}
