use crate::models::region::CaptureRegion;
use crate::models::scan::DepositResolution;
use std::time::{Duration, Instant};

/// Overlay rendering surface contract
///
/// The core never draws; it only pushes label and geometry state to
/// whatever toolkit hosts the overlay window.
pub trait OverlaySurface: Send + Sync {
    fn set_label(&self, text: &str, color: &str);
    fn set_region_bounds(&self, region: &CaptureRegion);
    fn set_border_visible(&self, visible: bool);
}

/// Headless surface that just logs pushes, for running without a GUI
pub struct LogOverlay;

impl OverlaySurface for LogOverlay {
    fn set_label(&self, text: &str, color: &str) {
        if text.is_empty() {
            tracing::debug!("overlay label cleared");
        } else {
            tracing::info!(label = text, color, "overlay label updated");
        }
    }

    fn set_region_bounds(&self, region: &CaptureRegion) {
        tracing::info!(
            left = region.left,
            top = region.top,
            width = region.width,
            height = region.height,
            "overlay region updated"
        );
    }

    fn set_border_visible(&self, visible: bool) {
        tracing::info!(visible, "overlay border toggled");
    }
}

/// Timed overlay label state
///
/// Two states: EMPTY (no text) and SHOWING (text since some instant). A
/// resolution moves it to SHOWING and restamps the clock; an unresolved
/// scan leaves it alone so transient recognition misses don't flicker the
/// label. A periodic driver clears it once the inactivity deadline passes.
#[derive(Debug, Default)]
pub struct OverlayState {
    text: String,
    last_update: Option<Instant>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_showing(&self) -> bool {
        !self.text.is_empty()
    }

    /// Apply a scan outcome at `now`
    ///
    /// Returns the new label text when the resolution updated the label;
    /// `None` resolutions never transition state.
    pub fn apply(&mut self, info: Option<&DepositResolution>, now: Instant) -> Option<&str> {
        let info = info?;
        self.text = format!("{} x{}", info.name, info.deposits);
        self.last_update = Some(now);
        Some(&self.text)
    }

    /// Clear the label if the inactivity deadline has passed
    ///
    /// The single monotonic rule: clear when `now - last_update > timeout`.
    /// Returns true when a clear happened.
    pub fn clear_if_expired(&mut self, now: Instant, timeout: Duration) -> bool {
        match self.last_update {
            Some(stamp) if now.duration_since(stamp) > timeout => {
                self.text.clear();
                self.last_update = None;
                true
            }
            _ => false,
        }
    }
}
