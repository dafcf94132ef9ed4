use crate::models::region::CaptureRegion;
use image::DynamicImage;
use xcap::Monitor;

/// Capture provider contract
///
/// Given a screen region, returns a single still image. Failures are
/// expected (driver errors, no display) and are absorbed by the scan
/// orchestrator as "no text".
pub trait CaptureProvider: Send + Sync {
    fn capture_region(&self, region: &CaptureRegion) -> Result<DynamicImage, String>;
}

/// Thread-safe wrapper for xcap::Monitor
///
/// SAFETY: This wrapper implements Send and Sync for Monitor, which is safe because:
/// 1. Monitor is essentially a handle to OS display resources
/// 2. On Windows, HMONITOR handles are thread-safe at the OS level
/// 3. All xcap operations internally handle synchronization
/// 4. We only use Monitor for read-only capture operations
struct SendSyncMonitor(Monitor);

// SAFETY: Monitor handles are thread-safe at the OS level.
unsafe impl Send for SendSyncMonitor {}

// SAFETY: Monitor operations through xcap are internally synchronized.
unsafe impl Sync for SendSyncMonitor {}

/// Screen capture service using xcap
pub struct ScreenCapture {
    monitor: SendSyncMonitor,
    scale_factor: f64,
}

impl ScreenCapture {
    /// Create a new screen capture instance using the primary monitor
    pub fn new() -> Result<Self, String> {
        let monitor = Monitor::all()
            .map_err(|e| format!("Failed to get monitors: {}", e))?
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .ok_or("No primary monitor found")?;

        // xcap returns physical pixels, so we need to detect the scale factor
        // On macOS Retina, the scale factor is typically 2.0
        let scale_factor = monitor.scale_factor().unwrap_or(1.0) as f64;

        tracing::debug!(
            scale_factor,
            physical_width = monitor.width().unwrap_or(0),
            physical_height = monitor.height().unwrap_or(0),
            "screen capture initialized"
        );

        Ok(Self {
            monitor: SendSyncMonitor(monitor),
            scale_factor,
        })
    }
}

impl CaptureProvider for ScreenCapture {
    /// Capture a specific region of the screen
    ///
    /// Region coordinates are in logical pixels, automatically converted
    /// to physical pixels.
    fn capture_region(&self, region: &CaptureRegion) -> Result<DynamicImage, String> {
        let rgba_image = self
            .monitor
            .0
            .capture_image()
            .map_err(|e| format!("Failed to capture screen: {}", e))?;

        let image = DynamicImage::ImageRgba8(rgba_image);

        // Apply scale factor to convert logical coordinates to physical pixels
        // On 125% scale: logical 100x100 -> physical 125x125
        let physical_x = (region.left as f64 * self.scale_factor) as u32;
        let physical_y = (region.top as f64 * self.scale_factor) as u32;
        let physical_width = (region.width as f64 * self.scale_factor) as u32;
        let physical_height = (region.height as f64 * self.scale_factor) as u32;

        tracing::trace!(
            left = region.left,
            top = region.top,
            physical_x,
            physical_y,
            "cropping capture to region"
        );

        // Crop to region (with bounds checking)
        let cropped = image.crop_imm(
            physical_x,
            physical_y,
            physical_width.min(image.width().saturating_sub(physical_x)),
            physical_height.min(image.height().saturating_sub(physical_y)),
        );

        Ok(cropped)
    }
}
