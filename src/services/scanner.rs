use crate::models::config::AppConfig;
use crate::models::scan::ScanResult;
use crate::services::ocr::normalizer::extract_code;
use crate::services::ocr::TextRecognizer;
use crate::services::overlay::{OverlayState, OverlaySurface};
use crate::services::resolver::lookup_deposit;
use crate::services::screen_capture::CaptureProvider;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Shared mutable application state
///
/// All writes are short field-overwrites under brief lock scopes; when a
/// manual scan races the continuous driver, last-writer-wins.
pub struct ScannerShared {
    pub config: RwLock<AppConfig>,
    pub last_result: RwLock<ScanResult>,
    pub overlay: Mutex<OverlayState>,
    pub continuous: AtomicBool,
    pub border_visible: AtomicBool,
}

impl ScannerShared {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: RwLock::new(config),
            last_result: RwLock::new(ScanResult::default()),
            overlay: Mutex::new(OverlayState::new()),
            continuous: AtomicBool::new(false),
            border_visible: AtomicBool::new(true),
        }
    }
}

/// Scan orchestrator and background loop owner
///
/// Holds the capture/recognition/overlay collaborators and the handles of
/// the two background tasks (continuous driver, overlay ticker) so
/// shutdown can stop and join them deterministically.
pub struct DepositScanner {
    shared: Arc<ScannerShared>,
    capture: Arc<dyn CaptureProvider>,
    recognizer: Arc<dyn TextRecognizer>,
    surface: Arc<dyn OverlaySurface>,
    stopping: AtomicBool,
    driver: Mutex<Option<JoinHandle<()>>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl DepositScanner {
    pub fn new(
        shared: Arc<ScannerShared>,
        capture: Arc<dyn CaptureProvider>,
        recognizer: Arc<dyn TextRecognizer>,
        surface: Arc<dyn OverlaySurface>,
    ) -> Arc<Self> {
        Arc::new(Self {
            shared,
            capture,
            recognizer,
            surface,
            stopping: AtomicBool::new(false),
            driver: Mutex::new(None),
            ticker: Mutex::new(None),
        })
    }

    /// Run one capture -> recognize -> normalize -> resolve cycle
    ///
    /// Never fails past this boundary: collaborator errors degrade to an
    /// unresolved scan with empty text.
    pub async fn run_one_scan(&self) {
        let region = self.shared.config.read().region;
        let capture = Arc::clone(&self.capture);
        let recognizer = Arc::clone(&self.recognizer);

        // Capture and recognition are blocking calls; keep them off the
        // async workers.
        let recognized = tokio::task::spawn_blocking(move || -> Result<String, String> {
            let image = capture.capture_region(&region)?;
            recognizer.recognize(&image)
        })
        .await;

        let raw_text = match recognized {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "capture/recognition failed, treating as empty text");
                String::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "scan task failed, treating as empty text");
                String::new()
            }
        };

        let (code, code_raw) = extract_code(&raw_text);
        let info = lookup_deposit(code.as_deref());

        let result = ScanResult {
            code,
            code_raw,
            info: info.clone(),
            raw_text,
            scanned_at: Some(chrono::Local::now().to_rfc3339()),
        };

        match &result.info {
            Some(info) => tracing::info!(
                code = result.code.as_deref().unwrap_or(""),
                name = %info.name,
                deposits = info.deposits,
                "scan resolved"
            ),
            None => tracing::debug!(
                raw_text = %result.raw_text,
                "scan did not resolve"
            ),
        }

        *self.shared.last_result.write() = result;

        // A resolution updates the overlay label; an unresolved scan leaves
        // the previous label in place until it times out.
        let label = {
            let mut overlay = self.shared.overlay.lock();
            overlay
                .apply(info.as_ref(), Instant::now())
                .map(|text| text.to_string())
        };
        if let Some(label) = label {
            let color = self.shared.config.read().label_color.clone();
            self.surface.set_label(&label, &color);
        }
    }

    /// Flip continuous mode; returns the new state
    ///
    /// Turning it on starts the background driver. Turning it off lets the
    /// in-flight wait finish; no further scan is issued.
    pub fn toggle_continuous(self: &Arc<Self>) -> bool {
        let was_on = self.shared.continuous.fetch_xor(true, Ordering::SeqCst);
        let enabled = !was_on;
        tracing::info!(enabled, "continuous mode toggled");
        if enabled {
            self.start_driver();
        }
        enabled
    }

    pub fn continuous_enabled(&self) -> bool {
        self.shared.continuous.load(Ordering::SeqCst)
    }

    /// Spawn the continuous-scan driver; no-op while one is still running.
    /// Returns whether a new driver was spawned.
    pub(crate) fn start_driver(self: &Arc<Self>) -> bool {
        let mut slot = self.driver.lock();
        if slot
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
        {
            tracing::debug!("continuous driver already running, ignoring start");
            return false;
        }

        let scanner = Arc::clone(self);
        *slot = Some(tokio::spawn(async move {
            tracing::debug!("continuous driver started");
            while scanner.shared.continuous.load(Ordering::SeqCst) {
                scanner.run_one_scan().await;
                let interval = scanner.shared.config.read().scan.interval_secs;
                sleep(Duration::from_secs(interval)).await;
            }
            tracing::debug!("continuous driver stopped");
        }));
        true
    }

    /// Start the overlay timeout ticker
    ///
    /// Checks the label deadline on the configured cadence and pushes a
    /// cleared label to the surface when it expires. Runs until shutdown.
    pub fn start_ticker(self: &Arc<Self>) {
        let mut slot = self.ticker.lock();
        if slot
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
        {
            return;
        }

        let scanner = Arc::clone(self);
        *slot = Some(tokio::spawn(async move {
            while !scanner.stopping.load(Ordering::SeqCst) {
                let (check_ms, timeout_secs, color) = {
                    let config = scanner.shared.config.read();
                    (
                        config.scan.label_check_ms,
                        config.scan.label_timeout_secs,
                        config.label_color.clone(),
                    )
                };
                sleep(Duration::from_millis(check_ms)).await;

                let cleared = scanner
                    .shared
                    .overlay
                    .lock()
                    .clear_if_expired(Instant::now(), Duration::from_secs(timeout_secs));
                if cleared {
                    tracing::debug!("overlay label cleared after inactivity");
                    scanner.surface.set_label("", &color);
                }
            }
        }));
    }

    /// Stop both background tasks and wait for them to finish
    pub async fn shutdown(&self) {
        self.shared.continuous.store(false, Ordering::SeqCst);
        self.stopping.store(true, Ordering::SeqCst);

        let driver = self.driver.lock().take();
        if let Some(handle) = driver {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "continuous driver did not shut down cleanly");
            }
        }

        let ticker = self.ticker.lock().take();
        if let Some(handle) = ticker {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "overlay ticker did not shut down cleanly");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::CaptureRegion;
    use crate::models::scan::DepositResolution;
    use image::DynamicImage;
    use std::sync::atomic::AtomicUsize;

    struct FakeCapture {
        fail: bool,
    }

    impl CaptureProvider for FakeCapture {
        fn capture_region(&self, _region: &CaptureRegion) -> Result<DynamicImage, String> {
            if self.fail {
                Err("no display".to_string())
            } else {
                Ok(DynamicImage::new_rgba8(4, 4))
            }
        }
    }

    struct FakeRecognizer {
        text: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FakeRecognizer {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(error: &str) -> Arc<Self> {
            Arc::new(Self {
                text: Err(error.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        labels: Mutex<Vec<(String, String)>>,
    }

    impl OverlaySurface for RecordingSurface {
        fn set_label(&self, text: &str, color: &str) {
            self.labels.lock().push((text.to_string(), color.to_string()));
        }

        fn set_region_bounds(&self, _region: &CaptureRegion) {}

        fn set_border_visible(&self, _visible: bool) {}
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        // Keep loop tests fast
        config.scan.interval_secs = 0;
        config.scan.label_check_ms = 10;
        config
    }

    fn build_scanner(
        capture_fails: bool,
        recognizer: Arc<FakeRecognizer>,
    ) -> (Arc<DepositScanner>, Arc<ScannerShared>, Arc<RecordingSurface>) {
        let shared = Arc::new(ScannerShared::new(test_config()));
        let surface = Arc::new(RecordingSurface::default());
        let scanner = DepositScanner::new(
            Arc::clone(&shared),
            Arc::new(FakeCapture {
                fail: capture_fails,
            }),
            recognizer,
            Arc::clone(&surface) as Arc<dyn OverlaySurface>,
        );
        (scanner, shared, surface)
    }

    #[tokio::test]
    async fn test_scan_resolves_and_updates_state() {
        let (scanner, shared, surface) =
            build_scanner(false, FakeRecognizer::returning("Code: 3400 detected"));

        scanner.run_one_scan().await;

        let result = shared.last_result.read().clone();
        assert_eq!(result.code.as_deref(), Some("3400"));
        assert_eq!(result.code_raw.as_deref(), Some("3400"));
        assert_eq!(result.raw_text, "Code: 3400 detected");
        assert!(result.scanned_at.is_some());

        let info = result.info.expect("should resolve");
        assert_eq!(info.name, "C-Type");
        assert_eq!(info.deposits, 2);

        assert_eq!(shared.overlay.lock().text(), "C-Type x2");
        let labels = surface.labels.lock();
        assert_eq!(labels.as_slice(), &[("C-Type x2".to_string(), "yellow".to_string())]);
    }

    #[tokio::test]
    async fn test_recognition_failure_degrades_to_unresolved() {
        let (scanner, shared, surface) = build_scanner(false, FakeRecognizer::failing("model offline"));

        scanner.run_one_scan().await;

        let result = shared.last_result.read().clone();
        assert_eq!(result.raw_text, "");
        assert!(result.code.is_none());
        assert!(result.info.is_none());

        // No label was pushed
        assert!(surface.labels.lock().is_empty());
    }

    #[tokio::test]
    async fn test_capture_failure_degrades_to_unresolved() {
        let recognizer = FakeRecognizer::returning("3400");
        let (scanner, shared, _surface) = build_scanner(true, Arc::clone(&recognizer));

        scanner.run_one_scan().await;

        // Recognition was never reached
        assert_eq!(recognizer.call_count(), 0);
        assert!(shared.last_result.read().info.is_none());
    }

    #[tokio::test]
    async fn test_unresolved_scan_keeps_previous_label() {
        let (scanner, shared, _surface) =
            build_scanner(false, FakeRecognizer::returning("Code: 3400 detected"));
        scanner.run_one_scan().await;
        assert_eq!(shared.overlay.lock().text(), "C-Type x2");

        // Pretend a later scan misses: label must persist
        let resolution: Option<&DepositResolution> = None;
        assert!(shared
            .overlay
            .lock()
            .apply(resolution, Instant::now())
            .is_none());
        assert_eq!(shared.overlay.lock().text(), "C-Type x2");
    }

    #[tokio::test]
    async fn test_each_scan_overwrites_last_result() {
        let (scanner, shared, _surface) =
            build_scanner(false, FakeRecognizer::returning("9999999"));

        scanner.run_one_scan().await;
        let first = shared.last_result.read().clone();
        assert_eq!(first.code.as_deref(), Some("9999999"));
        assert!(first.info.is_none());

        scanner.run_one_scan().await;
        let second = shared.last_result.read().clone();
        assert_eq!(second.code.as_deref(), Some("9999999"));
    }

    #[tokio::test]
    async fn test_toggle_starts_and_stops_driver() {
        let recognizer = FakeRecognizer::returning("Code: 3400 detected");
        let (scanner, _shared, _surface) = build_scanner(false, Arc::clone(&recognizer));

        assert!(scanner.toggle_continuous());
        assert!(scanner.continuous_enabled());

        // Starting again while the driver is alive is a no-op
        assert!(!scanner.start_driver());

        // Let the driver run a few cycles
        sleep(Duration::from_millis(50)).await;
        assert!(recognizer.call_count() > 0);

        assert!(!scanner.toggle_continuous());
        scanner.shutdown().await;

        // No further scans after the driver stopped
        let settled = recognizer.call_count();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(recognizer.call_count(), settled);
    }

    #[tokio::test]
    async fn test_ticker_clears_expired_label() {
        let recognizer = FakeRecognizer::returning("Code: 3400 detected");
        let (scanner, shared, surface) = build_scanner(false, recognizer);
        // Expire immediately once any time has passed
        shared.config.write().scan.label_timeout_secs = 0;

        scanner.run_one_scan().await;
        assert!(shared.overlay.lock().is_showing());

        scanner.start_ticker();
        sleep(Duration::from_millis(100)).await;

        assert!(!shared.overlay.lock().is_showing());
        let labels = surface.labels.lock().clone();
        assert_eq!(labels.last(), Some(&("".to_string(), "yellow".to_string())));

        drop(labels);
        scanner.shutdown().await;
    }
}
