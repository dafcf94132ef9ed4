use image::DynamicImage;

/// Text recognizer contract - abstraction over the external vision model
///
/// Implementations return whatever free-form text the model produced for
/// the capture; the scan pipeline extracts a code from it downstream.
/// Recognition accuracy is entirely the implementation's problem.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text from image
    fn recognize(&self, image: &DynamicImage) -> Result<String, String>;
}
