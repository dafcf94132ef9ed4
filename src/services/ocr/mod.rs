pub mod engine;
pub mod normalizer;
pub mod ollama;

// Re-export main types
pub use engine::TextRecognizer;
pub use normalizer::extract_code;
pub use ollama::OllamaClient;
