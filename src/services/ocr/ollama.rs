use crate::models::config::OcrConfig;
use crate::services::ocr::engine::TextRecognizer;
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Recognition client for a local Ollama vision model
///
/// Sends the captured region as a base64 PNG to Ollama's chat endpoint and
/// returns the model's reply text. No request timeout is set: stopping
/// continuous mode never aborts an in-flight call, and a hung call stalls
/// only the scan that issued it.
pub struct OllamaClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    prompt: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &OcrConfig) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            prompt: config.prompt.clone(),
        })
    }

    /// Encode image to base64 PNG
    fn encode_image(image: &DynamicImage) -> Result<String, String> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| format!("Failed to encode image: {}", e))?;
        Ok(general_purpose::STANDARD.encode(&buffer))
    }
}

impl TextRecognizer for OllamaClient {
    fn recognize(&self, image: &DynamicImage) -> Result<String, String> {
        let image_base64 = Self::encode_image(image)?;
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &self.prompt,
                images: vec![image_base64],
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Ollama server error: {}", error_text));
        }

        let data: ChatResponse = response
            .json()
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(data.message.content.trim().to_string())
    }
}
