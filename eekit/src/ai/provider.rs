//! AI Provider Trait
//!
//! Defines the request shape every generative backend accepts.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::ai::AiError;

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Which configured model serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Vision,
    Chat,
    Reasoning,
}

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImagePart {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::new(data, DEFAULT_IMAGE_MIME)
    }

    /// Guess the MIME type from a file extension, falling back to JPEG.
    pub fn from_extension(data: Vec<u8>, extension: Option<&str>) -> Self {
        let mime = match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            Some("heic") => "image/heic",
            _ => DEFAULT_IMAGE_MIME,
        };
        Self::new(data, mime)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// One piece of user content, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image(ImagePart),
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub role: ModelRole,
    pub parts: Vec<Part>,
    pub system_instruction: Option<String>,
    /// When set the response must be JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
    pub thinking_budget: Option<u32>,
    /// Allow the model to ground answers with web search.
    pub web_search: bool,
}

impl GenerationRequest {
    pub fn new(role: ModelRole) -> Self {
        Self {
            role,
            parts: Vec::new(),
            system_instruction: None,
            response_schema: None,
            thinking_budget: None,
            web_search: false,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    pub fn image(mut self, image: ImagePart) -> Self {
        self.parts.push(Part::Image(image));
        self
    }

    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn thinking(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// Information about an AI model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider name (e.g., "gemini")
    pub provider: String,

    /// Model name serving the given role
    pub model_name: String,

    /// Whether this is a local model
    pub is_local: bool,

    /// Whether the model supports schema-constrained JSON output
    pub supports_json: bool,
}

/// Common trait for all AI providers
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available/configured
    async fn is_available(&self) -> bool;

    /// Run one generation and return the concatenated response text
    async fn generate(&self, request: GenerationRequest) -> Result<String, AiError>;

    /// Get model info for a role
    fn model_info(&self, role: ModelRole) -> ModelInfo;
}
