pub mod gemini;
pub mod prompts;
pub mod provider;
pub mod schema;
pub mod service;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompts::ImageTask;
pub use provider::{AiProvider, GenerationRequest, ImagePart, ModelInfo, ModelRole, Part};
pub use schema::{
    extract_json_payload, ComponentRecord, HardwareSolution, SearchHit, SolutionOutcome,
};
pub use service::Assistant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Missing API key or no provider available")]
    MissingApiKey,
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u32, available: u32 },
}

impl AiError {
    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AiError::RequestFailed(_) => {
                "Query failed. Please check your network or API configuration.".to_string()
            }
            AiError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                "The AI service rejected the API key.".to_string()
            }
            AiError::ApiError { .. } => {
                "AI service is temporarily unavailable. Please try again later.".to_string()
            }
            AiError::ParseError(_) | AiError::InvalidResponse(_) => {
                "Sorry, the AI returned an unreadable answer. Please try again.".to_string()
            }
            AiError::RateLimited { retry_after } => {
                format!("AI service is busy. Try again in {} seconds.", retry_after)
            }
            AiError::MissingApiKey => {
                "No AI API key configured. Set GEMINI_API_KEY or pass --api-key.".to_string()
            }
            AiError::InsufficientCredits { required, .. } => format!(
                "Insufficient credits. Action requires {} credits. Please top up.",
                required
            ),
        }
    }

    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::RequestFailed(_) | AiError::RateLimited { .. } => true,
            AiError::ApiError { status, .. } => *status >= 500,
            AiError::ParseError(_) | AiError::InvalidResponse(_) => true,
            AiError::MissingApiKey | AiError::InsufficientCredits { .. } => false,
        }
    }
}

/// Credit-metered AI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiOperation {
    AnalyzeImage,
    Chat,
    DiscussNews,
    DeepComponentSearch,
    GenerateHardwareSolution,
}

impl AiOperation {
    pub fn cost(&self) -> u32 {
        match self {
            AiOperation::AnalyzeImage => 1,
            AiOperation::Chat => 1,
            AiOperation::DiscussNews => 2,
            AiOperation::DeepComponentSearch => 5,
            AiOperation::GenerateHardwareSolution => 15,
        }
    }

    pub fn model_role(&self) -> ModelRole {
        match self {
            AiOperation::AnalyzeImage => ModelRole::Vision,
            AiOperation::Chat | AiOperation::DiscussNews | AiOperation::DeepComponentSearch => {
                ModelRole::Chat
            }
            AiOperation::GenerateHardwareSolution => ModelRole::Reasoning,
        }
    }
}
