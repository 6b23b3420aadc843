//! AI Assistant
//!
//! Credit-gated front door to an [`AiProvider`]. Every operation reserves its
//! cost before the request and refunds it if the request or parsing fails.

use std::sync::Arc;

use crate::ai::prompts::{self, DEFAULT_IMAGE_QUERY, FAE_SYSTEM_INSTRUCTION, SOLUTION_THINKING_BUDGET};
use crate::ai::provider::{AiProvider, GenerationRequest, ImagePart, ModelInfo};
use crate::ai::schema::{self, SearchHit, SolutionOutcome};
use crate::ai::{AiError, AiOperation};
use crate::state::{AppState, HistoryKind};

/// Number of query characters kept in a chat history title.
const CHAT_TITLE_CHARS: usize = 15;

pub struct Assistant {
    provider: Arc<dyn AiProvider>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model_info(&self, operation: AiOperation) -> ModelInfo {
        self.provider.model_info(operation.model_role())
    }

    /// Reserve credits, run the request, parse the answer; refund on any failure.
    async fn metered<T>(
        &self,
        state: &mut AppState,
        operation: AiOperation,
        request: GenerationRequest,
        parse: impl FnOnce(String) -> Result<T, AiError>,
    ) -> Result<T, AiError> {
        let cost = operation.cost();
        if !state.consume(cost) {
            return Err(AiError::InsufficientCredits {
                required: cost,
                available: state.credits(),
            });
        }

        tracing::info!(
            "Using AI provider: {} for {:?} ({} credits)",
            self.provider.name(),
            operation,
            cost
        );
        let outcome = match self.provider.generate(request).await {
            Ok(text) => parse(text),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            state.refund(cost);
            tracing::warn!("{:?} failed, refunded {} credits: {}", operation, cost, e);
        }
        outcome
    }

    /// Analyze an image following `instruction`. The result is added to
    /// history under `title`.
    pub async fn analyze_image(
        &self,
        state: &mut AppState,
        image: ImagePart,
        title: &str,
        instruction: &str,
    ) -> Result<String, AiError> {
        let request = GenerationRequest::new(AiOperation::AnalyzeImage.model_role())
            .image(image)
            .text(prompts::build_image_prompt(instruction));
        let text = self
            .metered(state, AiOperation::AnalyzeImage, request, Ok)
            .await?;
        state.record_history(HistoryKind::Image, title, text.clone(), None);
        Ok(text)
    }

    /// Component consultation chat, optionally with an attached image.
    pub async fn chat(
        &self,
        state: &mut AppState,
        query: &str,
        image: Option<ImagePart>,
    ) -> Result<String, AiError> {
        let mut request = GenerationRequest::new(AiOperation::Chat.model_role())
            .system(FAE_SYSTEM_INSTRUCTION);
        request = match image {
            Some(image) => {
                let text = if query.trim().is_empty() {
                    DEFAULT_IMAGE_QUERY
                } else {
                    query
                };
                request.text(text).image(image)
            }
            None => request.text(query),
        };

        let text = self.metered(state, AiOperation::Chat, request, Ok).await?;
        let title: String = query.chars().take(CHAT_TITLE_CHARS).collect();
        state.record_history(HistoryKind::Chat, format!("Consult: {}...", title), text.clone(), None);
        Ok(text)
    }

    /// Discuss a news item given its text as context. Grounded with web search.
    pub async fn discuss_news(
        &self,
        state: &mut AppState,
        query: &str,
        news_context: &str,
    ) -> Result<String, AiError> {
        let request = GenerationRequest::new(AiOperation::DiscussNews.model_role())
            .system(prompts::build_news_instruction(news_context))
            .text(query)
            .with_web_search();
        self.metered(state, AiOperation::DiscussNews, request, Ok)
            .await
    }

    /// Structured component search. The query is recorded in search history.
    pub async fn deep_component_search(
        &self,
        state: &mut AppState,
        query: &str,
    ) -> Result<Vec<SearchHit>, AiError> {
        let request = GenerationRequest::new(AiOperation::DeepComponentSearch.model_role())
            .text(prompts::build_search_prompt(query))
            .json_schema(prompts::component_schema());
        let hits = self
            .metered(state, AiOperation::DeepComponentSearch, request, |text| {
                schema::parse_search_hits(&text)
            })
            .await?;
        state.record_search(query);
        Ok(hits)
    }

    /// Generate a full hardware solution with BOM and scores.
    pub async fn generate_hardware_solution(
        &self,
        state: &mut AppState,
        requirement: &str,
    ) -> Result<SolutionOutcome, AiError> {
        let request = GenerationRequest::new(AiOperation::GenerateHardwareSolution.model_role())
            .text(prompts::build_solution_prompt(requirement))
            .json_schema(prompts::solution_schema())
            .thinking(SOLUTION_THINKING_BUDGET);
        let outcome = self
            .metered(state, AiOperation::GenerateHardwareSolution, request, |text| {
                schema::parse_solution(&text)
            })
            .await?;
        if let SolutionOutcome::Complete(solution) = &outcome {
            state.record_history(
                HistoryKind::Chat,
                format!("Design: {}", solution.topology_name),
                solution.summary(),
                None,
            );
        }
        Ok(outcome)
    }
}
