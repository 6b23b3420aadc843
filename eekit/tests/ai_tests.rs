//! AI boundary tests against a scripted provider

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eekit::ai::{
    AiError, AiProvider, Assistant, GenerationRequest, ImagePart, ImageTask, ModelInfo,
    ModelRole, SearchHit, SolutionOutcome,
};
use eekit::state::HistoryKind;
use eekit::{AppState, KvStore};

/// Replies with queued answers in order.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AiError::MissingApiKey))
    }

    fn model_info(&self, role: ModelRole) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: format!("{:?}", role).to_lowercase(),
            is_local: true,
            supports_json: true,
        }
    }
}

const SEARCH_ANSWER: &str = r#"```json
[
  {
    "name": "AMS1117-3.3",
    "manufacturer": "Advanced Monolithic Systems",
    "category": "LDO",
    "description": "1A low dropout regulator",
    "isDomestic": false,
    "specs": {"voltage": "3.3V", "package": "SOT-223"},
    "aiAdvice": {"pros": ["cheap"], "cons": ["1.1V dropout"]},
    "marketInfo": {"priceTrend": "Stable", "sources": []}
  },
  {
    "name": "HT7333",
    "manufacturer": "Holtek"
  }
]
```"#;

const SOLUTION_ANSWER: &str = r#"{
  "topologyName": "Synchronous Buck",
  "description": "12V to 5V 3A using an integrated switcher",
  "modules": ["Input filter", "Buck stage"],
  "bom": [
    {"mpn": "TPS54331", "mfg": "TI", "func": "Buck controller", "price": "$0.90"},
    {"mpn": "SRP1265A-100M", "mfg": "Bourns", "func": "Inductor"}
  ],
  "analysis": {"performance": 85, "cost": 70, "availability": 90, "tradeoff": "Cost vs. efficiency"}
}"#;

#[tokio::test]
async fn test_deep_search_mixes_complete_and_partial() {
    let provider = ScriptedProvider::new(vec![Ok(SEARCH_ANSWER.to_string())]);
    let assistant = Assistant::new(provider.clone());
    let mut state = AppState::default();

    let hits = assistant
        .deep_component_search(&mut state, "  3.3V LDO  ")
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    match &hits[0] {
        SearchHit::Complete(record) => {
            assert_eq!(record.name, "AMS1117-3.3");
            assert!(record.id.starts_with("ai_"));
            assert_eq!(record.datasheet_insights.parameter_table["package"], "SOT-223");
        }
        other => panic!("expected a complete record, got {:?}", other),
    }
    match &hits[1] {
        SearchHit::Partial { name, missing, .. } => {
            assert_eq!(name.as_deref(), Some("HT7333"));
            assert!(missing.iter().any(|m| m == "isDomestic"));
        }
        other => panic!("expected a partial record, got {:?}", other),
    }

    assert_eq!(state.credits(), 45);
    assert_eq!(state.search_history, vec!["3.3V LDO"]);
    let requests = provider.requests.lock().unwrap();
    assert!(requests[0].response_schema.is_some());
}

#[tokio::test]
async fn test_solution_generation_records_history() {
    let provider = ScriptedProvider::new(vec![Ok(SOLUTION_ANSWER.to_string())]);
    let assistant = Assistant::new(provider.clone());
    let mut state = AppState::default();

    let outcome = assistant
        .generate_hardware_solution(&mut state, "12V to 5V 3A")
        .await
        .unwrap();

    let SolutionOutcome::Complete(solution) = outcome else {
        panic!("expected a complete solution");
    };
    assert_eq!(solution.bom.len(), 2);
    assert_eq!(solution.analysis.performance, Some(85));
    assert_eq!(state.credits(), 35);
    assert_eq!(state.history[0].task, "Design: Synchronous Buck");
    assert!(state.history[0].content.starts_with("Generated Solution: **Synchronous Buck**"));

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].role, ModelRole::Reasoning);
    assert!(requests[0].thinking_budget.is_some());
}

#[tokio::test]
async fn test_out_of_range_score_is_partial_and_charged() {
    let answer = SOLUTION_ANSWER.replace("\"cost\": 70", "\"cost\": 170");
    let assistant = Assistant::new(ScriptedProvider::new(vec![Ok(answer)]));
    let mut state = AppState::default();

    let outcome = assistant
        .generate_hardware_solution(&mut state, "12V to 5V 3A")
        .await
        .unwrap();

    match outcome {
        SolutionOutcome::Partial { missing, .. } => {
            assert_eq!(missing, vec!["analysis.cost".to_string()]);
        }
        other => panic!("expected partial, got {:?}", other),
    }
    assert_eq!(state.credits(), 35);
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn test_service_failure_leaves_state_untouched() {
    let provider = ScriptedProvider::new(vec![Err(AiError::ApiError {
        status: 503,
        message: "overloaded".to_string(),
    })]);
    let assistant = Assistant::new(provider);
    let mut state = AppState::default();
    let before = state.clone();

    let err = assistant
        .analyze_image(
            &mut state,
            ImagePart::jpeg(vec![0xff, 0xd8, 0xff]),
            ImageTask::CircuitAnalysis.title(),
            ImageTask::CircuitAnalysis.instruction(),
        )
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.user_message().contains("try again"));
    assert_eq!(state, before);
}

#[tokio::test]
async fn test_image_analysis_persists_through_store() {
    let provider = ScriptedProvider::new(vec![Ok("Two 0603 capacitors and an LDO.".to_string())]);
    let assistant = Assistant::new(provider.clone());
    let store = KvStore::open_in_memory().unwrap();
    let mut state = AppState::load(&store).unwrap();

    assistant
        .analyze_image(
            &mut state,
            ImagePart::jpeg(vec![1, 2, 3]),
            "Component Recognition",
            ImageTask::ComponentRecognition.instruction(),
        )
        .await
        .unwrap();
    state.save(&store).unwrap();

    let reloaded = AppState::load(&store).unwrap();
    assert_eq!(reloaded.credits(), 49);
    assert_eq!(reloaded.history.len(), 1);
    assert_eq!(reloaded.history[0].kind, HistoryKind::Image);
    assert_eq!(reloaded.history[0].task, "Component Recognition");

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].role, ModelRole::Vision);
    assert_eq!(requests[0].parts.len(), 2);
}

#[tokio::test]
async fn test_credits_gate_each_operation() {
    let provider = ScriptedProvider::new(vec![Ok("ok".to_string()), Ok("ok".to_string())]);
    let assistant = Assistant::new(provider.clone());
    let mut state = AppState::default();
    state.account.credits = 2;

    assistant.chat(&mut state, "hello", None).await.unwrap();
    assert_eq!(state.credits(), 1);

    let err = assistant
        .discuss_news(&mut state, "impact?", "DRAM prices up 20%")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AiError::InsufficientCredits {
            required: 2,
            available: 1
        }
    ));
    assert_eq!(provider.requests.lock().unwrap().len(), 1);
}
