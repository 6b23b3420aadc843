//! Typed views over the JSON the model returns.
//!
//! Responses are first stripped of markdown fences, then checked field by
//! field. A record missing required fields is kept as a `Partial` result with
//! the offending field names so callers can show what came back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ai::prompts::AI_DESIGN_NOTE;
use crate::ai::AiError;

/// Strip markdown code fences and surrounding prose from a JSON answer.
///
/// Returns the slice between the first `{`/`[` and the matching last `}`/`]`.
/// Text without any JSON delimiters is returned trimmed.
pub fn extract_json_payload(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        text = match after.rfind("```") {
            Some(end) => after[..end].trim(),
            None => after.trim(),
        };
    }

    let start = match (text.find('{'), text.find('[')) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    if let Some(start) = start {
        let close = if text[start..].starts_with('[') { ']' } else { '}' };
        if let Some(end) = text.rfind(close) {
            if end > start {
                return &text[start..=end];
            }
        }
    }
    text
}

fn parse_payload(text: &str) -> Result<Value, AiError> {
    let payload = extract_json_payload(text);
    serde_json::from_str(payload).map_err(|e| AiError::ParseError(format!("{}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Bool,
    Object,
    Array,
}

impl Kind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Bool => value.is_boolean(),
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
        }
    }
}

/// Names (prefixed with `prefix`) of required fields that are absent or of the wrong type.
fn check_fields(object: &Map<String, Value>, required: &[(&str, Kind)], prefix: &str) -> Vec<String> {
    required
        .iter()
        .filter(|(key, kind)| !object.get(*key).map(|v| kind.matches(v)).unwrap_or(false))
        .map(|(key, _)| format!("{}{}", prefix, key))
        .collect()
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

const COMPONENT_REQUIRED: &[(&str, Kind)] = &[
    ("name", Kind::String),
    ("manufacturer", Kind::String),
    ("description", Kind::String),
    ("isDomestic", Kind::Bool),
    ("specs", Kind::Object),
    ("aiAdvice", Kind::Object),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PinEntry {
    pub pin: String,
    pub func: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ratings {
    pub newbie_friendly: f64,
    pub competition_popularity: f64,
    pub failure_risk: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineeringInsights {
    pub ratings: Ratings,
    pub pitfalls: Vec<String>,
    pub best_fit: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskProfile {
    pub lifecycle: String,
    pub supply: String,
    #[serde(rename = "thermalEMC")]
    pub thermal_emc: String,
    pub second_source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiAdvice {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub precautions: Vec<String>,
    pub typical_apps: Vec<String>,
    pub risks: RiskProfile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTrend {
    Rising,
    Stable,
    Falling,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplySource {
    pub distributor: String,
    pub price: String,
    pub stock: String,
    pub is_authorized: bool,
    pub lead_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketInfo {
    pub price_trend: PriceTrend,
    pub buying_advice: String,
    pub sources: Vec<SupplySource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatasheetInsights {
    pub design_notes: String,
    pub parameter_table: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasheet_url: Option<String>,
}

/// A component as stored in favorites and returned by deep search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub description: String,
    pub is_domestic: bool,
    pub specs: BTreeMap<String, String>,
    pub pinout: Vec<PinEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub engineering_insights: EngineeringInsights,
    pub ai_advice: AiAdvice,
    pub datasheet_insights: DatasheetInsights,
    pub market_info: MarketInfo,
}

impl ComponentRecord {
    /// Fill the fields the model is not asked for: id, datasheet link and notes.
    pub fn enrich(mut self) -> Self {
        if self.id.is_empty() {
            self.id = generate_id();
        }
        self.datasheet_insights = DatasheetInsights {
            design_notes: AI_DESIGN_NOTE.to_string(),
            parameter_table: self.specs.clone(),
            datasheet_url: Some(datasheet_search_url(&self.name)),
        };
        self
    }
}

/// `ai_` followed by nine random hex characters.
pub fn generate_id() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    format!("ai_{}", &simple[..9])
}

pub fn datasheet_search_url(name: &str) -> String {
    let query: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '+' } else { c })
        .collect();
    format!("https://www.google.com/search?q={}+datasheet", query)
}

/// One entry of a deep search answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchHit {
    Complete(ComponentRecord),
    Partial {
        name: Option<String>,
        missing: Vec<String>,
        raw: Value,
    },
}

impl SearchHit {
    pub fn name(&self) -> Option<&str> {
        match self {
            SearchHit::Complete(record) => Some(&record.name),
            SearchHit::Partial { name, .. } => name.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SearchHit::Complete(_))
    }
}

fn validate_component(value: Value) -> SearchHit {
    let name = value.get("name").and_then(Value::as_str).map(str::to_string);
    let Some(object) = value.as_object() else {
        return SearchHit::Partial {
            name,
            missing: vec!["<object>".to_string()],
            raw: value,
        };
    };

    let missing = check_fields(object, COMPONENT_REQUIRED, "");
    if !missing.is_empty() {
        return SearchHit::Partial {
            name,
            missing,
            raw: value,
        };
    }

    match serde_json::from_value::<ComponentRecord>(value.clone()) {
        Ok(record) => SearchHit::Complete(record.enrich()),
        Err(e) => SearchHit::Partial {
            name,
            missing: vec![format!("<invalid: {}>", e)],
            raw: value,
        },
    }
}

/// Parse a deep search answer. A bare object is treated as a one-element list.
pub fn parse_search_hits(text: &str) -> Result<Vec<SearchHit>, AiError> {
    match parse_payload(text)? {
        Value::Array(items) => Ok(items.into_iter().map(validate_component).collect()),
        object @ Value::Object(_) => Ok(vec![validate_component(object)]),
        other => Err(AiError::InvalidResponse(format!(
            "expected a JSON array of components, got {}",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Hardware solutions
// ---------------------------------------------------------------------------

const SOLUTION_REQUIRED: &[(&str, Kind)] = &[
    ("topologyName", Kind::String),
    ("description", Kind::String),
    ("bom", Kind::Array),
    ("analysis", Kind::Object),
];

const BOM_REQUIRED: &[(&str, Kind)] = &[
    ("mpn", Kind::String),
    ("mfg", Kind::String),
    ("func", Kind::String),
];

const SCORES: &[&str] = &["performance", "cost", "availability"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BomLine {
    pub mpn: String,
    pub mfg: String,
    pub func: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<String>,
}

/// Scores are 0..=100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolutionAnalysis {
    pub performance: Option<u8>,
    pub cost: Option<u8>,
    pub availability: Option<u8>,
    pub tradeoff: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HardwareSolution {
    pub topology_name: String,
    pub description: String,
    pub modules: Vec<String>,
    pub bom: Vec<BomLine>,
    pub analysis: SolutionAnalysis,
}

impl HardwareSolution {
    /// Short chat-style summary of the solution.
    pub fn summary(&self) -> String {
        format!(
            "Generated Solution: **{}**\n\n{}",
            self.topology_name, self.description
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolutionOutcome {
    Complete(HardwareSolution),
    Partial { missing: Vec<String>, raw: Value },
}

fn solution_problems(object: &Map<String, Value>) -> Vec<String> {
    let mut problems = check_fields(object, SOLUTION_REQUIRED, "");

    if let Some(Value::Array(lines)) = object.get("bom") {
        for (i, line) in lines.iter().enumerate() {
            match line.as_object() {
                Some(line) => {
                    problems.extend(check_fields(line, BOM_REQUIRED, &format!("bom[{}].", i)))
                }
                None => problems.push(format!("bom[{}]", i)),
            }
        }
    }

    if let Some(Value::Object(analysis)) = object.get("analysis") {
        for score in SCORES {
            match analysis.get(*score) {
                None | Some(Value::Null) => {}
                Some(v) => {
                    let in_range = v.as_u64().map(|n| n <= 100).unwrap_or(false);
                    if !in_range {
                        problems.push(format!("analysis.{}", score));
                    }
                }
            }
        }
    }

    problems
}

/// Parse and validate a hardware solution answer.
pub fn parse_solution(text: &str) -> Result<SolutionOutcome, AiError> {
    let value = parse_payload(text)?;
    let Some(object) = value.as_object() else {
        return Err(AiError::InvalidResponse(
            "expected a JSON object for the solution".to_string(),
        ));
    };

    let missing = solution_problems(object);
    if !missing.is_empty() {
        return Ok(SolutionOutcome::Partial {
            missing,
            raw: value,
        });
    }

    match serde_json::from_value::<HardwareSolution>(value.clone()) {
        Ok(solution) => Ok(SolutionOutcome::Complete(solution)),
        Err(e) => Ok(SolutionOutcome::Partial {
            missing: vec![format!("<invalid: {}>", e)],
            raw: value,
        }),
    }
}
