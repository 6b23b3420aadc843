use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_IMAGE_QUERY: &str = "Please analyze this image.";

pub const FAE_SYSTEM_INSTRUCTION: &str = "You are a senior FAE (Field Application Engineer). \
Your task is to help hardware engineers and sales staff with component selection, technical \
parameter comparison, and finding alternatives. Your answers should be professional, accurate, \
and objective. If the user uploads an image, please analyze it. Reply in English.";

/// Placeholder design note attached to AI search results.
pub const AI_DESIGN_NOTE: &str = "AI Generated Summary. Please refer to official PDF.";

/// Thinking budget for hardware solution generation.
pub const SOLUTION_THINKING_BUDGET: u32 = 16384;

/// Preset analysis tasks for image uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ImageTask {
    #[default]
    ComponentRecognition,
    CircuitAnalysis,
    WaveformDiagnosis,
    DesignOptimization,
    PcbReview,
    Alternatives,
}

impl ImageTask {
    pub const ALL: [ImageTask; 6] = [
        ImageTask::ComponentRecognition,
        ImageTask::CircuitAnalysis,
        ImageTask::WaveformDiagnosis,
        ImageTask::DesignOptimization,
        ImageTask::PcbReview,
        ImageTask::Alternatives,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ImageTask::ComponentRecognition => "Component Recognition",
            ImageTask::CircuitAnalysis => "Circuit Analysis",
            ImageTask::WaveformDiagnosis => "Waveform Diagnosis",
            ImageTask::DesignOptimization => "Design Optimization",
            ImageTask::PcbReview => "PCB Review",
            ImageTask::Alternatives => "Alternatives",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            ImageTask::ComponentRecognition => "Identify the electronic components in the image, provide MPN suggestions, package types, and key specs.",
            ImageTask::CircuitAnalysis => "Analyze the schematic logic, explain the workflow, evaluate design rationality, and suggest improvements.",
            ImageTask::WaveformDiagnosis => "Analyze the oscilloscope/logic analyzer waveform, judge signal quality, and identify overshoot or timing issues.",
            ImageTask::DesignOptimization => "Identify components and recommend more cost-effective or supply-chain stable alternatives.",
            ImageTask::PcbReview => "Review the PCB layout/routing, evaluate thermal design, signal integrity, and EMI suppression.",
            ImageTask::Alternatives => "Find 3 Pin-to-Pin or functionally compatible high-reliability alternatives for the core chips in the image.",
        }
    }
}

impl fmt::Display for ImageTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ImageTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        ImageTask::ALL
            .into_iter()
            .find(|t| t.title().to_ascii_lowercase().replace(' ', "-") == wanted)
            .ok_or_else(|| format!("unknown image task: {}", s))
    }
}

pub fn build_image_prompt(task: &str) -> String {
    format!(
        r#"You are an expert hardware engineer assistant. Based on the uploaded image, perform the following task: {}.
Please provide professional analysis, including component identification, circuit principles, potential risks, or BOM alternatives.
Reply in English."#,
        task
    )
}

pub fn build_news_instruction(news_context: &str) -> String {
    format!(
        r#"You are a professional tech commentator and electronics engineer. Based on the following news content, discuss with the user:

--- News Context ---
{}
--- End Context ---

Provide deep insights, technical explanations, or trend predictions. Use Google Search for latest background info if needed. Reply in English. Use Markdown."#,
        news_context
    )
}

pub fn build_search_prompt(query: &str) -> String {
    format!(
        r#"User is searching for a component or has a requirement: "{}".
Analyze this requirement and return 1-3 best matching electronic components.
If it's a specific MPN, return detailed data for that MPN.
If it's a description (e.g., "3.3V LDO"), recommend popular high-value parts.

Important:
1. Accurately judge if a component is an "Asian Source" or "Domestic" to China (isDomestic).
2. Use real placeholder images or logo URLs.
3. Generate full specs summary, pinout, and market analysis.
4. All text fields must be in English."#,
        query
    )
}

pub fn build_solution_prompt(requirement: &str) -> String {
    format!(
        "Generate a complete technical solution based on the following hardware requirements: {}. Reply in English.",
        requirement
    )
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

/// Response schema for component search: an array of component records.
pub fn component_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "Full Part Number (MPN)" },
                "manufacturer": { "type": "STRING" },
                "category": { "type": "STRING" },
                "description": { "type": "STRING" },
                "isDomestic": {
                    "type": "BOOLEAN",
                    "description": "True if manufacturer is from Asia/China (Low Cost Source)"
                },
                "specs": {
                    "type": "OBJECT",
                    "properties": {
                        "core": { "type": "STRING" },
                        "voltage": { "type": "STRING" },
                        "package": { "type": "STRING" },
                        "temp": { "type": "STRING" }
                    }
                },
                "pinout": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "pin": { "type": "STRING" },
                            "func": { "type": "STRING" },
                            "desc": { "type": "STRING" }
                        }
                    }
                },
                "engineeringInsights": {
                    "type": "OBJECT",
                    "properties": {
                        "ratings": {
                            "type": "OBJECT",
                            "properties": {
                                "newbieFriendly": { "type": "NUMBER" },
                                "competitionPopularity": { "type": "NUMBER" },
                                "failureRisk": { "type": "NUMBER" }
                            }
                        },
                        "pitfalls": string_array(),
                        "bestFit": string_array()
                    }
                },
                "aiAdvice": {
                    "type": "OBJECT",
                    "properties": {
                        "pros": string_array(),
                        "cons": string_array(),
                        "risks": {
                            "type": "OBJECT",
                            "properties": {
                                "lifecycle": { "type": "STRING" },
                                "supply": { "type": "STRING" },
                                "thermalEMC": { "type": "STRING" },
                                "secondSource": { "type": "STRING" }
                            }
                        }
                    }
                },
                "marketInfo": {
                    "type": "OBJECT",
                    "properties": {
                        "priceTrend": { "type": "STRING", "enum": ["Rising", "Stable", "Falling"] },
                        "buyingAdvice": { "type": "STRING" },
                        "sources": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "distributor": { "type": "STRING" },
                                    "price": { "type": "STRING" },
                                    "stock": { "type": "STRING" },
                                    "isAuthorized": { "type": "BOOLEAN" },
                                    "leadTime": { "type": "STRING" }
                                }
                            }
                        }
                    }
                }
            },
            "required": ["name", "manufacturer", "description", "isDomestic", "specs", "aiAdvice"]
        }
    })
}

/// Response schema for hardware solution generation.
pub fn solution_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topologyName": { "type": "STRING", "description": "Name of the circuit topology" },
            "description": { "type": "STRING", "description": "Brief description of the solution" },
            "modules": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key functional modules"
            },
            "bom": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "mpn": { "type": "STRING", "description": "Part Number" },
                        "mfg": { "type": "STRING", "description": "Manufacturer" },
                        "func": { "type": "STRING", "description": "Function" },
                        "price": { "type": "STRING", "description": "Estimated Unit Price (USD)" },
                        "stock": { "type": "STRING", "description": "Availability Status" }
                    },
                    "required": ["mpn", "mfg", "func"]
                }
            },
            "analysis": {
                "type": "OBJECT",
                "properties": {
                    "performance": { "type": "INTEGER", "description": "Performance Score (0-100)" },
                    "cost": { "type": "INTEGER", "description": "Cost Efficiency Score (0-100)" },
                    "availability": { "type": "INTEGER", "description": "Supply Stability Score (0-100)" },
                    "tradeoff": { "type": "STRING", "description": "Trade-off Analysis" }
                }
            }
        },
        "required": ["topologyName", "description", "bom", "analysis"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt_contains_task() {
        let prompt = build_image_prompt(ImageTask::PcbReview.instruction());
        assert!(prompt.contains("thermal design"));
        assert!(prompt.ends_with("Reply in English."));
    }

    #[test]
    fn test_image_task_parse() {
        assert_eq!("pcb-review".parse::<ImageTask>().unwrap(), ImageTask::PcbReview);
        assert_eq!(
            "Component Recognition".parse::<ImageTask>().unwrap(),
            ImageTask::ComponentRecognition
        );
        assert!("astrology".parse::<ImageTask>().is_err());
    }

    #[test]
    fn test_schemas_list_required_fields() {
        let required = &component_schema()["items"]["required"];
        assert_eq!(required.as_array().unwrap().len(), 6);
        let required = &solution_schema()["required"];
        assert!(required.as_array().unwrap().contains(&json!("bom")));
    }

    #[test]
    fn test_news_instruction_wraps_context() {
        let text = build_news_instruction("TSMC raises prices");
        assert!(text.contains("--- News Context ---\nTSMC raises prices\n--- End Context ---"));
    }
}
