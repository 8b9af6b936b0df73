//! Analysis Response Handling
//!
//! Locates the JSON object inside generated text and shapes the final
//! report. Degraded reports carry an `error` entry in `analysis` and never
//! invent analysis content.
//!
//! ## Strategy
//!
//! JSON is located in this order, first hit wins:
//! 1. A ```` ```json ```` fenced block
//! 2. The whole text, when it starts with `{`
//! 3. The span from the first `{` to the last `}`
//!
//! The located text must parse to a JSON object.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::types::{GatewayError, Result};

/// Provider name reported when no backend produced the text
pub const NO_PROVIDER: &str = "none";

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

// =============================================================================
// JSON Location
// =============================================================================

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(JSON_FENCE)? + JSON_FENCE.len();
    let len = text[start..].find(FENCE)?;
    Some(text[start..start + len].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn locate_json(text: &str) -> Option<&str> {
    if let Some(block) = fenced_block(text) {
        return Some(block);
    }
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    brace_span(trimmed)
}

/// Extract the JSON object embedded in generated text
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    let candidate = locate_json(text)
        .ok_or_else(|| GatewayError::ResponseFormat("no JSON object found".to_string()))?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GatewayError::ResponseFormat(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
        Err(e) => {
            debug!(error = %e, "Located JSON failed to parse");
            Err(GatewayError::ResponseFormat(e.to_string()))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Analysis Report
// =============================================================================

/// How a report came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    /// Generated text parsed into an analysis object
    #[default]
    Complete,
    AllProvidersFailed,
    EmptyResponse,
    Unparseable,
}

/// Final result of one letter analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub outcome: ReportOutcome,
    /// Full structured analysis, or an object with an `error` entry
    pub analysis: Value,
    pub summary: String,
    pub actions_needed: Vec<String>,
    pub deadlines: Vec<String>,
    pub response_template: Option<String>,
    /// Adapter that produced the text, `none` when every adapter failed
    pub llm_provider: String,
}

impl AnalysisReport {
    /// Shape a report from a parsed analysis object
    pub fn from_analysis(analysis: Map<String, Value>, provider: &str) -> Self {
        let summary = analysis
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or("Analysis completed")
            .to_string();
        let actions_needed = string_list(analysis.get("actions_needed"));
        let deadlines = string_list(analysis.get("deadlines"));
        let response_template = analysis
            .get("response_template")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            outcome: ReportOutcome::Complete,
            analysis: Value::Object(analysis),
            summary,
            actions_needed,
            deadlines,
            response_template,
            llm_provider: provider.to_string(),
        }
    }

    /// Parse generated text into a report, degrading on blank or malformed text
    pub fn from_generated(text: &str, provider: &str) -> Self {
        if text.trim().is_empty() {
            return Self::empty_response(provider);
        }
        match extract_json_object(text) {
            Ok(analysis) => Self::from_analysis(analysis, provider),
            Err(e) => {
                debug!(provider, error = %e, "Generated text is not an analysis object");
                Self::unparseable(text, provider)
            }
        }
    }

    /// Every adapter was ineligible or failed
    pub fn all_providers_failed(err: &GatewayError) -> Self {
        Self {
            outcome: ReportOutcome::AllProvidersFailed,
            analysis: json!({
                "error": "All LLM providers failed",
                "details": err.to_string(),
            }),
            summary: "All AI services are currently unavailable. Please try again later."
                .to_string(),
            actions_needed: vec!["Please try again later when AI services are available".to_string()],
            deadlines: Vec::new(),
            response_template: None,
            llm_provider: NO_PROVIDER.to_string(),
        }
    }

    /// The winning adapter returned nothing usable
    pub fn empty_response(provider: &str) -> Self {
        Self {
            outcome: ReportOutcome::EmptyResponse,
            analysis: json!({ "error": "Empty response from AI" }),
            summary: "AI service returned empty response. Please try again.".to_string(),
            actions_needed: vec!["Please try uploading the file again".to_string()],
            deadlines: Vec::new(),
            response_template: None,
            llm_provider: provider.to_string(),
        }
    }

    /// Text was produced but holds no usable JSON object
    pub fn unparseable(raw: &str, provider: &str) -> Self {
        Self {
            outcome: ReportOutcome::Unparseable,
            analysis: json!({
                "raw_response": raw,
                "error": "Failed to parse AI response",
                "summary": "AI provided analysis but in unexpected format",
            }),
            summary: "AI analysis completed but response format was unexpected. Please try again."
                .to_string(),
            actions_needed: vec![
                "Please try uploading the file again".to_string(),
                "Check if the document contains clear German text".to_string(),
            ],
            deadlines: Vec::new(),
            response_template: None,
            llm_provider: provider.to_string(),
        }
    }

    /// True for every outcome other than `Complete`
    pub fn is_degraded(&self) -> bool {
        self.outcome != ReportOutcome::Complete
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_fence() {
        let text = "Here you go:\n```json\n{\"summary\": \"Jobcenter\"}\n```\nGood luck";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["summary"], "Jobcenter");
    }

    #[test]
    fn test_extract_bare_object() {
        let map = extract_json_object("  {\"a\": 1}  ").unwrap();
        assert_eq!(map["a"], 1);
    }

    #[test]
    fn test_extract_embedded_span() {
        let text = "Analysis follows {\"a\": {\"b\": 2}} end of analysis";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["a"]["b"], 2);
    }

    #[test]
    fn test_unclosed_fence_falls_through() {
        let text = "```json\n{\"a\": true}";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["a"], true);
    }

    #[test]
    fn test_extract_rejects_non_objects() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(GatewayError::ResponseFormat(_))
        ));
        assert!(matches!(
            extract_json_object("```json\n[1, 2]\n```"),
            Err(GatewayError::ResponseFormat(_))
        ));
        assert!(matches!(
            extract_json_object("{ broken"),
            Err(GatewayError::ResponseFormat(_))
        ));
    }

    #[test]
    fn test_report_from_analysis() {
        let text = r#"{
            "summary": "Invitation to an appointment",
            "actions_needed": ["Attend on 12.05.", "Bring passport"],
            "deadlines": ["12.05.2025"],
            "response_template": null,
            "urgency_level": "HIGH"
        }"#;
        let report = AnalysisReport::from_generated(text, "gemini");

        assert!(!report.is_degraded());
        assert_eq!(report.summary, "Invitation to an appointment");
        assert_eq!(report.actions_needed.len(), 2);
        assert_eq!(report.deadlines, vec!["12.05.2025"]);
        assert!(report.response_template.is_none());
        assert_eq!(report.analysis["urgency_level"], "HIGH");
        assert_eq!(report.llm_provider, "gemini");
    }

    #[test]
    fn test_error_field_in_analysis_is_not_degraded() {
        let text = r#"{"summary": "Payment reminder", "error": "wrong amount billed"}"#;
        let report = AnalysisReport::from_generated(text, "anthropic");

        assert!(!report.is_degraded());
        assert_eq!(report.outcome, ReportOutcome::Complete);
        assert_eq!(report.analysis["error"], "wrong amount billed");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "complete");
    }

    #[test]
    fn test_report_defaults_for_missing_fields() {
        let report = AnalysisReport::from_generated("{}", "cohere");
        assert_eq!(report.summary, "Analysis completed");
        assert!(report.actions_needed.is_empty());
        assert!(report.deadlines.is_empty());
    }

    #[test]
    fn test_blank_text_is_empty_response() {
        let report = AnalysisReport::from_generated("   \n", "mistral");
        assert_eq!(report.outcome, ReportOutcome::EmptyResponse);
        assert_eq!(report.analysis["error"], "Empty response from AI");
        assert_eq!(report.llm_provider, "mistral");
    }

    #[test]
    fn test_unparseable_keeps_raw_text() {
        let report = AnalysisReport::from_generated("Sorry, I cannot help.", "openai");
        assert_eq!(report.outcome, ReportOutcome::Unparseable);
        assert_eq!(report.analysis["raw_response"], "Sorry, I cannot help.");
        assert_eq!(report.actions_needed.len(), 2);
    }

    #[test]
    fn test_all_failed_report() {
        let err = GatewayError::AllProvidersFailed {
            attempted: 3,
            last_error: Some("[gemini:RATE_LIMIT] quota".to_string()),
        };
        let report = AnalysisReport::all_providers_failed(&err);

        assert_eq!(report.outcome, ReportOutcome::AllProvidersFailed);
        assert!(report.is_degraded());
        assert_eq!(report.llm_provider, NO_PROVIDER);
        assert_eq!(report.analysis["error"], "All LLM providers failed");
        assert!(
            report.analysis["details"]
                .as_str()
                .unwrap()
                .contains("[gemini:RATE_LIMIT] quota")
        );
        assert!(report.deadlines.is_empty());
    }
}
