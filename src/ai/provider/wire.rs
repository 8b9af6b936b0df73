//! Wire Formats
//!
//! Each supported service speaks one of a handful of JSON shapes. A
//! [`WireFormat`] knows how to build its endpoint URL and request body and
//! where the generated text sits in the response.

use serde_json::{Value, json};

/// Generation parameters shared by every call
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// How the credential travels with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// Raw key in the named header
    Header(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// OpenAI-compatible `/chat/completions` (OpenAI, OpenRouter, Mistral)
    ChatCompletions,
    /// Anthropic `/messages`
    AnthropicMessages,
    /// Google `models/{model}:generateContent`
    GeminiGenerateContent,
    /// Cohere `/generate`
    CohereGenerate,
    /// Hugging Face hosted inference `models/{model}`
    HuggingFaceInference,
}

impl WireFormat {
    pub fn endpoint(self, api_base: &str, model: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            Self::ChatCompletions => format!("{}/chat/completions", base),
            Self::AnthropicMessages => format!("{}/messages", base),
            Self::GeminiGenerateContent => format!("{}/models/{}:generateContent", base, model),
            Self::CohereGenerate => format!("{}/generate", base),
            Self::HuggingFaceInference => format!("{}/{}", base, model),
        }
    }

    pub fn request_body(self, model: &str, prompt: &str, params: GenerationParams) -> Value {
        match self {
            Self::ChatCompletions => json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
            }),
            Self::AnthropicMessages => json!({
                "model": model,
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "messages": [{"role": "user", "content": prompt}],
            }),
            Self::GeminiGenerateContent => json!({
                "contents": [{"parts": [{"text": prompt}]}],
                "generationConfig": {
                    "maxOutputTokens": params.max_tokens,
                    "temperature": params.temperature,
                },
            }),
            Self::CohereGenerate => json!({
                "model": model,
                "prompt": prompt,
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
            }),
            // The hosted inference API takes the bare input only
            Self::HuggingFaceInference => json!({ "inputs": prompt }),
        }
    }

    /// JSON pointer to the generated text in a successful response
    pub fn text_pointer(self) -> &'static str {
        match self {
            Self::ChatCompletions => "/choices/0/message/content",
            Self::AnthropicMessages => "/content/0/text",
            Self::GeminiGenerateContent => "/candidates/0/content/parts/0/text",
            Self::CohereGenerate => "/generations/0/text",
            Self::HuggingFaceInference => "/0/generated_text",
        }
    }

    /// Extra headers the service requires besides auth
    pub fn extra_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::AnthropicMessages => &[("anthropic-version", "2023-06-01")],
            _ => &[],
        }
    }

    /// Generated text, trimmed. `None` when the field is missing, not a
    /// string, or blank.
    pub fn extract_text(self, body: &Value) -> Option<String> {
        body.pointer(self.text_pointer())
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: GenerationParams = GenerationParams {
        max_tokens: 2000,
        temperature: 0.7,
    };

    #[test]
    fn test_endpoints() {
        assert_eq!(
            WireFormat::ChatCompletions.endpoint("https://api.openai.com/v1/", "gpt"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            WireFormat::GeminiGenerateContent.endpoint(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-1.5-flash"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            WireFormat::HuggingFaceInference.endpoint(
                "https://api-inference.huggingface.co/models",
                "microsoft/DialoGPT-large"
            ),
            "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large"
        );
    }

    #[test]
    fn test_chat_body_carries_ceiling() {
        let body = WireFormat::ChatCompletions.request_body("gpt-3.5-turbo", "hi", PARAMS);
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 2000);
    }

    #[test]
    fn test_gemini_body_shape() {
        let body = WireFormat::GeminiGenerateContent.request_body("m", "hello", PARAMS);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
    }

    #[test]
    fn test_extract_text_per_format() {
        let chat = json!({"choices": [{"message": {"content": "  answer \n"}}]});
        assert_eq!(
            WireFormat::ChatCompletions.extract_text(&chat).as_deref(),
            Some("answer")
        );

        let anthropic = json!({"content": [{"type": "text", "text": "claude"}]});
        assert_eq!(
            WireFormat::AnthropicMessages.extract_text(&anthropic).as_deref(),
            Some("claude")
        );

        let cohere = json!({"generations": [{"text": "cohere"}]});
        assert_eq!(
            WireFormat::CohereGenerate.extract_text(&cohere).as_deref(),
            Some("cohere")
        );

        let hf = json!([{"generated_text": "hf"}]);
        assert_eq!(
            WireFormat::HuggingFaceInference.extract_text(&hf).as_deref(),
            Some("hf")
        );
    }

    #[test]
    fn test_extract_text_rejects_blank_or_missing() {
        let blank = json!({"choices": [{"message": {"content": "   "}}]});
        assert!(WireFormat::ChatCompletions.extract_text(&blank).is_none());

        let missing = json!({"choices": []});
        assert!(WireFormat::ChatCompletions.extract_text(&missing).is_none());

        let null_content = json!({"choices": [{"message": {"content": null}}]});
        assert!(WireFormat::ChatCompletions.extract_text(&null_content).is_none());
    }
}
