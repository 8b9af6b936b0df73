//! Built-in Backend Catalog
//!
//! Static description of every supported text-generation service: where its
//! credential lives, what a well-formed credential looks like, how to reach
//! it, and its default priority and rate limits.

use std::fmt;
use std::str::FromStr;

use super::wire::{AuthStyle, WireFormat};

/// Supported backend kinds, in default priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Anthropic,
    OpenRouter,
    Cohere,
    Mistral,
    HuggingFace,
}

impl ProviderKind {
    /// All kinds in registration order
    pub const ALL: [ProviderKind; 7] = [
        Self::Gemini,
        Self::OpenAi,
        Self::Anthropic,
        Self::OpenRouter,
        Self::Cohere,
        Self::Mistral,
        Self::HuggingFace,
    ];

    /// Registry key and config section name
    pub fn name(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::OpenRouter => "openrouter",
            Self::Cohere => "cohere",
            Self::Mistral => "mistral",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Environment variable holding the credential
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Cohere => "COHERE_API_KEY",
            Self::Mistral => "MISTRAL_API_KEY",
            Self::HuggingFace => "HUGGINGFACE_API_KEY",
        }
    }

    /// Sentinel value shipped in sample `.env` files
    pub fn placeholder(self) -> String {
        format!("your_{}_api_key_here", self.name())
    }

    /// Prefix a credential must carry, if the service issues recognizable keys
    pub fn required_prefix(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("sk-proj-"),
            Self::OpenRouter => Some("sk-or-"),
            _ => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-3-haiku-20240307",
            Self::OpenRouter => "mistralai/mistral-7b-instruct:free",
            Self::Cohere => "command-light",
            Self::Mistral => "mistral-tiny",
            Self::HuggingFace => "microsoft/DialoGPT-large",
        }
    }

    pub fn default_api_base(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Cohere => "https://api.cohere.ai/v1",
            Self::Mistral => "https://api.mistral.ai/v1",
            Self::HuggingFace => "https://api-inference.huggingface.co/models",
        }
    }

    /// Lower is tried first
    pub fn default_priority(self) -> u32 {
        match self {
            Self::Gemini => 1,
            Self::OpenAi => 2,
            Self::Anthropic => 3,
            Self::OpenRouter => 4,
            Self::Cohere => 5,
            Self::Mistral => 6,
            Self::HuggingFace => 7,
        }
    }

    /// (requests per minute, requests per day)
    pub fn default_rate_limits(self) -> (u32, u32) {
        match self {
            Self::Gemini => (15, 1000),
            Self::OpenAi => (3, 100),
            Self::Anthropic => (5, 200),
            Self::OpenRouter => (10, 500),
            Self::Cohere => (5, 100),
            Self::Mistral => (5, 100),
            Self::HuggingFace => (10, 1000),
        }
    }

    pub fn wire_format(self) -> WireFormat {
        match self {
            Self::OpenAi | Self::OpenRouter | Self::Mistral => WireFormat::ChatCompletions,
            Self::Anthropic => WireFormat::AnthropicMessages,
            Self::Gemini => WireFormat::GeminiGenerateContent,
            Self::Cohere => WireFormat::CohereGenerate,
            Self::HuggingFace => WireFormat::HuggingFaceInference,
        }
    }

    pub fn auth_style(self) -> AuthStyle {
        match self {
            Self::Gemini => AuthStyle::Header("x-goog-api-key"),
            Self::Anthropic => AuthStyle::Header("x-api-key"),
            _ => AuthStyle::Bearer,
        }
    }

    /// Structural credential check. `Err` carries the reason the credential
    /// is unusable.
    pub fn check_credential(self, credential: &str) -> Result<(), String> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(format!("{} is not set", self.env_var()));
        }
        if credential == self.placeholder() {
            return Err(format!("{} still holds the placeholder value", self.env_var()));
        }
        if let Some(prefix) = self.required_prefix()
            && !credential.starts_with(prefix)
        {
            return Err(format!(
                "{} must start with '{}'",
                self.env_var(),
                prefix
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown provider: {}. Supported: {}",
                    s,
                    Self::ALL.map(|k| k.name()).join(", ")
                )
            })
    }
}
