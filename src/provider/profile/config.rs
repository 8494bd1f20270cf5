use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mistral models that support function calling.
const MISTRAL_FUNCTION_CALLING_MODELS: &[&str] = &[
    "mistral-large-latest",
    "mistral-large-2407",
    "mistral-large-2402",
    "mistral-small-latest",
    "open-mixtral-8x22b",
    "open-mistral-nemo",
    "codestral-latest",
];

/// Model backend selected for the console's agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProviderConfig {
    /// Provider type.
    pub provider: ProviderType,

    /// Model identifier.
    pub model: String,

    /// Base URL or endpoint provider specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure-openai")]
    AzureOpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "gemini")]
    Gemini,
}

impl ProviderType {
    pub fn slug(self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::AzureOpenAI => "azure-openai",
            ProviderType::Anthropic => "anthropic",
            ProviderType::Groq => "groq",
            ProviderType::Ollama => "ollama",
            ProviderType::Mistral => "mistral",
            ProviderType::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProviderType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderType::OpenAI),
            "azure-openai" => Ok(ProviderType::AzureOpenAI),
            "anthropic" => Ok(ProviderType::Anthropic),
            "groq" => Ok(ProviderType::Groq),
            "ollama" => Ok(ProviderType::Ollama),
            "mistral" => Ok(ProviderType::Mistral),
            "gemini" => Ok(ProviderType::Gemini),
            _ => Err(SyncError::Config(format!(
                "Invalid provider type: {}. Must be openai, azure-openai, anthropic, groq, ollama, mistral, or gemini",
                s
            ))),
        }
    }
}

/// Whether `model` served by `provider` can drive multi-agent mode.
pub fn supports_multi_agent(provider: ProviderType, model: &str) -> bool {
    match provider {
        ProviderType::OpenAI
        | ProviderType::AzureOpenAI
        | ProviderType::Groq
        | ProviderType::Ollama => true,
        ProviderType::Mistral => MISTRAL_FUNCTION_CALLING_MODELS.contains(&model),
        ProviderType::Anthropic | ProviderType::Gemini => false,
    }
}

impl ModelProviderConfig {
    pub fn new(provider: ProviderType, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn supports_multi_agent(&self) -> bool {
        supports_multi_agent(self.provider, &self.model)
    }

    pub fn endpoint_url_is_valid(endpoint: &str) -> bool {
        let endpoint = endpoint.trim();
        let Some(rest) = endpoint
            .strip_prefix("http://")
            .or_else(|| endpoint.strip_prefix("https://"))
        else {
            return false;
        };

        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return false;
        }

        let authority = rest.split('/').next().unwrap_or_default();
        if authority.is_empty() {
            return false;
        }

        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        let host = if host_port.starts_with('[') {
            let Some(end_bracket) = host_port.find(']') else {
                return false;
            };
            &host_port[1..end_bracket]
        } else {
            host_port.split(':').next().unwrap_or_default()
        };

        if host.is_empty() {
            return false;
        }

        // Bare container names such as `ollama` are valid hosts here.
        host.parse::<std::net::IpAddr>().is_ok()
            || host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    }

    /// Validate provider configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if let Some(base_url) = &self.base_url {
            if !Self::endpoint_url_is_valid(base_url) {
                return Err(format!("Invalid base URL: {}", base_url));
            }
        }

        Ok(())
    }
}
