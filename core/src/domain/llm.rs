// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provider capability interface for the content pipeline.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Uniform contract over heterogeneous LLM backends

// LLM Provider Domain Interface (Anti-Corruption Layer)
//
// Every backend implements all five capabilities. A backend that lacks a
// capability still answers with a degraded value of the declared shape, so
// callers never probe for support.
//
// Implementations in infrastructure/llm/ directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};

/// Domain interface for LLM providers.
///
/// No method returns `Result`: transport and extraction failures are folded
/// into degraded values at the adapter boundary.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Which backend this instance talks to
    fn kind(&self) -> ProviderKind;

    /// Free-form text completion. Failures come back as `"Error: <message>"`.
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> String;

    /// Image generation. Returns a URL, or an `"Error: ..."` description when
    /// the backend failed or has no image capability.
    async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> String;

    /// Web search. Empty on any failure.
    async fn search_web(&self, query: &str, options: &GenerationOptions) -> Vec<SearchResult>;

    /// Structured competitor analysis of the content at `url`
    async fn analyze_competitor(
        &self,
        url: &str,
        analysis_type: &str,
        options: &GenerationOptions,
    ) -> CompetitorAnalysisResult;

    /// Prompt ideas derived from a stored analysis
    async fn generate_prompt_ideas(
        &self,
        analysis_data: &serde_json::Value,
        options: &GenerationOptions,
    ) -> Vec<PromptIdeaCandidate>;
}

/// The supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Claude,
    Gemini,
    DeepSeek,
    Manus,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::Claude,
        ProviderKind::Gemini,
        ProviderKind::DeepSeek,
        ProviderKind::Manus,
    ];

    /// Canonical lowercase name, also used as the credential lookup key
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Manus => "manus",
        }
    }

    /// Environment variable consulted for the API key when config has none
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderKind::Manus => "MANUS_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| ConfigurationError::UnknownProvider(s.to_string()))
    }
}

/// The five capabilities of [`LlmProvider`], used to pick option defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Text,
    Image,
    Search,
    Analysis,
    PromptIdeas,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Text => "text",
            Capability::Image => "image",
            Capability::Search => "search",
            Capability::Analysis => "analysis",
            Capability::PromptIdeas => "prompt_ideas",
        }
    }

    pub fn default_max_tokens(&self) -> u32 {
        match self {
            Capability::Text => 1000,
            Capability::Search => 1500,
            Capability::Image => 0,
            Capability::Analysis | Capability::PromptIdeas => 2000,
        }
    }
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "standard";
pub const DEFAULT_NUM_IDEAS: u32 = 5;

/// Caller-supplied generation options.
///
/// Every field is optional; [`GenerationOptions::resolve`] applies the
/// per-capability defaults. Unknown keys are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Provider-specific model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default, alias = "max_output_tokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Image dimensions, e.g. "1024x1024"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Image quality, e.g. "standard" or "hd"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,

    /// Number of prompt ideas to request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_ideas: Option<u32>,
}

impl GenerationOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_num_ideas(mut self, num_ideas: u32) -> Self {
        self.num_ideas = Some(num_ideas);
        self
    }

    /// Fill every unset field with the default for `capability`.
    pub fn resolve(&self, capability: Capability, default_model: &str) -> ResolvedOptions {
        ResolvedOptions {
            model: self
                .model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_model.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self
                .max_tokens
                .unwrap_or_else(|| capability.default_max_tokens()),
            size: self
                .size
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            quality: self
                .quality
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_QUALITY.to_string()),
            num_ideas: self.num_ideas.unwrap_or(DEFAULT_NUM_IDEAS),
        }
    }
}

/// Options with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub size: String,
    pub quality: String,
    pub num_ideas: u32,
}

/// Transport-level failures inside a provider adapter.
///
/// Never crosses [`LlmProvider`]; adapters convert it to a degraded value.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API returned status code {status}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

impl LlmError {
    /// Map a reqwest failure, keeping timeouts distinguishable
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

/// Raised before any remote call; always propagated to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Unsupported provider: {0}")]
    UnknownProvider(String),

    #[error("No API key configured for provider: {0}")]
    MissingCredential(String),

    #[error("Provider is disabled in configuration: {0}")]
    ProviderDisabled(String),

    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
