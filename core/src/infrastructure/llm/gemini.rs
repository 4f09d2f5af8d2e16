// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Google Gemini LLM Provider Adapter
//
// Anti-Corruption Layer for the Generative Language API. Structured
// capabilities request `responseMimeType: application/json`, but the reply
// still goes through extraction since the model may wrap it in a code fence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};
use crate::domain::llm::{Capability, GenerationOptions, LlmError, LlmProvider, ProviderKind};
use crate::domain::pipeline_config::TimeoutConfig;
use crate::infrastructure::llm::extraction::parse_reply;
use crate::infrastructure::llm::prompts::{self, ReplyFormat, SEARCH_SYSTEM_PROMPT};
use crate::infrastructure::llm::transport::{
    failure_text, record_call, report_failure, send_json, unsupported_image, AdapterSettings, Outcome,
};

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Search and analysis favour precise output
const STRUCTURED_TEMPERATURE: f32 = 0.2;
const SEARCH_MAX_OUTPUT_TOKENS: u32 = 2000;

const NO_IMAGE_SUPPORT: &str = "Error: Gemini does not support image generation through this integration.";

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_model: String,
    timeouts: TimeoutConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url(GEMINI_ENDPOINT),
            api_key: settings.api_key,
            default_model: settings
                .default_model
                .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string()),
            timeouts: settings.timeouts,
        }
    }

    /// Gemini-specific defaults layered under the caller's options
    fn with_capability_defaults(options: &GenerationOptions, capability: Capability) -> GenerationOptions {
        let mut options = options.clone();
        if matches!(capability, Capability::Search | Capability::Analysis) && options.temperature.is_none() {
            options.temperature = Some(STRUCTURED_TEMPERATURE);
        }
        if capability == Capability::Search && options.max_tokens.is_none() {
            options.max_tokens = Some(SEARCH_MAX_OUTPUT_TOKENS);
        }
        options
    }

    async fn generate_content(
        &self,
        system: Option<&str>,
        prompt: &str,
        capability: Capability,
        options: &GenerationOptions,
        timeout_secs: u64,
    ) -> Result<String, LlmError> {
        let resolved = Self::with_capability_defaults(options, capability).resolve(capability, &self.default_model);
        let json_mode = capability != Capability::Text;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                temperature: resolved.temperature,
                max_output_tokens: resolved.max_tokens,
                response_mime_type: json_mode.then_some("application/json"),
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, resolved.model);
        let response: GenerateContentResponse = send_json(
            self.client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .header("Content-Type", "application/json")
                .json(&request),
            timeout_secs,
        )
        .await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> String {
        match self
            .generate_content(None, prompt, Capability::Text, options, self.timeouts.request_secs)
            .await
        {
            Ok(text) => {
                record_call(self.kind(), Capability::Text, Outcome::Ok);
                text
            }
            Err(e) => failure_text(self.kind(), Capability::Text, &e),
        }
    }

    async fn generate_image(&self, _prompt: &str, _options: &GenerationOptions) -> String {
        unsupported_image(self.kind(), NO_IMAGE_SUPPORT)
    }

    async fn search_web(&self, query: &str, options: &GenerationOptions) -> Vec<SearchResult> {
        let prompt = prompts::web_search(query, ReplyFormat::Envelope);
        match self
            .generate_content(Some(SEARCH_SYSTEM_PROMPT), &prompt, Capability::Search, options, self.timeouts.request_secs)
            .await
        {
            Ok(body) => parse_reply(self.kind(), Capability::Search, &body),
            Err(e) => {
                report_failure(self.kind(), Capability::Search, &e);
                Vec::new()
            }
        }
    }

    async fn analyze_competitor(
        &self,
        url: &str,
        analysis_type: &str,
        options: &GenerationOptions,
    ) -> CompetitorAnalysisResult {
        let prompt = prompts::competitor_analysis(url, analysis_type);
        match self
            .generate_content(None, &prompt, Capability::Analysis, options, self.timeouts.analysis_secs)
            .await
        {
            Ok(body) => parse_reply(self.kind(), Capability::Analysis, &body),
            Err(e) => {
                report_failure(self.kind(), Capability::Analysis, &e);
                CompetitorAnalysisResult::transport_failure(&e)
            }
        }
    }

    async fn generate_prompt_ideas(
        &self,
        analysis_data: &serde_json::Value,
        options: &GenerationOptions,
    ) -> Vec<PromptIdeaCandidate> {
        let num_ideas = options.resolve(Capability::PromptIdeas, &self.default_model).num_ideas;
        let prompt = prompts::prompt_ideas(analysis_data, num_ideas, ReplyFormat::Envelope);
        match self
            .generate_content(None, &prompt, Capability::PromptIdeas, options, self.timeouts.request_secs)
            .await
        {
            Ok(body) => parse_reply(self.kind(), Capability::PromptIdeas, &body),
            Err(e) => {
                report_failure(self.kind(), Capability::PromptIdeas, &e);
                vec![PromptIdeaCandidate::transport_failure(&e)]
            }
        }
    }
}
