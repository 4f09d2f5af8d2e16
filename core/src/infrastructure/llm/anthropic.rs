// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Anthropic Claude LLM Provider Adapter
//
// Anti-Corruption Layer for the Anthropic Messages API. Claude has no JSON
// response mode here, so structured capabilities go through extraction.

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

pub const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const CLAUDE_TEXT_MODEL: &str = "claude-3-sonnet-20240229";
pub const CLAUDE_STRUCTURED_MODEL: &str = "claude-3-opus-20240229";

const NO_IMAGE_SUPPORT: &str = "Error: Claude does not support image generation natively.";

pub struct ClaudeAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Config override applied to every capability
    model_override: Option<String>,
    timeouts: TimeoutConfig,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url(ANTHROPIC_ENDPOINT),
            api_key: settings.api_key,
            model_override: settings.default_model,
            timeouts: settings.timeouts,
        }
    }

    fn default_model(&self, capability: Capability) -> &str {
        match (&self.model_override, capability) {
            (Some(model), _) => model,
            (None, Capability::Text) => CLAUDE_TEXT_MODEL,
            (None, _) => CLAUDE_STRUCTURED_MODEL,
        }
    }

    async fn complete(
        &self,
        system: Option<&str>,
        prompt: &str,
        capability: Capability,
        options: &GenerationOptions,
        timeout_secs: u64,
    ) -> Result<String, LlmError> {
        let resolved = options.resolve(capability, self.default_model(capability));
        let request = MessagesRequest {
            model: &resolved.model,
            max_tokens: resolved.max_tokens,
            temperature: Some(resolved.temperature),
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response: MessagesResponse = send_json(
            self.client
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("Content-Type", "application/json")
                .json(&request),
            timeout_secs,
        )
        .await?;

        let text: String = response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmProvider for ClaudeAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> String {
        match self
            .complete(None, prompt, Capability::Text, options, self.timeouts.request_secs)
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
        let prompt = prompts::web_search(query, ReplyFormat::Bare);
        match self
            .complete(Some(SEARCH_SYSTEM_PROMPT), &prompt, Capability::Search, options, self.timeouts.request_secs)
            .await
        {
            Ok(text) => parse_reply(self.kind(), Capability::Search, &text),
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
            .complete(None, &prompt, Capability::Analysis, options, self.timeouts.analysis_secs)
            .await
        {
            Ok(text) => parse_reply(self.kind(), Capability::Analysis, &text),
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
        let num_ideas = options
            .resolve(Capability::PromptIdeas, self.default_model(Capability::PromptIdeas))
            .num_ideas;
        let prompt = prompts::prompt_ideas(analysis_data, num_ideas, ReplyFormat::Bare);
        match self
            .complete(None, &prompt, Capability::PromptIdeas, options, self.timeouts.request_secs)
            .await
        {
            Ok(text) => parse_reply(self.kind(), Capability::PromptIdeas, &text),
            Err(e) => {
                report_failure(self.kind(), Capability::PromptIdeas, &e);
                vec![PromptIdeaCandidate::transport_failure(&e)]
            }
        }
    }
}
