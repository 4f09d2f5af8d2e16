// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// DeepSeek LLM Provider Adapter
//
// DeepSeek speaks the OpenAI chat completions dialect but without a reliable
// JSON mode, so structured replies are extracted from free text.

use async_trait::async_trait;

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};
use crate::domain::llm::{Capability, GenerationOptions, LlmError, LlmProvider, ProviderKind};
use crate::domain::pipeline_config::TimeoutConfig;
use crate::infrastructure::llm::chat_completions::{ChatCall, ChatCompletionsClient};
use crate::infrastructure::llm::extraction::parse_reply;
use crate::infrastructure::llm::prompts::{self, ReplyFormat, SEARCH_SYSTEM_PROMPT};
use crate::infrastructure::llm::transport::{
    failure_text, record_call, report_failure, unsupported_image, AdapterSettings, Outcome,
};

pub const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

const NO_IMAGE_SUPPORT: &str = "Error: DeepSeek does not support image generation through this integration.";

pub struct DeepSeekAdapter {
    chat: ChatCompletionsClient,
    default_model: String,
    timeouts: TimeoutConfig,
}

impl DeepSeekAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            chat: ChatCompletionsClient::new(settings.base_url(DEEPSEEK_ENDPOINT), settings.api_key),
            default_model: settings
                .default_model
                .unwrap_or_else(|| DEEPSEEK_DEFAULT_MODEL.to_string()),
            timeouts: settings.timeouts,
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
        let resolved = options.resolve(capability, &self.default_model);
        self.chat
            .complete(
                ChatCall {
                    system,
                    user: prompt,
                    model: &resolved.model,
                    temperature: Some(resolved.temperature),
                    max_tokens: Some(resolved.max_tokens),
                    json_mode: false,
                },
                timeout_secs,
            )
            .await
    }
}

#[async_trait]
impl LlmProvider for DeepSeekAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeepSeek
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
        let num_ideas = options.resolve(Capability::PromptIdeas, &self.default_model).num_ideas;
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
