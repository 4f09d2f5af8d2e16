// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI LLM Provider Adapter
//
// Anti-Corruption Layer for the OpenAI API. Search runs in native JSON mode.
// Analysis and prompt ideas are plain completions since `response_format` is
// rejected by the base gpt-4 model; their replies are still parsed directly
// instead of being extracted from free text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};
use crate::domain::llm::{Capability, GenerationOptions, LlmError, LlmProvider, ProviderKind};
use crate::domain::pipeline_config::TimeoutConfig;
use crate::infrastructure::llm::chat_completions::{ChatCall, ChatCompletionsClient};
use crate::infrastructure::llm::extraction::parse_json_reply;
use crate::infrastructure::llm::prompts::{self, ReplyFormat, SEARCH_SYSTEM_PROMPT};
use crate::infrastructure::llm::transport::{
    failure_text, record_call, report_failure, send_json, AdapterSettings, Outcome,
};

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4";
const IMAGE_MODEL: &str = "dall-e-3";

pub struct OpenAiAdapter {
    chat: ChatCompletionsClient,
    default_model: String,
    timeouts: TimeoutConfig,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

impl OpenAiAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            chat: ChatCompletionsClient::new(settings.base_url(OPENAI_ENDPOINT), settings.api_key),
            default_model: settings
                .default_model
                .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
            timeouts: settings.timeouts,
        }
    }

    async fn structured_completion(
        &self,
        system: Option<&str>,
        user: &str,
        capability: Capability,
        options: &GenerationOptions,
        timeout_secs: u64,
    ) -> Result<String, LlmError> {
        let resolved = options.resolve(capability, &self.default_model);
        self.chat
            .complete(
                ChatCall {
                    system,
                    user,
                    model: &resolved.model,
                    temperature: Some(resolved.temperature),
                    max_tokens: Some(resolved.max_tokens),
                    json_mode: capability == Capability::Search,
                },
                timeout_secs,
            )
            .await
    }

    async fn request_image(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        let resolved = options.resolve(Capability::Image, &self.default_model);
        let request = ImageRequest {
            model: IMAGE_MODEL,
            prompt,
            size: &resolved.size,
            quality: &resolved.quality,
            n: 1,
        };

        let response: ImageResponse = send_json(
            self.chat.post("images/generations").json(&request),
            self.timeouts.request_secs,
        )
        .await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl LlmProvider for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> String {
        let resolved = options.resolve(Capability::Text, &self.default_model);
        let call = ChatCall {
            system: None,
            user: prompt,
            model: &resolved.model,
            temperature: Some(resolved.temperature),
            max_tokens: Some(resolved.max_tokens),
            json_mode: false,
        };

        match self.chat.complete(call, self.timeouts.request_secs).await {
            Ok(text) => {
                record_call(self.kind(), Capability::Text, Outcome::Ok);
                text
            }
            Err(e) => failure_text(self.kind(), Capability::Text, &e),
        }
    }

    async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> String {
        match self.request_image(prompt, options).await {
            Ok(url) => {
                record_call(self.kind(), Capability::Image, Outcome::Ok);
                url
            }
            Err(e) => failure_text(self.kind(), Capability::Image, &e),
        }
    }

    async fn search_web(&self, query: &str, options: &GenerationOptions) -> Vec<SearchResult> {
        let user = prompts::web_search(query, ReplyFormat::Envelope);
        match self
            .structured_completion(Some(SEARCH_SYSTEM_PROMPT), &user, Capability::Search, options, self.timeouts.request_secs)
            .await
        {
            Ok(body) => parse_json_reply(self.kind(), Capability::Search, &body),
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
        let user = prompts::competitor_analysis(url, analysis_type);
        match self
            .structured_completion(None, &user, Capability::Analysis, options, self.timeouts.analysis_secs)
            .await
        {
            Ok(body) => parse_json_reply(self.kind(), Capability::Analysis, &body),
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
        let user = prompts::prompt_ideas(analysis_data, num_ideas, ReplyFormat::Bare);
        match self
            .structured_completion(None, &user, Capability::PromptIdeas, options, self.timeouts.request_secs)
            .await
        {
            Ok(body) => parse_json_reply(self.kind(), Capability::PromptIdeas, &body),
            Err(e) => {
                report_failure(self.kind(), Capability::PromptIdeas, &e);
                vec![PromptIdeaCandidate::transport_failure(&e)]
            }
        }
    }
}
