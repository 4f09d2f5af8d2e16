// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Manus LLM Provider Adapter
//
// Direct HTTP backend with dedicated endpoints per capability. Analysis and
// prompt ideas try the structured endpoint first; only a non-success status
// falls back to plain completion plus extraction. A transport failure of the
// structured call degrades immediately.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};
use crate::domain::llm::{Capability, GenerationOptions, LlmError, LlmProvider, ProviderKind};
use crate::domain::pipeline_config::TimeoutConfig;
use crate::infrastructure::llm::extraction::{parse_json_reply, parse_reply, StructuredReply};
use crate::infrastructure::llm::prompts::{self, ReplyFormat};
use crate::infrastructure::llm::transport::{
    failure_text, record_call, report_failure, send_json, send_text, AdapterSettings, Outcome,
};

pub const MANUS_ENDPOINT: &str = "https://api.manus.ai/v1";
pub const MANUS_DEFAULT_MODEL: &str = "manus-default";

pub struct ManusAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_model: String,
    timeouts: TimeoutConfig,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    image_url: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
    analysis_type: &'a str,
    prompt: &'a str,
}

#[derive(Serialize)]
struct GeneratePromptsRequest<'a> {
    analysis: &'a serde_json::Value,
    num_ideas: u32,
}

impl ManusAdapter {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url(MANUS_ENDPOINT),
            api_key: settings.api_key,
            default_model: settings
                .default_model
                .unwrap_or_else(|| MANUS_DEFAULT_MODEL.to_string()),
            timeouts: settings.timeouts,
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    async fn complete(&self, prompt: &str, capability: Capability, options: &GenerationOptions) -> Result<String, LlmError> {
        let resolved = options.resolve(capability, &self.default_model);
        let request = CompletionRequest {
            model: &resolved.model,
            prompt,
            temperature: resolved.temperature,
            max_tokens: resolved.max_tokens,
        };
        let response: CompletionResponse =
            send_json(self.post("completions").json(&request), self.timeouts.request_secs).await?;
        Ok(response.text)
    }

    /// Primary structured call with the text fallback chain.
    ///
    /// `Ok` carries the parsed (possibly parse-degraded) value; `Err` means
    /// the remote call itself failed and the caller picks the transport
    /// degraded form.
    async fn structured_with_fallback<T: StructuredReply>(
        &self,
        primary: reqwest::RequestBuilder,
        timeout_secs: u64,
        fallback_prompt: &str,
        capability: Capability,
        options: &GenerationOptions,
    ) -> Result<T, LlmError> {
        match send_text(primary, timeout_secs).await {
            Ok(body) => Ok(parse_json_reply(self.kind(), capability, &body)),
            Err(LlmError::Status { status, .. }) => {
                tracing::info!(
                    capability = capability.as_str(),
                    status,
                    "Manus structured endpoint rejected request, falling back to text generation"
                );
                let text = self.complete(fallback_prompt, capability, options).await?;
                Ok(parse_reply(self.kind(), capability, &text))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl LlmProvider for ManusAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Manus
    }

    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> String {
        match self.complete(prompt, Capability::Text, options).await {
            Ok(text) => {
                record_call(self.kind(), Capability::Text, Outcome::Ok);
                text
            }
            Err(e) => failure_text(self.kind(), Capability::Text, &e),
        }
    }

    async fn generate_image(&self, prompt: &str, options: &GenerationOptions) -> String {
        let resolved = options.resolve(Capability::Image, &self.default_model);
        let request = ImageRequest {
            prompt,
            size: &resolved.size,
        };
        match send_json::<ImageResponse>(self.post("images/generate").json(&request), self.timeouts.request_secs).await {
            Ok(response) => {
                record_call(self.kind(), Capability::Image, Outcome::Ok);
                response.image_url
            }
            Err(e) => failure_text(self.kind(), Capability::Image, &e),
        }
    }

    async fn search_web(&self, query: &str, _options: &GenerationOptions) -> Vec<SearchResult> {
        match send_text(self.post("search").json(&SearchRequest { query }), self.timeouts.request_secs).await {
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
        let prompt = prompts::competitor_analysis(url, analysis_type);
        let primary = self.post("analyze").json(&AnalyzeRequest {
            url,
            analysis_type,
            prompt: &prompt,
        });

        match self
            .structured_with_fallback(primary, self.timeouts.analysis_secs, &prompt, Capability::Analysis, options)
            .await
        {
            Ok(result) => result,
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
        let primary = self.post("generate_prompts").json(&GeneratePromptsRequest {
            analysis: analysis_data,
            num_ideas,
        });

        match self
            .structured_with_fallback(primary, self.timeouts.request_secs, &prompt, Capability::PromptIdeas, options)
            .await
        {
            Ok(ideas) => ideas,
            Err(e) => {
                report_failure(self.kind(), Capability::PromptIdeas, &e);
                vec![PromptIdeaCandidate::transport_failure(&e)]
            }
        }
    }
}
