// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI-compatible chat completions client
//
// Shared wire layer for the OpenAI and DeepSeek adapters. Both speak
// `POST {base}/chat/completions` with bearer auth.

use serde::{Deserialize, Serialize};

use crate::domain::llm::LlmError;
use crate::infrastructure::llm::transport::send_json;

pub(crate) struct ChatCompletionsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// One chat turn to send
pub(crate) struct ChatCall<'a> {
    pub system: Option<&'a str>,
    pub user: &'a str,
    pub model: &'a str,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask for `response_format: {"type": "json_object"}`
    pub json_mode: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub(crate) fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Authenticated POST to `{base}/{path}`
    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    /// Run one completion and return the first choice's text
    pub(crate) async fn complete(&self, call: ChatCall<'_>, timeout_secs: u64) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = call.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: call.user,
        });

        let request = ChatRequest {
            model: call.model,
            messages,
            max_tokens: call.max_tokens,
            temperature: call.temperature,
            response_format: call.json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        let response: ChatResponse = send_json(self.post("chat/completions").json(&request), timeout_secs).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
