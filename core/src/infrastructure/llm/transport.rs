// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Shared HTTP plumbing for provider adapters.
//
// Every remote call is a single attempt with a bounded timeout. Failures are
// returned as `LlmError` here and turned into degraded values by the adapter.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::domain::llm::{Capability, LlmError, ProviderKind};
use crate::domain::pipeline_config::TimeoutConfig;

/// Everything an adapter needs besides its vendor-specific wire types
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    pub api_key: String,
    /// Base URL; `None` means the vendor's public endpoint
    pub endpoint: Option<String>,
    /// Overrides the adapter's built-in default model
    pub default_model: Option<String>,
    pub timeouts: TimeoutConfig,
}

impl AdapterSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: None,
            default_model: None,
            timeouts: TimeoutConfig::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Base URL without a trailing slash
    pub(crate) fn base_url(&self, vendor_default: &str) -> String {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(vendor_default)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Send a prepared request and return the raw body of a success response
pub(crate) async fn send_text(request: reqwest::RequestBuilder, timeout_secs: u64) -> Result<String, LlmError> {
    let response = request
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(|e| LlmError::from_reqwest(e, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .text()
        .await
        .map_err(|e| LlmError::from_reqwest(e, timeout_secs))
}

/// Send a prepared request and decode a JSON body, mapping every failure
pub(crate) async fn send_json<R: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout_secs: u64,
) -> Result<R, LlmError> {
    let body = send_text(request, timeout_secs).await?;
    serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Ok,
    Degraded,
    Unsupported,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Degraded => "degraded",
            Outcome::Unsupported => "unsupported",
        }
    }
}

/// Count one capability call
pub(crate) fn record_call(provider: ProviderKind, capability: Capability, outcome: Outcome) {
    metrics::counter!(
        "promptforge_provider_calls_total",
        "provider" => provider.as_str(),
        "capability" => capability.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Log and count a failed remote call
pub(crate) fn report_failure(provider: ProviderKind, capability: Capability, err: &LlmError) {
    tracing::warn!(
        provider = %provider,
        capability = capability.as_str(),
        error = %err,
        "Provider call failed"
    );
    record_call(provider, capability, Outcome::Degraded);
}

/// The `"Error: ..."` form returned by text-shaped capabilities
pub(crate) fn failure_text(provider: ProviderKind, capability: Capability, err: &LlmError) -> String {
    report_failure(provider, capability, err);
    format!("Error: {}", err)
}

/// Image generation on a backend that has none; no network call is made
pub(crate) fn unsupported_image(provider: ProviderKind, message: &str) -> String {
    tracing::debug!(provider = %provider, "Image generation not supported by provider");
    record_call(provider, Capability::Image, Outcome::Unsupported);
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_prefers_override_and_trims_slash() {
        let settings = AdapterSettings::new("k").with_endpoint("http://127.0.0.1:1234/");
        assert_eq!(settings.base_url("https://api.openai.com/v1"), "http://127.0.0.1:1234");

        let defaulted = AdapterSettings::new("k");
        assert_eq!(defaulted.base_url("https://api.openai.com/v1"), "https://api.openai.com/v1");

        let blank = AdapterSettings::new("k").with_endpoint("  ");
        assert_eq!(blank.base_url("https://api.deepseek.com/v1"), "https://api.deepseek.com/v1");
    }

    #[test]
    fn test_status_error_text() {
        let err = LlmError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            failure_text(ProviderKind::Manus, Capability::Image, &err),
            "Error: API returned status code 503"
        );
    }
}
