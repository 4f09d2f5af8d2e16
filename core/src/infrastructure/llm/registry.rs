// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Provider Name Resolution
//
// Resolves a provider name plus an optional credential to a fresh adapter
// instance. Unknown names and missing credentials fail before any HTTP client
// is built.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::llm::{ConfigurationError, LlmProvider, ProviderKind};
use crate::domain::pipeline_config::{resolve_api_key, PipelineConfig, ProviderConfig, TimeoutConfig};

use super::anthropic::{ClaudeAdapter, ANTHROPIC_ENDPOINT, CLAUDE_TEXT_MODEL};
use super::deepseek::{DeepSeekAdapter, DEEPSEEK_DEFAULT_MODEL, DEEPSEEK_ENDPOINT};
use super::gemini::{GeminiAdapter, GEMINI_DEFAULT_MODEL, GEMINI_ENDPOINT};
use super::manus::{ManusAdapter, MANUS_DEFAULT_MODEL, MANUS_ENDPOINT};
use super::openai::{OpenAiAdapter, OPENAI_DEFAULT_MODEL, OPENAI_ENDPOINT};
use super::transport::AdapterSettings;

/// Registry for resolving provider names to adapters
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, ProviderConfig>,
    timeouts: TimeoutConfig,
}

/// One row of [`ProviderRegistry::describe`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub kind: ProviderKind,
    pub enabled: bool,
    pub endpoint: String,
    pub default_model: String,
    pub credential_configured: bool,
}

impl ProviderRegistry {
    /// Create provider registry from pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let providers = ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                let entry = config
                    .provider(kind)
                    .cloned()
                    .unwrap_or_else(|| ProviderConfig::new(kind));
                (kind, entry)
            })
            .collect::<HashMap<_, _>>();

        info!(
            "Initialized LLM provider registry ({} providers enabled)",
            providers.values().filter(|p| p.enabled).count()
        );

        Self {
            providers,
            timeouts: config.timeouts.clone(),
        }
    }

    /// Resolve `name` (case-insensitive) to a new adapter instance.
    ///
    /// An explicit `credential` wins over the configured key.
    pub fn resolve(
        &self,
        name: &str,
        credential: Option<&str>,
    ) -> Result<Box<dyn LlmProvider>, ConfigurationError> {
        let kind: ProviderKind = name.parse()?;
        let entry = self.entry(kind);

        if !entry.enabled {
            return Err(ConfigurationError::ProviderDisabled(kind.to_string()));
        }

        let api_key = match credential.filter(|c| !c.trim().is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => match entry.api_key.as_deref() {
                Some(configured) => resolve_api_key(configured)?,
                None => String::new(),
            },
        };
        if api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential(kind.to_string()));
        }

        let settings = AdapterSettings {
            api_key,
            endpoint: entry.endpoint.clone(),
            default_model: entry.default_model.clone(),
            timeouts: self.timeouts.clone(),
        };

        debug!("Resolved provider: {}", kind);
        Ok(Self::create_provider(kind, settings))
    }

    fn create_provider(kind: ProviderKind, settings: AdapterSettings) -> Box<dyn LlmProvider> {
        match kind {
            ProviderKind::OpenAi => Box::new(OpenAiAdapter::new(settings)),
            ProviderKind::Claude => Box::new(ClaudeAdapter::new(settings)),
            ProviderKind::Gemini => Box::new(GeminiAdapter::new(settings)),
            ProviderKind::DeepSeek => Box::new(DeepSeekAdapter::new(settings)),
            ProviderKind::Manus => Box::new(ManusAdapter::new(settings)),
        }
    }

    fn entry(&self, kind: ProviderKind) -> ProviderConfig {
        self.providers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(kind))
    }

    /// Providers that may be resolved
    pub fn available(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.entry(*kind).enabled)
            .collect()
    }

    /// Effective settings for every supported provider, in a stable order
    pub fn describe(&self) -> Vec<ProviderSummary> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                let entry = self.entry(kind);
                let (vendor_endpoint, vendor_model) = vendor_defaults(kind);
                ProviderSummary {
                    kind,
                    enabled: entry.enabled,
                    endpoint: entry.endpoint.unwrap_or_else(|| vendor_endpoint.to_string()),
                    default_model: entry.default_model.unwrap_or_else(|| vendor_model.to_string()),
                    credential_configured: entry
                        .api_key
                        .as_deref()
                        .map(|key| resolve_api_key(key).is_ok_and(|k| !k.is_empty()))
                        .unwrap_or(false),
                }
            })
            .collect()
    }
}

fn vendor_defaults(kind: ProviderKind) -> (&'static str, &'static str) {
    match kind {
        ProviderKind::OpenAi => (OPENAI_ENDPOINT, OPENAI_DEFAULT_MODEL),
        ProviderKind::Claude => (ANTHROPIC_ENDPOINT, CLAUDE_TEXT_MODEL),
        ProviderKind::Gemini => (GEMINI_ENDPOINT, GEMINI_DEFAULT_MODEL),
        ProviderKind::DeepSeek => (DEEPSEEK_ENDPOINT, DEEPSEEK_DEFAULT_MODEL),
        ProviderKind::Manus => (MANUS_ENDPOINT, MANUS_DEFAULT_MODEL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(providers: Vec<ProviderConfig>) -> ProviderRegistry {
        ProviderRegistry::from_config(&PipelineConfig {
            providers,
            ..Default::default()
        })
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = registry_with(vec![]);
        for name in ["OpenAI", "openai", "OPENAI"] {
            let provider = registry.resolve(name, Some("sk-test")).unwrap();
            assert_eq!(provider.kind(), ProviderKind::OpenAi);
        }
    }

    #[test]
    fn test_unknown_provider_fails_fast() {
        let registry = registry_with(vec![]);
        let err = registry.resolve("unknown-provider", Some("key")).err().unwrap();
        assert_eq!(
            err,
            ConfigurationError::UnknownProvider("unknown-provider".to_string())
        );
    }

    #[test]
    fn test_missing_credential() {
        let registry = registry_with(vec![]);
        let err = registry.resolve("claude", None).err().unwrap();
        assert_eq!(err, ConfigurationError::MissingCredential("claude".to_string()));

        let blank = registry.resolve("claude", Some("  ")).err().unwrap();
        assert_eq!(blank, ConfigurationError::MissingCredential("claude".to_string()));
    }

    #[test]
    fn test_configured_key_is_used_when_no_credential_given() {
        let mut gemini = ProviderConfig::new(ProviderKind::Gemini);
        gemini.api_key = Some("configured".to_string());
        let registry = registry_with(vec![gemini]);

        let provider = registry.resolve("Gemini", None).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn test_env_reference_must_exist() {
        let mut manus = ProviderConfig::new(ProviderKind::Manus);
        manus.api_key = Some("env:PROMPTFORGE_TEST_UNSET_MANUS_KEY".to_string());
        let registry = registry_with(vec![manus]);

        let err = registry.resolve("manus", None).err().unwrap();
        assert_eq!(
            err,
            ConfigurationError::MissingEnvVar("PROMPTFORGE_TEST_UNSET_MANUS_KEY".to_string())
        );
    }

    #[test]
    fn test_disabled_provider_is_rejected() {
        let mut deepseek = ProviderConfig::new(ProviderKind::DeepSeek);
        deepseek.enabled = false;
        let registry = registry_with(vec![deepseek]);

        let err = registry.resolve("deepseek", Some("key")).err().unwrap();
        assert_eq!(err, ConfigurationError::ProviderDisabled("deepseek".to_string()));
        assert!(!registry.available().contains(&ProviderKind::DeepSeek));
        assert_eq!(registry.available().len(), 4);
    }

    #[test]
    fn test_describe_reports_defaults_and_overrides() {
        let mut openai = ProviderConfig::new(ProviderKind::OpenAi);
        openai.default_model = Some("gpt-4o".to_string());
        openai.api_key = Some("sk".to_string());
        let registry = registry_with(vec![openai]);

        let summary = registry.describe();
        assert_eq!(summary.len(), 5);
        assert_eq!(summary[0].kind, ProviderKind::OpenAi);
        assert_eq!(summary[0].default_model, "gpt-4o");
        assert_eq!(summary[0].endpoint, OPENAI_ENDPOINT);
        assert!(summary[0].credential_configured);
        assert!(!summary[1].credential_configured);
        assert_eq!(summary[4].default_model, MANUS_DEFAULT_MODEL);
    }
}
