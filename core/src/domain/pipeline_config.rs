// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Pipeline Configuration Types
//
// Explicit configuration object built once at startup and handed to the
// provider registry and credential provider:
// - Per-provider endpoint, API key and default model overrides
// - Remote call timeouts
// - Optional PostgreSQL persistence
// - Logging settings for the CLI

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::llm::{ConfigurationError, ProviderKind};
use crate::domain::repository::{PostgresConfig, StorageBackend};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Provider overrides; providers without an entry use built-in defaults
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Remote call timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// PostgreSQL persistence (in-memory when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend this entry configures
    pub provider: ProviderKind,

    /// API base URL (defaults to the vendor's public endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used when the caller does not pick one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Whether this provider may be resolved
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            endpoint: None,
            api_key: None,
            default_model: None,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Text, search, image and prompt-idea calls
    #[serde(default = "default_request_timeout")]
    pub request_secs: u64,

    /// Full competitor analysis calls
    #[serde(default = "default_analysis_timeout")]
    pub analysis_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: default_request_timeout(),
            analysis_secs: default_analysis_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    60
}

fn default_analysis_timeout() -> u64 {
    120
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Resolve API key from config (supports "env:VAR_NAME" syntax)
pub fn resolve_api_key(key: &str) -> Result<String, ConfigurationError> {
    match key.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .map_err(|_| ConfigurationError::MissingEnvVar(var_name.to_string())),
        None => Ok(key.to_string()),
    }
}

impl PipelineConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. PROMPTFORGE_CONFIG_PATH environment variable
    /// 2. ./promptforge.yaml (working directory)
    /// 3. ~/.promptforge/config.yaml (user home)
    /// 4. /etc/promptforge/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PROMPTFORGE_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./promptforge.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".promptforge").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/promptforge/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration.
    ///
    /// Vendor API key variables fill in keys the file leaves unset; an
    /// explicit key in the file wins.
    pub fn apply_env_overrides(&mut self) {
        for kind in ProviderKind::ALL {
            let var = kind.api_key_env_var();
            let Ok(value) = std::env::var(var) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let entry = self.provider_entry_mut(kind);
            if entry.api_key.is_none() {
                tracing::debug!("Environment override: {} supplies the {} API key", var, kind);
                entry.api_key = Some(value);
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.is_empty() {
                tracing::debug!("Environment override: DATABASE_URL");
                let max_connections = self
                    .database
                    .as_ref()
                    .map(|db| db.max_connections)
                    .unwrap_or_else(default_max_connections);
                self.database = Some(DatabaseConfig { url, max_connections });
            }
        }

        if let Ok(format) = std::env::var("PROMPTFORGE_LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "json" | "text" => self.logging.format = format.to_lowercase(),
                _ => tracing::warn!(
                    "Invalid value for PROMPTFORGE_LOG_FORMAT: '{}'. Expected json/text. Ignoring.",
                    format
                ),
            }
        }
    }

    /// Configuration entry for `kind`, if the file has one
    pub fn provider(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.provider == kind)
    }

    fn provider_entry_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        if let Some(index) = self.providers.iter().position(|p| p.provider == kind) {
            &mut self.providers[index]
        } else {
            self.providers.push(ProviderConfig::new(kind));
            let last = self.providers.len() - 1;
            &mut self.providers[last]
        }
    }

    /// Configured API key for `kind`, with "env:" references expanded.
    /// `Ok(None)` when no key is configured.
    pub fn api_key_for(&self, kind: ProviderKind) -> Result<Option<String>, ConfigurationError> {
        match self.provider(kind).and_then(|p| p.api_key.as_deref()) {
            Some(key) => resolve_api_key(key).map(Some),
            None => Ok(None),
        }
    }

    pub fn storage_backend(&self) -> StorageBackend {
        match &self.database {
            Some(db) => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: db.url.clone(),
                max_connections: db.max_connections,
            }),
            None => StorageBackend::InMemory,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.provider) {
                anyhow::bail!("Provider '{}' is configured more than once", provider.provider);
            }

            if let Some(endpoint) = &provider.endpoint {
                if endpoint.trim().is_empty() {
                    anyhow::bail!("Endpoint cannot be empty for provider: {}", provider.provider);
                }
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    anyhow::bail!(
                        "Endpoint for provider '{}' must be an http(s) URL: {}",
                        provider.provider,
                        endpoint
                    );
                }
            }

            if let Some(model) = &provider.default_model {
                if model.trim().is_empty() {
                    anyhow::bail!("Default model cannot be empty for provider: {}", provider.provider);
                }
            }
        }

        if self.timeouts.request_secs == 0 || self.timeouts.analysis_secs == 0 {
            anyhow::bail!("Timeouts must be greater than zero");
        }

        if let Some(db) = &self.database {
            if db.url.trim().is_empty() {
                anyhow::bail!("database.url cannot be empty");
            }
            if db.max_connections == 0 {
                anyhow::bail!("database.max_connections must be greater than zero");
            }
        }

        match self.logging.format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("Invalid logging.format: '{}'. Must be 'json' or 'text'", other),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.providers.is_empty());
        assert_eq!(config.timeouts.request_secs, 60);
        assert_eq!(config.timeouts.analysis_secs, 120);
        assert!(matches!(config.storage_backend(), StorageBackend::InMemory));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
providers:
  - provider: claude
    api_key: sk-test
    default_model: claude-3-haiku-20240307
  - provider: manus
    endpoint: http://localhost:9000/v1
    enabled: false
timeouts:
  analysis_secs: 90
database:
  url: postgres://localhost/promptforge
"#;
        let config = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.providers.len(), 2);

        let claude = config.provider(ProviderKind::Claude).unwrap();
        assert_eq!(claude.default_model.as_deref(), Some("claude-3-haiku-20240307"));
        assert!(claude.enabled);

        let manus = config.provider(ProviderKind::Manus).unwrap();
        assert!(!manus.enabled);

        assert_eq!(config.timeouts.request_secs, 60);
        assert_eq!(config.timeouts.analysis_secs, 90);
        assert_eq!(config.database.as_ref().unwrap().max_connections, 5);
        assert_eq!(config.api_key_for(ProviderKind::Claude).unwrap().as_deref(), Some("sk-test"));
        assert_eq!(config.api_key_for(ProviderKind::Gemini).unwrap(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_reference_must_exist() {
        let mut config = PipelineConfig::default();
        let mut entry = ProviderConfig::new(ProviderKind::OpenAi);
        entry.api_key = Some("env:PROMPTFORGE_TEST_SURELY_UNSET_VAR".to_string());
        config.providers.push(entry);

        assert_eq!(
            config.api_key_for(ProviderKind::OpenAi).unwrap_err(),
            ConfigurationError::MissingEnvVar("PROMPTFORGE_TEST_SURELY_UNSET_VAR".to_string())
        );
    }

    #[test]
    fn test_validation() {
        let mut config = PipelineConfig::default();

        config.providers.push(ProviderConfig::new(ProviderKind::Gemini));
        config.providers.push(ProviderConfig::new(ProviderKind::Gemini));
        assert!(config.validate().is_err());
        config.providers.pop();

        config.providers[0].endpoint = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());
        config.providers[0].endpoint = Some("https://example.com".to_string());
        assert!(config.validate().is_ok());

        config.timeouts.request_secs = 0;
        assert!(config.validate().is_err());
        config.timeouts.request_secs = 60;

        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promptforge.yaml");

        let mut config = PipelineConfig::default();
        let mut entry = ProviderConfig::new(ProviderKind::DeepSeek);
        entry.default_model = Some("deepseek-reasoner".to_string());
        config.providers.push(entry);
        config.to_yaml_file(&path).unwrap();

        let loaded = PipelineConfig::from_yaml_file(&path).unwrap();
        assert_eq!(
            loaded.provider(ProviderKind::DeepSeek).unwrap().default_model.as_deref(),
            Some("deepseek-reasoner")
        );
    }
}
