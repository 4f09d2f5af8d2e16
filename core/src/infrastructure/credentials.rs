// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Credential Provider Implementations
//
// - ConfigCredentialProvider: keys from PipelineConfig (file, env:VAR, vendor env vars)
// - InMemoryCredentialStore: managed keys for tests and single-process runs
// - PostgresCredentialStore: the `api_keys` table, one active key per provider
// - LayeredCredentialProvider: first store that knows the provider wins
//
// Keys are stored as given; encryption at rest is left to the database.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::credentials::{CredentialError, CredentialProvider};
use crate::domain::llm::{ConfigurationError, ProviderKind};
use crate::domain::pipeline_config::PipelineConfig;

fn canonical(provider: &str) -> String {
    provider.trim().to_ascii_lowercase()
}

/// Reads keys straight from the pipeline configuration
pub struct ConfigCredentialProvider {
    config: Arc<PipelineConfig>,
}

impl ConfigCredentialProvider {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CredentialProvider for ConfigCredentialProvider {
    async fn get_credential(&self, provider: &str) -> Result<String, CredentialError> {
        let kind: ProviderKind = provider
            .parse()
            .map_err(|_| CredentialError::NotFound(provider.to_string()))?;

        match self.config.api_key_for(kind) {
            Ok(Some(key)) if !key.is_empty() => Ok(key),
            Ok(_) => Err(CredentialError::NotFound(kind.to_string())),
            Err(ConfigurationError::MissingEnvVar(var)) => {
                tracing::debug!("API key for {} references unset variable {}", kind, var);
                Err(CredentialError::NotFound(kind.to_string()))
            }
            Err(e) => Err(CredentialError::Store(e.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredKey {
    api_key: String,
    is_active: bool,
}

/// Process-local key store with activate/deactivate semantics
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    keys: Arc<RwLock<HashMap<String, StoredKey>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `api_key` as the active key for `provider`
    pub fn upsert(&self, provider: &str, api_key: impl Into<String>) -> Result<(), CredentialError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|_| CredentialError::Store("Credential store lock poisoned".to_string()))?;
        keys.insert(
            canonical(provider),
            StoredKey {
                api_key: api_key.into(),
                is_active: true,
            },
        );
        Ok(())
    }

    /// Keep the key but stop handing it out
    pub fn deactivate(&self, provider: &str) -> Result<bool, CredentialError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|_| CredentialError::Store("Credential store lock poisoned".to_string()))?;
        Ok(match keys.get_mut(&canonical(provider)) {
            Some(stored) if stored.is_active => {
                stored.is_active = false;
                true
            }
            _ => false,
        })
    }
}

#[async_trait]
impl CredentialProvider for InMemoryCredentialStore {
    async fn get_credential(&self, provider: &str) -> Result<String, CredentialError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| CredentialError::Store("Credential store lock poisoned".to_string()))?;
        keys.get(&canonical(provider))
            .filter(|stored| stored.is_active)
            .map(|stored| stored.api_key.clone())
            .ok_or_else(|| CredentialError::NotFound(canonical(provider)))
    }
}

/// Keys in the `api_keys` table
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the active key for `provider` in one transaction
    pub async fn upsert(&self, provider: &str, api_key: &str) -> Result<(), CredentialError> {
        let provider = canonical(provider);
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query("UPDATE api_keys SET is_active = FALSE, updated_at = $2 WHERE provider = $1 AND is_active")
            .bind(&provider)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, provider, api_key, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, $4, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&provider)
        .bind(api_key)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        tracing::info!("Stored new active API key for provider: {}", provider);
        Ok(())
    }

    /// Returns whether an active key was deactivated
    pub async fn deactivate(&self, provider: &str) -> Result<bool, CredentialError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = FALSE, updated_at = $2 WHERE provider = $1 AND is_active")
            .bind(canonical(provider))
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

fn store_error(err: sqlx::Error) -> CredentialError {
    CredentialError::Store(err.to_string())
}

#[async_trait]
impl CredentialProvider for PostgresCredentialStore {
    async fn get_credential(&self, provider: &str) -> Result<String, CredentialError> {
        let row = sqlx::query(
            r#"
            SELECT api_key FROM api_keys
            WHERE provider = $1 AND is_active
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(canonical(provider))
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(row) => row.try_get::<String, _>("api_key").map_err(store_error),
            None => Err(CredentialError::NotFound(canonical(provider))),
        }
    }
}

/// Consults each provider in order; `NotFound` moves on, other errors stop
pub struct LayeredCredentialProvider {
    layers: Vec<Arc<dyn CredentialProvider>>,
}

impl LayeredCredentialProvider {
    pub fn new(layers: Vec<Arc<dyn CredentialProvider>>) -> Self {
        Self { layers }
    }
}

#[async_trait]
impl CredentialProvider for LayeredCredentialProvider {
    async fn get_credential(&self, provider: &str) -> Result<String, CredentialError> {
        for layer in &self.layers {
            match layer.get_credential(provider).await {
                Err(CredentialError::NotFound(_)) => continue,
                other => return other,
            }
        }
        Err(CredentialError::NotFound(canonical(provider)))
    }
}
