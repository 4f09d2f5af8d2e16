// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process service wiring
//!
//! Builds the registry, credential chain, repositories and services from the
//! loaded configuration.

use anyhow::{Context, Result};
use std::sync::Arc;

use promptforge_core::{
    application::{
        create_repositories, AnalysisService, ContentService, StandardAnalysisService, StandardContentService,
    },
    domain::{credentials::CredentialProvider, pipeline_config::PipelineConfig, repository::StorageBackend},
    infrastructure::{
        credentials::{ConfigCredentialProvider, LayeredCredentialProvider, PostgresCredentialStore},
        db::Database,
        llm::ProviderRegistry,
    },
};

pub struct EmbeddedPipeline {
    pub analysis: Arc<dyn AnalysisService>,
    pub content: Arc<dyn ContentService>,
}

impl EmbeddedPipeline {
    pub async fn new(config: &PipelineConfig) -> Result<Self> {
        config
            .validate()
            .context("Configuration validation failed")?;

        let registry = Arc::new(ProviderRegistry::from_config(config));
        let from_config: Arc<dyn CredentialProvider> = Arc::new(ConfigCredentialProvider::new(Arc::new(config.clone())));

        let db = connect(config).await?;
        let repositories = create_repositories(db.as_ref());

        // Managed keys take precedence over the config file
        let credentials: Arc<dyn CredentialProvider> = match &db {
            Some(db) => Arc::new(LayeredCredentialProvider::new(vec![
                Arc::new(PostgresCredentialStore::new(db.get_pool().clone())),
                from_config,
            ])),
            None => from_config,
        };

        let analysis = Arc::new(StandardAnalysisService::new(
            registry.clone(),
            credentials.clone(),
            repositories.analyses.clone(),
            repositories.prompt_ideas.clone(),
        ));
        let content = Arc::new(StandardContentService::new(
            registry,
            credentials,
            repositories.prompt_ideas,
            repositories.contents,
        ));

        Ok(Self { analysis, content })
    }
}

/// Connect and migrate when a database is configured
pub async fn connect(config: &PipelineConfig) -> Result<Option<Database>> {
    match config.storage_backend() {
        StorageBackend::PostgreSQL(pg) => {
            let db = Database::from_config(&pg)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.migrate().await?;
            Ok(Some(db))
        }
        StorageBackend::InMemory => Ok(None),
    }
}
