// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each pipeline stage, following the DDD
//! Repository pattern: interface defined in the domain layer, implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AnalysisRepository` | `CompetitorAnalysis` | `InMemoryAnalysisRepository`, `PostgresAnalysisRepository` |
//! | `PromptIdeaRepository` | `PromptIdea` | `InMemoryPromptIdeaRepository`, `PostgresPromptIdeaRepository` |
//! | `GeneratedContentRepository` | `GeneratedContent` | `InMemoryGeneratedContentRepository`, `PostgresGeneratedContentRepository` |
//!
//! Each `save` is one unit of work. PostgreSQL implementations run it inside
//! a transaction that is rolled back unless the write commits.

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisId, CompetitorAnalysis, PromptIdea, PromptIdeaId};
use crate::domain::generated::{GeneratedContent, GeneratedContentId};

/// Storage backend selected at startup
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn save(&self, analysis: &CompetitorAnalysis) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<CompetitorAnalysis>, RepositoryError>;

    /// Newest first
    async fn list_all(&self) -> Result<Vec<CompetitorAnalysis>, RepositoryError>;

    async fn delete(&self, id: AnalysisId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PromptIdeaRepository: Send + Sync {
    async fn save(&self, idea: &PromptIdea) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: PromptIdeaId) -> Result<Option<PromptIdea>, RepositoryError>;

    /// Ideas for one analysis in creation order
    async fn find_by_analysis(&self, analysis_id: AnalysisId) -> Result<Vec<PromptIdea>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<PromptIdea>, RepositoryError>;
}

#[async_trait]
pub trait GeneratedContentRepository: Send + Sync {
    async fn save(&self, content: &GeneratedContent) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: GeneratedContentId) -> Result<Option<GeneratedContent>, RepositoryError>;

    async fn find_by_prompt(&self, prompt_id: PromptIdeaId) -> Result<Vec<GeneratedContent>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<GeneratedContent>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
