// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod analysis_service;
pub mod content_service;
pub mod repository_factory;

use crate::domain::credentials::CredentialError;
use crate::domain::llm::ConfigurationError;
use crate::domain::repository::RepositoryError;

// Re-export services for convenience
pub use analysis_service::{
    AnalysisService, AnalyzeCompetitorRequest, GeneratePromptIdeasRequest, StandardAnalysisService,
};
pub use content_service::{ContentService, GenerateContentRequest, StandardContentService};
pub use repository_factory::{create_repositories, Repositories};

/// Failures surfaced by the orchestration services.
///
/// Provider and extraction failures never appear here; they arrive as
/// degraded results instead.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
