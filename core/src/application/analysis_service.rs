// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Analysis Service
//!
//! Application service for competitor analysis and prompt-idea generation.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Sequence credential lookup, provider resolution,
//!   capability invocation and persistence for one request
//! - **Collaborators:**
//!   - Domain: CompetitorAnalysis, PromptIdea, CredentialProvider
//!   - Infrastructure: ProviderRegistry, AnalysisRepository, PromptIdeaRepository

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::application::ServiceError;
use crate::domain::analysis::{AnalysisId, CompetitorAnalysis, PromptIdea};
use crate::domain::credentials::CredentialProvider;
use crate::domain::llm::{GenerationOptions, LlmProvider, ProviderKind};
use crate::domain::repository::{AnalysisRepository, PromptIdeaRepository};
use crate::infrastructure::llm::ProviderRegistry;

fn default_analysis_type() -> String {
    "blog".to_string()
}

/// Competitor analysis request
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeCompetitorRequest {
    /// Page or site to analyze
    pub competitor_url: String,

    /// blog, social, website, ...
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,

    /// Provider name, case-insensitive
    pub provider: String,

    #[serde(default)]
    pub options: GenerationOptions,
}

/// Prompt-idea generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePromptIdeasRequest {
    pub analysis_id: AnalysisId,

    pub provider: String,

    /// Overrides `options.num_ideas`
    #[serde(default)]
    pub num_ideas: Option<u32>,

    #[serde(default)]
    pub options: GenerationOptions,
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyze a competitor and persist the (possibly degraded) result
    ///
    /// # Errors
    ///
    /// - Configuration: unknown or disabled provider
    /// - Credential: no active key for the provider
    /// - Persistence: the analysis could not be stored
    async fn analyze_competitor(&self, request: AnalyzeCompetitorRequest) -> Result<CompetitorAnalysis, ServiceError>;

    /// Generate prompt ideas from a stored analysis, persisting each one
    ///
    /// Returns exactly the ideas the provider produced, never padded or
    /// truncated to the requested count.
    async fn generate_prompt_ideas(&self, request: GeneratePromptIdeasRequest) -> Result<Vec<PromptIdea>, ServiceError>;

    /// Newest first
    async fn list_analyses(&self) -> Result<Vec<CompetitorAnalysis>, ServiceError>;

    async fn get_analysis(&self, id: AnalysisId) -> Result<CompetitorAnalysis, ServiceError>;

    async fn delete_analysis(&self, id: AnalysisId) -> Result<(), ServiceError>;

    /// All ideas, or only those derived from `analysis_id`
    async fn list_prompt_ideas(&self, analysis_id: Option<AnalysisId>) -> Result<Vec<PromptIdea>, ServiceError>;
}

/// Standard implementation of AnalysisService
pub struct StandardAnalysisService {
    registry: Arc<ProviderRegistry>,
    credentials: Arc<dyn CredentialProvider>,
    analyses: Arc<dyn AnalysisRepository>,
    prompt_ideas: Arc<dyn PromptIdeaRepository>,
}

impl StandardAnalysisService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        credentials: Arc<dyn CredentialProvider>,
        analyses: Arc<dyn AnalysisRepository>,
        prompt_ideas: Arc<dyn PromptIdeaRepository>,
    ) -> Self {
        Self {
            registry,
            credentials,
            analyses,
            prompt_ideas,
        }
    }

    /// Credential lookup followed by registry resolution
    async fn provider_for(&self, name: &str) -> Result<Box<dyn LlmProvider>, ServiceError> {
        let kind: ProviderKind = name.parse()?;
        let credential = self.credentials.get_credential(kind.as_str()).await?;
        Ok(self.registry.resolve(kind.as_str(), Some(&credential))?)
    }
}

fn validate_url(url: &str) -> Result<(), ServiceError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ServiceError::InvalidRequest("competitor_url cannot be empty".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ServiceError::InvalidRequest(format!(
            "competitor_url must be an http(s) URL: {}",
            url
        )));
    }
    Ok(())
}

#[async_trait]
impl AnalysisService for StandardAnalysisService {
    async fn analyze_competitor(&self, request: AnalyzeCompetitorRequest) -> Result<CompetitorAnalysis, ServiceError> {
        validate_url(&request.competitor_url)?;
        if request.analysis_type.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("analysis_type cannot be empty".to_string()));
        }

        // Step 1-2: credential and provider
        let provider = self.provider_for(&request.provider).await?;

        // Step 3: remote call (never fails, may degrade)
        info!(
            provider = %provider.kind(),
            url = %request.competitor_url,
            analysis_type = %request.analysis_type,
            "Analyzing competitor"
        );
        let result = provider
            .analyze_competitor(&request.competitor_url, &request.analysis_type, &request.options)
            .await;
        if result.is_degraded() {
            warn!(provider = %provider.kind(), "Competitor analysis returned a degraded result");
        }

        // Step 4: persist
        let analysis = CompetitorAnalysis::new(
            request.competitor_url.trim(),
            request.analysis_type.trim(),
            provider.kind(),
            result,
        );
        self.analyses.save(&analysis).await.map_err(|e| {
            error!(analysis_id = %analysis.id, "Failed to persist analysis: {}", e);
            ServiceError::Persistence(e)
        })?;

        info!(analysis_id = %analysis.id, "Stored competitor analysis");
        Ok(analysis)
    }

    async fn generate_prompt_ideas(&self, request: GeneratePromptIdeasRequest) -> Result<Vec<PromptIdea>, ServiceError> {
        let mut options = request.options;
        if let Some(num_ideas) = request.num_ideas {
            options.num_ideas = Some(num_ideas);
        }
        if options.num_ideas == Some(0) {
            return Err(ServiceError::InvalidRequest("num_ideas must be at least 1".to_string()));
        }

        let analysis = self.get_analysis(request.analysis_id).await?;
        let provider = self.provider_for(&request.provider).await?;

        info!(
            provider = %provider.kind(),
            analysis_id = %analysis.id,
            "Generating prompt ideas"
        );
        let candidates = provider
            .generate_prompt_ideas(&analysis.analysis_data(), &options)
            .await;

        // Each idea is its own unit of work
        let mut ideas = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let idea = PromptIdea::new(analysis.id, provider.kind(), candidate);
            self.prompt_ideas.save(&idea).await.map_err(|e| {
                error!(prompt_id = %idea.id, "Failed to persist prompt idea: {}", e);
                ServiceError::Persistence(e)
            })?;
            ideas.push(idea);
        }

        info!(analysis_id = %analysis.id, count = ideas.len(), "Stored prompt ideas");
        Ok(ideas)
    }

    async fn list_analyses(&self) -> Result<Vec<CompetitorAnalysis>, ServiceError> {
        Ok(self.analyses.list_all().await?)
    }

    async fn get_analysis(&self, id: AnalysisId) -> Result<CompetitorAnalysis, ServiceError> {
        self.analyses
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Analysis", id))
    }

    async fn delete_analysis(&self, id: AnalysisId) -> Result<(), ServiceError> {
        // Existence check keeps NotFound distinguishable from a no-op delete
        self.get_analysis(id).await?;
        self.analyses.delete(id).await?;
        info!(analysis_id = %id, "Deleted analysis");
        Ok(())
    }

    async fn list_prompt_ideas(&self, analysis_id: Option<AnalysisId>) -> Result<Vec<PromptIdea>, ServiceError> {
        Ok(match analysis_id {
            Some(id) => self.prompt_ideas.find_by_analysis(id).await?,
            None => self.prompt_ideas.list_all().await?,
        })
    }
}
