// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Content Service
//!
//! Turns a stored prompt idea into generated content of the requested type.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::application::ServiceError;
use crate::domain::analysis::{PromptIdea, PromptIdeaId};
use crate::domain::credentials::CredentialProvider;
use crate::domain::generated::{ContentType, GeneratedContent, GeneratedContentId, GeneratedContentPayload};
use crate::domain::llm::{GenerationOptions, LlmProvider, ProviderKind};
use crate::domain::repository::{GeneratedContentRepository, PromptIdeaRepository};
use crate::infrastructure::llm::ProviderRegistry;

/// Content generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentRequest {
    pub prompt_id: PromptIdeaId,
    pub provider: String,
    pub content_type: ContentType,
    /// Recorded on the stored content when non-empty
    #[serde(default)]
    pub options: GenerationOptions,
}

#[async_trait]
pub trait ContentService: Send + Sync {
    async fn generate_content(&self, request: GenerateContentRequest) -> Result<GeneratedContent, ServiceError>;

    async fn get_prompt_idea(&self, id: PromptIdeaId) -> Result<PromptIdea, ServiceError>;

    /// All content, or only content generated from `prompt_id`
    async fn list_content(&self, prompt_id: Option<PromptIdeaId>) -> Result<Vec<GeneratedContent>, ServiceError>;

    async fn get_content(&self, id: GeneratedContentId) -> Result<GeneratedContent, ServiceError>;
}

pub struct StandardContentService {
    registry: Arc<ProviderRegistry>,
    credentials: Arc<dyn CredentialProvider>,
    prompt_ideas: Arc<dyn PromptIdeaRepository>,
    contents: Arc<dyn GeneratedContentRepository>,
}

impl StandardContentService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        credentials: Arc<dyn CredentialProvider>,
        prompt_ideas: Arc<dyn PromptIdeaRepository>,
        contents: Arc<dyn GeneratedContentRepository>,
    ) -> Self {
        Self {
            registry,
            credentials,
            prompt_ideas,
            contents,
        }
    }

    async fn provider_for(&self, name: &str) -> Result<Box<dyn LlmProvider>, ServiceError> {
        let kind: ProviderKind = name.parse()?;
        let credential = self.credentials.get_credential(kind.as_str()).await?;
        Ok(self.registry.resolve(kind.as_str(), Some(&credential))?)
    }
}

/// Run the capability calls `content_type` needs, strictly in sequence
async fn dispatch(
    provider: &dyn LlmProvider,
    content_type: ContentType,
    prompt: &str,
    options: &GenerationOptions,
) -> GeneratedContentPayload {
    match content_type {
        ContentType::Text => GeneratedContentPayload::Text {
            text: provider.generate_text(prompt, options).await,
        },
        ContentType::Image => GeneratedContentPayload::Image {
            url: provider.generate_image(prompt, options).await,
        },
        ContentType::TextAndImage => {
            let text = provider.generate_text(prompt, options).await;
            let url = provider.generate_image(prompt, options).await;
            GeneratedContentPayload::TextAndImage { text, url }
        }
        ContentType::Video => GeneratedContentPayload::video_placeholder(),
    }
}

#[async_trait]
impl ContentService for StandardContentService {
    async fn generate_content(&self, request: GenerateContentRequest) -> Result<GeneratedContent, ServiceError> {
        let idea = self.get_prompt_idea(request.prompt_id).await?;
        let provider = self.provider_for(&request.provider).await?;

        info!(
            provider = %provider.kind(),
            prompt_id = %idea.id,
            content_type = request.content_type.as_str(),
            "Generating content"
        );
        let payload = dispatch(provider.as_ref(), request.content_type, &idea.prompt_text, &request.options).await;

        let parameters = (request.options != GenerationOptions::default()).then_some(request.options);
        let content = GeneratedContent::new(idea.id, payload, provider.kind(), parameters);
        self.contents.save(&content).await.map_err(|e| {
            error!(content_id = %content.id, "Failed to persist generated content: {}", e);
            ServiceError::Persistence(e)
        })?;

        info!(content_id = %content.id, "Stored generated content");
        Ok(content)
    }

    async fn get_prompt_idea(&self, id: PromptIdeaId) -> Result<PromptIdea, ServiceError> {
        self.prompt_ideas
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Prompt idea", id))
    }

    async fn list_content(&self, prompt_id: Option<PromptIdeaId>) -> Result<Vec<GeneratedContent>, ServiceError> {
        Ok(match prompt_id {
            Some(id) => self.contents.find_by_prompt(id).await?,
            None => self.contents.list_all().await?,
        })
    }

    async fn get_content(&self, id: GeneratedContentId) -> Result<GeneratedContent, ServiceError> {
        self.contents
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Generated content", id))
    }
}
