// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the orchestration services
//!
//! Services run against in-memory repositories and a registry whose provider
//! endpoints point at a local mock server.

use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Matcher, Server};
use serde_json::json;

use promptforge_core::application::{
    AnalysisService, AnalyzeCompetitorRequest, ContentService, GenerateContentRequest, GeneratePromptIdeasRequest,
    ServiceError, StandardAnalysisService, StandardContentService,
};
use promptforge_core::domain::analysis::{AnalysisId, CompetitorAnalysis, PromptIdea, PromptIdeaId};
use promptforge_core::domain::content::{ANALYSIS_FAILURE_SENTINEL, PromptIdeaCandidate};
use promptforge_core::domain::credentials::CredentialError;
use promptforge_core::domain::generated::{ContentType, GeneratedContentPayload, VIDEO_PLACEHOLDER_NOTE};
use promptforge_core::domain::llm::{ConfigurationError, GenerationOptions, ProviderKind};
use promptforge_core::domain::pipeline_config::{PipelineConfig, ProviderConfig};
use promptforge_core::domain::repository::{
    AnalysisRepository, GeneratedContentRepository, PromptIdeaRepository, RepositoryError,
};
use promptforge_core::infrastructure::credentials::InMemoryCredentialStore;
use promptforge_core::infrastructure::llm::ProviderRegistry;
use promptforge_core::infrastructure::repositories::{
    InMemoryAnalysisRepository, InMemoryGeneratedContentRepository, InMemoryPromptIdeaRepository,
};

/// Registry with every provider's endpoint pointed at `base_url`
fn registry_for(base_url: &str) -> Arc<ProviderRegistry> {
    let providers = ProviderKind::ALL
        .into_iter()
        .map(|kind| {
            let mut entry = ProviderConfig::new(kind);
            entry.endpoint = Some(base_url.to_string());
            entry
        })
        .collect();
    Arc::new(ProviderRegistry::from_config(&PipelineConfig {
        providers,
        ..Default::default()
    }))
}

fn credentials() -> Arc<InMemoryCredentialStore> {
    let store = InMemoryCredentialStore::new();
    store.upsert("claude", "sk-ant-test").unwrap();
    store.upsert("openai", "sk-test").unwrap();
    Arc::new(store)
}

struct Harness {
    analyses: Arc<InMemoryAnalysisRepository>,
    ideas: Arc<InMemoryPromptIdeaRepository>,
    contents: Arc<InMemoryGeneratedContentRepository>,
    analysis_service: StandardAnalysisService,
    content_service: StandardContentService,
}

fn harness(server: &Server) -> Harness {
    let registry = registry_for(&server.url());
    let creds = credentials();
    let ideas = InMemoryPromptIdeaRepository::new();
    let contents = InMemoryGeneratedContentRepository::new();
    let analyses = Arc::new(InMemoryAnalysisRepository::with_dependents(ideas.clone(), contents.clone()));
    let ideas = Arc::new(ideas);
    let contents = Arc::new(contents);

    Harness {
        analysis_service: StandardAnalysisService::new(
            registry.clone(),
            creds.clone(),
            analyses.clone(),
            ideas.clone(),
        ),
        content_service: StandardContentService::new(registry, creds, ideas.clone(), contents.clone()),
        analyses,
        ideas,
        contents,
    }
}

fn claude_reply(text: &str) -> String {
    json!({"content": [{"type": "text", "text": text}]}).to_string()
}

fn chat_reply(content: &str) -> String {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

fn analyze_request(provider: &str) -> AnalyzeCompetitorRequest {
    AnalyzeCompetitorRequest {
        competitor_url: "https://competitor.example/blog".to_string(),
        analysis_type: "blog".to_string(),
        provider: provider.to_string(),
        options: GenerationOptions::default(),
    }
}

#[tokio::test]
async fn test_analyze_then_generate_ideas() {
    let mut server = Server::new_async().await;
    let analysis_json = json!({
        "content_themes": ["seo"],
        "content_strategy": ["long-form guides"],
        "tone_analysis": "casual",
        "target_audience": "marketers",
        "opportunities": ["case studies"]
    });
    let _analysis = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("Focus on blog content".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(claude_reply(&format!("Here is the result: {}", analysis_json)))
        .create_async()
        .await;
    let _ideas = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("generate 3 creative prompt ideas".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(claude_reply(
            r#"[{"prompt_text": "Write a case study", "confidence_score": 90, "explanation": "Gap"},
                {"prompt_text": "SEO checklist", "confidence_score": 75, "explanation": "Theme"}]"#,
        ))
        .create_async()
        .await;

    let h = harness(&server);
    let analysis = h.analysis_service.analyze_competitor(analyze_request("Claude")).await.unwrap();
    assert_eq!(analysis.provider, ProviderKind::Claude);
    assert_eq!(analysis.result.tone_analysis, "casual");
    assert_eq!(h.analyses.find_by_id(analysis.id).await.unwrap(), Some(analysis.clone()));

    let ideas = h
        .analysis_service
        .generate_prompt_ideas(GeneratePromptIdeasRequest {
            analysis_id: analysis.id,
            provider: "claude".to_string(),
            num_ideas: Some(3),
            options: GenerationOptions::default(),
        })
        .await
        .unwrap();

    // Two produced, two returned, despite three requested
    assert_eq!(ideas.len(), 2);
    assert!(ideas.iter().all(|idea| idea.analysis_id == analysis.id));
    let stored = h.ideas.find_by_analysis(analysis.id).await.unwrap();
    assert_eq!(stored, ideas);
}

#[tokio::test]
async fn test_degraded_analysis_is_still_persisted() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(502)
        .create_async()
        .await;

    let h = harness(&server);
    let analysis = h.analysis_service.analyze_competitor(analyze_request("claude")).await.unwrap();

    assert_eq!(analysis.result.tone_analysis, ANALYSIS_FAILURE_SENTINEL);
    assert_eq!(h.analysis_service.list_analyses().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_provider_is_configuration_error() {
    let server = Server::new_async().await;
    let h = harness(&server);

    let err = h
        .analysis_service
        .analyze_competitor(analyze_request("unknown-provider"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Configuration(ConfigurationError::UnknownProvider(ref name)) if name == "unknown-provider"
    ));
    assert!(h.analyses.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_fails_before_remote_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let h = harness(&server);
    let err = h
        .analysis_service
        .analyze_competitor(analyze_request("gemini"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ServiceError::Credential(CredentialError::NotFound(ref p)) if p == "gemini"));
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let server = Server::new_async().await;
    let h = harness(&server);
    let mut request = analyze_request("claude");
    request.competitor_url = "ftp://competitor.example".to_string();

    let err = h.analysis_service.analyze_competitor(request).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_ideas_for_missing_analysis_is_not_found() {
    let server = Server::new_async().await;
    let h = harness(&server);

    let err = h
        .analysis_service
        .generate_prompt_ideas(GeneratePromptIdeasRequest {
            analysis_id: AnalysisId::new(),
            provider: "claude".to_string(),
            num_ideas: None,
            options: GenerationOptions::default(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Analysis", .. }));
}

#[tokio::test]
async fn test_delete_analysis() {
    let server = Server::new_async().await;
    let h = harness(&server);
    let analysis = CompetitorAnalysis::new(
        "https://a.example",
        "blog",
        ProviderKind::Claude,
        promptforge_core::domain::content::CompetitorAnalysisResult::parse_failure(),
    );
    h.analyses.save(&analysis).await.unwrap();
    let idea = PromptIdea::new(
        analysis.id,
        ProviderKind::Claude,
        PromptIdeaCandidate::new("Write about pricing", 70.0, "Gap"),
    );
    h.ideas.save(&idea).await.unwrap();

    h.analysis_service.delete_analysis(analysis.id).await.unwrap();
    let err = h.analysis_service.delete_analysis(analysis.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));

    let remaining = h.analysis_service.list_prompt_ideas(Some(analysis.id)).await.unwrap();
    assert!(remaining.is_empty());
    assert!(h.ideas.find_by_id(idea.id).await.unwrap().is_none());
}

async fn seeded_idea(h: &Harness) -> PromptIdea {
    let idea = PromptIdea::new(
        AnalysisId::new(),
        ProviderKind::Claude,
        PromptIdeaCandidate::new("Write about onboarding", 80.0, "Popular"),
    );
    h.ideas.save(&idea).await.unwrap();
    idea
}

#[tokio::test]
async fn test_generate_text_and_image_content() {
    let mut server = Server::new_async().await;
    let text = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Write about onboarding".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply("Onboarding, explained."))
        .create_async()
        .await;
    let image = server
        .mock("POST", "/images/generations")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": [{"url": "https://img.example/onboarding.png"}]}).to_string())
        .create_async()
        .await;

    let h = harness(&server);
    let idea = seeded_idea(&h).await;
    let options = GenerationOptions::default().with_temperature(0.3);

    let content = h
        .content_service
        .generate_content(GenerateContentRequest {
            prompt_id: idea.id,
            provider: "OpenAI".to_string(),
            content_type: ContentType::TextAndImage,
            options: options.clone(),
        })
        .await
        .unwrap();

    text.assert_async().await;
    image.assert_async().await;
    assert_eq!(
        content.payload,
        GeneratedContentPayload::TextAndImage {
            text: "Onboarding, explained.".to_string(),
            url: "https://img.example/onboarding.png".to_string(),
        }
    );
    assert_eq!(content.parameters, Some(options));
    assert_eq!(h.content_service.list_content(Some(idea.id)).await.unwrap(), vec![content.clone()]);
    assert_eq!(h.content_service.get_content(content.id).await.unwrap(), content);
}

#[tokio::test]
async fn test_image_on_text_only_provider_is_stored_degraded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let h = harness(&server);
    let idea = seeded_idea(&h).await;
    let content = h
        .content_service
        .generate_content(GenerateContentRequest {
            prompt_id: idea.id,
            provider: "claude".to_string(),
            content_type: ContentType::Image,
            options: GenerationOptions::default(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(content
        .payload
        .content_url()
        .is_some_and(|url| url.starts_with("Error: Claude does not support image generation")));
    assert_eq!(content.parameters, None);
}

#[tokio::test]
async fn test_video_is_placeholder_without_remote_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let h = harness(&server);
    let idea = seeded_idea(&h).await;
    let content = h
        .content_service
        .generate_content(GenerateContentRequest {
            prompt_id: idea.id,
            provider: "openai".to_string(),
            content_type: ContentType::Video,
            options: GenerationOptions::default(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(content.payload.content_url(), Some(VIDEO_PLACEHOLDER_NOTE));
    assert_eq!(h.contents.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_content_for_missing_prompt_is_not_found() {
    let server = Server::new_async().await;
    let h = harness(&server);

    let err = h
        .content_service
        .generate_content(GenerateContentRequest {
            prompt_id: PromptIdeaId::new(),
            provider: "openai".to_string(),
            content_type: ContentType::Text,
            options: GenerationOptions::default(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound { entity: "Prompt idea", .. }));
}

/// Accepts reads, rejects every write
struct ReadOnlyAnalysisRepository;

#[async_trait]
impl AnalysisRepository for ReadOnlyAnalysisRepository {
    async fn save(&self, _analysis: &CompetitorAnalysis) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: AnalysisId) -> Result<Option<CompetitorAnalysis>, RepositoryError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<CompetitorAnalysis>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: AnalysisId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_persistence_failure_is_propagated() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(claude_reply("I cannot comply."))
        .create_async()
        .await;

    let service = StandardAnalysisService::new(
        registry_for(&server.url()),
        credentials(),
        Arc::new(ReadOnlyAnalysisRepository),
        Arc::new(InMemoryPromptIdeaRepository::new()),
    );

    let err = service.analyze_competitor(analyze_request("claude")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Persistence(RepositoryError::Database(_))));
}
