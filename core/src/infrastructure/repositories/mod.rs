// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits defined in
//! `crate::domain::repository`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve pipeline records
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresAnalysisRepository** - `competitor_analyses` table
//! - **PostgresPromptIdeaRepository** - `prompt_ideas` table
//! - **PostgresGeneratedContentRepository** - `generated_contents` table
//!
//! ## In-Memory Repositories
//!
//! Lightweight implementations for tests and database-less CLI runs. Records
//! are kept in insertion order. An analysis repository built with
//! `with_dependents` cascades deletes the way the schema's foreign keys do.
//!
//! # Usage
//!
//! ```no_run
//! # async fn example(database_url: &str) -> anyhow::Result<()> {
//! use promptforge_core::infrastructure::db::Database;
//! use promptforge_core::infrastructure::repositories::PostgresAnalysisRepository;
//! use promptforge_core::domain::repository::AnalysisRepository;
//!
//! let db = Database::new(database_url).await?;
//! db.migrate().await?;
//! let repo = PostgresAnalysisRepository::new(db.get_pool().clone());
//! let recent = repo.list_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod postgres_analysis;
pub mod postgres_generated_content;
pub mod postgres_prompt_idea;

pub use postgres_analysis::PostgresAnalysisRepository;
pub use postgres_generated_content::PostgresGeneratedContentRepository;
pub use postgres_prompt_idea::PostgresPromptIdeaRepository;

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisId, CompetitorAnalysis, PromptIdea, PromptIdeaId};
use crate::domain::generated::{GeneratedContent, GeneratedContentId};
use crate::domain::repository::{
    AnalysisRepository, GeneratedContentRepository, PromptIdeaRepository, RepositoryError,
};

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unknown("In-memory store lock poisoned".to_string())
}

/// Insert or replace by key, keeping first-insertion order
fn upsert<T: Clone, K: PartialEq>(records: &mut Vec<T>, record: &T, key: impl Fn(&T) -> K) {
    let id = key(record);
    match records.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAnalysisRepository {
    analyses: Arc<RwLock<Vec<CompetitorAnalysis>>>,
    dependents: Option<(InMemoryPromptIdeaRepository, InMemoryGeneratedContentRepository)>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deleting an analysis also drops its prompt ideas and their content
    pub fn with_dependents(ideas: InMemoryPromptIdeaRepository, contents: InMemoryGeneratedContentRepository) -> Self {
        Self {
            analyses: Arc::default(),
            dependents: Some((ideas, contents)),
        }
    }

    fn cascade(&self, id: AnalysisId) -> Result<(), RepositoryError> {
        let Some((ideas, contents)) = &self.dependents else {
            return Ok(());
        };

        let mut ideas = ideas.ideas.write().map_err(poisoned)?;
        let removed: Vec<PromptIdeaId> = ideas
            .iter()
            .filter(|i| i.analysis_id == id)
            .map(|i| i.id)
            .collect();
        ideas.retain(|i| i.analysis_id != id);

        let mut contents = contents.contents.write().map_err(poisoned)?;
        contents.retain(|c| !removed.contains(&c.prompt_id));
        Ok(())
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn save(&self, analysis: &CompetitorAnalysis) -> Result<(), RepositoryError> {
        let mut analyses = self.analyses.write().map_err(poisoned)?;
        upsert(&mut analyses, analysis, |a| a.id);
        Ok(())
    }

    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<CompetitorAnalysis>, RepositoryError> {
        let analyses = self.analyses.read().map_err(poisoned)?;
        Ok(analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<CompetitorAnalysis>, RepositoryError> {
        let analyses = self.analyses.read().map_err(poisoned)?;
        Ok(analyses.iter().rev().cloned().collect())
    }

    async fn delete(&self, id: AnalysisId) -> Result<(), RepositoryError> {
        {
            let mut analyses = self.analyses.write().map_err(poisoned)?;
            analyses.retain(|a| a.id != id);
        }
        self.cascade(id)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPromptIdeaRepository {
    ideas: Arc<RwLock<Vec<PromptIdea>>>,
}

impl InMemoryPromptIdeaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptIdeaRepository for InMemoryPromptIdeaRepository {
    async fn save(&self, idea: &PromptIdea) -> Result<(), RepositoryError> {
        let mut ideas = self.ideas.write().map_err(poisoned)?;
        upsert(&mut ideas, idea, |i| i.id);
        Ok(())
    }

    async fn find_by_id(&self, id: PromptIdeaId) -> Result<Option<PromptIdea>, RepositoryError> {
        let ideas = self.ideas.read().map_err(poisoned)?;
        Ok(ideas.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_analysis(&self, analysis_id: AnalysisId) -> Result<Vec<PromptIdea>, RepositoryError> {
        let ideas = self.ideas.read().map_err(poisoned)?;
        Ok(ideas
            .iter()
            .filter(|i| i.analysis_id == analysis_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<PromptIdea>, RepositoryError> {
        let ideas = self.ideas.read().map_err(poisoned)?;
        Ok(ideas.clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryGeneratedContentRepository {
    contents: Arc<RwLock<Vec<GeneratedContent>>>,
}

impl InMemoryGeneratedContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GeneratedContentRepository for InMemoryGeneratedContentRepository {
    async fn save(&self, content: &GeneratedContent) -> Result<(), RepositoryError> {
        let mut contents = self.contents.write().map_err(poisoned)?;
        upsert(&mut contents, content, |c| c.id);
        Ok(())
    }

    async fn find_by_id(&self, id: GeneratedContentId) -> Result<Option<GeneratedContent>, RepositoryError> {
        let contents = self.contents.read().map_err(poisoned)?;
        Ok(contents.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_prompt(&self, prompt_id: PromptIdeaId) -> Result<Vec<GeneratedContent>, RepositoryError> {
        let contents = self.contents.read().map_err(poisoned)?;
        Ok(contents
            .iter()
            .filter(|c| c.prompt_id == prompt_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<GeneratedContent>, RepositoryError> {
        let contents = self.contents.read().map_err(poisoned)?;
        Ok(contents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate};
    use crate::domain::generated::GeneratedContentPayload;
    use crate::domain::llm::ProviderKind;

    fn analysis(url: &str) -> CompetitorAnalysis {
        CompetitorAnalysis::new(url, "blog", ProviderKind::Claude, CompetitorAnalysisResult::parse_failure())
    }

    #[tokio::test]
    async fn test_analysis_list_is_newest_first() {
        let repo = InMemoryAnalysisRepository::new();
        let first = analysis("https://a.example");
        let second = analysis("https://b.example");
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        repo.delete(first.id).await.unwrap();
        assert!(repo.find_by_id(first.id).await.unwrap().is_none());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_record() {
        let repo = InMemoryAnalysisRepository::new();
        let mut record = analysis("https://a.example");
        repo.save(&record).await.unwrap();
        record.analysis_type = "social".to_string();
        repo.save(&record).await.unwrap();

        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].analysis_type, "social");
    }

    #[tokio::test]
    async fn test_ideas_filtered_by_analysis_in_creation_order() {
        let repo = InMemoryPromptIdeaRepository::new();
        let target = AnalysisId::new();
        let other = AnalysisId::new();

        let first = PromptIdea::new(target, ProviderKind::OpenAi, PromptIdeaCandidate::new("one", 90.0, "a"));
        let unrelated = PromptIdea::new(other, ProviderKind::OpenAi, PromptIdeaCandidate::new("x", 10.0, "b"));
        let second = PromptIdea::new(target, ProviderKind::OpenAi, PromptIdeaCandidate::new("two", 80.0, "c"));
        for idea in [&first, &unrelated, &second] {
            repo.save(idea).await.unwrap();
        }

        let found = repo.find_by_analysis(target).await.unwrap();
        assert_eq!(found.iter().map(|i| i.prompt_text.as_str()).collect::<Vec<_>>(), ["one", "two"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_ideas_and_content() {
        let ideas = InMemoryPromptIdeaRepository::new();
        let contents = InMemoryGeneratedContentRepository::new();
        let repo = InMemoryAnalysisRepository::with_dependents(ideas.clone(), contents.clone());

        let doomed = analysis("https://a.example");
        let kept = analysis("https://b.example");
        repo.save(&doomed).await.unwrap();
        repo.save(&kept).await.unwrap();

        let doomed_idea = PromptIdea::new(doomed.id, ProviderKind::Claude, PromptIdeaCandidate::new("one", 50.0, "a"));
        let kept_idea = PromptIdea::new(kept.id, ProviderKind::Claude, PromptIdeaCandidate::new("two", 60.0, "b"));
        ideas.save(&doomed_idea).await.unwrap();
        ideas.save(&kept_idea).await.unwrap();

        let text = |prompt_id| {
            GeneratedContent::new(
                prompt_id,
                GeneratedContentPayload::Text {
                    text: "copy".to_string(),
                },
                ProviderKind::Claude,
                None,
            )
        };
        contents.save(&text(doomed_idea.id)).await.unwrap();
        contents.save(&text(kept_idea.id)).await.unwrap();

        repo.delete(doomed.id).await.unwrap();

        assert!(ideas.find_by_analysis(doomed.id).await.unwrap().is_empty());
        assert_eq!(ideas.find_by_analysis(kept.id).await.unwrap(), vec![kept_idea.clone()]);
        assert!(contents.find_by_prompt(doomed_idea.id).await.unwrap().is_empty());
        assert_eq!(contents.find_by_prompt(kept_idea.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_content_lookup_by_prompt() {
        let repo = InMemoryGeneratedContentRepository::new();
        let prompt_id = PromptIdeaId::new();
        let content = GeneratedContent::new(
            prompt_id,
            GeneratedContentPayload::Text {
                text: "hello".to_string(),
            },
            ProviderKind::Gemini,
            None,
        );
        repo.save(&content).await.unwrap();

        assert_eq!(repo.find_by_prompt(prompt_id).await.unwrap().len(), 1);
        assert!(repo.find_by_prompt(PromptIdeaId::new()).await.unwrap().is_empty());
        assert_eq!(repo.find_by_id(content.id).await.unwrap(), Some(content));
    }
}
