// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Prompt Idea Repository
//!
//! `PromptIdeaRepository` backed by the `prompt_ideas` table.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use super::postgres_analysis::parse_provider;
use crate::domain::analysis::{AnalysisId, PromptIdea, PromptIdeaId};
use crate::domain::repository::{PromptIdeaRepository, RepositoryError};

const SELECT_COLUMNS: &str =
    "SELECT id, analysis_id, prompt_text, provider, confidence_score, explanation, created_at FROM prompt_ideas";

pub struct PostgresPromptIdeaRepository {
    pool: PgPool,
}

impl PostgresPromptIdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn idea_from_row(row: &PgRow) -> Result<PromptIdea, RepositoryError> {
    let provider: String = row.try_get("provider")?;
    Ok(PromptIdea {
        id: PromptIdeaId(row.try_get("id")?),
        analysis_id: AnalysisId(row.try_get("analysis_id")?),
        prompt_text: row.try_get("prompt_text")?,
        provider: parse_provider(&provider)?,
        confidence_score: row.try_get("confidence_score")?,
        explanation: row.try_get("explanation")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl PromptIdeaRepository for PostgresPromptIdeaRepository {
    async fn save(&self, idea: &PromptIdea) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO prompt_ideas (
                id, analysis_id, prompt_text, provider, confidence_score, explanation, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                prompt_text = EXCLUDED.prompt_text,
                provider = EXCLUDED.provider,
                confidence_score = EXCLUDED.confidence_score,
                explanation = EXCLUDED.explanation
            "#,
        )
        .bind(idea.id.0)
        .bind(idea.analysis_id.0)
        .bind(&idea.prompt_text)
        .bind(idea.provider.as_str())
        .bind(idea.confidence_score)
        .bind(&idea.explanation)
        .bind(idea.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save prompt idea: {}", e)))?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: PromptIdeaId) -> Result<Option<PromptIdea>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(idea_from_row).transpose()
    }

    async fn find_by_analysis(&self, analysis_id: AnalysisId) -> Result<Vec<PromptIdea>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{} WHERE analysis_id = $1 ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))
        .bind(analysis_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(idea_from_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<PromptIdea>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(idea_from_row).collect()
    }
}
