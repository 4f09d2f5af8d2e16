// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Generated Content Repository
//!
//! `GeneratedContentRepository` backed by the `generated_contents` table.
//! The payload is flattened into `content_type`, `content_text` and
//! `content_url`; the video placeholder note lives in `content_url`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use super::postgres_analysis::parse_provider;
use crate::domain::analysis::PromptIdeaId;
use crate::domain::generated::{ContentType, GeneratedContent, GeneratedContentId, GeneratedContentPayload};
use crate::domain::llm::GenerationOptions;
use crate::domain::repository::{GeneratedContentRepository, RepositoryError};

const SELECT_COLUMNS: &str = "SELECT id, prompt_id, content_type, content_text, content_url, provider, parameters, created_at FROM generated_contents";

pub struct PostgresGeneratedContentRepository {
    pool: PgPool,
}

impl PostgresGeneratedContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn content_from_row(row: &PgRow) -> Result<GeneratedContent, RepositoryError> {
    let content_type: String = row.try_get("content_type")?;
    let content_type: ContentType = content_type
        .parse()
        .map_err(|e| RepositoryError::Serialization(format!("{}", e)))?;
    let provider: String = row.try_get("provider")?;
    let parameters: Option<serde_json::Value> = row.try_get("parameters")?;
    let parameters = parameters
        .map(serde_json::from_value::<GenerationOptions>)
        .transpose()?;

    Ok(GeneratedContent {
        id: GeneratedContentId(row.try_get("id")?),
        prompt_id: PromptIdeaId(row.try_get("prompt_id")?),
        payload: GeneratedContentPayload::from_parts(
            content_type,
            row.try_get("content_text")?,
            row.try_get("content_url")?,
        ),
        provider: parse_provider(&provider)?,
        parameters,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl GeneratedContentRepository for PostgresGeneratedContentRepository {
    async fn save(&self, content: &GeneratedContent) -> Result<(), RepositoryError> {
        let parameters = content
            .parameters
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO generated_contents (
                id, prompt_id, content_type, content_text, content_url, provider, parameters, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                content_type = EXCLUDED.content_type,
                content_text = EXCLUDED.content_text,
                content_url = EXCLUDED.content_url,
                provider = EXCLUDED.provider,
                parameters = EXCLUDED.parameters
            "#,
        )
        .bind(content.id.0)
        .bind(content.prompt_id.0)
        .bind(content.content_type().as_str())
        .bind(content.payload.content_text())
        .bind(content.payload.content_url())
        .bind(content.provider.as_str())
        .bind(parameters)
        .bind(content.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save generated content: {}", e)))?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: GeneratedContentId) -> Result<Option<GeneratedContent>, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(content_from_row).transpose()
    }

    async fn find_by_prompt(&self, prompt_id: PromptIdeaId) -> Result<Vec<GeneratedContent>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{} WHERE prompt_id = $1 ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))
        .bind(prompt_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(content_from_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<GeneratedContent>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(content_from_row).collect()
    }
}
