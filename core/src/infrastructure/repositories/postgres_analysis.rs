// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Analysis Repository
//!
//! `AnalysisRepository` backed by the `competitor_analyses` table. The
//! structured result is stored as JSONB in `analysis_data`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::analysis::{AnalysisId, CompetitorAnalysis};
use crate::domain::content::CompetitorAnalysisResult;
use crate::domain::llm::ProviderKind;
use crate::domain::repository::{AnalysisRepository, RepositoryError};

pub struct PostgresAnalysisRepository {
    pool: PgPool,
}

impl PostgresAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) fn parse_provider(value: &str) -> Result<ProviderKind, RepositoryError> {
    value
        .parse()
        .map_err(|e| RepositoryError::Serialization(format!("Invalid provider column: {}", e)))
}

fn analysis_from_row(row: &PgRow) -> Result<CompetitorAnalysis, RepositoryError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let provider: String = row.try_get("provider")?;
    let data: serde_json::Value = row.try_get("analysis_data")?;

    let result: CompetitorAnalysisResult = serde_json::from_value(data)
        .map_err(|e| RepositoryError::Serialization(format!("Failed to deserialize analysis: {}", e)))?;

    Ok(CompetitorAnalysis {
        id: AnalysisId(id),
        competitor_url: row.try_get("competitor_url")?,
        analysis_type: row.try_get("analysis_type")?,
        provider: parse_provider(&provider)?,
        result,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl AnalysisRepository for PostgresAnalysisRepository {
    async fn save(&self, analysis: &CompetitorAnalysis) -> Result<(), RepositoryError> {
        let data = serde_json::to_value(&analysis.result)?;

        // Dropped without commit on any error, which rolls the write back
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO competitor_analyses (
                id, competitor_url, analysis_type, provider, analysis_data, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                competitor_url = EXCLUDED.competitor_url,
                analysis_type = EXCLUDED.analysis_type,
                provider = EXCLUDED.provider,
                analysis_data = EXCLUDED.analysis_data
            "#,
        )
        .bind(analysis.id.0)
        .bind(&analysis.competitor_url)
        .bind(&analysis.analysis_type)
        .bind(analysis.provider.as_str())
        .bind(data)
        .bind(analysis.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save analysis: {}", e)))?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<CompetitorAnalysis>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, competitor_url, analysis_type, provider, analysis_data, created_at
            FROM competitor_analyses
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(analysis_from_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<CompetitorAnalysis>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, competitor_url, analysis_type, provider, analysis_data, created_at
            FROM competitor_analyses
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(analysis_from_row).collect()
    }

    async fn delete(&self, id: AnalysisId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM competitor_analyses WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to delete analysis: {}", e)))?;
        tx.commit().await?;
        Ok(())
    }
}
