// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate};
use crate::domain::llm::ProviderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptIdeaId(pub Uuid);

impl PromptIdeaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PromptIdeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PromptIdeaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted competitor analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub id: AnalysisId,
    pub competitor_url: String,
    /// blog, social, website, ...
    pub analysis_type: String,
    pub provider: ProviderKind,
    pub result: CompetitorAnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl CompetitorAnalysis {
    pub fn new(
        competitor_url: impl Into<String>,
        analysis_type: impl Into<String>,
        provider: ProviderKind,
        result: CompetitorAnalysisResult,
    ) -> Self {
        Self {
            id: AnalysisId::new(),
            competitor_url: competitor_url.into(),
            analysis_type: analysis_type.into(),
            provider,
            result,
            created_at: Utc::now(),
        }
    }

    /// The stored result as the JSON document fed back into prompt-idea
    /// generation
    pub fn analysis_data(&self) -> serde_json::Value {
        serde_json::to_value(&self.result).unwrap_or(serde_json::Value::Null)
    }
}

/// A persisted prompt idea, linked to the analysis it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptIdea {
    pub id: PromptIdeaId,
    pub analysis_id: AnalysisId,
    pub prompt_text: String,
    pub provider: ProviderKind,
    pub confidence_score: f64,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl PromptIdea {
    pub fn new(analysis_id: AnalysisId, provider: ProviderKind, candidate: PromptIdeaCandidate) -> Self {
        Self {
            id: PromptIdeaId::new(),
            analysis_id,
            prompt_text: candidate.prompt_text,
            provider,
            confidence_score: candidate.confidence_score,
            explanation: candidate.explanation,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_data_round_trips_result() {
        let analysis = CompetitorAnalysis::new(
            "https://example.com",
            "blog",
            ProviderKind::Claude,
            CompetitorAnalysisResult::parse_failure(),
        );
        let data = analysis.analysis_data();
        assert_eq!(data["tone_analysis"], "Error parsing response");
        assert_eq!(data["content_themes"][0], "Error parsing response");
    }

    #[test]
    fn test_prompt_idea_takes_candidate_fields() {
        let analysis_id = AnalysisId::new();
        let idea = PromptIdea::new(
            analysis_id,
            ProviderKind::OpenAi,
            PromptIdeaCandidate::new("Write a listicle", 88.0, "matches gaps"),
        );
        assert_eq!(idea.analysis_id, analysis_id);
        assert_eq!(idea.prompt_text, "Write a listicle");
        assert_eq!(idea.confidence_score, 88.0);
        assert_eq!(idea.explanation, "matches gaps");
    }

    #[test]
    fn test_ids_parse_from_string() {
        let id = AnalysisId::new();
        assert_eq!(AnalysisId::from_string(&id.to_string()).unwrap(), id);
        assert!(PromptIdeaId::from_string("not-a-uuid").is_err());
    }
}
