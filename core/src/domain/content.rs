// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Capability result shapes
//!
//! Value objects returned by [`crate::domain::llm::LlmProvider`]. Each shape
//! owns its degraded constructors so sentinel literals exist in one place.
//!
//! Deserialization is deliberately lenient: models return themes as bare
//! strings or as objects, scores as numbers or numeric strings, and lists of
//! strings that sometimes contain objects. Anything that still fits the shape
//! is accepted; anything that does not is a parse failure for the caller to
//! degrade.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Result types and degraded-result policy

use serde::{Deserialize, Deserializer, Serialize};

/// Literal placed in every field of an analysis that failed to parse
pub const PARSE_ERROR_SENTINEL: &str = "Error parsing response";

/// Placed in fields of an analysis whose remote call failed
pub const ANALYSIS_FAILURE_SENTINEL: &str = "Error occurred during analysis";

/// Prompt text of the sentinel idea returned when parsing failed
pub const IDEA_PARSE_ERROR_TEXT: &str = "Error generating prompt ideas";

/// Explanation of the sentinel idea returned when the remote call failed
pub const IDEA_FAILURE_SENTINEL: &str = "Error occurred during generation";

/// One content theme. Serialized as a bare string when no confidence is
/// known, matching what most models emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThemeRepr", into = "ThemeRepr")]
pub struct ContentTheme {
    pub theme: String,
    pub confidence: Option<f64>,
}

impl ContentTheme {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            confidence: None,
        }
    }

    pub fn scored(theme: impl Into<String>, confidence: f64) -> Self {
        Self {
            theme: theme.into(),
            confidence: Some(confidence),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ThemeRepr {
    Label(String),
    Scored {
        #[serde(alias = "name", alias = "topic")]
        theme: String,
        #[serde(
            default,
            alias = "confidence_score",
            alias = "score",
            deserialize_with = "lenient_score",
            skip_serializing_if = "Option::is_none"
        )]
        confidence: Option<f64>,
    },
}

impl From<ThemeRepr> for ContentTheme {
    fn from(repr: ThemeRepr) -> Self {
        match repr {
            ThemeRepr::Label(theme) => ContentTheme::new(theme),
            ThemeRepr::Scored { theme, confidence } => ContentTheme { theme, confidence },
        }
    }
}

impl From<ContentTheme> for ThemeRepr {
    fn from(theme: ContentTheme) -> Self {
        match theme.confidence {
            None => ThemeRepr::Label(theme.theme),
            Some(confidence) => ThemeRepr::Scored {
                theme: theme.theme,
                confidence: Some(confidence),
            },
        }
    }
}

/// Structured competitor analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysisResult {
    #[serde(default)]
    pub content_themes: Vec<ContentTheme>,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub content_strategy: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub tone_analysis: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub target_audience: String,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub opportunities: Vec<String>,
}

impl CompetitorAnalysisResult {
    /// Every field set to [`PARSE_ERROR_SENTINEL`]
    pub fn parse_failure() -> Self {
        Self {
            content_themes: vec![ContentTheme::new(PARSE_ERROR_SENTINEL)],
            content_strategy: vec![PARSE_ERROR_SENTINEL.to_string()],
            tone_analysis: PARSE_ERROR_SENTINEL.to_string(),
            target_audience: PARSE_ERROR_SENTINEL.to_string(),
            opportunities: vec![PARSE_ERROR_SENTINEL.to_string()],
        }
    }

    /// The remote call itself failed; the reason lands in `content_themes`
    pub fn transport_failure(reason: impl std::fmt::Display) -> Self {
        Self {
            content_themes: vec![ContentTheme::new(format!("Error: {}", reason))],
            content_strategy: vec![ANALYSIS_FAILURE_SENTINEL.to_string()],
            tone_analysis: ANALYSIS_FAILURE_SENTINEL.to_string(),
            target_audience: ANALYSIS_FAILURE_SENTINEL.to_string(),
            opportunities: vec![ANALYSIS_FAILURE_SENTINEL.to_string()],
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.tone_analysis == PARSE_ERROR_SENTINEL || self.tone_analysis == ANALYSIS_FAILURE_SENTINEL
    }
}

/// One generated prompt idea, before persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptIdeaCandidate {
    #[serde(default, alias = "prompt", deserialize_with = "lenient_string")]
    pub prompt_text: String,

    /// 0-100, clamped on the way in
    #[serde(default, alias = "confidence", deserialize_with = "clamped_score")]
    pub confidence_score: f64,

    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: String,
}

impl PromptIdeaCandidate {
    pub fn new(prompt_text: impl Into<String>, confidence_score: f64, explanation: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            confidence_score: confidence_score.clamp(0.0, 100.0),
            explanation: explanation.into(),
        }
    }

    pub fn parse_failure() -> Self {
        Self::new(IDEA_PARSE_ERROR_TEXT, 0.0, PARSE_ERROR_SENTINEL)
    }

    pub fn transport_failure(reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Error: {}", reason), 0.0, IDEA_FAILURE_SENTINEL)
    }
}

/// A single web search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, alias = "link", deserialize_with = "lenient_string")]
    pub url: String,

    #[serde(default, alias = "description", deserialize_with = "lenient_string")]
    pub snippet: String,
}

fn value_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(serde_json::Value::deserialize(deserializer)?))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items.into_iter().map(value_to_string).collect(),
        serde_json::Value::Null => Vec::new(),
        single => vec![value_to_string(single)],
    })
}

fn score_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(score_from_value(&value))
}

fn clamped_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(score_from_value(&value)
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0))
}
