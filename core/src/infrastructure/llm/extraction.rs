// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Structured extraction of JSON from model replies
//!
//! Models asked for "only JSON" still wrap it in prose or code fences. The
//! protocol here is deliberately simple and local:
//!
//! 1. Find the first opening delimiter (`{` or `[`) and the last matching
//!    closing delimiter.
//! 2. If both exist in that order, parse the slice between them.
//! 3. Deserialize into the expected type.
//! 4. On any failure return the type's degraded value.
//!
//! It never retries and never re-prompts. Replies that must be bare JSON
//! (OpenAI, the Manus structured endpoints) use [`parse_json_reply`] instead,
//! which parses the whole body and unwraps an object envelope around an
//! expected array.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::content::{CompetitorAnalysisResult, PromptIdeaCandidate, SearchResult};
use crate::domain::llm::{Capability, ProviderKind};
use crate::infrastructure::llm::transport::{record_call, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }

    fn name(self) -> &'static str {
        match self {
            JsonShape::Object => "object",
            JsonShape::Array => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("No JSON {0} found in response")]
    NotFound(&'static str),

    #[error("Malformed JSON: {0}")]
    Malformed(String),

    #[error("JSON does not match the expected shape: {0}")]
    Shape(String),
}

/// A capability result that can be recovered from model text.
pub trait StructuredReply: DeserializeOwned {
    /// Delimiters to look for
    const SHAPE: JsonShape;

    /// Object keys a native-JSON reply may wrap the expected array in
    const ENVELOPE_KEYS: &'static [&'static str] = &[];

    /// Value returned when nothing usable could be parsed
    fn parse_failure() -> Self;
}

impl StructuredReply for CompetitorAnalysisResult {
    const SHAPE: JsonShape = JsonShape::Object;

    fn parse_failure() -> Self {
        CompetitorAnalysisResult::parse_failure()
    }
}

impl StructuredReply for Vec<PromptIdeaCandidate> {
    const SHAPE: JsonShape = JsonShape::Array;
    const ENVELOPE_KEYS: &'static [&'static str] = &["prompt_ideas", "ideas", "prompts"];

    fn parse_failure() -> Self {
        vec![PromptIdeaCandidate::parse_failure()]
    }
}

impl StructuredReply for Vec<SearchResult> {
    const SHAPE: JsonShape = JsonShape::Array;
    const ENVELOPE_KEYS: &'static [&'static str] = &["results", "search_results"];

    fn parse_failure() -> Self {
        Vec::new()
    }
}

/// Slice the outermost candidate JSON value out of `text` and parse it.
pub fn extract_json(text: &str, shape: JsonShape) -> Result<Value, ExtractionError> {
    let (open, close) = shape.delimiters();
    match (text.find(open), text.rfind(close)) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&text[start..=end])
            .map_err(|e| ExtractionError::Malformed(e.to_string())),
        _ => Err(ExtractionError::NotFound(shape.name())),
    }
}

/// Extract and deserialize, reporting why it failed.
pub fn try_parse_reply<T: StructuredReply>(text: &str) -> Result<T, ExtractionError> {
    let value = extract_json(text, T::SHAPE)?;
    serde_json::from_value(value).map_err(|e| ExtractionError::Shape(e.to_string()))
}

/// Extract from free text, degrading on failure.
pub fn parse_reply<T: StructuredReply>(provider: ProviderKind, capability: Capability, text: &str) -> T {
    settle(provider, capability, try_parse_reply(text))
}

/// Parse a body that must be bare JSON, reporting why it failed.
pub fn try_parse_json_reply<T: StructuredReply>(body: &str) -> Result<T, ExtractionError> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let value = match (T::SHAPE, value) {
        (JsonShape::Array, Value::Object(mut map)) => {
            let key = T::ENVELOPE_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
                .map(|key| key.to_string())
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });
            match key.and_then(|k| map.remove(&k)) {
                Some(array) => array,
                None => return Err(ExtractionError::NotFound(JsonShape::Array.name())),
            }
        }
        (_, other) => other,
    };

    serde_json::from_value(value).map_err(|e| ExtractionError::Shape(e.to_string()))
}

/// Parse a bare JSON body, degrading on failure.
pub fn parse_json_reply<T: StructuredReply>(provider: ProviderKind, capability: Capability, body: &str) -> T {
    settle(provider, capability, try_parse_json_reply(body))
}

fn settle<T: StructuredReply>(
    provider: ProviderKind,
    capability: Capability,
    parsed: Result<T, ExtractionError>,
) -> T {
    match parsed {
        Ok(value) => {
            record_call(provider, capability, Outcome::Ok);
            value
        }
        Err(err) => {
            tracing::warn!(
                provider = %provider,
                capability = capability.as_str(),
                error = %err,
                "Structured extraction failed, returning degraded result"
            );
            record_call(provider, capability, Outcome::Degraded);
            T::parse_failure()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{ContentTheme, PARSE_ERROR_SENTINEL};
    use serde_json::json;

    const P: ProviderKind = ProviderKind::Claude;

    #[test]
    fn test_extracts_object_surrounded_by_noise() {
        let value = extract_json("noise {\"a\":1} noise", JsonShape::Object).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_extracts_array_from_code_fence() {
        let text = "Sure!\n```json\n[{\"title\": \"t\", \"url\": \"u\", \"snippet\": \"s\"}]\n```";
        let results: Vec<SearchResult> = parse_reply(P, Capability::Analysis, text);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "u");
    }

    #[test]
    fn test_missing_delimiters() {
        assert_eq!(
            extract_json("I cannot comply.", JsonShape::Object).unwrap_err(),
            ExtractionError::NotFound("object")
        );
        assert_eq!(
            extract_json("} backwards {", JsonShape::Object).unwrap_err(),
            ExtractionError::NotFound("object")
        );
    }

    #[test]
    fn test_malformed_interior() {
        let err = extract_json("{\"a\": oops}", JsonShape::Object).unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn test_analysis_degrades_to_sentinel() {
        let analysis: CompetitorAnalysisResult = parse_reply(P, Capability::Analysis, "I cannot comply.");
        assert_eq!(analysis, CompetitorAnalysisResult::parse_failure());

        let malformed: CompetitorAnalysisResult = parse_reply(P, Capability::Analysis, "{\"tone_analysis\": }");
        assert_eq!(malformed, CompetitorAnalysisResult::parse_failure());
    }

    #[test]
    fn test_sentinel_extraction_is_idempotent() {
        let sentinel = serde_json::to_string(&CompetitorAnalysisResult::parse_failure()).unwrap();
        let again: CompetitorAnalysisResult = parse_reply(P, Capability::Analysis, &sentinel);
        assert_eq!(again, CompetitorAnalysisResult::parse_failure());
        assert_eq!(again.content_themes, vec![ContentTheme::new(PARSE_ERROR_SENTINEL)]);

        let ideas = serde_json::to_string(&Vec::<PromptIdeaCandidate>::parse_failure()).unwrap();
        let again: Vec<PromptIdeaCandidate> = parse_reply(P, Capability::Analysis, &ideas);
        assert_eq!(again, vec![PromptIdeaCandidate::parse_failure()]);
    }

    #[test]
    fn test_array_degraded_policies() {
        let ideas: Vec<PromptIdeaCandidate> = parse_reply(P, Capability::Analysis, "no list here");
        assert_eq!(ideas, vec![PromptIdeaCandidate::parse_failure()]);

        let results: Vec<SearchResult> = parse_reply(P, Capability::Analysis, "no list here");
        assert!(results.is_empty());
    }

    #[test]
    fn test_ideas_are_not_padded_or_truncated() {
        let text = r#"Here you go: [
            {"prompt_text": "one", "confidence_score": 90, "explanation": "a"},
            {"prompt_text": "two", "confidence_score": 80, "explanation": "b"}
        ]"#;
        let ideas: Vec<PromptIdeaCandidate> = parse_reply(P, Capability::Analysis, text);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[1].prompt_text, "two");
    }

    #[test]
    fn test_shape_mismatch_degrades() {
        let err = try_parse_reply::<Vec<PromptIdeaCandidate>>("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ExtractionError::Shape(_)));
    }

    #[test]
    fn test_json_reply_unwraps_envelope() {
        let body = json!({"results": [{"title": "a", "url": "b", "snippet": "c"}]}).to_string();
        let results: Vec<SearchResult> = parse_json_reply(P, Capability::Analysis, &body);
        assert_eq!(results.len(), 1);

        let body = json!({"items": [{"prompt_text": "x", "confidence_score": 10}]}).to_string();
        let ideas: Vec<PromptIdeaCandidate> = parse_json_reply(P, Capability::Analysis, &body);
        assert_eq!(ideas[0].prompt_text, "x");
    }

    #[test]
    fn test_json_reply_does_not_hunt_through_prose() {
        let analysis: CompetitorAnalysisResult =
            parse_json_reply(P, Capability::Analysis, "Here is the result: {\"tone_analysis\": \"casual\"}");
        assert_eq!(analysis, CompetitorAnalysisResult::parse_failure());

        let empty: Vec<SearchResult> = parse_json_reply(P, Capability::Analysis, "{\"note\": \"nothing\"}");
        assert!(empty.is_empty());
    }
}
