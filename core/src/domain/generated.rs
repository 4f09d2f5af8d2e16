// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::analysis::PromptIdeaId;
use crate::domain::llm::{GenerationOptions, ProviderKind};

/// Stored in place of a URL for video requests
pub const VIDEO_PLACEHOLDER_NOTE: &str = "Video generation not fully implemented yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedContentId(pub Uuid);

impl GeneratedContentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for GeneratedContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GeneratedContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Requested kind of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "text+image")]
    TextAndImage,
    #[serde(rename = "video")]
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::TextAndImage => "text+image",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported content type: {0}")]
pub struct UnsupportedContentType(pub String);

impl FromStr for ContentType {
    type Err = UnsupportedContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "text+image" | "text_and_image" => Ok(ContentType::TextAndImage),
            "video" => Ok(ContentType::Video),
            _ => Err(UnsupportedContentType(s.to_string())),
        }
    }
}

/// What a generation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedContentPayload {
    Text { text: String },
    Image { url: String },
    TextAndImage { text: String, url: String },
    VideoPlaceholder { note: String },
}

impl GeneratedContentPayload {
    pub fn video_placeholder() -> Self {
        GeneratedContentPayload::VideoPlaceholder {
            note: VIDEO_PLACEHOLDER_NOTE.to_string(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            GeneratedContentPayload::Text { .. } => ContentType::Text,
            GeneratedContentPayload::Image { .. } => ContentType::Image,
            GeneratedContentPayload::TextAndImage { .. } => ContentType::TextAndImage,
            GeneratedContentPayload::VideoPlaceholder { .. } => ContentType::Video,
        }
    }

    pub fn content_text(&self) -> Option<&str> {
        match self {
            GeneratedContentPayload::Text { text } | GeneratedContentPayload::TextAndImage { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        }
    }

    /// Image URL, or the placeholder note for video
    pub fn content_url(&self) -> Option<&str> {
        match self {
            GeneratedContentPayload::Image { url } | GeneratedContentPayload::TextAndImage { url, .. } => {
                Some(url.as_str())
            }
            GeneratedContentPayload::VideoPlaceholder { note } => Some(note.as_str()),
            GeneratedContentPayload::Text { .. } => None,
        }
    }

    /// Rebuild from stored columns
    pub fn from_parts(content_type: ContentType, text: Option<String>, url: Option<String>) -> Self {
        match content_type {
            ContentType::Text => GeneratedContentPayload::Text {
                text: text.unwrap_or_default(),
            },
            ContentType::Image => GeneratedContentPayload::Image {
                url: url.unwrap_or_default(),
            },
            ContentType::TextAndImage => GeneratedContentPayload::TextAndImage {
                text: text.unwrap_or_default(),
                url: url.unwrap_or_default(),
            },
            ContentType::Video => GeneratedContentPayload::VideoPlaceholder {
                note: url.unwrap_or_else(|| VIDEO_PLACEHOLDER_NOTE.to_string()),
            },
        }
    }
}

/// A persisted piece of generated content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: GeneratedContentId,
    pub prompt_id: PromptIdeaId,
    pub payload: GeneratedContentPayload,
    pub provider: ProviderKind,
    /// Options the caller supplied, if any
    pub parameters: Option<GenerationOptions>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedContent {
    pub fn new(
        prompt_id: PromptIdeaId,
        payload: GeneratedContentPayload,
        provider: ProviderKind,
        parameters: Option<GenerationOptions>,
    ) -> Self {
        Self {
            id: GeneratedContentId::new(),
            prompt_id,
            payload,
            provider,
            parameters,
            created_at: Utc::now(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.payload.content_type()
    }
}
