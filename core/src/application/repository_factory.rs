// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations for the configured storage
//! backend, keeping the domain layer free of infrastructure dependencies.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire repository traits to in-memory or PostgreSQL adapters

use std::sync::Arc;

use crate::domain::repository::{AnalysisRepository, GeneratedContentRepository, PromptIdeaRepository};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::{
    InMemoryAnalysisRepository, InMemoryGeneratedContentRepository, InMemoryPromptIdeaRepository,
    PostgresAnalysisRepository, PostgresGeneratedContentRepository, PostgresPromptIdeaRepository,
};

/// The three pipeline repositories, sharing one backend
#[derive(Clone)]
pub struct Repositories {
    pub analyses: Arc<dyn AnalysisRepository>,
    pub prompt_ideas: Arc<dyn PromptIdeaRepository>,
    pub contents: Arc<dyn GeneratedContentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let prompt_ideas = InMemoryPromptIdeaRepository::new();
        let contents = InMemoryGeneratedContentRepository::new();
        Self {
            analyses: Arc::new(InMemoryAnalysisRepository::with_dependents(
                prompt_ideas.clone(),
                contents.clone(),
            )),
            prompt_ideas: Arc::new(prompt_ideas),
            contents: Arc::new(contents),
        }
    }

    pub fn postgres(db: &Database) -> Self {
        let pool = db.get_pool().clone();
        Self {
            analyses: Arc::new(PostgresAnalysisRepository::new(pool.clone())),
            prompt_ideas: Arc::new(PostgresPromptIdeaRepository::new(pool.clone())),
            contents: Arc::new(PostgresGeneratedContentRepository::new(pool)),
        }
    }
}

/// PostgreSQL when a database is connected, in-memory otherwise
pub fn create_repositories(db: Option<&Database>) -> Repositories {
    match db {
        Some(db) => Repositories::postgres(db),
        None => {
            tracing::debug!("No database configured, using in-memory repositories");
            Repositories::in_memory()
        }
    }
}
