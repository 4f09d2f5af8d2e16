// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Credential lookup contract
//!
//! The orchestration services ask for a provider's secret right before
//! resolving the provider. Where the secret lives (config file, environment,
//! database) is an infrastructure concern; see
//! `crate::infrastructure::credentials`.

use async_trait::async_trait;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Secret for `provider` (canonical lowercase name, e.g. "claude").
    async fn get_credential(&self, provider: &str) -> Result<String, CredentialError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("No active API key found for provider: {0}")]
    NotFound(String),

    #[error("Credential store error: {0}")]
    Store(String),
}
