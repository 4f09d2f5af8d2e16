// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Managed API key commands
//!
//! Keys stored here take precedence over the configuration file.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use promptforge_core::domain::llm::ProviderKind;
use promptforge_core::domain::pipeline_config::PipelineConfig;
use promptforge_core::infrastructure::credentials::PostgresCredentialStore;

use crate::embedded::connect;

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Store the active API key for a provider
    Set {
        #[arg(value_name = "PROVIDER")]
        provider: String,

        /// API key (read from the environment when omitted)
        #[arg(long, env = "PROMPTFORGE_API_KEY", hide_env_values = true)]
        key: String,
    },

    /// Stop using the stored key for a provider
    Deactivate {
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },
}

pub async fn handle_command(command: KeysCommand, config: &PipelineConfig) -> Result<()> {
    let db = connect(config)
        .await?
        .context("Managed keys require a database (set `database.url` or DATABASE_URL)")?;
    let store = PostgresCredentialStore::new(db.get_pool().clone());

    match command {
        KeysCommand::Set { provider, key } => {
            let kind: ProviderKind = provider.parse()?;
            store.upsert(kind.as_str(), &key).await?;
            println!("{}", format!("✓ Stored API key for {}", kind).green());
        }
        KeysCommand::Deactivate { provider } => {
            let kind: ProviderKind = provider.parse()?;
            if store.deactivate(kind.as_str()).await? {
                println!("{}", format!("✓ Deactivated API key for {}", kind).green());
            } else {
                println!("{}", format!("No active API key for {}", kind).yellow());
            }
        }
    }

    Ok(())
}
