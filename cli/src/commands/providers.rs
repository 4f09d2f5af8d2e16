// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use colored::Colorize;

use promptforge_core::domain::pipeline_config::PipelineConfig;
use promptforge_core::infrastructure::llm::ProviderRegistry;

use super::output;

pub async fn handle_command(config: &PipelineConfig, json: bool) -> Result<()> {
    let registry = ProviderRegistry::from_config(config);
    let providers = registry.describe();

    if json {
        let rows: Vec<_> = providers
            .iter()
            .map(|p| {
                serde_json::json!({
                    "provider": p.kind,
                    "enabled": p.enabled,
                    "endpoint": p.endpoint,
                    "default_model": p.default_model,
                    "credential_configured": p.credential_configured,
                })
            })
            .collect();
        return output::print_json(&rows);
    }

    println!("{:<10} {:<9} {:<28} {:<6} {}", "PROVIDER", "ENABLED", "DEFAULT MODEL", "KEY", "ENDPOINT");
    for p in providers {
        let enabled = if p.enabled { "yes".green() } else { "no".red() };
        let key = if p.credential_configured { "✓".green() } else { "-".dimmed() };
        println!(
            "{:<10} {:<9} {:<28} {:<6} {}",
            p.kind.as_str().bold(),
            enabled,
            p.default_model,
            key,
            p.endpoint
        );
    }

    Ok(())
}
