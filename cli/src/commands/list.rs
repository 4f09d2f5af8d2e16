// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use promptforge_core::domain::analysis::{AnalysisId, PromptIdeaId};
use promptforge_core::domain::pipeline_config::PipelineConfig;

use super::output;
use crate::embedded::EmbeddedPipeline;

#[derive(Subcommand)]
pub enum ListCommand {
    /// Stored analyses, newest first
    Analyses,

    /// Stored prompt ideas
    Ideas {
        /// Only ideas derived from this analysis
        #[arg(long, value_name = "ANALYSIS_ID")]
        analysis: Option<Uuid>,
    },

    /// Stored generated content
    Content {
        /// Only content generated from this prompt idea
        #[arg(long, value_name = "PROMPT_ID")]
        prompt: Option<Uuid>,
    },
}

pub async fn handle_command(command: ListCommand, config: &PipelineConfig, json: bool) -> Result<()> {
    if config.database.is_none() && !json {
        println!("{}", "No database configured; in-memory storage starts empty.".dimmed());
    }
    let pipeline = EmbeddedPipeline::new(config).await?;

    match command {
        ListCommand::Analyses => {
            let analyses = pipeline.analysis.list_analyses().await?;
            if json {
                return output::print_json(&analyses);
            }
            if analyses.is_empty() {
                println!("{}", "No analyses found".yellow());
                return Ok(());
            }
            println!("{} analyses found:", analyses.len());
            println!("{:<38} {:<10} {:<10} {}", "ID", "PROVIDER", "TYPE", "URL");
            for analysis in analyses {
                println!(
                    "{:<38} {:<10} {:<10} {}",
                    analysis.id,
                    analysis.provider,
                    analysis.analysis_type,
                    analysis.competitor_url.bold()
                );
            }
            Ok(())
        }
        ListCommand::Ideas { analysis } => {
            let ideas = pipeline.analysis.list_prompt_ideas(analysis.map(AnalysisId)).await?;
            if json {
                output::print_json(&ideas)
            } else {
                output::print_ideas(&ideas);
                Ok(())
            }
        }
        ListCommand::Content { prompt } => {
            let contents = pipeline.content.list_content(prompt.map(PromptIdeaId)).await?;
            if json {
                return output::print_json(&contents);
            }
            if contents.is_empty() {
                println!("{}", "No content found".yellow());
            }
            for content in &contents {
                output::print_content(content);
                println!();
            }
            Ok(())
        }
    }
}
