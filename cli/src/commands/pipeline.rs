// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pipeline commands
//!
//! Commands: analyze, ideas, generate, run

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use promptforge_core::application::{AnalyzeCompetitorRequest, GenerateContentRequest, GeneratePromptIdeasRequest};
use promptforge_core::domain::analysis::{AnalysisId, PromptIdeaId};
use promptforge_core::domain::generated::ContentType;
use promptforge_core::domain::llm::GenerationOptions;
use promptforge_core::domain::pipeline_config::PipelineConfig;

use super::output;
use crate::embedded::EmbeddedPipeline;

/// Per-call model settings
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Model identifier (default: provider's default)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Image size, e.g. 1024x1024
    #[arg(long)]
    size: Option<String>,

    /// Image quality, e.g. standard or hd
    #[arg(long)]
    quality: Option<String>,
}

impl ModelArgs {
    fn options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            size: self.size.clone(),
            quality: self.quality.clone(),
            num_ideas: None,
        }
    }
}

#[derive(Subcommand)]
pub enum PipelineCommand {
    /// Analyze a competitor's content
    Analyze {
        /// Page or site to analyze
        #[arg(value_name = "URL")]
        url: String,

        /// Kind of content to focus on
        #[arg(short = 't', long, default_value = "blog")]
        analysis_type: String,

        /// openai, claude, gemini, deepseek or manus
        #[arg(short, long, default_value = "openai")]
        provider: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate prompt ideas from a stored analysis
    Ideas {
        #[arg(value_name = "ANALYSIS_ID")]
        analysis_id: Uuid,

        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// Number of ideas to request
        #[arg(short, long, default_value_t = 5)]
        num_ideas: u32,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Generate content from a stored prompt idea
    Generate {
        #[arg(value_name = "PROMPT_ID")]
        prompt_id: Uuid,

        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// text, image, text+image or video
        #[arg(short = 't', long, default_value = "text")]
        content_type: ContentType,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Analyze, generate ideas and produce content for the best idea
    Run {
        #[arg(value_name = "URL")]
        url: String,

        #[arg(short = 't', long, default_value = "blog")]
        analysis_type: String,

        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// Provider for content generation (default: --provider)
        #[arg(long)]
        content_provider: Option<String>,

        #[arg(short, long, default_value_t = 3)]
        num_ideas: u32,

        /// text, image, text+image or video
        #[arg(long, default_value = "text")]
        content_type: ContentType,

        #[command(flatten)]
        model: ModelArgs,
    },
}

pub async fn handle_command(command: PipelineCommand, config: &PipelineConfig, json: bool) -> Result<()> {
    let pipeline = EmbeddedPipeline::new(config).await?;

    match command {
        PipelineCommand::Analyze {
            url,
            analysis_type,
            provider,
            model,
        } => analyze(&pipeline, url, analysis_type, provider, &model, json).await,
        PipelineCommand::Ideas {
            analysis_id,
            provider,
            num_ideas,
            model,
        } => ideas(&pipeline, AnalysisId(analysis_id), provider, num_ideas, &model, json).await,
        PipelineCommand::Generate {
            prompt_id,
            provider,
            content_type,
            model,
        } => generate(&pipeline, PromptIdeaId(prompt_id), provider, content_type, &model, json).await,
        PipelineCommand::Run {
            url,
            analysis_type,
            provider,
            content_provider,
            num_ideas,
            content_type,
            model,
        } => {
            let content_provider = content_provider.unwrap_or_else(|| provider.clone());
            run(
                &pipeline,
                RunPlan {
                    url,
                    analysis_type,
                    provider,
                    content_provider,
                    num_ideas,
                    content_type,
                },
                &model,
                json,
            )
            .await
        }
    }
}

async fn analyze(
    pipeline: &EmbeddedPipeline,
    url: String,
    analysis_type: String,
    provider: String,
    model: &ModelArgs,
    json: bool,
) -> Result<()> {
    if !json {
        println!("Analyzing {} with {}...", url.bold(), provider);
    }

    let analysis = pipeline
        .analysis
        .analyze_competitor(AnalyzeCompetitorRequest {
            competitor_url: url,
            analysis_type,
            provider,
            options: model.options(),
        })
        .await?;

    if json {
        output::print_json(&analysis)
    } else {
        output::print_analysis(&analysis);
        Ok(())
    }
}

async fn ideas(
    pipeline: &EmbeddedPipeline,
    analysis_id: AnalysisId,
    provider: String,
    num_ideas: u32,
    model: &ModelArgs,
    json: bool,
) -> Result<()> {
    let ideas = pipeline
        .analysis
        .generate_prompt_ideas(GeneratePromptIdeasRequest {
            analysis_id,
            provider,
            num_ideas: Some(num_ideas),
            options: model.options(),
        })
        .await?;

    if json {
        output::print_json(&ideas)
    } else {
        output::print_ideas(&ideas);
        Ok(())
    }
}

async fn generate(
    pipeline: &EmbeddedPipeline,
    prompt_id: PromptIdeaId,
    provider: String,
    content_type: ContentType,
    model: &ModelArgs,
    json: bool,
) -> Result<()> {
    let content = pipeline
        .content
        .generate_content(GenerateContentRequest {
            prompt_id,
            provider,
            content_type,
            options: model.options(),
        })
        .await?;

    if json {
        output::print_json(&content)
    } else {
        output::print_content(&content);
        Ok(())
    }
}

struct RunPlan {
    url: String,
    analysis_type: String,
    provider: String,
    content_provider: String,
    num_ideas: u32,
    content_type: ContentType,
}

async fn run(pipeline: &EmbeddedPipeline, plan: RunPlan, model: &ModelArgs, json: bool) -> Result<()> {
    let analysis = pipeline
        .analysis
        .analyze_competitor(AnalyzeCompetitorRequest {
            competitor_url: plan.url,
            analysis_type: plan.analysis_type,
            provider: plan.provider.clone(),
            options: model.options(),
        })
        .await?;
    if !json {
        output::print_analysis(&analysis);
        println!();
    }

    let ideas = pipeline
        .analysis
        .generate_prompt_ideas(GeneratePromptIdeasRequest {
            analysis_id: analysis.id,
            provider: plan.provider,
            num_ideas: Some(plan.num_ideas),
            options: model.options(),
        })
        .await?;
    if !json {
        output::print_ideas(&ideas);
        println!();
    }

    let Some(best) = ideas
        .iter()
        .max_by(|a, b| a.confidence_score.total_cmp(&b.confidence_score))
    else {
        anyhow::bail!("Provider returned no prompt ideas");
    };

    let content = pipeline
        .content
        .generate_content(GenerateContentRequest {
            prompt_id: best.id,
            provider: plan.content_provider,
            content_type: plan.content_type,
            options: model.options(),
        })
        .await?;

    if json {
        output::print_json(&serde_json::json!({
            "analysis": analysis,
            "prompt_ideas": ideas,
            "content": content,
        }))
    } else {
        output::print_content(&content);
        Ok(())
    }
}
