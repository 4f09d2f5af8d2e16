// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering for pipeline records

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use promptforge_core::domain::analysis::{CompetitorAnalysis, PromptIdea};
use promptforge_core::domain::generated::GeneratedContent;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_analysis(analysis: &CompetitorAnalysis) {
    let result = &analysis.result;
    println!("{} {}", "Analysis".bold(), analysis.id.to_string().cyan());
    println!("  URL: {}", analysis.competitor_url);
    println!("  Type: {}", analysis.analysis_type);
    println!("  Provider: {}", analysis.provider);
    println!("  Created: {}", analysis.created_at.to_rfc3339());
    if result.is_degraded() {
        println!("  {}", "⚠ Provider returned a degraded result".yellow());
    }

    println!("  {}", "Themes:".bold());
    for theme in &result.content_themes {
        match theme.confidence {
            Some(confidence) => println!("    - {} ({})", theme.theme, confidence),
            None => println!("    - {}", theme.theme),
        }
    }
    print_list("Strategy:", &result.content_strategy);
    println!("  {} {}", "Tone:".bold(), result.tone_analysis);
    println!("  {} {}", "Audience:".bold(), result.target_audience);
    print_list("Opportunities:", &result.opportunities);
}

fn print_list(title: &str, items: &[String]) {
    println!("  {}", title.bold());
    for item in items {
        println!("    - {}", item);
    }
}

pub fn print_ideas(ideas: &[PromptIdea]) {
    if ideas.is_empty() {
        println!("{}", "No prompt ideas found".yellow());
        return;
    }

    println!("{} prompt ideas:", ideas.len());
    for idea in ideas {
        println!();
        println!(
            "{} {} {}",
            idea.id.to_string().cyan(),
            format!("[{:.0}]", idea.confidence_score).bold(),
            idea.prompt_text
        );
        println!("  {}", idea.explanation.dimmed());
    }
}

pub fn print_content(content: &GeneratedContent) {
    println!(
        "{} {} ({}, {})",
        "Content".bold(),
        content.id.to_string().cyan(),
        content.content_type(),
        content.provider
    );
    println!("  Prompt: {}", content.prompt_id);
    if let Some(text) = content.payload.content_text() {
        println!();
        println!("{}", text);
    }
    if let Some(url) = content.payload.content_url() {
        println!();
        println!("  {} {}", "URL:".bold(), url);
    }
}
