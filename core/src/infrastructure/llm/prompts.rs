// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Instruction templates shared by every provider adapter.
//
// Adapters with a native JSON response mode ask for an object envelope
// (`ReplyFormat::Envelope`) because those modes only emit top-level objects.

pub(crate) const SEARCH_SYSTEM_PROMPT: &str = "You are a helpful assistant with web search capabilities. \
Search the web for the latest information and return results in JSON format.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyFormat {
    /// Free text that should contain the bare JSON value
    Bare,
    /// A single JSON object; arrays are wrapped under a named key
    Envelope,
}

pub(crate) fn competitor_analysis(url: &str, analysis_type: &str) -> String {
    format!(
        r#"Analyze the competitor content at {url}. Focus on {analysis_type} content.

Provide a detailed analysis including:
1. Main content themes
2. Content strategy observations
3. Tone and style analysis
4. Target audience insights
5. Content gaps or opportunities

Format your response as a JSON object with the following structure:
{{
    "content_themes": [list of main themes with confidence scores],
    "content_strategy": [list of strategy observations],
    "tone_analysis": string description,
    "target_audience": string description,
    "opportunities": [list of content opportunities]
}}

Return only the JSON object, nothing else."#
    )
}

pub(crate) fn prompt_ideas(analysis_data: &serde_json::Value, num_ideas: u32, format: ReplyFormat) -> String {
    let analysis = serde_json::to_string_pretty(analysis_data).unwrap_or_else(|_| analysis_data.to_string());
    let (shape, closing) = match format {
        ReplyFormat::Bare => (
            "a JSON array of objects",
            "Return only the JSON array, nothing else.",
        ),
        ReplyFormat::Envelope => (
            "a JSON object with a \"prompt_ideas\" key holding an array of objects",
            "Return only the JSON object, nothing else.",
        ),
    };

    format!(
        r#"Based on the following competitor analysis, generate {num_ideas} creative prompt ideas for marketing content:

{analysis}

For each prompt idea:
1. Create a compelling prompt that would generate excellent marketing content
2. Assign a confidence score (0-100) based on how well it addresses the opportunities
3. Add a brief explanation of why this prompt would be effective

Format your response as {shape} with the following structure:
[
    {{
        "prompt_text": "The complete prompt text",
        "confidence_score": numeric score between 0-100,
        "explanation": "Brief explanation of effectiveness"
    }}
]

{closing}"#
    )
}

pub(crate) fn web_search(query: &str, format: ReplyFormat) -> String {
    match format {
        ReplyFormat::Bare => format!(
            "Search the web for: {query}. Return results as a JSON array of objects with \
'title', 'url', and 'snippet' fields. Return only the JSON array, nothing else."
        ),
        ReplyFormat::Envelope => format!(
            "Search the web for: {query}. Return a JSON object with a 'results' key holding \
an array of objects with 'title', 'url', and 'snippet' fields."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_template_embeds_inputs() {
        let prompt = competitor_analysis("https://example.com", "blog");
        assert!(prompt.contains("content at https://example.com"));
        assert!(prompt.contains("Focus on blog content"));
        assert!(prompt.contains("\"tone_analysis\""));
    }

    #[test]
    fn test_prompt_ideas_template_embeds_pretty_analysis() {
        let data = serde_json::json!({"tone_analysis": "casual"});
        let prompt = prompt_ideas(&data, 3, ReplyFormat::Bare);
        assert!(prompt.contains("generate 3 creative prompt ideas"));
        assert!(prompt.contains("\"tone_analysis\": \"casual\""));
        assert!(prompt.ends_with("Return only the JSON array, nothing else."));

        let envelope = prompt_ideas(&data, 3, ReplyFormat::Envelope);
        assert!(envelope.contains("\"prompt_ideas\" key"));
    }

    #[test]
    fn test_search_template_variants() {
        assert!(web_search("rust", ReplyFormat::Bare).contains("JSON array"));
        assert!(web_search("rust", ReplyFormat::Envelope).contains("'results' key"));
    }
}
