// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates between the `LlmProvider` domain interface and one
// vendor API. Shared pieces: HTTP transport, instruction templates and the
// structured extraction protocol.

pub mod anthropic;
pub mod deepseek;
pub mod extraction;
pub mod gemini;
pub mod manus;
pub mod openai;
pub mod registry;
pub mod transport;

mod chat_completions;
mod prompts;

pub use registry::{ProviderRegistry, ProviderSummary};
pub use transport::AdapterSettings;
