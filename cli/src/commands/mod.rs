// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the promptforge CLI

pub mod config;
pub mod keys;
pub mod list;
pub mod output;
pub mod pipeline;
pub mod providers;

pub use self::config::ConfigCommand;
pub use self::keys::KeysCommand;
pub use self::list::ListCommand;
pub use self::pipeline::PipelineCommand;
