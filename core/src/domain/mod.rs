// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Domain model for the content pipeline.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Entities, value objects and ports shared by every layer

pub mod llm;
pub mod content;
pub mod analysis;
pub mod generated;
pub mod credentials;
pub mod repository;
pub mod pipeline_config;
