// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! promptforge core
//!
//! Provider abstraction, JSON extraction protocol and orchestration services
//! for the promptforge marketing-content pipeline.
//!
//! # Architecture
//!
//! - **domain:** entities, value objects, provider and repository contracts
//! - **application:** analysis and content services
//! - **infrastructure:** provider adapters, registry, credential stores, persistence

pub mod application;
pub mod domain;
pub mod infrastructure;
