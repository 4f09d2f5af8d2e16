// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod credentials;
pub mod db;
pub mod llm;
pub mod repositories;
