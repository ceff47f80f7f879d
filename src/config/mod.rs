// ABOUTME: Configuration module organization for the Forkful server
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

/// Environment-variable configuration loading
pub mod environment;

pub use environment::{FdcSettings, ServerConfig};
