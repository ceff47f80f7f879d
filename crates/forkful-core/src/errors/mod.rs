// ABOUTME: Error module organization for the core crate
// ABOUTME: Houses the typed provider error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

/// Typed errors crossing the provider boundary
pub mod provider;

pub use provider::{ProviderError, ProviderResult};
