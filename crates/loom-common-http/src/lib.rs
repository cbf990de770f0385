// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Loom SDKs.
//!
//! This crate provides:
//! - A pre-configured HTTP client with consistent User-Agent header
//! - The transient-vs-fatal failure classification shared by SDK errors
//! - An opt-in retry helper that honours that classification

mod client;
mod retry;

pub use client::{builder, user_agent};
pub use retry::{retry, RetryConfig, RetryableError};
