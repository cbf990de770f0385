// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rollbar error and message reporting SDK for Rust applications.
//!
//! # Quick Start
//!
//! ```ignore
//! use loom_rollbar::{Level, Person, Report, RequestContext, RollbarClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rollbar = RollbarClient::builder()
//!         .access_token("post_server_item_token")
//!         .environment("production")
//!         .build()?;
//!
//!     // Errors carry the stack captured at the time of posting.
//!     if let Err(e) = std::fs::read_to_string("settings.toml") {
//!         rollbar.post_error(&e).await?;
//!     }
//!
//!     // Messages may carry extra metadata, request and person context.
//!     let report = Report::message("checkout slow")
//!         .with_level(Level::Warning)
//!         .with_extra("latency_ms", 2300)
//!         .with_request(RequestContext::new("POST", "https://shop.example.com/checkout"))
//!         .with_person(Person::new("42").with_username("ada"));
//!     rollbar.post(&report).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Failures
//!
//! A failed post is either [`RollbarError::Transport`] (network-level,
//! reports `is_temporary()`/`is_timeout()` from the transport) or
//! [`RollbarError::Fatal`] (never temporary). Both implement
//! [`loom_common_http::RetryableError`], so callers that want retries can
//! wrap a post in [`loom_common_http::retry`]; the client never retries on
//! its own.

mod client;
mod error;
mod payload;
mod stack;

pub use client::{RollbarClient, RollbarClientBuilder, HTTPS_ENDPOINT, HTTP_ENDPOINT};
pub use error::{FatalError, Result, RollbarError};
pub use payload::Report;
pub use stack::{StackCapturer, StackConfig, UNKNOWN};

// Re-export core types for convenience
pub use loom_rollbar_core::{
	Body, Data, ErrorClass, Exception, Frame, Item, Level, Person, RequestContext,
};
