// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Rollbar error and message reports.
//!
//! This crate defines the JSON wire format posted to the Rollbar item
//! endpoint together with the context types callers attach to a report.
//! It performs no I/O; stack capture and delivery live in `loom-rollbar`.

pub mod context;
pub mod error;
pub mod item;
pub mod level;
pub mod trace;

pub use context::{Person, RequestContext, HEADER_VALUE_SEPARATOR};
pub use error::{CoreError, Result};
pub use item::{Body, Data, Item, RequestBlock};
pub use level::Level;
pub use trace::{ErrorClass, Exception, Frame};

/// Language tag sent with every report.
pub const LANGUAGE: &str = "rust";

/// Platform tag in `{os} {arch}` format, e.g. "linux x86_64".
pub fn platform() -> String {
	format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
