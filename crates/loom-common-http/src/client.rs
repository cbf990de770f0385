// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};

/// Creates a new HTTP client builder with the standard Loom User-Agent header.
///
/// SDKs that accept an injected transport fall back to this when the
/// embedding application does not supply one.
///
/// # Example
/// ```ignore
/// let client = loom_common_http::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Returns the standard Loom User-Agent string.
///
/// Format: `loom/{version} ({os} {arch})`
pub fn user_agent() -> String {
	format!(
		"loom/{} ({} {})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
