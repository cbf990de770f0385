// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Rollbar SDK.
//!
//! Failures fall into two kinds. Network-level transport failures are
//! surfaced unchanged as [`RollbarError::Transport`] and may be retried.
//! Everything else is a [`FatalError`], which reports itself as neither a
//! timeout nor temporary so that retry logic gives up immediately.

use loom_common_http::RetryableError;
use thiserror::Error;

/// Result type alias for Rollbar operations.
pub type Result<T> = std::result::Result<T, RollbarError>;

/// Errors that can occur in the Rollbar SDK.
#[derive(Debug, Error)]
pub enum RollbarError {
	/// No access token was configured.
	#[error("access token is required")]
	MissingAccessToken,

	/// The configured endpoint is not a valid URL.
	#[error("invalid endpoint URL: {0}")]
	InvalidEndpoint(String),

	/// Connection, timeout or send failure from the HTTP transport.
	#[error(transparent)]
	Transport(reqwest::Error),

	/// A failure that retrying cannot fix.
	#[error(transparent)]
	Fatal(#[from] FatalError),
}

impl RollbarError {
	pub fn is_fatal(&self) -> bool {
		matches!(self, RollbarError::Fatal(_))
	}

	pub fn is_timeout(&self) -> bool {
		match self {
			RollbarError::Transport(e) => RetryableError::is_timeout(e),
			_ => false,
		}
	}

	pub fn is_temporary(&self) -> bool {
		match self {
			RollbarError::Transport(e) => RetryableError::is_temporary(e),
			_ => false,
		}
	}
}

impl RetryableError for RollbarError {
	fn is_timeout(&self) -> bool {
		RollbarError::is_timeout(self)
	}

	fn is_temporary(&self) -> bool {
		RollbarError::is_temporary(self)
	}
}

/// Non-retryable failure while posting a report.
#[derive(Debug, Error)]
pub enum FatalError {
	#[error("failed to serialize report: {0}")]
	Serialization(#[source] serde_json::Error),

	/// The service answered with a non-2xx status; `body` is its response.
	#[error("report rejected (status {status}): {body}")]
	Server { status: u16, body: String },

	#[error("failed to read response body: {0}")]
	ResponseBody(#[source] reqwest::Error),

	/// A transport failure that is not network-level (e.g. request
	/// construction or redirect policy).
	#[error("HTTP request failed: {0}")]
	Request(#[source] reqwest::Error),
}

impl FatalError {
	pub fn is_timeout(&self) -> bool {
		false
	}

	pub fn is_temporary(&self) -> bool {
		false
	}
}

impl RetryableError for FatalError {
	fn is_timeout(&self) -> bool {
		false
	}

	fn is_temporary(&self) -> bool {
		false
	}
}

/// Sorts a `send` failure into transient or fatal.
pub(crate) fn classify_transport(err: reqwest::Error) -> RollbarError {
	if RetryableError::is_temporary(&err) {
		RollbarError::Transport(err)
	} else {
		RollbarError::Fatal(FatalError::Request(err))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn server_error(status: u16) -> RollbarError {
		FatalError::Server {
			status,
			body: "server error".to_string(),
		}
		.into()
	}

	#[test]
	fn test_server_error_is_fatal() {
		for status in [400, 401, 413, 429, 500, 503] {
			let err = server_error(status);
			assert!(err.is_fatal(), "status {status} should be fatal");
			assert!(!err.is_timeout());
			assert!(!err.is_temporary());
			assert!(!err.is_retryable());
		}
	}

	#[test]
	fn test_server_error_message_contains_body() {
		let err = server_error(500);
		let message = err.to_string();
		assert!(message.contains("server error"), "got: {message}");
		assert!(message.contains("500"));
	}

	#[test]
	fn test_serialization_error_is_fatal() {
		let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: RollbarError = FatalError::Serialization(json_err).into();
		assert!(err.is_fatal());
		assert!(!err.is_retryable());
	}

	#[test]
	fn test_configuration_errors_not_retryable() {
		assert!(!RollbarError::MissingAccessToken.is_retryable());
		assert!(!RollbarError::InvalidEndpoint("::".to_string()).is_retryable());
		assert!(!RollbarError::MissingAccessToken.is_fatal());
	}
}
