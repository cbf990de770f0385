// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Transient failure classification and an opt-in retry helper.
//!
//! SDK clients in this workspace never retry on their own. They classify
//! every failure as either transient (network-level, worth retrying) or
//! fatal, and callers that want bounded retries wrap the call in [`retry`].

use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

/// Classification of a failure for generic retry logic.
///
/// Mirrors the usual network error contract: a failure may report itself as
/// a timeout, as temporary, or as neither. Fatal failures answer `false` to
/// both and are never retried.
pub trait RetryableError {
	fn is_timeout(&self) -> bool;

	fn is_temporary(&self) -> bool;

	fn is_retryable(&self) -> bool {
		self.is_timeout() || self.is_temporary()
	}
}

impl RetryableError for reqwest::Error {
	fn is_timeout(&self) -> bool {
		reqwest::Error::is_timeout(self)
	}

	fn is_temporary(&self) -> bool {
		reqwest::Error::is_timeout(self) || self.is_connect() || self.is_request()
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential_delay = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped_delay = exponential_delay.min(cfg.max_delay.as_secs_f64());

	let final_delay = if cfg.jitter {
		capped_delay * (0.5 + fastrand::f64())
	} else {
		capped_delay
	};

	Duration::from_secs_f64(final_delay)
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or
/// `max_attempts` is exhausted.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Display,
{
	let mut attempt = 0;

	loop {
		let err = match f().await {
			Ok(result) => return Ok(result),
			Err(err) => err,
		};
		attempt += 1;

		if !err.is_retryable() {
			warn!(error = %err, attempt, "non-retryable error encountered");
			return Err(err);
		}

		if attempt >= cfg.max_attempts {
			warn!(
				error = %err,
				attempt,
				max_attempts = cfg.max_attempts,
				"max retry attempts exhausted"
			);
			return Err(err);
		}

		let delay = calculate_delay(cfg, attempt - 1);
		warn!(
			error = %err,
			attempt,
			delay_ms = delay.as_millis() as u64,
			"retrying after transient error"
		);
		tokio::time::sleep(delay).await;
	}
}
