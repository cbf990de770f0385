// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rollbar client for posting error and message reports.

use std::sync::Arc;

use loom_rollbar_core::{Item, RequestContext};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::error::{classify_transport, FatalError, Result, RollbarError};
use crate::payload::Report;
use crate::stack::{StackCapturer, StackConfig};

/// Item endpoint over plain HTTP.
pub const HTTP_ENDPOINT: &str = "http://api.rollbar.com/api/1/item/";
/// Item endpoint over HTTPS (the default).
pub const HTTPS_ENDPOINT: &str = "https://api.rollbar.com/api/1/item/";

/// Builder for constructing a RollbarClient.
#[derive(Debug, Default)]
pub struct RollbarClientBuilder {
	access_token: Option<String>,
	environment: Option<String>,
	use_http: bool,
	endpoint: Option<String>,
	http_client: Option<Client>,
	stack_config: StackConfig,
}

impl RollbarClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the project access token (required).
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());
		self
	}

	/// Sets the environment name.
	///
	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.environment = Some(env.into());
		self
	}

	/// Posts to the plain HTTP endpoint instead of HTTPS.
	pub fn use_http(mut self, use_http: bool) -> Self {
		self.use_http = use_http;
		self
	}

	/// Overrides the item endpoint, e.g. for a relay or a test server.
	/// Takes precedence over [`use_http`](Self::use_http).
	pub fn endpoint(mut self, url: impl Into<String>) -> Self {
		self.endpoint = Some(url.into());
		self
	}

	/// Uses `client` as the HTTP transport.
	///
	/// Timeouts, proxies and TLS settings are whatever `client` was built
	/// with; the SDK adds none of its own.
	pub fn http_client(mut self, client: Client) -> Self {
		self.http_client = Some(client);
		self
	}

	/// Sets the frame filter used when capturing error stacks.
	pub fn stack_config(mut self, config: StackConfig) -> Self {
		self.stack_config = config;
		self
	}

	/// Builds the RollbarClient.
	pub fn build(self) -> Result<RollbarClient> {
		let access_token = self
			.access_token
			.filter(|t| !t.is_empty())
			.ok_or(RollbarError::MissingAccessToken)?;

		let endpoint = match self.endpoint {
			Some(url) => url,
			None if self.use_http => HTTP_ENDPOINT.to_string(),
			None => HTTPS_ENDPOINT.to_string(),
		};
		let endpoint = Url::parse(&endpoint).map_err(|_| RollbarError::InvalidEndpoint(endpoint))?;

		let http_client = match self.http_client {
			Some(client) => client,
			None => loom_common_http::builder()
				.build()
				.map_err(|e| RollbarError::Fatal(FatalError::Request(e)))?,
		};

		info!(endpoint = %endpoint, environment = ?self.environment, "Rollbar client initialized");

		Ok(RollbarClient {
			inner: Arc::new(RollbarClientInner {
				access_token,
				environment: self.environment.filter(|e| !e.is_empty()),
				endpoint,
				http_client,
				capturer: StackCapturer::new(self.stack_config),
			}),
		})
	}
}

struct RollbarClientInner {
	access_token: String,
	environment: Option<String>,
	endpoint: Url,
	http_client: Client,
	capturer: StackCapturer,
}

/// Client for posting reports to Rollbar.
///
/// Each call performs exactly one POST: no queueing, batching or retries.
/// Cloning is cheap and clones share the HTTP transport.
///
/// # Example
///
/// ```ignore
/// use loom_rollbar::{RollbarClient, Report, Level};
///
/// let client = RollbarClient::builder()
///     .access_token("post_server_item_token")
///     .environment("production")
///     .build()?;
///
/// if let Err(e) = load_config() {
///     client.post_error(&e).await?;
/// }
///
/// client
///     .post(&Report::message("cache rebuilt").with_level(Level::Info))
///     .await?;
/// ```
#[derive(Clone)]
pub struct RollbarClient {
	inner: Arc<RollbarClientInner>,
}

impl RollbarClient {
	/// Creates a new builder for constructing a RollbarClient.
	pub fn builder() -> RollbarClientBuilder {
		RollbarClientBuilder::new()
	}

	/// The URL reports are posted to.
	pub fn endpoint(&self) -> &Url {
		&self.inner.endpoint
	}

	/// Sends `report`.
	///
	/// Network-level transport failures come back as
	/// [`RollbarError::Transport`]; anything else, including a non-2xx
	/// response, as [`RollbarError::Fatal`].
	pub async fn post(&self, report: &Report) -> Result<()> {
		let item = self.item(report);
		let body = serde_json::to_vec(&item).map_err(FatalError::Serialization)?;

		debug!(
			endpoint = %self.inner.endpoint,
			is_error = report.is_error(),
			bytes = body.len(),
			"Posting Rollbar item"
		);

		let response = self
			.inner
			.http_client
			.post(self.inner.endpoint.clone())
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(classify_transport)?;

		let status = response.status();
		if status.is_success() {
			debug!(status = status.as_u16(), "Rollbar item accepted");
			return Ok(());
		}

		let body = response.text().await.map_err(FatalError::ResponseBody)?;
		warn!(status = status.as_u16(), body = %body, "Rollbar rejected item");
		Err(FatalError::Server {
			status: status.as_u16(),
			body,
		}
		.into())
	}

	/// Posts a plain message.
	pub async fn post_message(&self, message: impl Into<String>) -> Result<()> {
		self.post(&Report::message(message)).await
	}

	/// Posts a message raised while serving `request`.
	pub async fn post_request_message(
		&self,
		request: RequestContext,
		message: impl Into<String>,
	) -> Result<()> {
		self.post(&Report::message(message).with_request(request)).await
	}

	/// Posts an error together with the current stack.
	pub async fn post_error<E>(&self, error: &E) -> Result<()>
	where
		E: std::error::Error + ?Sized,
	{
		self.post(&Report::error(error)).await
	}

	/// Posts an error raised while serving `request`.
	pub async fn post_request_error<E>(&self, request: RequestContext, error: &E) -> Result<()>
	where
		E: std::error::Error + ?Sized,
	{
		self.post(&Report::error(error).with_request(request)).await
	}

	fn item(&self, report: &Report) -> Item {
		let mut data = report.build(&self.inner.capturer);
		data.environment = self.inner.environment.clone();
		Item {
			access_token: self.inner.access_token.clone(),
			data,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_rollbar_core::Body;

	fn client() -> RollbarClient {
		RollbarClient::builder().access_token("token_123").build().unwrap()
	}

	#[test]
	fn test_builder_requires_access_token() {
		let result = RollbarClientBuilder::new().environment("test").build();
		assert!(matches!(result, Err(RollbarError::MissingAccessToken)));
	}

	#[test]
	fn test_builder_rejects_empty_access_token() {
		let result = RollbarClientBuilder::new().access_token("").build();
		assert!(matches!(result, Err(RollbarError::MissingAccessToken)));
	}

	#[test]
	fn test_builder_defaults_to_https() {
		assert_eq!(client().endpoint().as_str(), HTTPS_ENDPOINT);
	}

	#[test]
	fn test_builder_use_http() {
		let client = RollbarClient::builder()
			.access_token("token_123")
			.use_http(true)
			.build()
			.unwrap();
		assert_eq!(client.endpoint().as_str(), HTTP_ENDPOINT);
	}

	#[test]
	fn test_builder_endpoint_override() {
		let client = RollbarClient::builder()
			.access_token("token_123")
			.use_http(true)
			.endpoint("http://127.0.0.1:8080/api/1/item/")
			.build()
			.unwrap();
		assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:8080/api/1/item/");
	}

	#[test]
	fn test_builder_rejects_invalid_endpoint() {
		let result = RollbarClient::builder()
			.access_token("token_123")
			.endpoint("not a url")
			.build();
		assert!(matches!(result, Err(RollbarError::InvalidEndpoint(url)) if url == "not a url"));
	}

	#[test]
	fn test_item_injects_token_and_environment() {
		let client = RollbarClient::builder()
			.access_token("token_123")
			.environment("staging")
			.build()
			.unwrap();

		let item = client.item(&Report::message("hi"));
		assert_eq!(item.access_token, "token_123");
		assert_eq!(item.data.environment.as_deref(), Some("staging"));
		assert!(matches!(item.data.body, Body::Message(_)));
	}

	#[test]
	fn test_item_without_environment() {
		let item = client().item(&Report::message("hi"));
		let value = serde_json::to_value(&item).unwrap();
		assert!(value["data"].get("environment").is_none());
	}
}
