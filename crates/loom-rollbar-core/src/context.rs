// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context attached to a report (HTTP request, affected person).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator used when a header carries more than one value.
pub const HEADER_VALUE_SEPARATOR: &str = ", ";

/// The person affected by the reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
	pub id: String,
	#[serde(default, skip_serializing_if = "is_none_or_empty")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "is_none_or_empty")]
	pub email: Option<String>,
}

impl Person {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			username: None,
			email: None,
		}
	}

	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self
	}

	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}
}

fn is_none_or_empty(value: &Option<String>) -> bool {
	value.as_deref().map_or(true, str::is_empty)
}

/// HTTP request being served when the report was raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
	pub method: String,
	/// Request-target exactly as received on the request line.
	pub request_uri: Option<String>,
	/// URL reconstructed from the parsed request.
	pub url: Option<String>,
	/// Header name to every value received for it, in arrival order.
	pub headers: BTreeMap<String, Vec<String>>,
}

impl RequestContext {
	pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			url: Some(url.into()),
			..Default::default()
		}
	}

	pub fn with_request_uri(mut self, request_uri: impl Into<String>) -> Self {
		self.request_uri = Some(request_uri.into());
		self
	}

	/// Appends a value to `name`, keeping any values already present.
	pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.entry(name.into()).or_default().push(value.into());
		self
	}

	/// Replaces every value of `name` with `value`.
	pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), vec![value.into()]);
		self
	}

	/// The raw request-line URI when one was recorded, else the
	/// reconstructed URL.
	pub fn effective_url(&self) -> &str {
		match self.request_uri.as_deref() {
			Some(uri) if !uri.is_empty() => uri,
			_ => self.url.as_deref().unwrap_or_default(),
		}
	}

	/// Headers with multi-valued entries collapsed into one string.
	pub fn joined_headers(&self) -> BTreeMap<String, String> {
		self.headers
			.iter()
			.map(|(name, values)| (name.clone(), values.join(HEADER_VALUE_SEPARATOR)))
			.collect()
	}

	/// Captures method, URI and headers from an `http` request.
	///
	/// Header names come out lower-cased, as the `http` crate normalises them.
	pub fn from_http<B>(request: &http::Request<B>) -> Self {
		let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
		for (name, value) in request.headers() {
			headers
				.entry(name.as_str().to_string())
				.or_default()
				.push(String::from_utf8_lossy(value.as_bytes()).into_owned());
		}

		Self {
			method: request.method().as_str().to_string(),
			request_uri: None,
			url: Some(request.uri().to_string()),
			headers,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_request_uri_takes_precedence() {
		let ctx = RequestContext::new("GET", "http://reconstructed.example.com/y")
			.with_request_uri("http://example.com/x");
		assert_eq!(ctx.effective_url(), "http://example.com/x");
	}

	#[test]
	fn test_empty_request_uri_falls_back_to_url() {
		let ctx = RequestContext::new("GET", "http://rollbar.com").with_request_uri("");
		assert_eq!(ctx.effective_url(), "http://rollbar.com");
	}

	#[test]
	fn test_multi_valued_header_joined() {
		let ctx = RequestContext::new("GET", "http://rollbar.com")
			.add_header("Cache-Control", "no-cache")
			.add_header("Cache-Control", "no-store");
		assert_eq!(
			ctx.joined_headers().get("Cache-Control").map(String::as_str),
			Some("no-cache, no-store")
		);
	}

	#[test]
	fn test_set_header_replaces_values() {
		let ctx = RequestContext::new("GET", "/")
			.add_header("Accept", "text/html")
			.set_header("Accept", "application/json");
		assert_eq!(ctx.headers["Accept"], vec!["application/json".to_string()]);
	}

	#[test]
	fn test_from_http_request() {
		let request = http::Request::builder()
			.method("POST")
			.uri("http://example.com/items?id=1")
			.header("Content-Type", "application/json")
			.header("Cache-Control", "no-cache")
			.header("Cache-Control", "no-store")
			.body(())
			.unwrap();

		let ctx = RequestContext::from_http(&request);
		assert_eq!(ctx.method, "POST");
		assert_eq!(ctx.effective_url(), "http://example.com/items?id=1");

		let headers = ctx.joined_headers();
		assert_eq!(headers["content-type"], "application/json");
		assert_eq!(headers["cache-control"], "no-cache, no-store");
	}

	#[test]
	fn test_person_omits_empty_fields() {
		let person = Person::new("42").with_email("");
		let json = serde_json::to_value(&person).unwrap();
		assert_eq!(json, serde_json::json!({ "id": "42" }));
	}

	proptest! {
		#[test]
		fn joined_header_splits_back_into_values(
			values in proptest::collection::vec("[a-z0-9-]{1,12}", 1..6)
		) {
			let ctx = values.iter().fold(RequestContext::new("GET", "/"), |ctx, v| {
				ctx.add_header("X-Test", v.clone())
			});
			let joined = ctx.joined_headers();
			let parts: Vec<&str> = joined["X-Test"].split(HEADER_VALUE_SEPARATOR).collect();
			prop_assert_eq!(parts, values.iter().map(String::as_str).collect::<Vec<_>>());
		}
	}
}
