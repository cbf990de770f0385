// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report construction and conversion into the wire format.

use chrono::{DateTime, Utc};
use loom_rollbar_core::{
	Body, Data, ErrorClass, Exception, Level, Person, RequestBlock, RequestContext,
};
use serde_json::{Map, Value};

use crate::stack::StackCapturer;

#[derive(Debug, Clone, PartialEq)]
enum Content {
	Message {
		text: String,
		extra: Map<String, Value>,
	},
	Error(Exception),
}

/// A single error or message report.
///
/// ```ignore
/// let report = Report::message("cache warmed")
///     .with_level(Level::Info)
///     .with_extra("entries", 1024)
///     .with_person(Person::new("42").with_username("ada"));
/// client.post(&report).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
	content: Content,
	level: Option<Level>,
	timestamp: Option<DateTime<Utc>>,
	context: Option<String>,
	request: Option<RequestContext>,
	person: Option<Person>,
}

impl Report {
	fn with_content(content: Content) -> Self {
		Self {
			content,
			level: None,
			timestamp: None,
			context: None,
			request: None,
			person: None,
		}
	}

	pub fn message(text: impl Into<String>) -> Self {
		Self::with_content(Content::Message {
			text: text.into(),
			extra: Map::new(),
		})
	}

	/// Error report classed by the static type of `error`.
	pub fn error<E>(error: &E) -> Self
	where
		E: std::error::Error + ?Sized,
	{
		Self::exception(Exception::from_error(error))
	}

	/// Error report classed by [`ErrorClass::error_class`].
	pub fn classified_error<E>(error: &E) -> Self
	where
		E: ErrorClass + ?Sized,
	{
		Self::exception(Exception::from_classified(error))
	}

	pub fn exception(exception: Exception) -> Self {
		Self::with_content(Content::Error(exception))
	}

	pub fn with_level(mut self, level: Level) -> Self {
		self.level = Some(level);
		self
	}

	pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = Some(timestamp);
		self
	}

	pub fn with_context(mut self, context: impl Into<String>) -> Self {
		self.context = Some(context.into());
		self
	}

	pub fn with_request(mut self, request: RequestContext) -> Self {
		self.request = Some(request);
		self
	}

	pub fn with_person(mut self, person: Person) -> Self {
		self.person = Some(person);
		self
	}

	/// Adds a metadata field next to the message text. Ignored for error
	/// reports. A `body` key replaces the text.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		if let Content::Message { extra, .. } = &mut self.content {
			extra.insert(key.into(), value.into());
		}
		self
	}

	pub fn is_error(&self) -> bool {
		matches!(self.content, Content::Error(_))
	}

	/// Converts the report into wire data. The stack is captured here, and
	/// only for error reports; access token and environment are left to the
	/// client.
	pub fn build(&self, capturer: &StackCapturer) -> Data {
		let body = match &self.content {
			Content::Message { text, extra } => {
				let mut message = Map::with_capacity(extra.len() + 1);
				message.insert("body".to_string(), Value::String(text.clone()));
				message.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
				Body::Message(message)
			}
			Content::Error(exception) => Body::Trace {
				frames: capturer.capture(),
				exception: exception.clone(),
			},
		};

		let mut data = Data::new(body);
		data.level = self.level;
		data.timestamp = self
			.timestamp
			.map(|ts| ts.timestamp())
			.filter(|secs| *secs != 0);
		data.context = self.context.clone().filter(|c| !c.is_empty());
		data.request = self.request.as_ref().map(RequestBlock::from);
		data.person = self.person.clone();
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::stack::StackConfig;
	use chrono::TimeZone;
	use loom_rollbar_core::platform;
	use serde_json::json;

	fn capturer() -> StackCapturer {
		StackCapturer::new(StackConfig::unfiltered())
	}

	#[test]
	fn test_message_report_with_request() {
		let request = RequestContext::new("GET", "http://rollbar.com")
			.set_header("Content-Type", "application/json")
			.add_header("Cache-Control", "no-cache")
			.add_header("Cache-Control", "no-store");

		let report = Report::message("Hello!")
			.with_level(Level::Error)
			.with_context("rollbar#test")
			.with_request(request);

		let actual = serde_json::to_value(report.build(&capturer())).unwrap();
		let expected = json!({
			"body": {
				"message": {
					"body": "Hello!"
				}
			},
			"level": "error",
			"platform": platform(),
			"language": "rust",
			"context": "rollbar#test",
			"request": {
				"method": "GET",
				"url": "http://rollbar.com",
				"headers": {
					"Content-Type": "application/json",
					"Cache-Control": "no-cache, no-store"
				}
			}
		});
		assert_eq!(actual, expected);
	}

	#[test]
	fn test_message_extras_are_flattened() {
		let report = Report::message("deploy finished")
			.with_extra("revision", "abc123")
			.with_extra("duration_ms", 1500);

		let data = report.build(&capturer());
		assert!(!data.body.is_trace());
		assert_eq!(
			serde_json::to_value(&data.body).unwrap(),
			json!({
				"message": {
					"body": "deploy finished",
					"revision": "abc123",
					"duration_ms": 1500
				}
			})
		);
	}

	#[test]
	fn test_extra_body_key_overrides_text() {
		let report = Report::message("original").with_extra("body", "replaced");
		let value = serde_json::to_value(report.build(&capturer())).unwrap();
		assert_eq!(value["body"]["message"]["body"], json!("replaced"));
	}

	#[test]
	fn test_error_report_has_trace() {
		let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
		let report = Report::error(&err).with_extra("ignored", true);
		assert!(report.is_error());

		let data = report.build(&capturer());
		match data.body {
			Body::Trace { exception, .. } => {
				assert!(!exception.class.is_empty());
				assert_eq!(exception.message, "config.toml missing");
			}
			Body::Message(_) => panic!("expected trace body"),
		}
	}

	#[test]
	fn test_error_report_frames_respect_skip_path() {
		let capturer = StackCapturer::new(StackConfig::with_skip_path("/rustc/"));
		let data = Report::exception(Exception::new("Timeout", "upstream slow")).build(&capturer);

		let Body::Trace { frames, .. } = data.body else {
			panic!("expected trace body");
		};
		assert!(!frames.is_empty());
		assert!(frames.iter().all(|f| !f.filename.contains("/rustc/")));
	}

	#[test]
	fn test_optional_fields_omitted_when_unset_or_empty() {
		let report = Report::message("quiet")
			.with_context("")
			.with_timestamp(Utc.timestamp_opt(0, 0).unwrap());

		let value = serde_json::to_value(report.build(&capturer())).unwrap();
		let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
		assert_eq!(keys.len(), 3, "unexpected keys: {keys:?}");
		for key in ["body", "platform", "language"] {
			assert!(keys.contains(&key));
		}
	}

	#[test]
	fn test_timestamp_and_person_included_when_set() {
		let report = Report::message("signed in")
			.with_timestamp(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
			.with_person(Person::new("42").with_username("ada"));

		let value = serde_json::to_value(report.build(&capturer())).unwrap();
		assert_eq!(value["timestamp"], json!(1_700_000_000));
		assert_eq!(value["person"], json!({ "id": "42", "username": "ada" }));
	}

	#[test]
	fn test_build_is_deterministic() {
		let report = Report::message("same")
			.with_level(Level::Warning)
			.with_extra("attempt", 2)
			.with_person(Person::new("7").with_email("a@example.com"));

		assert_eq!(report.build(&capturer()), report.build(&capturer()));
	}
}
