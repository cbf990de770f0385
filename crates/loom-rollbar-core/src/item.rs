// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire envelope posted to the item endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::{Person, RequestContext};
use crate::level::Level;
use crate::trace::{Exception, Frame};
use crate::{platform, LANGUAGE};

/// Top-level JSON object sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
	pub access_token: String,
	pub data: Data,
}

/// Report data. Every optional field is left out of the JSON when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
	pub body: Body,
	pub platform: String,
	pub language: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<Level>,
	/// Unix seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request: Option<RequestBlock>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub person: Option<Person>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<String>,
}

impl Data {
	/// Data carrying only `body` and the platform/language tags.
	pub fn new(body: Body) -> Self {
		Self {
			body,
			platform: platform(),
			language: LANGUAGE.to_string(),
			level: None,
			timestamp: None,
			context: None,
			request: None,
			person: None,
			environment: None,
		}
	}
}

/// Exactly one of a message or a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
	/// `body` holds the text; any other keys are caller metadata.
	Message(serde_json::Map<String, serde_json::Value>),
	Trace {
		frames: Vec<Frame>,
		exception: Exception,
	},
}

impl Body {
	pub fn is_trace(&self) -> bool {
		matches!(self, Body::Trace { .. })
	}
}

/// Request section of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBlock {
	pub url: String,
	pub method: String,
	pub headers: BTreeMap<String, String>,
}

impl From<&RequestContext> for RequestBlock {
	fn from(ctx: &RequestContext) -> Self {
		Self {
			url: ctx.effective_url().to_string(),
			method: ctx.method.clone(),
			headers: ctx.joined_headers(),
		}
	}
}
