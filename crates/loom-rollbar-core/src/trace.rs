// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack frames and exception descriptions for error reports.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Class reported when a caller supplies an empty one.
const FALLBACK_CLASS: &str = "Error";

/// A single captured stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
	pub filename: String,
	pub lineno: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	/// Trimmed source line at `lineno`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
}

/// Error kind and text as shown by the tracking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
	pub class: String,
	pub message: String,
}

impl Exception {
	pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
		let class = class.into();
		Self {
			class: if class.is_empty() {
				FALLBACK_CLASS.to_string()
			} else {
				class
			},
			message: message.into(),
		}
	}

	/// Describes `error` using its static type name as the class.
	///
	/// For trait objects the name is the trait object type; implement
	/// [`ErrorClass`] and use [`Exception::from_classified`] to report
	/// something more specific.
	pub fn from_error<E>(error: &E) -> Self
	where
		E: std::error::Error + ?Sized,
	{
		Self::new(std::any::type_name::<E>(), error.to_string())
	}

	pub fn from_classified<E>(error: &E) -> Self
	where
		E: ErrorClass + ?Sized,
	{
		Self::new(error.error_class(), error.to_string())
	}
}

/// Errors that expose a stable, human-readable class for reporting.
///
/// ```ignore
/// impl ErrorClass for StoreError {
///     fn error_class(&self) -> Cow<'_, str> {
///         match self {
///             StoreError::NotFound(_) => "StoreError::NotFound".into(),
///             StoreError::Io(_) => "StoreError::Io".into(),
///         }
///     }
/// }
/// ```
pub trait ErrorClass: std::error::Error {
	fn error_class(&self) -> Cow<'_, str>;
}
