// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Severity level of a report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
	Critical,
	Error,
	Warning,
	Info,
	Debug,
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Critical => write!(f, "critical"),
			Self::Error => write!(f, "error"),
			Self::Warning => write!(f, "warning"),
			Self::Info => write!(f, "info"),
			Self::Debug => write!(f, "debug"),
		}
	}
}

impl FromStr for Level {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"critical" => Ok(Self::Critical),
			"error" => Ok(Self::Error),
			"warning" => Ok(Self::Warning),
			"info" => Ok(Self::Info),
			"debug" => Ok(Self::Debug),
			_ => Err(CoreError::InvalidLevel(s.to_string())),
		}
	}
}
