// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack frame capture for error reports.
//!
//! Capture is best-effort: a frame whose symbol, file or source line cannot
//! be resolved is still reported with whatever information is available.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use loom_rollbar_core::Frame;
use rustc_demangle::demangle;
use tracing::debug;

/// Placeholder for a function name or source line that could not be resolved.
pub const UNKNOWN: &str = "???";

const UNWIND_FN: &str = concat!(module_path!(), "::unwind");
const CAPTURER_TYPE: &str = concat!(module_path!(), "::StackCapturer");

/// Frame filtering applied by a [`StackCapturer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
	/// Frames whose file path contains this substring are dropped.
	pub skip_path: Option<String>,
}

impl StackConfig {
	pub fn with_skip_path(path: impl Into<String>) -> Self {
		Self {
			skip_path: Some(path.into()),
		}
	}

	/// Keeps every frame, including the SDK's own.
	pub fn unfiltered() -> Self {
		Self { skip_path: None }
	}
}

impl Default for StackConfig {
	/// Hides frames from this crate's own sources.
	fn default() -> Self {
		Self::with_skip_path(env!("CARGO_MANIFEST_DIR"))
	}
}

/// Frame as produced by the unwinder, before shaping.
#[derive(Debug, Clone, Default)]
struct RawFrame {
	symbol: Option<String>,
	file: Option<PathBuf>,
	line: Option<u32>,
}

/// Captures the call chain at the point an error is reported.
#[derive(Debug, Clone, Default)]
pub struct StackCapturer {
	config: StackConfig,
}

impl StackCapturer {
	pub fn new(config: StackConfig) -> Self {
		Self { config }
	}

	/// Returns the caller's frames, innermost first.
	#[inline(never)]
	pub fn capture(&self) -> Vec<Frame> {
		self.shape(unwind())
	}

	fn shape(&self, raw: Vec<RawFrame>) -> Vec<Frame> {
		let mut sources = SourceCache::default();

		// Unnamed frames inside the leading internal run are dropped with it;
		// a stack with no names at all is kept whole.
		let leading = raw
			.iter()
			.take_while(|frame| frame.symbol.as_deref().map_or(true, is_capture_internal))
			.enumerate()
			.filter(|(_, frame)| frame.symbol.is_some())
			.last()
			.map_or(0, |(idx, _)| idx + 1);

		raw.into_iter()
			.skip(leading)
			.filter(|frame| !self.is_skipped(frame.file.as_deref()))
			.map(|frame| {
				let method = Some(function_name(frame.symbol.as_deref()));
				let lineno = frame.line.unwrap_or(0);

				let Some(file) = frame.file else {
					return Frame {
						filename: UNKNOWN.to_string(),
						lineno,
						method,
						code: None,
					};
				};

				let code = sources
					.lines(&file)
					.map(|lines| source_line(lines, lineno).to_string());

				Frame {
					filename: file.to_string_lossy().into_owned(),
					lineno,
					method,
					code,
				}
			})
			.collect()
	}

	fn is_skipped(&self, file: Option<&Path>) -> bool {
		match (self.config.skip_path.as_deref(), file) {
			(Some(skip), Some(file)) if !skip.is_empty() => file.to_string_lossy().contains(skip),
			_ => false,
		}
	}
}

#[inline(never)]
fn unwind() -> Vec<RawFrame> {
	let mut frames = Vec::new();

	backtrace::trace(|frame| {
		backtrace::resolve_frame(frame, |symbol| {
			frames.push(RawFrame {
				symbol: symbol.name().and_then(|name| name.as_str().map(str::to_owned)),
				file: symbol.filename().map(Path::to_path_buf),
				line: symbol.lineno(),
			});
		});
		true
	});

	frames
}

/// Whether a raw symbol belongs to the unwinder or to this module.
fn is_capture_internal(symbol: &str) -> bool {
	let name = format!("{:#}", demangle(symbol));
	name.starts_with("backtrace::")
		|| name.starts_with("<backtrace::")
		|| name.contains(UNWIND_FN)
		|| name.contains(CAPTURER_TYPE)
}

/// Demangles `symbol` and drops the hash suffix and leading crate segment.
fn function_name(symbol: Option<&str>) -> String {
	let Some(symbol) = symbol.filter(|s| !s.is_empty()) else {
		return UNKNOWN.to_string();
	};

	let name = format!("{:#}", demangle(symbol)).replace("{{closure}}", "{closure}");

	if name.starts_with('<') {
		return name;
	}
	match name.split_once("::") {
		Some((_, rest)) if !rest.is_empty() => rest.to_string(),
		_ => name,
	}
}

/// Trimmed 1-indexed `lineno` of `lines`, or [`UNKNOWN`] when out of range.
fn source_line(lines: &[String], lineno: u32) -> &str {
	(lineno as usize)
		.checked_sub(1)
		.and_then(|idx| lines.get(idx))
		.map_or(UNKNOWN, |line| line.trim_matches(|c: char| c == ' ' || c == '\t'))
}

/// Source files read during one capture. Failed reads are remembered too.
#[derive(Debug, Default)]
struct SourceCache {
	files: HashMap<PathBuf, Option<Vec<String>>>,
}

impl SourceCache {
	fn lines(&mut self, path: &Path) -> Option<&[String]> {
		self.files
			.entry(path.to_path_buf())
			.or_insert_with(|| match fs::read(path) {
				Ok(bytes) => Some(
					String::from_utf8_lossy(&bytes)
						.lines()
						.map(str::to_owned)
						.collect(),
				),
				Err(e) => {
					debug!(path = %path.display(), error = %e, "Source file unavailable for snippet");
					None
				}
			})
			.as_deref()
	}
}
