// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Diagnostic output for ACL ingestion and evaluation.
//!
//! ACLs and policies report what they do through a [`DiagnosticSink`]
//! injected at construction. The default [`TracingSink`] forwards to
//! `tracing` under the `keel_acl` target; [`MemorySink`] captures messages
//! for inspection and [`NullSink`] drops them.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Receiver of diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
	fn emit(&self, level: Level, message: fmt::Arguments<'_>);
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// The sink used when none is supplied.
pub fn default_sink() -> SharedSink {
	Arc::new(TracingSink)
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
		match level {
			Level::ERROR => tracing::error!(target: "keel_acl", "{message}"),
			Level::WARN => tracing::warn!(target: "keel_acl", "{message}"),
			Level::INFO => tracing::info!(target: "keel_acl", "{message}"),
			Level::DEBUG => tracing::debug!(target: "keel_acl", "{message}"),
			_ => tracing::trace!(target: "keel_acl", "{message}"),
		}
	}
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
	fn emit(&self, _level: Level, _message: fmt::Arguments<'_>) {}
}

/// Records diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
	entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything emitted so far.
	pub fn entries(&self) -> Vec<(Level, String)> {
		self.entries
			.lock()
			.map(|entries| entries.clone())
			.unwrap_or_default()
	}

	/// Messages emitted at exactly `level`.
	pub fn messages_at(&self, level: Level) -> Vec<String> {
		self.entries()
			.into_iter()
			.filter(|(l, _)| *l == level)
			.map(|(_, message)| message)
			.collect()
	}
}

impl DiagnosticSink for MemorySink {
	fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
		if let Ok(mut entries) = self.entries.lock() {
			entries.push((level, message.to_string()));
		}
	}
}
