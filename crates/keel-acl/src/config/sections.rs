// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections and their mergeable layers.

use serde::Deserialize;

/// Default cap on grants per policy, matching the S3 limit.
pub const DEFAULT_MAX_GRANTS: usize = 100;

/// Default log filter for binaries.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ACL configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclConfig {
	/// Largest number of grants a persisted policy may hold.
	pub max_grants: usize,
}

impl Default for AclConfig {
	fn default() -> Self {
		Self {
			max_grants: DEFAULT_MAX_GRANTS,
		}
	}
}

/// ACL configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AclConfigLayer {
	#[serde(default)]
	pub max_grants: Option<usize>,
}

impl AclConfigLayer {
	pub fn merge(&mut self, other: AclConfigLayer) {
		if other.max_grants.is_some() {
			self.max_grants = other.max_grants;
		}
	}

	pub fn finalize(self) -> AclConfig {
		AclConfig {
			max_grants: self.max_grants.unwrap_or(DEFAULT_MAX_GRANTS),
		}
	}
}

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	/// `EnvFilter` directive used when `RUST_LOG` is unset.
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LOG_LEVEL.to_string(),
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self
				.level
				.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
		}
	}
}

/// Top-level layer as read from one source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeelConfigLayer {
	#[serde(default)]
	pub acl: Option<AclConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl KeelConfigLayer {
	pub fn merge(&mut self, other: KeelConfigLayer) {
		if let Some(acl) = other.acl {
			self.acl.get_or_insert_with(Default::default).merge(acl);
		}
		if let Some(logging) = other.logging {
			self.logging
				.get_or_insert_with(Default::default)
				.merge(logging);
		}
	}
}
