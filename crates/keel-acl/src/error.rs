// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for keel-acl.
//!
//! Policy evaluation itself never fails; these errors come from parsing,
//! loading persisted documents and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from policy documents and permission parsing.
#[derive(Debug, Error)]
pub enum AclError {
	/// Persisted document is not valid JSON or has the wrong shape.
	#[error("failed to parse policy document: {0}")]
	Json(#[from] serde_json::Error),

	/// Document was written by a newer encoder.
	#[error("unsupported policy document version {found} (supported up to {supported})")]
	UnsupportedVersion { found: u32, supported: u32 },

	/// Document holds more grants than configured.
	#[error("policy has {count} grants, limit is {max}")]
	TooManyGrants { count: usize, max: usize },

	#[error("unknown permission: {0}")]
	UnknownPermission(String),

	#[error("unknown canned acl: {0}")]
	UnknownCannedAcl(String),

	/// Policy has no owner id.
	#[error("policy has no owner")]
	MissingOwner,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Config file exists but could not be read.
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Environment variable holds a value of the wrong type.
	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	/// Validation error
	#[error("Validation error: {0}")]
	Validation(String),
}

/// Result type for keel-acl operations.
pub type Result<T> = std::result::Result<T, AclError>;
