// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration.
//!
//! Configuration is merged from built-in defaults, an optional TOML file and
//! environment variables (`KEEL_ACL_MAX_GRANTS`, `KEEL_LOG_LEVEL`), in that
//! order of precedence:
//!
//! ```toml
//! [acl]
//! max_grants = 100
//!
//! [logging]
//! level = "info"
//! ```

pub mod sections;
pub mod sources;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::ConfigError;

pub use sections::{
	AclConfig, AclConfigLayer, KeelConfigLayer, LoggingConfig, LoggingConfigLayer,
	DEFAULT_LOG_LEVEL, DEFAULT_MAX_GRANTS,
};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeelConfig {
	pub acl: AclConfig,
	pub logging: LoggingConfig,
}

/// Load configuration using the system config file.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`KEEL_ACL_MAX_GRANTS`, `KEEL_LOG_LEVEL`)
/// 2. Config file (`/etc/keel/acl.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<KeelConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<KeelConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` by precedence and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<KeelConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = KeelConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn finalize(layer: KeelConfigLayer) -> Result<KeelConfig, ConfigError> {
	let acl = layer.acl.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&acl)?;

	info!(
		max_grants = acl.max_grants,
		log_level = %logging.level,
		"ACL configuration loaded"
	);

	Ok(KeelConfig { acl, logging })
}

fn validate_config(acl: &AclConfig) -> Result<(), ConfigError> {
	if acl.max_grants == 0 {
		return Err(ConfigError::Validation(
			"acl.max_grants must be at least 1".to_string(),
		));
	}
	Ok(())
}
