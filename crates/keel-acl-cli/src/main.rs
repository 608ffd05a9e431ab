// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Operator tool for Keel access control policies.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keel_acl::{
	AccessControlPolicy, AclConfig, CannedAcl, KeelConfig, Owner, Permission, PolicyDocument,
	ANONYMOUS_ID,
};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect and evaluate stored access control policies.
#[derive(Parser, Debug)]
#[command(name = "keel-acl", about = "Keel access control policy tool", version)]
struct Cli {
	/// Path to the TOML config file.
	#[arg(long, global = true, env = "KEEL_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the structured dump of a stored policy.
	Dump {
		/// Stored policy document (JSON).
		policy: PathBuf,
	},
	/// Decide whether a caller may perform a request.
	Check {
		/// Stored policy document (JSON).
		policy: PathBuf,
		/// Caller id.
		#[arg(long, conflicts_with = "anonymous", required_unless_present = "anonymous")]
		uid: Option<String>,
		/// Evaluate as an anonymous caller.
		#[arg(long)]
		anonymous: bool,
		/// Requested permissions, e.g. `read,write_acp`.
		#[arg(long)]
		perm: String,
		/// Upper bound on what the caller may be granted.
		#[arg(long, default_value = "full_control")]
		user_mask: String,
	},
	/// Print the stored document of a canned policy.
	Canned {
		/// One of private, public-read, public-read-write, authenticated-read.
		canned: String,
		/// Owner id.
		#[arg(long)]
		owner: String,
		/// Owner display name.
		#[arg(long, default_value = "")]
		display_name: String,
	},
}

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	let config = match &cli.config {
		Some(path) => keel_acl::load_config_with_file(path),
		None => keel_acl::load_config(),
	}
	.context("failed to load configuration")?;

	init_tracing(&config);

	match cli.command {
		Command::Dump { policy } => {
			let policy = load_policy(&policy, &config.acl)?;
			println!("{}", serde_json::to_string_pretty(&policy.dump())?);
			Ok(ExitCode::SUCCESS)
		}
		Command::Check {
			policy,
			uid,
			anonymous,
			perm,
			user_mask,
		} => {
			let policy = load_policy(&policy, &config.acl)?;
			if let Err(e) = policy.validate() {
				warn!(error = %e, "ownership-derived rights will not apply");
			}

			let uid = if anonymous {
				ANONYMOUS_ID.to_string()
			} else {
				uid.unwrap_or_default()
			};
			let requested: Permission = perm.parse()?;
			let user_mask: Permission = user_mask.parse()?;

			let allowed = policy.verify_permission(&uid, user_mask, requested);
			info!(uid = %uid, requested = %requested, allowed, "permission check");

			if allowed {
				println!("allowed");
				Ok(ExitCode::SUCCESS)
			} else {
				println!("denied");
				Ok(ExitCode::FAILURE)
			}
		}
		Command::Canned {
			canned,
			owner,
			display_name,
		} => {
			let canned: CannedAcl = canned.parse()?;
			let policy = AccessControlPolicy::canned(Owner::new(owner, display_name), canned);
			println!("{}", PolicyDocument::from_policy(&policy).to_json()?);
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn init_tracing(config: &KeelConfig) {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn load_policy(path: &Path, config: &AclConfig) -> Result<AccessControlPolicy> {
	debug!(path = %path.display(), "loading policy document");
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	let policy = PolicyDocument::from_json(&content)
		.and_then(|document| document.into_policy(config))
		.with_context(|| format!("invalid policy document {}", path.display()))?;
	Ok(policy)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn check_requires_uid_or_anonymous() {
		let result = Cli::try_parse_from(["keel-acl", "check", "policy.json", "--perm", "read"]);
		assert!(result.is_err());

		let cli = Cli::try_parse_from([
			"keel-acl",
			"check",
			"policy.json",
			"--anonymous",
			"--perm",
			"read",
		])
		.unwrap();
		assert!(matches!(cli.command, Command::Check { anonymous: true, .. }));
	}

	#[test]
	fn uid_and_anonymous_conflict() {
		let result = Cli::try_parse_from([
			"keel-acl",
			"check",
			"policy.json",
			"--uid",
			"alice",
			"--anonymous",
			"--perm",
			"read",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn canned_defaults_display_name() {
		let cli = Cli::try_parse_from(["keel-acl", "canned", "public-read", "--owner", "alice"])
			.unwrap();
		match cli.command {
			Command::Canned {
				canned,
				owner,
				display_name,
			} => {
				assert_eq!(canned, "public-read");
				assert_eq!(owner, "alice");
				assert_eq!(display_name, "");
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn load_policy_reads_stored_document() {
		let policy = AccessControlPolicy::canned(Owner::new("owner", ""), CannedAcl::PublicRead);
		let file = tempfile::NamedTempFile::new().unwrap();
		std::fs::write(
			file.path(),
			PolicyDocument::from_policy(&policy).to_json().unwrap(),
		)
		.unwrap();

		let loaded = load_policy(file.path(), &AclConfig::default()).unwrap();
		assert_eq!(loaded, policy);
	}

	#[test]
	fn load_policy_reports_path_on_error() {
		let err = load_policy(Path::new("/nonexistent/policy.json"), &AclConfig::default())
			.unwrap_err();
		assert!(err.to_string().contains("/nonexistent/policy.json"));
	}
}
