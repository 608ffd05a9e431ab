// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted form of a policy.
//!
//! A [`PolicyDocument`] stores the owner and every raw grant with its exact
//! permission bits, aggregate bits included. Loading a document replays the
//! grants through [`AccessControlList::add_grant`], so the derived indices are
//! rebuilt rather than trusted from storage.

use serde::{Deserialize, Serialize};

use crate::acl::AccessControlList;
use crate::config::AclConfig;
use crate::diagnostics::{default_sink, SharedSink};
use crate::error::{AclError, Result};
use crate::grant::{Grant, Grantee, GranteeType, Group, UnknownGrantee, UserId};
use crate::owner::Owner;
use crate::permission::Permission;
use crate::policy::AccessControlPolicy;

/// Newest document version this crate writes and reads.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
	pub version: u32,
	#[serde(default)]
	pub owner: Owner,
	#[serde(default)]
	pub grants: Vec<StoredGrant>,
}

/// One grant as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGrant {
	#[serde(rename = "type")]
	pub grantee_type: u32,
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub display_name: String,
	#[serde(default)]
	pub group: u32,
	/// Raw permission bits.
	pub permission: u32,
}

impl StoredGrant {
	pub fn from_grant(grant: &Grant) -> Self {
		Self {
			grantee_type: grant.grantee().type_code(),
			id: grant.canonical_id().to_string(),
			email: grant.email().to_string(),
			display_name: grant.display_name().to_string(),
			group: grant.group_target().code(),
			permission: grant.permission().bits(),
		}
	}

	/// Rebuilds the grant. Unrecognised type codes become
	/// [`Grantee::Unknown`]; unrecognised group codes become [`Group::None`].
	pub fn into_grant(self) -> Grant {
		let permission = Permission::from_bits_retain(self.permission);
		let grant = match self.grantee_type {
			code if code == GranteeType::CanonicalUser.code() => {
				Grant::new(Grantee::CanonicalUser(UserId::new(self.id)), permission)
					.with_email(self.email)
			}
			code if code == GranteeType::EmailUser.code() => {
				Grant::new(Grantee::EmailUser(self.email), permission)
			}
			code if code == GranteeType::Group.code() => {
				Grant::new(Grantee::Group(Group::from_code(self.group)), permission)
					.with_email(self.email)
			}
			type_code => Grant::new(
				Grantee::Unknown(UnknownGrantee::new(type_code, self.id)),
				permission,
			)
			.with_email(self.email),
		};
		grant.with_display_name(self.display_name)
	}
}

impl PolicyDocument {
	/// Captures `policy` in its persisted form.
	pub fn from_policy(policy: &AccessControlPolicy) -> Self {
		Self {
			version: CURRENT_VERSION,
			owner: policy.owner().clone(),
			grants: policy
				.acl()
				.grants()
				.map(|(_, grant)| StoredGrant::from_grant(grant))
				.collect(),
		}
	}

	pub fn from_json(json: &str) -> Result<Self> {
		let document: PolicyDocument = serde_json::from_str(json)?;
		if document.version > CURRENT_VERSION {
			return Err(AclError::UnsupportedVersion {
				found: document.version,
				supported: CURRENT_VERSION,
			});
		}
		Ok(document)
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Checks the document against configured limits.
	pub fn validate(&self, config: &AclConfig) -> Result<()> {
		if self.grants.len() > config.max_grants {
			return Err(AclError::TooManyGrants {
				count: self.grants.len(),
				max: config.max_grants,
			});
		}
		Ok(())
	}

	/// Builds a policy reporting to the default sink.
	pub fn into_policy(self, config: &AclConfig) -> Result<AccessControlPolicy> {
		self.into_policy_with_sink(config, default_sink())
	}

	pub fn into_policy_with_sink(
		self,
		config: &AclConfig,
		sink: SharedSink,
	) -> Result<AccessControlPolicy> {
		self.validate(config)?;

		let mut acl = AccessControlList::with_sink(sink);
		for stored in self.grants {
			acl.add_grant(stored.into_grant());
		}
		Ok(AccessControlPolicy::new(acl, self.owner))
	}
}
