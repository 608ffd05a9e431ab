// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Canned access control policies.
//!
//! Every canned policy starts from the default policy (owner has full
//! control) and adds group grants on top.

use std::fmt;
use std::str::FromStr;

use crate::error::AclError;
use crate::grant::{Grant, Group};
use crate::permission::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CannedAcl {
	/// Owner only.
	#[default]
	Private,
	/// Anyone may read.
	PublicRead,
	/// Anyone may read and write.
	PublicReadWrite,
	/// Any identified caller may read.
	AuthenticatedRead,
}

impl CannedAcl {
	pub fn all() -> &'static [CannedAcl] {
		&[
			CannedAcl::Private,
			CannedAcl::PublicRead,
			CannedAcl::PublicReadWrite,
			CannedAcl::AuthenticatedRead,
		]
	}

	/// Header spelling, e.g. `public-read`.
	pub fn as_str(self) -> &'static str {
		match self {
			CannedAcl::Private => "private",
			CannedAcl::PublicRead => "public-read",
			CannedAcl::PublicReadWrite => "public-read-write",
			CannedAcl::AuthenticatedRead => "authenticated-read",
		}
	}

	/// Grants added on top of the owner's full control.
	pub fn group_grants(self) -> Vec<Grant> {
		match self {
			CannedAcl::Private => vec![],
			CannedAcl::PublicRead => vec![Grant::group(Group::AllUsers, Permission::READ)],
			CannedAcl::PublicReadWrite => vec![Grant::group(
				Group::AllUsers,
				Permission::READ | Permission::WRITE,
			)],
			CannedAcl::AuthenticatedRead => {
				vec![Grant::group(Group::AuthenticatedUsers, Permission::READ)]
			}
		}
	}
}

impl fmt::Display for CannedAcl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for CannedAcl {
	type Err = AclError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		CannedAcl::all()
			.iter()
			.copied()
			.find(|canned| canned.as_str() == s)
			.ok_or_else(|| AclError::UnknownCannedAcl(s.to_string()))
	}
}
