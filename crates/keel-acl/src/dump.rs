// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structured dump of ACLs and policies.
//!
//! These borrowed views serialize to the shape external tooling expects:
//!
//! ```json
//! {"policy": {
//!   "acl_user_map": [{"user": "alice", "acl": 1}],
//!   "acl_group_map": [{"group": 1, "acl": 1}],
//!   "grant_map": [{"id": "alice", "grant": {
//!     "type": {"type": 0}, "id": "alice", "email": "",
//!     "permission": ["read"], "display_name": "Alice", "group": 0}}],
//!   "owner": {"id": "owner", "display_name": "Owner"}}}
//! ```

use serde::Serialize;

use crate::acl::AccessControlList;
use crate::grant::Grant;
use crate::owner::Owner;
use crate::policy::AccessControlPolicy;

#[derive(Debug, Serialize)]
pub struct PolicyDump<'a> {
	policy: PolicySection<'a>,
}

impl<'a> PolicyDump<'a> {
	pub(crate) fn new(policy: &'a AccessControlPolicy) -> Self {
		Self {
			policy: PolicySection {
				acl: AclDump::new(policy.acl()),
				owner: OwnerDump::new(policy.owner()),
			},
		}
	}
}

#[derive(Debug, Serialize)]
struct PolicySection<'a> {
	#[serde(flatten)]
	acl: AclDump<'a>,
	owner: OwnerDump<'a>,
}

/// The three ACL arrays.
#[derive(Debug, Serialize)]
pub struct AclDump<'a> {
	acl_user_map: Vec<UserEntry<'a>>,
	acl_group_map: Vec<GroupEntry>,
	grant_map: Vec<GrantEntry<'a>>,
}

impl<'a> AclDump<'a> {
	pub(crate) fn new(acl: &'a AccessControlList) -> Self {
		Self {
			acl_user_map: acl
				.user_perms()
				.map(|(user, perm)| UserEntry {
					user,
					acl: perm.bits(),
				})
				.collect(),
			acl_group_map: acl
				.group_perms()
				.map(|(group, perm)| GroupEntry {
					group: group.code(),
					acl: perm.bits(),
				})
				.collect(),
			grant_map: acl
				.grants()
				.map(|(id, grant)| GrantEntry {
					id,
					grant: GrantDump::new(grant),
				})
				.collect(),
		}
	}
}

#[derive(Debug, Serialize)]
struct UserEntry<'a> {
	user: &'a str,
	acl: u32,
}

#[derive(Debug, Serialize)]
struct GroupEntry {
	group: u32,
	acl: u32,
}

#[derive(Debug, Serialize)]
struct GrantEntry<'a> {
	id: &'a str,
	grant: GrantDump<'a>,
}

#[derive(Debug, Serialize)]
struct GrantDump<'a> {
	#[serde(rename = "type")]
	grantee_type: TypeDump,
	id: &'a str,
	email: &'a str,
	permission: Vec<&'static str>,
	display_name: &'a str,
	group: u32,
}

impl<'a> GrantDump<'a> {
	fn new(grant: &'a Grant) -> Self {
		Self {
			grantee_type: TypeDump {
				code: grant.grantee().type_code(),
			},
			id: grant.canonical_id(),
			email: grant.email(),
			permission: grant.permission().dump_tags(),
			display_name: grant.display_name(),
			group: grant.group_target().code(),
		}
	}
}

#[derive(Debug, Serialize)]
struct TypeDump {
	#[serde(rename = "type")]
	code: u32,
}

#[derive(Debug, Serialize)]
struct OwnerDump<'a> {
	id: &'a str,
	display_name: &'a str,
}

impl<'a> OwnerDump<'a> {
	fn new(owner: &'a Owner) -> Self {
		Self {
			id: owner.id().as_str(),
			display_name: owner.display_name(),
		}
	}
}
