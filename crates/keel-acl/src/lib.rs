// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control for the Keel object gateway.
//!
//! This crate implements the permission algebra beneath the gateway's S3 and
//! Swift front ends. Protocol parsers turn grant documents into [`Grant`]s,
//! feed them to an [`AccessControlList`], and wrap the list with the resource
//! [`Owner`] in an [`AccessControlPolicy`] that answers authorization queries.
//!
//! # Overview
//!
//! - [`Permission`]: bitset of READ, WRITE, READ_ACP, WRITE_ACP and the Swift
//!   aggregate bits READ_OBJS / WRITE_OBJS
//! - [`Grant`]: a [`Grantee`] (user or [`Group`]) plus a permission
//! - [`AccessControlList`]: raw grants and derived per-user / per-group unions
//! - [`AccessControlPolicy`]: effective permission resolution and verification
//! - [`PolicyDocument`]: lossless persisted form
//! - [`CannedAcl`]: `private`, `public-read`, `public-read-write`,
//!   `authenticated-read`
//!
//! # Example
//!
//! ```
//! use keel_acl::{AccessControlList, AccessControlPolicy, Grant, Group, Owner, Permission, ANONYMOUS_ID};
//!
//! let mut acl = AccessControlList::new();
//! acl.add_grant(Grant::canonical_user("alice", "Alice", Permission::READ));
//! acl.add_grant(Grant::group(Group::AuthenticatedUsers, Permission::WRITE));
//! let policy = AccessControlPolicy::new(acl, Owner::new("owner", "Owner"));
//!
//! assert!(policy.verify_permission("alice", Permission::FULL_CONTROL, Permission::READ | Permission::WRITE));
//! assert!(!policy.verify_permission(ANONYMOUS_ID, Permission::FULL_CONTROL, Permission::WRITE));
//! ```

pub mod acl;
pub mod canned;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod dump;
pub mod error;
pub mod grant;
pub mod owner;
pub mod permission;
pub mod policy;

pub use acl::AccessControlList;
pub use canned::CannedAcl;
pub use config::{load_config, load_config_with_file, AclConfig, KeelConfig, LoggingConfig};
pub use diagnostics::{default_sink, DiagnosticSink, MemorySink, NullSink, SharedSink, TracingSink};
pub use document::{PolicyDocument, StoredGrant, CURRENT_VERSION};
pub use dump::{AclDump, PolicyDump};
pub use error::{AclError, ConfigError, Result};
pub use grant::{
	Grant, Grantee, GranteeType, Group, UnknownGrantee, UserId, ALL_USERS_URI, ANONYMOUS_ID,
	AUTHENTICATED_USERS_URI,
};
pub use owner::Owner;
pub use permission::Permission;
pub use policy::AccessControlPolicy;

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;
	use std::sync::Arc;

	use super::*;
	use proptest::prelude::*;

	fn arb_permission() -> impl Strategy<Value = Permission> {
		(0u32..0x40).prop_map(Permission::from_bits_retain)
	}

	fn arb_id() -> impl Strategy<Value = String> {
		prop_oneof![
			Just("alice".to_string()),
			Just("bob".to_string()),
			Just("owner".to_string()),
			Just(ANONYMOUS_ID.to_string()),
			Just(String::new()),
		]
	}

	fn arb_group() -> impl Strategy<Value = Group> {
		prop_oneof![
			Just(Group::None),
			Just(Group::AllUsers),
			Just(Group::AuthenticatedUsers),
		]
	}

	fn arb_grant() -> impl Strategy<Value = Grant> {
		prop_oneof![
			(arb_id(), arb_permission()).prop_map(|(id, perm)| Grant::canonical_user(id, "", perm)),
			(arb_id(), arb_permission()).prop_map(|(id, perm)| Grant::email_user(id, perm)),
			(arb_group(), arb_permission()).prop_map(|(group, perm)| Grant::group(group, perm)),
		]
	}

	fn build_policy(grants: &[Grant], owner: &str) -> AccessControlPolicy {
		let mut acl = AccessControlList::with_sink(Arc::new(NullSink));
		for grant in grants {
			acl.add_grant(grant.clone());
		}
		AccessControlPolicy::new(acl, Owner::new(owner, ""))
	}

	/// Every source unioned unconditionally, without the early return.
	fn unconditional_perm(policy: &AccessControlPolicy, id: &str, mask: Permission) -> Permission {
		let acl = policy.acl();
		let mut perm = acl.get_perm(id, mask);
		if policy.owner().id().as_str() == id {
			perm |= mask & Permission::ACP;
		}
		perm |= acl.get_group_perm(Group::AllUsers, mask);
		if !Group::AllUsers.matches_id(id) {
			perm |= acl.get_group_perm(Group::AuthenticatedUsers, mask);
		}
		perm
	}

	// Property-based tests for effective permission resolution
	proptest! {
		#[test]
		fn short_circuit_matches_unconditional_union(
			grants in prop::collection::vec(arb_grant(), 0..12),
			owner in arb_id(),
			id in arb_id(),
			mask in arb_permission(),
		) {
			let policy = build_policy(&grants, &owner);
			prop_assert_eq!(policy.get_perm(&id, mask), unconditional_perm(&policy, &id, mask));
		}

		#[test]
		fn effective_perm_is_within_mask(
			grants in prop::collection::vec(arb_grant(), 0..12),
			owner in arb_id(),
			id in arb_id(),
			mask in arb_permission(),
		) {
			let policy = build_policy(&grants, &owner);
			let perm = policy.get_perm(&id, mask);
			prop_assert_eq!(perm & mask, perm);
		}

		#[test]
		fn owner_always_has_acp(
			grants in prop::collection::vec(arb_grant(), 0..12),
			owner in "[a-z]{1,12}",
		) {
			let policy = build_policy(&grants, &owner);
			prop_assert_eq!(policy.get_perm(&owner, Permission::ACP), Permission::ACP);
		}

		#[test]
		fn lookups_are_idempotent(
			grants in prop::collection::vec(arb_grant(), 0..12),
			id in arb_id(),
			group in arb_group(),
			mask in arb_permission(),
		) {
			let policy = build_policy(&grants, "owner");
			let acl = policy.acl();
			prop_assert_eq!(acl.get_perm(&id, mask), acl.get_perm(&id, mask));
			prop_assert_eq!(acl.get_group_perm(group, mask), acl.get_group_perm(group, mask));
			prop_assert_eq!(policy.get_perm(&id, mask), policy.get_perm(&id, mask));
		}
	}

	// Property-based tests for ACL index consistency
	proptest! {
		#[test]
		fn derived_indices_equal_union_of_raw_grants(
			grants in prop::collection::vec(arb_grant(), 0..16),
		) {
			let policy = build_policy(&grants, "owner");
			let acl = policy.acl();

			let mut users: BTreeMap<String, Permission> = BTreeMap::new();
			let mut groups: BTreeMap<Group, Permission> = BTreeMap::new();
			for grant in &grants {
				match grant.grantee() {
					Grantee::Group(group) => *groups.entry(*group).or_default() |= grant.permission(),
					_ => {
						if let Some(id) = grant.id() {
							*users.entry(id.to_string()).or_default() |= grant.permission();
						}
					}
				}
			}

			let derived_users: BTreeMap<String, Permission> =
				acl.user_perms().map(|(id, perm)| (id.to_string(), perm)).collect();
			let derived_groups: BTreeMap<Group, Permission> = acl.group_perms().collect();
			prop_assert_eq!(derived_users, users);
			prop_assert_eq!(derived_groups, groups);
			prop_assert_eq!(acl.grant_count(), grants.len());
		}

		#[test]
		fn full_control_lookup_returns_union_for_id(
			grants in prop::collection::vec(arb_grant(), 1..16),
		) {
			let policy = build_policy(&grants, "owner");
			for grant in &grants {
				if let (Some(id), false) = (grant.id(), matches!(grant.grantee(), Grantee::Group(_))) {
					let expected = grants
						.iter()
						.filter(|g| g.id() == Some(id) && !matches!(g.grantee(), Grantee::Group(_)))
						.fold(Permission::NONE, |acc, g| acc | g.permission());
					prop_assert_eq!(
						policy.acl().get_perm(id, Permission::FULL_CONTROL),
						expected & Permission::FULL_CONTROL
					);
				}
			}
		}

		#[test]
		fn full_control_iff_all_base_bits(bits in 0u32..0x40) {
			let perm = Permission::from_bits_retain(bits);
			prop_assert_eq!(perm.is_full_control(), bits & 0x0f == 0x0f);
		}

		#[test]
		fn verify_requires_every_requested_bit(
			grants in prop::collection::vec(arb_grant(), 0..12),
			id in arb_id(),
			user_mask in arb_permission(),
			requested in arb_permission(),
		) {
			let policy = build_policy(&grants, "owner");
			if policy.verify_permission(&id, user_mask, requested) {
				prop_assert!(user_mask.covers(requested));
			}
		}

		#[test]
		fn document_round_trip_preserves_grants(
			grants in prop::collection::vec(arb_grant(), 0..16),
			owner in "[a-z]{1,12}",
		) {
			let policy = build_policy(&grants, &owner);
			let document = PolicyDocument::from_policy(&policy);
			let restored = document
				.clone()
				.into_policy_with_sink(&AclConfig::default(), Arc::new(NullSink))
				.unwrap();
			prop_assert_eq!(&restored, &policy);
			prop_assert_eq!(PolicyDocument::from_policy(&restored), document);
		}
	}
}
