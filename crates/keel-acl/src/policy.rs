// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control policy evaluation.
//!
//! An [`AccessControlPolicy`] combines an [`AccessControlList`] with the
//! resource [`Owner`] and answers two questions:
//!
//! 1. [`get_perm`](AccessControlPolicy::get_perm): which of the requested
//!    bits does a caller hold? Direct user grants, the owner's implicit ACP
//!    bits and group grants are unioned, each term limited to the mask.
//! 2. [`verify_permission`](AccessControlPolicy::verify_permission): is a
//!    request allowed? The Swift aggregate bits are probed and translated
//!    into base bits, the result is capped by the caller's own mask, and the
//!    request succeeds only if every requested bit survives.
//!
//! Evaluation is pure and never fails. A policy without an owner has an
//! empty owner id, so a caller presenting the empty id still receives the
//! owner's ACP bits; use [`validate`](AccessControlPolicy::validate) before
//! trusting ownership.

use std::fmt;

use tracing::Level;

use crate::acl::AccessControlList;
use crate::canned::CannedAcl;
use crate::diagnostics::SharedSink;
use crate::dump::PolicyDump;
use crate::error::{AclError, Result};
use crate::grant::Group;
use crate::owner::Owner;
use crate::permission::Permission;

/// ACL plus owner for a single bucket or object.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessControlPolicy {
	acl: AccessControlList,
	owner: Owner,
}

impl AccessControlPolicy {
	/// Wraps `acl` with `owner`. Diagnostics go to the ACL's sink.
	pub fn new(acl: AccessControlList, owner: Owner) -> Self {
		Self { acl, owner }
	}

	/// Builder: report diagnostics to `sink`.
	pub fn with_sink(mut self, sink: SharedSink) -> Self {
		self.acl.set_sink(sink);
		self
	}

	/// Policy in which only the owner holds any rights, with full control.
	pub fn create_default(owner: Owner) -> Self {
		let mut acl = AccessControlList::new();
		acl.create_default(owner.id(), owner.display_name());
		Self::new(acl, owner)
	}

	/// Default policy extended with the group grants of `canned`.
	pub fn canned(owner: Owner, canned: CannedAcl) -> Self {
		let mut policy = Self::create_default(owner);
		for grant in canned.group_grants() {
			policy.acl.add_grant(grant);
		}
		policy
	}

	pub fn acl(&self) -> &AccessControlList {
		&self.acl
	}

	/// Mutable access for grant ingestion.
	pub fn acl_mut(&mut self) -> &mut AccessControlList {
		&mut self.acl
	}

	pub fn owner(&self) -> &Owner {
		&self.owner
	}

	pub fn set_owner(&mut self, owner: Owner) {
		self.owner = owner;
	}

	/// Checks that the policy names an owner.
	pub fn validate(&self) -> Result<()> {
		if self.owner.is_empty() {
			return Err(AclError::MissingOwner);
		}
		Ok(())
	}

	fn sink(&self) -> &SharedSink {
		self.acl.sink()
	}

	fn is_owner(&self, id: &str) -> bool {
		self.owner.id().as_str() == id
	}

	/// Returns the bits of `mask` that `id` holds under this policy.
	///
	/// Owners always receive the ACP bits. Group grants are only consulted
	/// when direct grants leave some requested bit unsatisfied; the
	/// AUTHENTICATED_USERS group never applies to the anonymous caller
	/// ([`ANONYMOUS_ID`](crate::ANONYMOUS_ID)).
	pub fn get_perm(&self, id: &str, mask: Permission) -> Permission {
		let mut perm = self.acl.get_perm(id, mask);

		if self.is_owner(id) {
			perm |= mask & Permission::ACP;
		}

		if perm == mask {
			return perm;
		}

		if (perm & mask) != mask {
			perm |= self.acl.get_group_perm(Group::AllUsers, mask);

			if !Group::AllUsers.matches_id(id) {
				perm |= self.acl.get_group_perm(Group::AuthenticatedUsers, mask);
			}
		}

		self.sink().emit(
			Level::DEBUG,
			format_args!(
				"getting permissions id={id} owner={} perm={:#x}",
				self.owner.id(),
				perm.bits()
			),
		);

		perm
	}

	/// Returns true if `uid` holds every bit of `requested`, capped by
	/// `user_perm_mask`.
	///
	/// A grant of [`Permission::WRITE_OBJS`] also satisfies WRITE and
	/// WRITE_ACP; [`Permission::READ_OBJS`] also satisfies READ and READ_ACP.
	pub fn verify_permission(
		&self,
		uid: &str,
		user_perm_mask: Permission,
		requested: Permission,
	) -> bool {
		let test_mask = requested | Permission::READ_OBJS | Permission::WRITE_OBJS;

		let mut policy_perm = self.get_perm(uid, test_mask);

		if policy_perm.contains(Permission::WRITE_OBJS) {
			policy_perm |= Permission::WRITE | Permission::WRITE_ACP;
		}
		if policy_perm.contains(Permission::READ_OBJS) {
			policy_perm |= Permission::READ | Permission::READ_ACP;
		}

		let acl_perm = policy_perm & requested & user_perm_mask;

		self.sink().emit(
			Level::TRACE,
			format_args!(
				"uid={uid} requested perm={:#x} policy perm={:#x} user_perm_mask={:#x} acl perm={:#x}",
				requested.bits(),
				policy_perm.bits(),
				user_perm_mask.bits(),
				acl_perm.bits()
			),
		);

		acl_perm == requested
	}

	/// Structured view of this policy.
	pub fn dump(&self) -> PolicyDump<'_> {
		PolicyDump::new(self)
	}
}

impl Default for AccessControlPolicy {
	fn default() -> Self {
		Self::new(AccessControlList::new(), Owner::default())
	}
}

impl fmt::Debug for AccessControlPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessControlPolicy")
			.field("acl", &self.acl)
			.field("owner", &self.owner)
			.finish()
	}
}
