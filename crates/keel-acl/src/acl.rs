// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control lists.
//!
//! An [`AccessControlList`] keeps every raw [`Grant`] it was given, keyed by
//! the grant's id, plus two derived indices: the union of permissions per
//! user id and per [`Group`]. [`AccessControlList::add_grant`] is the only
//! way to change an ACL, so the indices always equal the OR of the raw
//! grants they were folded from.

use std::collections::BTreeMap;
use std::fmt;

use tracing::Level;

use crate::diagnostics::{default_sink, SharedSink};
use crate::dump::AclDump;
use crate::grant::{Grant, Grantee, Group, UserId};
use crate::permission::Permission;

/// Grants for one resource plus their derived lookup indices.
#[derive(Clone)]
pub struct AccessControlList {
	user_perms: BTreeMap<String, Permission>,
	group_perms: BTreeMap<Group, Permission>,
	grants: BTreeMap<String, Vec<Grant>>,
	sink: SharedSink,
}

impl AccessControlList {
	/// Creates an empty ACL reporting to the default sink.
	pub fn new() -> Self {
		Self::with_sink(default_sink())
	}

	/// Creates an empty ACL reporting to `sink`.
	pub fn with_sink(sink: SharedSink) -> Self {
		Self {
			user_perms: BTreeMap::new(),
			group_perms: BTreeMap::new(),
			grants: BTreeMap::new(),
			sink,
		}
	}

	pub fn sink(&self) -> &SharedSink {
		&self.sink
	}

	pub(crate) fn set_sink(&mut self, sink: SharedSink) {
		self.sink = sink;
	}

	/// Records `grant` and folds its permission into the derived indices.
	///
	/// Group grants are stored under the empty key. A user grant without a
	/// usable id is stored too, but contributes no permission and produces a
	/// warning.
	pub fn add_grant(&mut self, grant: Grant) {
		let key = grant.id().unwrap_or_default().to_string();
		self.fold(&grant);
		self.grants.entry(key).or_default().push(grant);
	}

	fn fold(&mut self, grant: &Grant) {
		let perm = grant.permission();
		match grant.grantee() {
			Grantee::Group(group) => {
				*self.group_perms.entry(*group).or_default() |= perm;
			}
			Grantee::CanonicalUser(_) | Grantee::EmailUser(_) | Grantee::Unknown(_) => {
				match grant.id() {
					Some(id) => {
						*self.user_perms.entry(id.to_string()).or_default() |= perm;
					}
					None => self.sink.emit(
						Level::WARN,
						format_args!(
							"grant has no usable id (type={}), ignoring its permissions",
							grant.grantee().type_code()
						),
					),
				}
			}
		}
	}

	/// Replaces the contents with a single full-control grant for the owner.
	pub fn create_default(&mut self, owner_id: &UserId, display_name: &str) {
		self.user_perms.clear();
		self.group_perms.clear();
		self.grants.clear();

		self.add_grant(Grant::canonical_user(
			owner_id.clone(),
			display_name,
			Permission::FULL_CONTROL,
		));
	}

	/// Returns the permissions granted directly to `id`, limited to `mask`.
	pub fn get_perm(&self, id: &str, mask: Permission) -> Permission {
		self.sink.emit(
			Level::DEBUG,
			format_args!("searching permissions for uid={id} mask={:#x}", mask.bits()),
		);
		match self.user_perms.get(id) {
			Some(perm) => {
				self.sink
					.emit(Level::DEBUG, format_args!("found permission: {:#x}", perm.bits()));
				*perm & mask
			}
			None => {
				self.sink
					.emit(Level::DEBUG, format_args!("permissions for user not found"));
				Permission::NONE
			}
		}
	}

	/// Returns the permissions granted to `group`, limited to `mask`.
	pub fn get_group_perm(&self, group: Group, mask: Permission) -> Permission {
		self.sink.emit(
			Level::DEBUG,
			format_args!(
				"searching permissions for group={} mask={:#x}",
				group.code(),
				mask.bits()
			),
		);
		match self.group_perms.get(&group) {
			Some(perm) => {
				self.sink
					.emit(Level::DEBUG, format_args!("found permission: {:#x}", perm.bits()));
				*perm & mask
			}
			None => {
				self.sink
					.emit(Level::DEBUG, format_args!("permissions for group not found"));
				Permission::NONE
			}
		}
	}

	/// All raw grants in key order, insertion order within a key.
	pub fn grants(&self) -> impl Iterator<Item = (&str, &Grant)> {
		self.grants
			.iter()
			.flat_map(|(key, grants)| grants.iter().map(move |grant| (key.as_str(), grant)))
	}

	/// Raw grants stored under `key`.
	pub fn grants_for(&self, key: &str) -> &[Grant] {
		self.grants.get(key).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn grant_count(&self) -> usize {
		self.grants.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.grants.is_empty()
	}

	/// Derived per-user permission unions.
	pub fn user_perms(&self) -> impl Iterator<Item = (&str, Permission)> {
		self.user_perms.iter().map(|(id, perm)| (id.as_str(), *perm))
	}

	/// Derived per-group permission unions.
	pub fn group_perms(&self) -> impl Iterator<Item = (Group, Permission)> + '_ {
		self.group_perms.iter().map(|(group, perm)| (*group, *perm))
	}

	/// Structured view of this ACL.
	pub fn dump(&self) -> AclDump<'_> {
		AclDump::new(self)
	}
}

impl Default for AccessControlList {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for AccessControlList {
	fn eq(&self, other: &Self) -> bool {
		self.user_perms == other.user_perms
			&& self.group_perms == other.group_perms
			&& self.grants == other.grants
	}
}

impl Eq for AccessControlList {}

impl fmt::Debug for AccessControlList {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessControlList")
			.field("user_perms", &self.user_perms)
			.field("group_perms", &self.group_perms)
			.field("grants", &self.grants)
			.finish_non_exhaustive()
	}
}
