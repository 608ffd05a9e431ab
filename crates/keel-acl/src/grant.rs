// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Grantees and grants.
//!
//! A [`Grant`] pairs a [`Grantee`] with a [`Permission`]. Grantees are either
//! a specific user (by canonical id or by email) or one of the well-known
//! [`Group`]s. Grants are built once by a protocol parser (or by the canned
//! policy helpers) and are immutable after they are handed to an ACL.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// URI naming the group of every caller, including anonymous ones.
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// URI naming the group of every successfully identified caller.
pub const AUTHENTICATED_USERS_URI: &str =
	"http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// Caller id used for anonymous requests.
///
/// Anonymous callers are identified by the ALL_USERS group name so that
/// policy evaluation can keep them out of authenticated-only grants.
pub const ANONYMOUS_ID: &str = ALL_USERS_URI;

/// Canonical identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for UserId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for UserId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Well-known groups of callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Group {
	/// Not one of the supported groups.
	#[default]
	None,
	/// Every caller, anonymous or not.
	AllUsers,
	/// Every caller with a resolved identity.
	AuthenticatedUsers,
}

impl Group {
	/// Stable numeric code used by the dump and the persisted document.
	pub const fn code(self) -> u32 {
		match self {
			Group::None => 0,
			Group::AllUsers => 1,
			Group::AuthenticatedUsers => 2,
		}
	}

	/// Maps a numeric code back to a group; unknown codes become [`Group::None`].
	pub fn from_code(code: u32) -> Self {
		match code {
			1 => Group::AllUsers,
			2 => Group::AuthenticatedUsers,
			_ => Group::None,
		}
	}

	pub fn uri(self) -> Option<&'static str> {
		match self {
			Group::None => None,
			Group::AllUsers => Some(ALL_USERS_URI),
			Group::AuthenticatedUsers => Some(AUTHENTICATED_USERS_URI),
		}
	}

	/// Resolves a group URI; anything unrecognised is [`Group::None`].
	pub fn from_uri(uri: &str) -> Self {
		match uri {
			ALL_USERS_URI => Group::AllUsers,
			AUTHENTICATED_USERS_URI => Group::AuthenticatedUsers,
			_ => Group::None,
		}
	}

	/// Returns true if `id` names this group.
	pub fn matches_id(self, id: &str) -> bool {
		self.uri().is_some_and(|uri| uri == id)
	}
}

impl fmt::Display for Group {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Group::None => write!(f, "none"),
			Group::AllUsers => write!(f, "all_users"),
			Group::AuthenticatedUsers => write!(f, "authenticated_users"),
		}
	}
}

/// Kind of grantee, with the numeric codes used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranteeType {
	CanonicalUser,
	EmailUser,
	Group,
	Unknown,
}

impl GranteeType {
	pub const fn code(self) -> u32 {
		match self {
			GranteeType::CanonicalUser => 0,
			GranteeType::EmailUser => 1,
			GranteeType::Group => 2,
			GranteeType::Unknown => 3,
		}
	}
}

/// Subject of a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
	/// A user identified by canonical id.
	CanonicalUser(UserId),
	/// A user identified by email address.
	EmailUser(String),
	/// A well-known group.
	Group(Group),
	/// A grantee kind this gateway does not understand.
	Unknown(UnknownGrantee),
}

/// Grantee of an unrecognised kind, kept so the grant persists unchanged.
///
/// The type code is never one of the codes reserved for known kinds, so a
/// stored unknown grantee cannot reload as a user or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGrantee {
	type_code: u32,
	id: String,
}

impl UnknownGrantee {
	/// Codes of known kinds are raised to [`GranteeType::Unknown`]'s code.
	pub fn new(type_code: u32, id: impl Into<String>) -> Self {
		Self {
			type_code: type_code.max(GranteeType::Unknown.code()),
			id: id.into(),
		}
	}

	pub fn type_code(&self) -> u32 {
		self.type_code
	}

	pub fn id(&self) -> &str {
		&self.id
	}
}

impl Grantee {
	pub fn grantee_type(&self) -> GranteeType {
		match self {
			Grantee::CanonicalUser(_) => GranteeType::CanonicalUser,
			Grantee::EmailUser(_) => GranteeType::EmailUser,
			Grantee::Group(_) => GranteeType::Group,
			Grantee::Unknown(_) => GranteeType::Unknown,
		}
	}

	/// Numeric type code; unknown grantees keep their original code.
	pub fn type_code(&self) -> u32 {
		match self {
			Grantee::Unknown(unknown) => unknown.type_code(),
			other => other.grantee_type().code(),
		}
	}
}

/// A grantee paired with the permissions it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
	grantee: Grantee,
	permission: Permission,
	display_name: String,
	email: String,
}

impl Grant {
	pub fn new(grantee: Grantee, permission: Permission) -> Self {
		Self {
			grantee,
			permission,
			display_name: String::new(),
			email: String::new(),
		}
	}

	/// Grant to a user by canonical id.
	pub fn canonical_user(
		id: impl Into<UserId>,
		display_name: impl Into<String>,
		permission: Permission,
	) -> Self {
		Self::new(Grantee::CanonicalUser(id.into()), permission).with_display_name(display_name)
	}

	/// Grant to a user by email address.
	pub fn email_user(email: impl Into<String>, permission: Permission) -> Self {
		Self::new(Grantee::EmailUser(email.into()), permission)
	}

	/// Grant to a well-known group.
	pub fn group(group: Group, permission: Permission) -> Self {
		Self::new(Grantee::Group(group), permission)
	}

	/// Builder: set the display name.
	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = display_name.into();
		self
	}

	/// Builder: set the contact email carried alongside a non-email grantee.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = email.into();
		self
	}

	pub fn grantee(&self) -> &Grantee {
		&self.grantee
	}

	pub fn grantee_type(&self) -> GranteeType {
		self.grantee.grantee_type()
	}

	pub fn permission(&self) -> Permission {
		self.permission
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Email of the grantee: the address itself for email grantees,
	/// otherwise the optional contact email.
	pub fn email(&self) -> &str {
		match &self.grantee {
			Grantee::EmailUser(email) => email,
			_ => &self.email,
		}
	}

	/// Canonical id field, empty unless the grantee carries one.
	pub fn canonical_id(&self) -> &str {
		match &self.grantee {
			Grantee::CanonicalUser(id) => id.as_str(),
			Grantee::Unknown(unknown) => unknown.id(),
			Grantee::EmailUser(_) | Grantee::Group(_) => "",
		}
	}

	/// Group targeted by this grant, [`Group::None`] for user grants.
	pub fn group_target(&self) -> Group {
		match self.grantee {
			Grantee::Group(group) => group,
			_ => Group::None,
		}
	}

	/// Id under which user lookups find this grant.
	///
	/// Returns `None` for group grants, which are never looked up by id, and
	/// for grants whose grantee id is empty.
	pub fn id(&self) -> Option<&str> {
		let id = match &self.grantee {
			Grantee::CanonicalUser(id) => id.as_str(),
			Grantee::EmailUser(email) => email.as_str(),
			Grantee::Unknown(unknown) => unknown.id(),
			Grantee::Group(_) => return None,
		};
		(!id.is_empty()).then_some(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonical_user_id_is_extracted() {
		let grant = Grant::canonical_user("alice", "Alice", Permission::READ);
		assert_eq!(grant.id(), Some("alice"));
		assert_eq!(grant.canonical_id(), "alice");
		assert_eq!(grant.display_name(), "Alice");
		assert_eq!(grant.grantee_type(), GranteeType::CanonicalUser);
	}

	#[test]
	fn email_user_keys_by_email() {
		let grant = Grant::email_user("bob@example.com", Permission::WRITE);
		assert_eq!(grant.id(), Some("bob@example.com"));
		assert_eq!(grant.email(), "bob@example.com");
		assert_eq!(grant.canonical_id(), "");
		assert_eq!(grant.grantee().type_code(), 1);
	}

	#[test]
	fn group_grant_has_no_id() {
		let grant = Grant::group(Group::AllUsers, Permission::READ);
		assert_eq!(grant.id(), None);
		assert_eq!(grant.group_target(), Group::AllUsers);
		assert_eq!(grant.grantee().type_code(), 2);
	}

	#[test]
	fn empty_ids_are_not_extractable() {
		assert_eq!(Grant::canonical_user("", "", Permission::READ).id(), None);
		assert_eq!(Grant::email_user("", Permission::READ).id(), None);
	}

	#[test]
	fn unknown_grantee_keeps_type_code() {
		let grant = Grant::new(
			Grantee::Unknown(UnknownGrantee::new(7, "legacy")),
			Permission::READ,
		);
		assert_eq!(grant.id(), Some("legacy"));
		assert_eq!(grant.grantee().type_code(), 7);
		assert_eq!(grant.grantee_type(), GranteeType::Unknown);
		assert_eq!(grant.canonical_id(), "legacy");
	}

	#[test]
	fn unknown_grantee_never_takes_a_known_code() {
		for code in [0, 1, 2] {
			let unknown = UnknownGrantee::new(code, "mallory");
			assert_eq!(unknown.type_code(), GranteeType::Unknown.code());
			assert_eq!(unknown.id(), "mallory");
		}
		assert_eq!(UnknownGrantee::new(3, "x").type_code(), 3);
		assert_eq!(
			Grant::new(Grantee::Unknown(UnknownGrantee::new(0, "")), Permission::READ).id(),
			None
		);
	}

	#[test]
	fn user_id_conversions() {
		let id = UserId::from("alice");
		assert_eq!(id, UserId::new("alice".to_string()));
		assert_eq!(id.to_string(), "alice");
		assert!(!id.is_empty());
		assert!(UserId::default().is_empty());
	}

	#[test]
	fn group_codes_and_uris() {
		for group in [Group::None, Group::AllUsers, Group::AuthenticatedUsers] {
			assert_eq!(Group::from_code(group.code()), group);
		}
		assert_eq!(Group::from_code(42), Group::None);
		assert_eq!(Group::from_uri(ALL_USERS_URI), Group::AllUsers);
		assert_eq!(
			Group::from_uri(AUTHENTICATED_USERS_URI),
			Group::AuthenticatedUsers
		);
		assert_eq!(Group::from_uri("urn:other"), Group::None);
	}

	#[test]
	fn anonymous_id_matches_all_users() {
		assert!(Group::AllUsers.matches_id(ANONYMOUS_ID));
		assert!(!Group::AuthenticatedUsers.matches_id(ANONYMOUS_ID));
		assert!(!Group::None.matches_id(""));
		assert!(!Group::AllUsers.matches_id("alice"));
	}
}
