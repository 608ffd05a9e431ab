// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission bitsets.
//!
//! A [`Permission`] is a set of fine-grained capabilities on a bucket or
//! object. The four base bits follow the S3 model; the two aggregate bits
//! ([`Permission::READ_OBJS`], [`Permission::WRITE_OBJS`]) express the Swift
//! dialect's "read/write any object in this bucket" grants and are translated
//! into base bits during verification.
//!
//! | Bit | Value | Tag |
//! |-----|-------|-----|
//! | [`READ`](Permission::READ) | `0x01` | `read` |
//! | [`WRITE`](Permission::WRITE) | `0x02` | `write` |
//! | [`READ_ACP`](Permission::READ_ACP) | `0x04` | `read_acp` |
//! | [`WRITE_ACP`](Permission::WRITE_ACP) | `0x08` | `write_acp` |
//! | [`READ_OBJS`](Permission::READ_OBJS) | `0x10` | `read_objs` |
//! | [`WRITE_OBJS`](Permission::WRITE_OBJS) | `0x20` | `write_objs` |
//!
//! # Example
//!
//! ```
//! use keel_acl::Permission;
//!
//! let granted = Permission::READ | Permission::READ_ACP;
//! let requested = Permission::READ | Permission::WRITE;
//! assert_eq!(granted & requested, Permission::READ);
//! assert!(!granted.is_full_control());
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::AclError;

bitflags! {
	/// Set of capabilities granted on a resource.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
	pub struct Permission: u32 {
		/// Read object data or list a bucket.
		const READ = 0x01;
		/// Write objects into a bucket.
		const WRITE = 0x02;
		/// Read the access control policy.
		const READ_ACP = 0x04;
		/// Modify the access control policy.
		const WRITE_ACP = 0x08;
		/// Read any object in a bucket (Swift aggregate).
		const READ_OBJS = 0x10;
		/// Write any object in a bucket (Swift aggregate).
		const WRITE_OBJS = 0x20;
		/// All four base bits.
		const FULL_CONTROL = Self::READ.bits()
			| Self::WRITE.bits()
			| Self::READ_ACP.bits()
			| Self::WRITE_ACP.bits();
	}
}

impl Default for Permission {
	fn default() -> Self {
		Self::NONE
	}
}

/// Base tags in the order the structured dump emits them.
const BASE_TAGS: [(Permission, &str); 4] = [
	(Permission::READ, "read"),
	(Permission::WRITE, "write"),
	(Permission::READ_ACP, "read_acp"),
	(Permission::WRITE_ACP, "write_acp"),
];

const AGGREGATE_TAGS: [(Permission, &str); 2] = [
	(Permission::READ_OBJS, "read_objs"),
	(Permission::WRITE_OBJS, "write_objs"),
];

impl Permission {
	/// No capabilities.
	pub const NONE: Self = Self::empty();

	/// Both policy-access bits.
	pub const ACP: Self = Self::READ_ACP.union(Self::WRITE_ACP);

	/// Returns `self & mask`.
	#[must_use]
	pub fn masked(self, mask: Self) -> Self {
		self & mask
	}

	/// Returns true if every bit of `mask` is present after masking.
	///
	/// This is an exact test: a value holding only some of the requested
	/// bits does not cover the mask.
	pub fn covers(self, mask: Self) -> bool {
		(self & mask) == mask
	}

	/// Returns true if all four base bits are set.
	pub fn is_full_control(self) -> bool {
		self.covers(Self::FULL_CONTROL)
	}

	/// Tags emitted by the structured dump.
	///
	/// `full_control` replaces the four base tags when all of them are set.
	/// Aggregate bits are never emitted here.
	pub fn dump_tags(self) -> Vec<&'static str> {
		if self.is_full_control() {
			return vec!["full_control"];
		}
		BASE_TAGS
			.iter()
			.filter(|(bit, _)| self.contains(*bit))
			.map(|(_, tag)| *tag)
			.collect()
	}

	/// Every tag describing this value, aggregate bits included.
	pub fn tags(self) -> Vec<&'static str> {
		let mut tags = self.dump_tags();
		tags.extend(
			AGGREGATE_TAGS
				.iter()
				.filter(|(bit, _)| self.contains(*bit))
				.map(|(_, tag)| *tag),
		);
		tags
	}

	/// Parses a single tag such as `read_acp` or `full_control`.
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag.trim().to_ascii_lowercase().as_str() {
			"none" => Some(Self::NONE),
			"read" => Some(Self::READ),
			"write" => Some(Self::WRITE),
			"read_acp" => Some(Self::READ_ACP),
			"write_acp" => Some(Self::WRITE_ACP),
			"read_objs" => Some(Self::READ_OBJS),
			"write_objs" => Some(Self::WRITE_OBJS),
			"full_control" => Some(Self::FULL_CONTROL),
			_ => None,
		}
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tags = self.tags();
		if tags.is_empty() {
			return write!(f, "none");
		}
		write!(f, "{}", tags.join(","))
	}
}

/// Parses a comma or `|` separated list of tags.
impl FromStr for Permission {
	type Err = AclError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.split([',', '|'])
			.filter(|tag| !tag.trim().is_empty())
			.try_fold(Self::NONE, |acc, tag| {
				Self::from_tag(tag)
					.map(|bit| acc | bit)
					.ok_or_else(|| AclError::UnknownPermission(tag.trim().to_string()))
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bit_values_are_stable() {
		assert_eq!(Permission::READ.bits(), 0x01);
		assert_eq!(Permission::WRITE.bits(), 0x02);
		assert_eq!(Permission::READ_ACP.bits(), 0x04);
		assert_eq!(Permission::WRITE_ACP.bits(), 0x08);
		assert_eq!(Permission::READ_OBJS.bits(), 0x10);
		assert_eq!(Permission::WRITE_OBJS.bits(), 0x20);
		assert_eq!(Permission::FULL_CONTROL.bits(), 0x0f);
	}

	#[test]
	fn three_of_four_is_not_full_control() {
		let perm = Permission::READ | Permission::WRITE | Permission::READ_ACP;
		assert!(!perm.is_full_control());
		assert!(Permission::FULL_CONTROL.is_full_control());
		assert!((Permission::FULL_CONTROL | Permission::READ_OBJS).is_full_control());
	}

	#[test]
	fn covers_is_exact() {
		let granted = Permission::READ;
		assert!(granted.covers(Permission::READ));
		assert!(!granted.covers(Permission::READ | Permission::WRITE));
		assert!(granted.covers(Permission::NONE));
	}

	#[test]
	fn dump_tags_collapse_full_control() {
		assert_eq!(Permission::FULL_CONTROL.dump_tags(), vec!["full_control"]);
		assert_eq!(
			(Permission::READ | Permission::WRITE_ACP).dump_tags(),
			vec!["read", "write_acp"]
		);
		assert!(Permission::READ_OBJS.dump_tags().is_empty());
	}

	#[test]
	fn tags_include_aggregate_bits() {
		assert_eq!(
			(Permission::READ | Permission::WRITE_OBJS).tags(),
			vec!["read", "write_objs"]
		);
	}

	#[test]
	fn parse_tag_list() {
		let perm: Permission = "read, WRITE_ACP|write_objs".parse().unwrap();
		assert_eq!(
			perm,
			Permission::READ | Permission::WRITE_ACP | Permission::WRITE_OBJS
		);
		let full: Permission = "full_control".parse().unwrap();
		assert_eq!(full, Permission::FULL_CONTROL);
		let empty: Permission = "".parse().unwrap();
		assert_eq!(empty, Permission::NONE);
	}

	#[test]
	fn parse_rejects_unknown_tag() {
		let err = "read,delete".parse::<Permission>().unwrap_err();
		assert!(matches!(err, AclError::UnknownPermission(tag) if tag == "delete"));
	}

	#[test]
	fn display_lists_tags() {
		assert_eq!(Permission::NONE.to_string(), "none");
		assert_eq!(
			(Permission::FULL_CONTROL | Permission::READ_OBJS).to_string(),
			"full_control,read_objs"
		);
	}

	#[test]
	fn unknown_bits_are_retained() {
		let perm = Permission::from_bits_retain(0x41);
		assert_eq!(perm.bits(), 0x41);
		assert!(perm.contains(Permission::READ));
	}
}
