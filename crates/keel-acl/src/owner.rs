// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource owner record.

use serde::{Deserialize, Serialize};

use crate::grant::UserId;

/// Owner of a bucket or object. Owners always hold the ACP bits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Owner {
	pub id: UserId,
	#[serde(default)]
	pub display_name: String,
}

impl Owner {
	pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
		}
	}

	pub fn id(&self) -> &UserId {
		&self.id
	}

	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Returns true if no owner id has been set.
	pub fn is_empty(&self) -> bool {
		self.id.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_owner_is_empty() {
		assert!(Owner::default().is_empty());
		assert!(!Owner::new("alice", "Alice").is_empty());
	}

	#[test]
	fn deserializes_without_display_name() {
		let owner: Owner = serde_json::from_str(r#"{"id": "alice"}"#).unwrap();
		assert_eq!(owner.id().as_str(), "alice");
		assert_eq!(owner.display_name(), "");
	}
}
