//! Refactoring rules: explicit member renames, deletions and additions.
//!
//! Identifiers are the textual member forms accepted by the [`RefactoringResolver`]:
//! `<typeName>#<memberIdentifier>`, `<memberIdentifier>` or, for targets, `#<name>`.
//!
//! ```toml
//! deleted = ["com.example.Person#age"]
//! new = ["#email"]
//!
//! [entries]
//! "com.example.Person#firstname" = "#givenName"
//! ```
//!
//! [`RefactoringResolver`]: crate::resolver::RefactoringResolver

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use crate::error::Result;

/// Ordered refactoring rules. A source mapped to `None` is an explicit deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefactoringMapping {
	entries: IndexMap<String, Option<String>>,
	new_members: IndexSet<String>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RefactoringFile {
	entries: IndexMap<String, String>,
	deleted: Vec<String>,
	new: Vec<String>,
}

impl RefactoringMapping {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses rules from TOML. Deletions override renames of the same source.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let file: RefactoringFile = toml::from_str(text)?;
		let mut mapping = Self::new();
		for (source, target) in file.entries {
			mapping = mapping.rename(source, target);
		}
		for source in file.deleted {
			mapping = mapping.delete(source);
		}
		for target in file.new {
			mapping = mapping.add(target);
		}
		Ok(mapping)
	}

	pub fn rename(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
		self.entries.insert(source.into(), Some(target.into()));
		self
	}

	pub fn delete(mut self, source: impl Into<String>) -> Self {
		self.entries.insert(source.into(), None);
		self
	}

	/// Declares a current member as new: it never receives legacy data.
	pub fn add(mut self, target: impl Into<String>) -> Self {
		self.new_members.insert(target.into());
		self
	}

	/// `None` if there is no rule for `source`, `Some(None)` for a deletion.
	pub fn lookup(&self, source: &str) -> Option<Option<&str>> {
		self.entries.get(source).map(Option::as_deref)
	}

	pub fn is_new(&self, target: &str) -> bool {
		self.new_members.contains(target)
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
		self.entries
			.iter()
			.map(|(source, target)| (source.as_str(), target.as_deref()))
	}

	pub fn len(&self) -> usize {
		self.entries.len() + self.new_members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty() && self.new_members.is_empty()
	}
}
