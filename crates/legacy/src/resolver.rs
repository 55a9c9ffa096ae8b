//! Explicit member mapping decisions.

use lineage_schema::member::QUALIFIER_DELIMITER;
use lineage_schema::{Member, TypeDefinition};

use crate::error::{LegacyMappingError, Result};
use crate::refactoring::RefactoringMapping;

/// Explicit decision for one legacy member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberResolution<'c> {
	/// No rule; the member is left to heuristic matching.
	Unspecified,
	/// Explicitly mapped onto a member of the current definition.
	Mapped(&'c Member),
	/// Explicitly deleted; its stored data is dropped.
	Deleted,
}

/// Source of explicit mappings consulted before heuristic matching.
pub trait MemberMappingResolver: Send + Sync {
	fn resolve_member<'c>(
		&self,
		legacy: &TypeDefinition,
		member: &Member,
		current: &'c TypeDefinition,
	) -> Result<MemberResolution<'c>>;

	/// Whether `member` is declared new and must not receive legacy data.
	fn is_new_current_member(&self, current: &TypeDefinition, member: &Member) -> bool;
}

/// Resolver without any rules.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoExplicitMappings;

impl MemberMappingResolver for NoExplicitMappings {
	fn resolve_member<'c>(
		&self,
		_legacy: &TypeDefinition,
		_member: &Member,
		_current: &'c TypeDefinition,
	) -> Result<MemberResolution<'c>> {
		Ok(MemberResolution::Unspecified)
	}

	fn is_new_current_member(&self, _current: &TypeDefinition, _member: &Member) -> bool {
		false
	}
}

/// Resolves members through a [`RefactoringMapping`].
///
/// Legacy members are looked up most specific first: `<typeName>#<identifier>`, then
/// `<identifier>`. Targets may use either form or `#<name>` if the name is unique.
#[derive(Clone, Debug, Default)]
pub struct RefactoringResolver {
	mapping: RefactoringMapping,
}

impl RefactoringResolver {
	pub fn new(mapping: RefactoringMapping) -> Self {
		Self { mapping }
	}

	pub fn mapping(&self) -> &RefactoringMapping {
		&self.mapping
	}
}

fn type_qualified(definition: &TypeDefinition, member: &Member) -> String {
	format!("{}{QUALIFIER_DELIMITER}{}", definition.type_name(), member.identifier())
}

fn find_target<'c>(current: &'c TypeDefinition, target: &str) -> Option<&'c Member> {
	let members = current.all_members();
	if let Some(found) = members.iter().find(|m| type_qualified(current, m) == target) {
		return Some(found);
	}
	if let Some(found) = members.iter().find(|m| m.identifier().as_str() == target) {
		return Some(found);
	}
	let name = target.strip_prefix(QUALIFIER_DELIMITER)?;
	let mut named = members.iter().filter(|m| m.name() == name);
	match (named.next(), named.next()) {
		(Some(unique), None) => Some(unique),
		_ => None,
	}
}

impl MemberMappingResolver for RefactoringResolver {
	fn resolve_member<'c>(
		&self,
		legacy: &TypeDefinition,
		member: &Member,
		current: &'c TypeDefinition,
	) -> Result<MemberResolution<'c>> {
		let entry = self
			.mapping
			.lookup(&type_qualified(legacy, member))
			.or_else(|| self.mapping.lookup(member.identifier().as_str()));

		match entry {
			None => Ok(MemberResolution::Unspecified),
			Some(None) => Ok(MemberResolution::Deleted),
			Some(Some(target)) => find_target(current, target).map(MemberResolution::Mapped).ok_or_else(|| {
				LegacyMappingError::UnresolvableRefactoringTarget {
					type_identifier: current.type_identifier(),
					member: member.identifier().to_string(),
					target: target.to_string(),
				}
			}),
		}
	}

	fn is_new_current_member(&self, current: &TypeDefinition, member: &Member) -> bool {
		self.mapping.is_new(&type_qualified(current, member))
			|| self.mapping.is_new(member.identifier().as_str())
			|| self.mapping.is_new(&format!("{QUALIFIER_DELIMITER}{}", member.name()))
	}
}
