//! The finalized member mapping between one legacy and one current definition.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use lineage_schema::{Member, MemberIdentifier, TypeDefinition};

use crate::similarity::EXPLICIT_MATCH_SIMILARITY;

const EXPLICIT_TOKEN: &str = "mapped";
const NEW_TOKEN: &str = " NEW    >";
const REMOVED_TOKEN: &str = " REMOVED ";

/// The partner of a mapped member and how it was matched.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberMatch {
	partner: Member,
	similarity: f64,
}

impl MemberMatch {
	pub fn new(partner: Member, similarity: f64) -> Self {
		Self { partner, similarity }
	}

	pub fn explicit(partner: Member) -> Self {
		Self::new(partner, EXPLICIT_MATCH_SIMILARITY)
	}

	pub fn partner(&self) -> &Member {
		&self.partner
	}

	pub fn similarity(&self) -> f64 {
		self.similarity
	}

	pub fn is_explicit(&self) -> bool {
		self.similarity == EXPLICIT_MATCH_SIMILARITY
	}
}

/// Bidirectional member mapping.
///
/// # Invariants
///
/// - Every legacy member is a key of [`legacy_to_current`](Self::legacy_to_current); it maps to
///   `None` exactly when it is in [`discarded_legacy_members`](Self::discarded_legacy_members).
/// - Every current member is a key of [`current_to_legacy`](Self::current_to_legacy); it maps to
///   `None` exactly when it is in [`new_current_members`](Self::new_current_members).
/// - Tables iterate in member declaration order.
#[derive(Clone, Debug)]
pub struct MappingResult {
	legacy: Arc<TypeDefinition>,
	current: Arc<TypeDefinition>,
	legacy_to_current: IndexMap<MemberIdentifier, Option<MemberMatch>>,
	current_to_legacy: IndexMap<MemberIdentifier, Option<MemberMatch>>,
}

impl MappingResult {
	pub(crate) fn new(
		legacy: Arc<TypeDefinition>,
		current: Arc<TypeDefinition>,
		legacy_to_current: IndexMap<MemberIdentifier, Option<MemberMatch>>,
		current_to_legacy: IndexMap<MemberIdentifier, Option<MemberMatch>>,
	) -> Self {
		Self {
			legacy,
			current,
			legacy_to_current,
			current_to_legacy,
		}
	}

	pub fn legacy_definition(&self) -> &Arc<TypeDefinition> {
		&self.legacy
	}

	pub fn current_definition(&self) -> &Arc<TypeDefinition> {
		&self.current
	}

	pub fn legacy_to_current(&self) -> &IndexMap<MemberIdentifier, Option<MemberMatch>> {
		&self.legacy_to_current
	}

	pub fn current_to_legacy(&self) -> &IndexMap<MemberIdentifier, Option<MemberMatch>> {
		&self.current_to_legacy
	}

	/// Current partner of a legacy member, by legacy member identifier.
	pub fn current_for(&self, legacy_member: &str) -> Option<&MemberMatch> {
		self.legacy_to_current.get(legacy_member)?.as_ref()
	}

	/// Legacy partner of a current member, by current member identifier.
	pub fn legacy_for(&self, current_member: &str) -> Option<&MemberMatch> {
		self.current_to_legacy.get(current_member)?.as_ref()
	}

	/// Legacy members whose stored data is dropped on load.
	pub fn discarded_legacy_members(&self) -> impl Iterator<Item = &Member> + '_ {
		unmatched(self.legacy.all_members(), &self.legacy_to_current)
	}

	/// Current members initialized to their default value on load.
	pub fn new_current_members(&self) -> impl Iterator<Item = &Member> + '_ {
		unmatched(self.current.all_members(), &self.current_to_legacy)
	}

	pub fn has_discarded_members(&self) -> bool {
		self.discarded_legacy_members().next().is_some()
	}
}

fn unmatched<'a>(
	members: &'a [Member],
	table: &'a IndexMap<MemberIdentifier, Option<MemberMatch>>,
) -> impl Iterator<Item = &'a Member> + 'a {
	members
		.iter()
		.filter(move |member| table.get(member.identifier().as_str()).is_none_or(Option::is_none))
}

fn similarity_token(partner: &MemberMatch) -> String {
	if partner.is_explicit() {
		format!("-{EXPLICIT_TOKEN}->")
	} else {
		format!("-{:.2}->", partner.similarity())
	}
}

/// One line per legacy member, then one per new current member:
///
/// ```text
/// 1 com.example.Person -> 2 com.example.Person
/// 	long id              -1.00->   long id
/// 	int age              -mapped-> int years
/// 	int obsolete          REMOVED
/// 	                      NEW    > java.lang.String email
/// ```
impl fmt::Display for MappingResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{} -> {}", self.legacy.type_identifier(), self.current.type_identifier())?;

		let width = self
			.legacy
			.all_members()
			.iter()
			.map(|member| member.to_string().len())
			.max()
			.unwrap_or(0);

		for member in self.legacy.all_members() {
			let legacy = member.to_string();
			match self.current_for(member.identifier().as_str()) {
				Some(partner) => writeln!(
					f,
					"\t{legacy:<width$} {:<9} {}",
					similarity_token(partner),
					partner.partner()
				)?,
				None => writeln!(f, "\t{legacy:<width$} {REMOVED_TOKEN}")?,
			}
		}
		for member in self.new_current_members() {
			writeln!(f, "\t{:<width$} {NEW_TOKEN} {member}", "")?;
		}
		Ok(())
	}
}
