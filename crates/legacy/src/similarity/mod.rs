//! Member similarity for heuristic matching.
//!
//! # Score
//!
//! A legacy/current member pair scores the average of a name similarity and a type similarity,
//! always within `[0, 1]`:
//!
//! | Part | Value                                                                             |
//! |------|-----------------------------------------------------------------------------------|
//! | name | normalized Levenshtein similarity × `0.5` if the qualifiers differ                |
//! | type | `1.0` for the same live type, else the [`TypeSimilarityTable`] entry (or `0.0`)   |
//! | type | `1.0` / `0.5` by type name when either side has no live type                      |
//!
//! An enum constant scores `0.0` against anything that is not an enum constant.
//! [`EXPLICIT_MATCH_SIMILARITY`] is outside that range and marks explicit mappings.

use lineage_matcher::{Equalator, MatchValidator, Similator};
use lineage_schema::{Member, TypeResolver};
use rustc_hash::FxHashMap;

#[cfg(test)]
mod tests;

/// Similarity recorded for explicitly mapped members. Outranks every heuristic score.
pub const EXPLICIT_MATCH_SIMILARITY: f64 = 2.0;

const QUALIFIER_MISMATCH_FACTOR: f64 = 0.5;
const UNRESOLVED_TYPE_MISMATCH: f64 = 0.5;

/// Symmetric similarity values between two distinct type names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeSimilarityTable {
	entries: FxHashMap<String, FxHashMap<String, f64>>,
}

impl TypeSimilarityTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Lossless and near-lossless numeric conversions.
	pub fn numeric_widening() -> Self {
		Self::new()
			.with("byte", "short", 0.8)
			.with("short", "int", 0.8)
			.with("int", "long", 0.8)
			.with("float", "double", 0.8)
			.with("char", "int", 0.5)
	}

	pub fn with(mut self, left: &str, right: &str, similarity: f64) -> Self {
		self.insert(left, right, similarity);
		self
	}

	/// Sets the similarity of both directions, clamped to `[0, 1]`.
	pub fn insert(&mut self, left: &str, right: &str, similarity: f64) {
		let similarity = similarity.clamp(0.0, 1.0);
		self.entries
			.entry(left.to_string())
			.or_default()
			.insert(right.to_string(), similarity);
		self.entries
			.entry(right.to_string())
			.or_default()
			.insert(left.to_string(), similarity);
	}

	pub fn similarity(&self, left: &str, right: &str) -> Option<f64> {
		self.entries.get(left)?.get(right).copied()
	}

	/// Number of unordered type pairs with a configured value.
	pub fn len(&self) -> usize {
		self.entries
			.iter()
			.map(|(left, targets)| targets.keys().filter(|right| left <= *right).count())
			.sum()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Name similarity scaled by the qualifier factor.
pub fn name_similarity(legacy: &Member, current: &Member) -> f64 {
	let factor = if legacy.qualifier() == current.qualifier() {
		1.0
	} else {
		QUALIFIER_MISMATCH_FACTOR
	};
	strsim::normalized_levenshtein(legacy.name(), current.name()) * factor
}

/// Scores legacy members against current members.
#[derive(Clone, Copy)]
pub struct MemberSimilator<'a> {
	types: &'a dyn TypeResolver,
	table: &'a TypeSimilarityTable,
}

impl<'a> MemberSimilator<'a> {
	pub fn new(types: &'a dyn TypeResolver, table: &'a TypeSimilarityTable) -> Self {
		Self { types, table }
	}

	pub fn type_similarity(&self, legacy_type: &str, current_type: &str) -> f64 {
		match (self.types.resolve_type(legacy_type), self.types.resolve_type(current_type)) {
			(Some(legacy), Some(current)) if legacy == current => 1.0,
			(Some(legacy), Some(current)) => self.table.similarity(legacy.name(), current.name()).unwrap_or(0.0),
			_ if legacy_type == current_type => 1.0,
			_ => UNRESOLVED_TYPE_MISMATCH,
		}
	}
}

impl Similator<Member> for MemberSimilator<'_> {
	fn evaluate(&self, legacy: &Member, current: &Member) -> f64 {
		if legacy.is_enum_constant() != current.is_enum_constant() {
			return 0.0;
		}
		let name = name_similarity(legacy, current);
		let ty = self.type_similarity(legacy.type_name(), current.type_name());
		(name + ty) / 2.0
	}
}

/// Forces a link between members with the same name, type name and qualifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemberEqualator;

impl Equalator<Member> for MemberEqualator {
	fn equal(&self, legacy: &Member, current: &Member) -> bool {
		legacy.kind() == current.kind()
			&& legacy.name() == current.name()
			&& legacy.type_name() == current.type_name()
			&& legacy.qualifier() == current.qualifier()
	}
}

/// Rejects links between members of different kinds, e.g. an enum constant and a field.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemberKindValidator;

impl MatchValidator<Member> for MemberKindValidator {
	fn is_valid_match(
		&self,
		legacy: &Member,
		current: &Member,
		_similarity: f64,
		_legacy_candidates: usize,
		_current_candidates: usize,
	) -> bool {
		legacy.kind() == current.kind()
	}
}
