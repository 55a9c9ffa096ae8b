//! Legacy type mapping: explicit rules first, heuristic matching for the rest.
//!
//! # Passes
//!
//! 1. A registered [`CustomLegacyHandler`] for the legacy shape short-circuits everything.
//! 2. The [`MemberMappingResolver`] decides explicit mappings, deletions and new members.
//!    Conflicts are errors, never resolved by priority.
//! 3. The remaining members of both sides go through the [`MultiMatcher`], unless one side has
//!    nothing left.
//! 4. Legacy members take their explicit mapping, else their heuristic match, else are
//!    discarded. Current members take their explicit mapping, else their heuristic match, else
//!    are new.
//! 5. The [`MappingResultor`] finalizes the result.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use lineage_matcher::{MatcherConfig, MultiMatcher};
use lineage_schema::{Member, MemberIdentifier, NoRuntimeTypes, TypeDefinition, TypeResolver};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::config::LegacyMappingConfig;
use crate::custom::{CustomHandlerRegistry, CustomLegacyHandler};
use crate::error::{LegacyMappingError, Result};
use crate::resolver::{MemberMappingResolver, MemberResolution, NoExplicitMappings};
use crate::result::{MappingResult, MemberMatch};
use crate::resultor::{MappingResultor, PassthroughResultor};
use crate::similarity::{MemberEqualator, MemberKindValidator, MemberSimilator, TypeSimilarityTable};

#[cfg(test)]
mod tests;

/// How data of one legacy shape gets loaded.
#[derive(Debug)]
pub enum LegacyTypeHandler {
	Custom(Arc<dyn CustomLegacyHandler>),
	Mapped(MappingResult),
}

impl LegacyTypeHandler {
	pub fn mapping(&self) -> Option<&MappingResult> {
		match self {
			Self::Custom(_) => None,
			Self::Mapped(result) => Some(result),
		}
	}
}

/// Maps legacy definitions onto current definitions. Holds no mutable state of its own.
pub struct LegacyTypeMapper {
	matcher: MatcherConfig,
	type_similarity: TypeSimilarityTable,
	types: Arc<dyn TypeResolver>,
	resolver: Arc<dyn MemberMappingResolver>,
	custom_handlers: Arc<CustomHandlerRegistry>,
	resultor: Arc<dyn MappingResultor>,
}

impl Default for LegacyTypeMapper {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for LegacyTypeMapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LegacyTypeMapper")
			.field("matcher", &self.matcher)
			.field("type_similarity", &self.type_similarity.len())
			.field("custom_handlers", &self.custom_handlers)
			.finish_non_exhaustive()
	}
}

impl LegacyTypeMapper {
	pub fn new() -> Self {
		Self::from_config(&LegacyMappingConfig::default())
	}

	pub fn from_config(config: &LegacyMappingConfig) -> Self {
		Self {
			matcher: config.matcher,
			type_similarity: config.type_similarity_table(),
			types: Arc::new(NoRuntimeTypes),
			resolver: Arc::new(NoExplicitMappings),
			custom_handlers: Arc::new(CustomHandlerRegistry::new()),
			resultor: Arc::new(PassthroughResultor),
		}
	}

	pub fn with_type_resolver(mut self, types: Arc<dyn TypeResolver>) -> Self {
		self.types = types;
		self
	}

	pub fn with_member_resolver(mut self, resolver: Arc<dyn MemberMappingResolver>) -> Self {
		self.resolver = resolver;
		self
	}

	pub fn with_custom_handlers(mut self, registry: Arc<CustomHandlerRegistry>) -> Self {
		self.custom_handlers = registry;
		self
	}

	pub fn with_resultor(mut self, resultor: Arc<dyn MappingResultor>) -> Self {
		self.resultor = resultor;
		self
	}

	pub fn with_type_similarity(mut self, table: TypeSimilarityTable) -> Self {
		self.type_similarity = table;
		self
	}

	pub fn custom_handlers(&self) -> &CustomHandlerRegistry {
		&self.custom_handlers
	}

	/// Custom handler for `legacy` if one is registered, a computed member mapping otherwise.
	pub fn ensure_legacy_handler(
		&self,
		legacy: &Arc<TypeDefinition>,
		current: &Arc<TypeDefinition>,
	) -> Result<LegacyTypeHandler> {
		if let Some(handler) = self.custom_handlers.lookup(legacy)? {
			debug!(legacy = %legacy.type_identifier(), "using custom legacy handler");
			return Ok(LegacyTypeHandler::Custom(handler));
		}
		self.map_members(legacy, current).map(LegacyTypeHandler::Mapped)
	}

	/// Computes the member mapping, bypassing custom handlers.
	///
	/// # Errors
	///
	/// - [`LegacyMappingError::UnresolvableRefactoringTarget`] from the member resolver.
	/// - [`LegacyMappingError::TargetDeclaredNew`] or [`LegacyMappingError::DuplicateTarget`]
	///   for conflicting explicit mappings.
	/// - Whatever the resultor rejects the mapping with.
	pub fn map_members(&self, legacy: &Arc<TypeDefinition>, current: &Arc<TypeDefinition>) -> Result<MappingResult> {
		let explicit = self.explicit_mappings(legacy, current)?;
		let heuristic = self.heuristic_matches(legacy, current, &explicit);
		let result = combine(legacy, current, &explicit, &heuristic);
		self.resultor.create_mapping_result(result)
	}

	fn explicit_mappings(&self, legacy: &TypeDefinition, current: &TypeDefinition) -> Result<ExplicitMappings> {
		let mut explicit = ExplicitMappings::default();
		let current_members = current.all_members();

		for (index, member) in current_members.iter().enumerate() {
			if self.resolver.is_new_current_member(current, member) {
				explicit.new_current.insert(index);
			}
		}

		for (index, member) in legacy.all_members().iter().enumerate() {
			let target = match self.resolver.resolve_member(legacy, member, current)? {
				MemberResolution::Unspecified => continue,
				MemberResolution::Deleted => None,
				MemberResolution::Mapped(target) => Some(
					current_members
						.iter()
						.position(|m| m.is_identical(target))
						.ok_or_else(|| LegacyMappingError::UnresolvableRefactoringTarget {
							type_identifier: current.type_identifier(),
							member: member.identifier().to_string(),
							target: target.identifier().to_string(),
						})?,
				),
			};

			if let Some(target) = target {
				if explicit.new_current.contains(&target) {
					return Err(LegacyMappingError::TargetDeclaredNew {
						type_identifier: current.type_identifier(),
						member: member.identifier().to_string(),
						target: current_members[target].identifier().to_string(),
					});
				}
				if let Some(&first) = explicit.current.get(&target) {
					return Err(LegacyMappingError::DuplicateTarget {
						type_identifier: current.type_identifier(),
						target: current_members[target].identifier().to_string(),
						first: legacy.all_members()[first].identifier().to_string(),
						second: member.identifier().to_string(),
					});
				}
				explicit.current.insert(target, index);
			}
			debug!(
				legacy = %legacy.type_identifier(),
				member = %member.identifier(),
				target = ?target.map(|t| current_members[t].identifier()),
				"explicit member mapping"
			);
			explicit.legacy.insert(index, target);
		}
		Ok(explicit)
	}

	fn heuristic_matches(
		&self,
		legacy: &TypeDefinition,
		current: &TypeDefinition,
		explicit: &ExplicitMappings,
	) -> FxHashMap<usize, (usize, f64)> {
		let sources: Vec<usize> = (0..legacy.all_members().len())
			.filter(|index| !explicit.legacy.contains_key(index))
			.collect();
		let targets: Vec<usize> = (0..current.all_members().len())
			.filter(|index| !explicit.current.contains_key(index) && !explicit.new_current.contains(index))
			.collect();
		if sources.is_empty() || targets.is_empty() {
			return FxHashMap::default();
		}

		let source_members: Vec<&Member> = sources.iter().map(|&i| &legacy.all_members()[i]).collect();
		let target_members: Vec<&Member> = targets.iter().map(|&i| &current.all_members()[i]).collect();

		let similator = MemberSimilator::new(&*self.types, &self.type_similarity);
		let matcher = MultiMatcher::<Member>::new(self.matcher)
			.equalator(&MemberEqualator)
			.similator(&similator)
			.validator(&MemberKindValidator);
		let matched = matcher.match_items(&source_members, &target_members);

		let statistics = matched.statistics();
		debug!(
			legacy = %legacy.type_identifier(),
			current = %current.type_identifier(),
			sources = sources.len(),
			targets = targets.len(),
			matches = statistics.match_count,
			lowest = statistics.lowest,
			average = statistics.average,
			"heuristic member matching"
		);

		matched
			.links()
			.map(|link| (sources[link.source], (targets[link.target], link.similarity)))
			.collect()
	}
}

/// Explicit decisions by member position.
#[derive(Debug, Default)]
struct ExplicitMappings {
	/// Legacy index to current index, `None` for deletions.
	legacy: FxHashMap<usize, Option<usize>>,
	/// Current index to legacy index, derived from `legacy`.
	current: FxHashMap<usize, usize>,
	new_current: FxHashSet<usize>,
}

fn combine(
	legacy: &Arc<TypeDefinition>,
	current: &Arc<TypeDefinition>,
	explicit: &ExplicitMappings,
	heuristic: &FxHashMap<usize, (usize, f64)>,
) -> MappingResult {
	let legacy_members = legacy.all_members();
	let current_members = current.all_members();
	let heuristic_current: FxHashMap<usize, (usize, f64)> = heuristic
		.iter()
		.map(|(&source, &(target, similarity))| (target, (source, similarity)))
		.collect();

	let legacy_to_current: IndexMap<MemberIdentifier, Option<MemberMatch>> = legacy_members
		.iter()
		.enumerate()
		.map(|(index, member)| {
			let partner = match explicit.legacy.get(&index) {
				Some(Some(target)) => Some(MemberMatch::explicit(current_members[*target].clone())),
				Some(None) => None,
				None => heuristic
					.get(&index)
					.map(|&(target, similarity)| MemberMatch::new(current_members[target].clone(), similarity)),
			};
			(member.identifier(), partner)
		})
		.collect();

	let current_to_legacy: IndexMap<MemberIdentifier, Option<MemberMatch>> = current_members
		.iter()
		.enumerate()
		.map(|(index, member)| {
			let partner = if explicit.new_current.contains(&index) {
				None
			} else if let Some(&source) = explicit.current.get(&index) {
				Some(MemberMatch::explicit(legacy_members[source].clone()))
			} else {
				heuristic_current
					.get(&index)
					.map(|&(source, similarity)| MemberMatch::new(legacy_members[source].clone(), similarity))
			};
			(member.identifier(), partner)
		})
		.collect();

	MappingResult::new(legacy.clone(), current.clone(), legacy_to_current, current_to_legacy)
}
