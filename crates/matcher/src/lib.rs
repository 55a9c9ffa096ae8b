//! Bipartite best-match assignment.
//!
//! Given a source list and a target list, [`MultiMatcher`] produces a 1:1 assignment of source
//! items to target items: forced pairs from an [`Equalator`] first, then the most plausible pairs
//! by [`Similator`] score. Every candidate link can be vetoed by a [`MatchValidator`].
//!
//! # Algorithm
//!
//! 1. Link every pair the equalator considers equal (recorded with similarity `1.0`).
//! 2. Score all remaining pairs; keep those at or above the similarity threshold as candidates.
//! 3. Link all perfect (`1.0`) candidates.
//! 4. Drop candidates below `noise_factor × best` of their row or column, if the threshold is
//!    below the noise factor.
//! 5. Until one side runs out of candidates, repeat: link all unconflicted pairs, else resolve
//!    one source singleton, else one target singleton, else link the single best pair.
//!
//! A singleton is an item with exactly one remaining candidate. It takes precedence over a
//! conflicting better pair when its score reaches `singleton_precedence_threshold`, or when its
//! score times `singleton_precedence_bonus` still reaches the competing score.

mod config;
mod engine;
mod result;

pub use config::MatcherConfig;
pub use result::{Link, MatchStatistics, MultiMatch};

/// Scores how similar two items are. Scores are expected in `[0, 1]`.
pub trait Similator<E: ?Sized> {
	fn evaluate(&self, source: &E, target: &E) -> f64;
}

impl<E: ?Sized, F> Similator<E> for F
where
	F: Fn(&E, &E) -> f64,
{
	fn evaluate(&self, source: &E, target: &E) -> f64 {
		self(source, target)
	}
}

/// Decides that two items are the same, forcing a link without scoring.
pub trait Equalator<E: ?Sized> {
	fn equal(&self, source: &E, target: &E) -> bool;
}

impl<E: ?Sized, F> Equalator<E> for F
where
	F: Fn(&E, &E) -> bool,
{
	fn equal(&self, source: &E, target: &E) -> bool {
		self(source, target)
	}
}

/// Vetoes candidate links. A rejected candidate is dropped for the rest of the run.
pub trait MatchValidator<E: ?Sized> {
	fn is_valid_match(
		&self,
		source: &E,
		target: &E,
		similarity: f64,
		source_candidates: usize,
		target_candidates: usize,
	) -> bool;
}

/// Configured matcher. Cheap to build; holds only borrowed strategies.
pub struct MultiMatcher<'a, E: ?Sized> {
	config: MatcherConfig,
	equalator: Option<&'a dyn Equalator<E>>,
	similator: Option<&'a dyn Similator<E>>,
	validator: Option<&'a dyn MatchValidator<E>>,
}

impl<'a, E: ?Sized> MultiMatcher<'a, E> {
	pub fn new(config: MatcherConfig) -> Self {
		Self {
			config,
			equalator: None,
			similator: None,
			validator: None,
		}
	}

	pub fn config(&self) -> &MatcherConfig {
		&self.config
	}

	pub fn equalator(mut self, equalator: &'a dyn Equalator<E>) -> Self {
		self.equalator = Some(equalator);
		self
	}

	pub fn similator(mut self, similator: &'a dyn Similator<E>) -> Self {
		self.similator = Some(similator);
		self
	}

	pub fn validator(mut self, validator: &'a dyn MatchValidator<E>) -> Self {
		self.validator = Some(validator);
		self
	}

	/// Matches `source` against `target`. Result indices refer to the input slices.
	pub fn match_items(&self, source: &[&E], target: &[&E]) -> MultiMatch {
		engine::run(self, source, target)
	}
}

impl<E: ?Sized> Default for MultiMatcher<'_, E> {
	fn default() -> Self {
		Self::new(MatcherConfig::default())
	}
}
