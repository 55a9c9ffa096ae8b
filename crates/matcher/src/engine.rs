//! Matching state machine over a dense similarity matrix.
//!
//! # Invariants
//!
//! - `matrix[s][t] > 0` exactly for live candidates; a linked or dropped pair is zeroed.
//! - `source_counts[s]` / `target_counts[t]` equal the live candidates in row `s` / column `t`.
//! - `live_sources` / `live_targets` count rows / columns with at least one live candidate.
//!
//! Each loop iteration zeroes at least one live candidate, so a run always terminates.

use crate::result::MultiMatch;
use crate::{MatcherConfig, MultiMatcher};


const PERFECT: f64 = 1.0;

pub(crate) fn run<E: ?Sized>(matcher: &MultiMatcher<'_, E>, source: &[&E], target: &[&E]) -> MultiMatch {
	let mut state = State::new(matcher, source, target);
	state.link_all_equal();
	if matcher.config.similarity_threshold > 0.0 && matcher.similator.is_some() {
		state.link_all_similar();
	}
	MultiMatch::new(state.links, target.len())
}

struct State<'r, 'a, E: ?Sized> {
	matcher: &'r MultiMatcher<'a, E>,
	config: MatcherConfig,
	source: &'r [&'r E],
	target: &'r [&'r E],
	links: Vec<Option<(usize, f64)>>,
	target_linked: Vec<bool>,
	matrix: Vec<Vec<f64>>,
	source_counts: Vec<usize>,
	target_counts: Vec<usize>,
	live_sources: usize,
	live_targets: usize,
}

impl<'r, 'a, E: ?Sized> State<'r, 'a, E> {
	fn new(matcher: &'r MultiMatcher<'a, E>, source: &'r [&'r E], target: &'r [&'r E]) -> Self {
		Self {
			matcher,
			config: matcher.config,
			source,
			target,
			links: vec![None; source.len()],
			target_linked: vec![false; target.len()],
			matrix: Vec::new(),
			source_counts: vec![0; source.len()],
			target_counts: vec![0; target.len()],
			live_sources: 0,
			live_targets: 0,
		}
	}

	fn is_source_linked(&self, s: usize) -> bool {
		self.links[s].is_some()
	}

	fn link(&mut self, s: usize, t: usize, similarity: f64) {
		self.links[s] = Some((t, similarity));
		self.target_linked[t] = true;
	}

	fn link_all_equal(&mut self) {
		let Some(equalator) = self.matcher.equalator else {
			return;
		};
		for s in 0..self.source.len() {
			let found = (0..self.target.len())
				.find(|&t| !self.target_linked[t] && equalator.equal(self.source[s], self.target[t]));
			if let Some(t) = found {
				self.link(s, t, PERFECT);
			}
		}
	}

	fn link_all_similar(&mut self) {
		self.build_matrix();
		self.link_all_perfect();

		if self.config.similarity_threshold < self.config.noise_factor {
			self.remove_noise();
		}

		while self.live_sources > 0 && self.live_targets > 0 {
			if self.link_all_unconflicted() {
				continue;
			}
			if self.resolve_one_source_singleton() {
				continue;
			}
			if self.resolve_one_target_singleton() {
				continue;
			}
			if !self.link_one_best() {
				break;
			}
		}
	}

	fn build_matrix(&mut self) {
		let Some(similator) = self.matcher.similator else {
			return;
		};
		let threshold = self.config.similarity_threshold;
		self.matrix = vec![vec![0.0; self.target.len()]; self.source.len()];

		for s in 0..self.source.len() {
			if self.is_source_linked(s) {
				continue;
			}
			for t in 0..self.target.len() {
				if self.target_linked[t] {
					continue;
				}
				let similarity = similator.evaluate(self.source[s], self.target[t]);
				if similarity >= threshold && similarity > 0.0 {
					self.matrix[s][t] = similarity;
					self.source_counts[s] += 1;
					self.target_counts[t] += 1;
				}
			}
		}

		self.live_sources = self.source_counts.iter().filter(|&&count| count > 0).count();
		self.live_targets = self.target_counts.iter().filter(|&&count| count > 0).count();
	}

	/// Zeroes one live candidate and updates all counters.
	fn drop_candidate(&mut self, s: usize, t: usize) {
		if self.matrix[s][t] <= 0.0 {
			return;
		}
		self.matrix[s][t] = 0.0;
		self.source_counts[s] -= 1;
		if self.source_counts[s] == 0 {
			self.live_sources -= 1;
		}
		self.target_counts[t] -= 1;
		if self.target_counts[t] == 0 {
			self.live_targets -= 1;
		}
	}

	/// Links `(s, t)` unless vetoed; either way the candidate is consumed.
	fn link_candidate(&mut self, s: usize, t: usize) {
		let similarity = self.matrix[s][t];
		if let Some(validator) = self.matcher.validator
			&& !validator.is_valid_match(
				self.source[s],
				self.target[t],
				similarity,
				self.source_counts[s],
				self.target_counts[t],
			) {
			self.drop_candidate(s, t);
			return;
		}

		self.link(s, t, similarity);
		for other in 0..self.target.len() {
			self.drop_candidate(s, other);
		}
		for other in 0..self.source.len() {
			self.drop_candidate(other, t);
		}
	}

	fn link_all_perfect(&mut self) {
		for s in 0..self.source.len() {
			if self.source_counts[s] == 0 {
				continue;
			}
			if let Some(t) = (0..self.target.len()).find(|&t| self.matrix[s][t] == PERFECT) {
				self.link_candidate(s, t);
			}
		}
	}

	fn remove_noise(&mut self) {
		let noise_factor = self.config.noise_factor;
		for s in 0..self.source.len() {
			let best = self.matrix[s].iter().copied().fold(0.0, f64::max);
			let noise = best * noise_factor;
			for t in 0..self.target.len() {
				if self.matrix[s][t] > 0.0 && self.matrix[s][t] < noise {
					self.drop_candidate(s, t);
				}
			}
		}
		for t in 0..self.target.len() {
			let best = (0..self.source.len()).map(|s| self.matrix[s][t]).fold(0.0, f64::max);
			let noise = best * noise_factor;
			for s in 0..self.source.len() {
				if self.matrix[s][t] > 0.0 && self.matrix[s][t] < noise {
					self.drop_candidate(s, t);
				}
			}
		}
	}

	/// Links every pair whose source and target both have exactly one candidate.
	fn link_all_unconflicted(&mut self) -> bool {
		let mut changed = false;
		'restart: loop {
			for s in 0..self.source.len() {
				if self.source_counts[s] != 1 {
					continue;
				}
				let unconflicted =
					(0..self.target.len()).find(|&t| self.matrix[s][t] > 0.0 && self.target_counts[t] == 1);
				if let Some(t) = unconflicted {
					self.link_candidate(s, t);
					changed = true;
					continue 'restart;
				}
			}
			break;
		}
		changed
	}

	fn resolve_one_source_singleton(&mut self) -> bool {
		for s in 0..self.source.len() {
			if self.source_counts[s] != 1 {
				continue;
			}
			let Some(t) = (0..self.target.len()).find(|&t| self.matrix[s][t] > 0.0) else {
				continue;
			};

			// Strongest singleton source competing for `t`.
			let singleton = (0..self.source.len())
				.filter(|&i| self.source_counts[i] == 1)
				.fold(s, |best, i| if self.matrix[i][t] > self.matrix[best][t] { i } else { best });
			let singleton_score = self.matrix[singleton][t];
			if singleton_score >= self.config.singleton_precedence_threshold {
				self.link_candidate(singleton, t);
				return true;
			}

			let overall = (0..self.source.len()).fold(singleton, |best, i| {
				if self.matrix[i][t] > self.matrix[best][t] { i } else { best }
			});
			if overall == singleton
				|| singleton_score * self.config.singleton_precedence_bonus >= self.matrix[overall][t]
			{
				self.link_candidate(singleton, t);
				return true;
			}
		}
		false
	}

	fn resolve_one_target_singleton(&mut self) -> bool {
		for t in 0..self.target.len() {
			if self.target_counts[t] != 1 {
				continue;
			}
			let Some(s) = (0..self.source.len()).find(|&s| self.matrix[s][t] > 0.0) else {
				continue;
			};

			let singleton = (0..self.target.len())
				.filter(|&i| self.target_counts[i] == 1)
				.fold(t, |best, i| if self.matrix[s][i] > self.matrix[s][best] { i } else { best });
			let singleton_score = self.matrix[s][singleton];
			if singleton_score >= self.config.singleton_precedence_threshold {
				self.link_candidate(s, singleton);
				return true;
			}

			let overall = (0..self.target.len()).fold(singleton, |best, i| {
				if self.matrix[s][i] > self.matrix[s][best] { i } else { best }
			});
			if overall == singleton
				|| singleton_score * self.config.singleton_precedence_bonus >= self.matrix[s][overall]
			{
				self.link_candidate(s, singleton);
				return true;
			}
		}
		false
	}

	/// Links the highest scoring live candidate. First in row-major order wins ties.
	fn link_one_best(&mut self) -> bool {
		let mut best: Option<(usize, usize, f64)> = None;
		for s in 0..self.source.len() {
			if self.source_counts[s] == 0 {
				continue;
			}
			for t in 0..self.target.len() {
				let score = self.matrix[s][t];
				if score > 0.0 && best.is_none_or(|(_, _, top)| score > top) {
					best = Some((s, t, score));
				}
			}
		}
		match best {
			Some((s, t, _)) => {
				self.link_candidate(s, t);
				true
			}
			None => false,
		}
	}
}
