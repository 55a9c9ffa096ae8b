/// One established source → target link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
	pub source: usize,
	pub target: usize,
	pub similarity: f64,
}

/// Aggregate over all established links. All zero when nothing matched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MatchStatistics {
	pub match_count: usize,
	pub lowest: f64,
	pub average: f64,
	pub highest: f64,
}

/// Outcome of one matcher run, indexed by input position.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiMatch {
	source_links: Vec<Option<(usize, f64)>>,
	target_links: Vec<Option<(usize, f64)>>,
	statistics: MatchStatistics,
}

impl MultiMatch {
	pub(crate) fn new(source_links: Vec<Option<(usize, f64)>>, target_len: usize) -> Self {
		let mut target_links = vec![None; target_len];
		for (source, link) in source_links.iter().enumerate() {
			if let Some((target, similarity)) = *link {
				target_links[target] = Some((source, similarity));
			}
		}

		let similarities: Vec<f64> = source_links.iter().flatten().map(|&(_, similarity)| similarity).collect();
		let statistics = if similarities.is_empty() {
			MatchStatistics::default()
		} else {
			MatchStatistics {
				match_count: similarities.len(),
				lowest: similarities.iter().copied().fold(f64::INFINITY, f64::min),
				average: similarities.iter().sum::<f64>() / similarities.len() as f64,
				highest: similarities.iter().copied().fold(f64::NEG_INFINITY, f64::max),
			}
		};

		Self {
			source_links,
			target_links,
			statistics,
		}
	}

	pub fn source_len(&self) -> usize {
		self.source_links.len()
	}

	pub fn target_len(&self) -> usize {
		self.target_links.len()
	}

	pub fn source_match(&self, source: usize) -> Option<Link> {
		let (target, similarity) = (*self.source_links.get(source)?)?;
		Some(Link {
			source,
			target,
			similarity,
		})
	}

	pub fn target_match(&self, target: usize) -> Option<Link> {
		let (source, similarity) = (*self.target_links.get(target)?)?;
		Some(Link {
			source,
			target,
			similarity,
		})
	}

	/// All links in ascending source order.
	pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
		(0..self.source_links.len()).filter_map(|source| self.source_match(source))
	}

	pub fn unmatched_sources(&self) -> impl Iterator<Item = usize> + '_ {
		(0..self.source_links.len()).filter(|&source| self.source_links[source].is_none())
	}

	pub fn unmatched_targets(&self) -> impl Iterator<Item = usize> + '_ {
		(0..self.target_links.len()).filter(|&target| self.target_links[target].is_none())
	}

	pub fn statistics(&self) -> MatchStatistics {
		self.statistics
	}
}
