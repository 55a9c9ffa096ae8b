//! Assignment invariants over arbitrary inputs.

use lineage_matcher::{MatcherConfig, MultiMatcher};
use proptest::prelude::*;

fn similarity(a: &str, b: &str) -> f64 {
	strsim::normalized_levenshtein(a, b)
}

fn words() -> impl Strategy<Value = Vec<String>> {
	proptest::collection::vec("[a-d]{1,5}", 0..8)
}

proptest! {
	/// Links form a partial bijection and every index is either linked or unmatched.
	#[test]
	fn links_are_one_to_one(source in words(), target in words(), noise in 0.0f64..1.0) {
		let equal = |a: &str, b: &str| a == b;
		let similar = similarity;
		let config = MatcherConfig::default().with_noise_factor(noise);
		let matcher = MultiMatcher::<str>::new(config).equalator(&equal).similator(&similar);

		let source: Vec<&str> = source.iter().map(String::as_str).collect();
		let target: Vec<&str> = target.iter().map(String::as_str).collect();
		let result = matcher.match_items(&source, &target);

		let mut target_seen = vec![false; target.len()];
		for link in result.links() {
			prop_assert!(!target_seen[link.target]);
			target_seen[link.target] = true;
			prop_assert_eq!(result.target_match(link.target).map(|l| l.source), Some(link.source));
			prop_assert!(link.similarity >= config.similarity_threshold);
		}
		let linked_sources = result.links().count();
		prop_assert_eq!(linked_sources + result.unmatched_sources().count(), source.len());
		prop_assert_eq!(linked_sources + result.unmatched_targets().count(), target.len());
		prop_assert_eq!(result.statistics().match_count, linked_sources);
	}
}
