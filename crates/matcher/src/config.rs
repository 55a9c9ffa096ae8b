/// Tuning knobs of the multi-matcher.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MatcherConfig {
	/// Minimal score for a pair to become a candidate. `0` disables scoring entirely.
	pub similarity_threshold: f64,
	/// Score from which a singleton wins over any conflicting pair.
	pub singleton_precedence_threshold: f64,
	/// Factor applied to a singleton's score when comparing it to a conflicting pair.
	pub singleton_precedence_bonus: f64,
	/// Fraction of a row's or column's best score below which its other candidates are noise.
	pub noise_factor: f64,
}

impl MatcherConfig {
	pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
	pub const DEFAULT_SINGLETON_PRECEDENCE_THRESHOLD: f64 = 0.75;
	pub const DEFAULT_SINGLETON_PRECEDENCE_BONUS: f64 = 1.25;
	pub const DEFAULT_NOISE_FACTOR: f64 = 0.5;

	pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
		self.similarity_threshold = threshold;
		self
	}

	pub fn with_noise_factor(mut self, noise_factor: f64) -> Self {
		self.noise_factor = noise_factor;
		self
	}
}

impl Default for MatcherConfig {
	fn default() -> Self {
		Self {
			similarity_threshold: Self::DEFAULT_SIMILARITY_THRESHOLD,
			singleton_precedence_threshold: Self::DEFAULT_SINGLETON_PRECEDENCE_THRESHOLD,
			singleton_precedence_bonus: Self::DEFAULT_SINGLETON_PRECEDENCE_BONUS,
			noise_factor: Self::DEFAULT_NOISE_FACTOR,
		}
	}
}
