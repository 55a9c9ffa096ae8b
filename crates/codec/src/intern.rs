//! String de-duplication for parsed names.
//!
//! Dictionary text repeats the same type names and qualifiers many times. Every name produced by
//! one parse is routed through one [`StringInterner`], so equal names share one allocation.

use std::sync::Arc;

use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub struct StringInterner {
	strings: FxHashSet<Arc<str>>,
}

impl StringInterner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the shared copy of `value`, storing it on first sight.
	pub fn intern(&mut self, value: &str) -> Arc<str> {
		if let Some(existing) = self.strings.get(value) {
			return existing.clone();
		}
		let interned: Arc<str> = Arc::from(value);
		self.strings.insert(interned.clone());
		interned
	}

	pub fn len(&self) -> usize {
		self.strings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.strings.is_empty()
	}
}
