//! Mapper configuration.
//!
//! ```toml
//! numeric_widening = true
//!
//! [matcher]
//! similarity_threshold = 0.6
//!
//! [[type_similarity]]
//! left = "java.lang.Integer"
//! right = "int"
//! similarity = 0.9
//! ```

use lineage_matcher::MatcherConfig;
use serde::Deserialize;

use crate::error::Result;
use crate::similarity::TypeSimilarityTable;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegacyMappingConfig {
	pub matcher: MatcherConfig,
	/// Start from [`TypeSimilarityTable::numeric_widening`] instead of an empty table.
	pub numeric_widening: bool,
	pub type_similarity: Vec<TypeSimilarityEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSimilarityEntry {
	pub left: String,
	pub right: String,
	pub similarity: f64,
}

impl Default for LegacyMappingConfig {
	fn default() -> Self {
		Self {
			matcher: MatcherConfig::default(),
			numeric_widening: true,
			type_similarity: Vec::new(),
		}
	}
}

impl LegacyMappingConfig {
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// The configured entries on top of the base table; later entries win.
	pub fn type_similarity_table(&self) -> TypeSimilarityTable {
		let mut table = if self.numeric_widening {
			TypeSimilarityTable::numeric_widening()
		} else {
			TypeSimilarityTable::new()
		};
		for entry in &self.type_similarity {
			table.insert(&entry.left, &entry.right, entry.similarity);
		}
		table
	}
}
