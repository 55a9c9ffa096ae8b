//! Type name mapping applied to parsed entries.
//!
//! A catalog may record a type under an interface-style name while the running program knows it
//! under a class-style name (or the other way round). Entries without instance members are asked
//! for an interface mapping, all others for a class mapping. No mapping keeps the recorded name.

use rustc_hash::FxHashMap;

pub trait TypeNameMapper: Send + Sync {
	fn map_interface_name(&self, type_name: &str) -> Option<String>;

	fn map_class_name(&self, type_name: &str) -> Option<String>;
}

/// Keeps every recorded name.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTypeNameMapping;

impl TypeNameMapper for NoTypeNameMapping {
	fn map_interface_name(&self, _type_name: &str) -> Option<String> {
		None
	}

	fn map_class_name(&self, _type_name: &str) -> Option<String> {
		None
	}
}

/// Mapper backed by two explicit name tables.
#[derive(Clone, Debug, Default)]
pub struct TableTypeNameMapper {
	interfaces: FxHashMap<String, String>,
	classes: FxHashMap<String, String>,
}

impl TableTypeNameMapper {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn interface(mut self, recorded: impl Into<String>, mapped: impl Into<String>) -> Self {
		self.interfaces.insert(recorded.into(), mapped.into());
		self
	}

	pub fn class(mut self, recorded: impl Into<String>, mapped: impl Into<String>) -> Self {
		self.classes.insert(recorded.into(), mapped.into());
		self
	}
}

impl TypeNameMapper for TableTypeNameMapper {
	fn map_interface_name(&self, type_name: &str) -> Option<String> {
		self.interfaces.get(type_name).cloned()
	}

	fn map_class_name(&self, type_name: &str) -> Option<String> {
		self.classes.get(type_name).cloned()
	}
}
