//! Parse, assemble and load dictionary text.

use std::sync::Arc;

use lineage_schema::{
	BinaryFieldLengthResolver, FieldLengthResolver, NoRuntimeTypes, TypeDefinition, TypeDescription, TypeDictionary,
	TypeDictionaryRead, TypeResolver,
};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::assembler::DictionaryAssembler;
use crate::entry::{EntryBuilder, TypeEntry};
use crate::error::{CodecError, ParseError, Result};
use crate::intern::StringInterner;
use crate::mapping::{NoTypeNameMapping, TypeNameMapper};
use crate::parser;

/// Text codec of the type dictionary, wired to the resolvers of the running program.
#[derive(Clone)]
pub struct DictionaryCodec {
	types: Arc<dyn TypeResolver>,
	lengths: Arc<dyn FieldLengthResolver>,
	names: Arc<dyn TypeNameMapper>,
	assembler: DictionaryAssembler,
}

impl Default for DictionaryCodec {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for DictionaryCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DictionaryCodec").finish_non_exhaustive()
	}
}

impl DictionaryCodec {
	/// Codec without runtime types, binary length bounds and no name mapping.
	pub fn new() -> Self {
		Self {
			types: Arc::new(NoRuntimeTypes),
			lengths: Arc::new(BinaryFieldLengthResolver),
			names: Arc::new(NoTypeNameMapping),
			assembler: DictionaryAssembler,
		}
	}

	pub fn with_type_resolver(mut self, types: Arc<dyn TypeResolver>) -> Self {
		self.types = types;
		self
	}

	pub fn with_length_resolver(mut self, lengths: Arc<dyn FieldLengthResolver>) -> Self {
		self.lengths = lengths;
		self
	}

	pub fn with_type_name_mapper(mut self, names: Arc<dyn TypeNameMapper>) -> Self {
		self.names = names;
		self
	}

	/// Parses dictionary text into entries, resolving members against the runtime.
	///
	/// # Errors
	///
	/// Returns the first [`ParseError`] encountered; nothing is returned on failure.
	pub fn parse(&self, text: &str) -> std::result::Result<Vec<TypeEntry>, ParseError> {
		let raw = parser::parse(text)?;
		let mut builder = EntryBuilder {
			types: &*self.types,
			lengths: &*self.lengths,
			names: &*self.names,
			interner: StringInterner::new(),
		};
		let entries: Vec<TypeEntry> = raw.into_iter().map(|raw| builder.build(raw)).collect();
		debug!(
			entries = entries.len(),
			interned = builder.interner.len(),
			"parsed type dictionary"
		);
		Ok(entries)
	}

	/// Assembles every definition of `dictionary`.
	pub fn assemble(&self, dictionary: &dyn TypeDictionaryRead) -> String {
		self.assembler.assemble_dictionary(dictionary)
	}

	pub fn assemble_entries(&self, entries: &[TypeEntry]) -> String {
		self.assembler
			.assemble_types(entries.iter().map(|entry| entry as &dyn TypeDescription))
	}

	/// Builds definitions from one batch of entries.
	///
	/// A type without a runtime counterpart keeps a `None` runtime type name; this is logged,
	/// not an error.
	///
	/// # Errors
	///
	/// - [`CodecError::DuplicateTypeId`] if two entries share a type id.
	/// - [`CodecError::Schema`] if an entry is not a valid definition.
	pub fn create_definitions(&self, entries: Vec<TypeEntry>) -> Result<Vec<Arc<TypeDefinition>>> {
		let mut seen: FxHashMap<_, String> = FxHashMap::default();
		for entry in &entries {
			if let Some(first) = seen.insert(entry.type_id(), entry.type_identifier()) {
				return Err(CodecError::DuplicateTypeId {
					type_id: entry.type_id(),
					first,
					second: entry.type_identifier(),
				});
			}
		}

		entries
			.into_iter()
			.map(|entry| {
				let mut builder = TypeDefinition::builder(entry.type_id(), entry.type_name_arc().clone());
				match self.types.resolve_type(entry.type_name()) {
					Some(handle) => builder = builder.runtime_type(handle),
					None => info!(type_identifier = %entry.type_identifier(), "type has no runtime counterpart"),
				}
				Ok(Arc::new(builder.members(entry.into_members()).build()?))
			})
			.collect()
	}

	/// Parses `text` and registers all of it in `dictionary` in one all-or-nothing batch.
	///
	/// Returns whether the dictionary changed.
	pub fn load_into(&self, text: &str, dictionary: &TypeDictionary) -> Result<bool> {
		let definitions = self.create_definitions(self.parse(text)?)?;
		Ok(dictionary.register_definitions(definitions)?)
	}
}
