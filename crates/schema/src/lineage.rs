//! Version history of one type name.
//!
//! # Invariants
//!
//! - Definitions are keyed by ascending [`TypeId`] and never removed.
//! - Every definition carries the lineage's type name and runtime type name.
//! - A type id already present only accepts a structurally equal definition (a no-op).
//! - The runtime definition is set at most once, and only to a registered definition.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::definition::{TypeDefinition, TypeId};
use crate::error::{Result, SchemaError};

/// Ordered history of all recorded shapes of one type name.
#[derive(Clone, Debug)]
pub struct TypeLineage {
	type_name: Arc<str>,
	runtime_type_name: Option<Arc<str>>,
	definitions: BTreeMap<TypeId, Arc<TypeDefinition>>,
	runtime_definition: Option<Arc<TypeDefinition>>,
}

impl TypeLineage {
	pub fn new(type_name: impl Into<Arc<str>>) -> Self {
		Self {
			type_name: type_name.into(),
			runtime_type_name: None,
			definitions: BTreeMap::new(),
			runtime_definition: None,
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Runtime type name shared by all definitions, adopted from the first one registered.
	pub fn runtime_type_name(&self) -> Option<&str> {
		self.runtime_type_name.as_deref()
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	pub fn lookup(&self, type_id: TypeId) -> Option<&Arc<TypeDefinition>> {
		self.definitions.get(&type_id)
	}

	/// Definition with the highest type id.
	pub fn latest(&self) -> Option<&Arc<TypeDefinition>> {
		self.definitions.values().next_back()
	}

	pub fn runtime_definition(&self) -> Option<&Arc<TypeDefinition>> {
		self.runtime_definition.as_ref()
	}

	/// Definitions in ascending type id order.
	pub fn definitions(&self) -> impl Iterator<Item = &Arc<TypeDefinition>> + '_ {
		self.definitions.values()
	}

	/// Checks whether `definition` may be registered without touching the lineage.
	pub fn validate(&self, definition: &TypeDefinition) -> Result<()> {
		if definition.type_name() != &*self.type_name {
			return Err(self.mismatch(definition, format!("type name {} differs", definition.type_name())));
		}
		if !self.definitions.is_empty() && definition.runtime_type_name() != self.runtime_type_name() {
			return Err(self.mismatch(
				definition,
				format!(
					"runtime type name {:?} differs from {:?}",
					definition.runtime_type_name(),
					self.runtime_type_name()
				),
			));
		}
		if let Some(existing) = self.definitions.get(&definition.type_id())
			&& !existing.equals_structure(definition)
		{
			return Err(SchemaError::InconsistentDefinition {
				type_id: definition.type_id(),
				existing: existing.type_identifier(),
				incoming: definition.type_identifier(),
			});
		}
		Ok(())
	}

	/// Adds `definition`. Returns whether the lineage changed.
	pub fn register(&mut self, definition: Arc<TypeDefinition>) -> Result<bool> {
		self.validate(&definition)?;
		if self.definitions.contains_key(&definition.type_id()) {
			return Ok(false);
		}
		if self.definitions.is_empty() {
			self.runtime_type_name = definition.runtime_type_name().map(Arc::from);
		}
		self.definitions.insert(definition.type_id(), definition);
		Ok(true)
	}

	/// Marks the registered definition with `definition`'s type id as the runtime definition.
	///
	/// Marking the same shape again is a no-op. Returns whether the lineage changed.
	pub fn set_runtime_definition(&mut self, definition: &TypeDefinition) -> Result<bool> {
		let Some(registered) = self
			.definitions
			.get(&definition.type_id())
			.filter(|registered| registered.equals_structure(definition))
			.cloned()
		else {
			return Err(SchemaError::RuntimeDefinitionNotRegistered {
				type_identifier: definition.type_identifier(),
			});
		};

		self.validate_runtime_mark(definition)?;
		if self.runtime_definition.is_some() {
			return Ok(false);
		}
		self.runtime_definition = Some(registered);
		Ok(true)
	}

	/// Checks that marking `definition` as the runtime definition does not replace another one.
	pub fn validate_runtime_mark(&self, definition: &TypeDefinition) -> Result<()> {
		match &self.runtime_definition {
			Some(current) if current.type_id() != definition.type_id() => Err(SchemaError::RuntimeDefinitionConflict {
				lineage: self.type_name.to_string(),
				existing: current.type_identifier(),
				incoming: definition.type_identifier(),
			}),
			_ => Ok(()),
		}
	}

	fn mismatch(&self, definition: &TypeDefinition, reason: String) -> SchemaError {
		SchemaError::LineageMismatch {
			lineage: self.type_name.to_string(),
			incoming: definition.type_identifier(),
			reason,
		}
	}
}
