//! Shared type dictionary.
//!
//! # Role
//!
//! The dictionary is the catalog of every recorded type shape: a `name → lineage` index and a
//! `type id → definition` index that are always updated together.
//!
//! # Invariants
//!
//! - One mutex guards both indexes, lineage creation and highest-id computation.
//! - Registration is all-or-nothing: a batch is applied to a staged copy and committed only if
//!   every definition in it is valid.
//! - A type id denotes one shape forever. Re-registering a structurally equal shape is a no-op;
//!   a different shape under a used id is an error.
//! - Nothing is ever removed.
//!
//! Lineages are held as `Arc<TypeLineage>` and copied on write, so staging a batch and taking a
//! [`TypeDictionaryView`] only clone the touched lineages.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::definition::{TypeDefinition, TypeId};
use crate::error::{Result, SchemaError};
use crate::lineage::TypeLineage;


/// Callback invoked for every definition passed to a successful registration call.
pub trait RegistrationObserver: Send + Sync {
	fn on_registered(&self, definition: &Arc<TypeDefinition>);
}

impl<F> RegistrationObserver for F
where
	F: Fn(&Arc<TypeDefinition>) + Send + Sync,
{
	fn on_registered(&self, definition: &Arc<TypeDefinition>) {
		self(definition)
	}
}

/// Query surface shared by the live dictionary and its snapshots.
///
/// Absence is reported as `None`; callers decide whether it is fatal.
pub trait TypeDictionaryRead {
	/// Latest definition of the lineage named `type_name`.
	fn lookup_by_name(&self, type_name: &str) -> Option<Arc<TypeDefinition>>;

	fn lookup_by_id(&self, type_id: TypeId) -> Option<Arc<TypeDefinition>>;

	fn lookup_lineage(&self, type_name: &str) -> Option<Arc<TypeLineage>>;

	/// Highest registered type id, `None` while empty.
	fn determine_highest_type_id(&self) -> Option<TypeId>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// All definitions in ascending type id order.
	fn all_definitions(&self) -> Vec<Arc<TypeDefinition>>;

	/// All lineages in ascending type name order.
	fn lineages(&self) -> Vec<Arc<TypeLineage>>;

	/// Latest definition of every non-empty lineage, by type name.
	fn latest_definitions(&self) -> Vec<Arc<TypeDefinition>> {
		self.lineages().iter().filter_map(|lineage| lineage.latest().cloned()).collect()
	}

	/// Runtime definition of every lineage that has one, by type name.
	fn runtime_definitions(&self) -> Vec<Arc<TypeDefinition>> {
		self.lineages()
			.iter()
			.filter_map(|lineage| lineage.runtime_definition().cloned())
			.collect()
	}

	/// Resolves every id or fails on the first unknown one.
	fn resolve_type_ids(&self, type_ids: &[TypeId]) -> Result<Vec<Arc<TypeDefinition>>> {
		type_ids
			.iter()
			.map(|&type_id| self.lookup_by_id(type_id).ok_or(SchemaError::UnknownTypeId { type_id }))
			.collect()
	}
}

#[derive(Clone, Debug, Default)]
struct DictionaryState {
	lineages: BTreeMap<Arc<str>, Arc<TypeLineage>>,
	by_id: BTreeMap<TypeId, Arc<TypeDefinition>>,
}

impl DictionaryState {
	fn lineage_mut(&mut self, type_name: &Arc<str>) -> &mut TypeLineage {
		let lineage = self
			.lineages
			.entry(type_name.clone())
			.or_insert_with(|| Arc::new(TypeLineage::new(type_name.clone())));
		Arc::make_mut(lineage)
	}

	/// Every check [`register`](Self::register) performs, without mutating anything.
	fn validate(&self, definition: &TypeDefinition, runtime: bool) -> Result<()> {
		let type_id = definition.type_id();
		if !type_id.is_assigned() {
			return Err(SchemaError::UnassignedTypeId {
				type_name: definition.type_name().to_string(),
			});
		}
		if let Some(existing) = self.by_id.get(&type_id)
			&& !existing.equals_structure(definition)
		{
			return Err(SchemaError::InconsistentDefinition {
				type_id,
				existing: existing.type_identifier(),
				incoming: definition.type_identifier(),
			});
		}
		if let Some(lineage) = self.lineages.get(definition.type_name()) {
			lineage.validate(definition)?;
			if runtime {
				lineage.validate_runtime_mark(definition)?;
			}
		}
		Ok(())
	}

	/// Validates first, so a failed registration leaves the state untouched.
	fn register(&mut self, definition: &Arc<TypeDefinition>, runtime: bool) -> Result<bool> {
		self.validate(definition, runtime)?;
		let type_id = definition.type_id();
		let lineage = self.lineage_mut(definition.type_name_arc());
		let mut changed = lineage.register(definition.clone())?;
		if runtime {
			changed |= lineage.set_runtime_definition(definition)?;
		}
		if !self.by_id.contains_key(&type_id) {
			self.by_id.insert(type_id, definition.clone());
			changed = true;
		}
		Ok(changed)
	}

	fn lookup_by_name(&self, type_name: &str) -> Option<Arc<TypeDefinition>> {
		self.lineages.get(type_name)?.latest().cloned()
	}

	fn lookup_by_id(&self, type_id: TypeId) -> Option<Arc<TypeDefinition>> {
		self.by_id.get(&type_id).cloned()
	}

	fn lookup_lineage(&self, type_name: &str) -> Option<Arc<TypeLineage>> {
		self.lineages.get(type_name).cloned()
	}

	fn highest_type_id(&self) -> Option<TypeId> {
		self.by_id.keys().next_back().copied()
	}

	fn all_definitions(&self) -> Vec<Arc<TypeDefinition>> {
		self.by_id.values().cloned().collect()
	}

	fn lineages(&self) -> Vec<Arc<TypeLineage>> {
		self.lineages.values().cloned().collect()
	}
}

struct Inner {
	state: DictionaryState,
	observer: Option<Arc<dyn RegistrationObserver>>,
}

/// The live, shared catalog of recorded type shapes.
pub struct TypeDictionary {
	inner: Mutex<Inner>,
}

impl Default for TypeDictionary {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for TypeDictionary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.lock();
		f.debug_struct("TypeDictionary")
			.field("lineages", &inner.state.lineages.len())
			.field("definitions", &inner.state.by_id.len())
			.field("observed", &inner.observer.is_some())
			.finish()
	}
}

impl TypeDictionary {
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(Inner {
				state: DictionaryState::default(),
				observer: None,
			}),
		}
	}

	/// Replaces the registration observer. `None` disables notification.
	pub fn set_registration_observer(&self, observer: Option<Arc<dyn RegistrationObserver>>) {
		self.inner.lock().observer = observer;
	}

	/// Returns the lineage for `type_name`, creating an empty one if absent.
	pub fn ensure_lineage(&self, type_name: &str) -> Arc<TypeLineage> {
		let mut inner = self.inner.lock();
		let type_name: Arc<str> = Arc::from(type_name);
		inner
			.state
			.lineages
			.entry(type_name.clone())
			.or_insert_with(|| Arc::new(TypeLineage::new(type_name)))
			.clone()
	}

	/// Registers one definition. Returns whether the catalog changed.
	pub fn register_definition(&self, definition: Arc<TypeDefinition>) -> Result<bool> {
		self.register_all(&[definition], false)
	}

	/// Registers a batch; nothing is applied unless every definition is valid.
	pub fn register_definitions(&self, definitions: impl IntoIterator<Item = Arc<TypeDefinition>>) -> Result<bool> {
		let definitions: Vec<_> = definitions.into_iter().collect();
		self.register_all(&definitions, false)
	}

	/// Registers one definition and marks it as its lineage's runtime definition.
	pub fn register_runtime_definition(&self, definition: Arc<TypeDefinition>) -> Result<bool> {
		self.register_all(&[definition], true)
	}

	/// Batch form of [`register_runtime_definition`](Self::register_runtime_definition).
	pub fn register_runtime_definitions(
		&self,
		definitions: impl IntoIterator<Item = Arc<TypeDefinition>>,
	) -> Result<bool> {
		let definitions: Vec<_> = definitions.into_iter().collect();
		self.register_all(&definitions, true)
	}

	/// Immutable snapshot of the current catalog.
	pub fn view(&self) -> TypeDictionaryView {
		TypeDictionaryView {
			state: self.inner.lock().state.clone(),
		}
	}

	fn register_all(&self, definitions: &[Arc<TypeDefinition>], runtime: bool) -> Result<bool> {
		let (changed, observer) = {
			let mut inner = self.inner.lock();
			let changed = match definitions {
				[definition] => inner.state.register(definition, runtime)?,
				_ => {
					// Later entries validate against earlier ones, so a batch is staged on a copy.
					let mut staged = inner.state.clone();
					let mut changed = false;
					for definition in definitions {
						changed |= staged.register(definition, runtime)?;
					}
					if changed {
						inner.state = staged;
					}
					changed
				}
			};
			(changed, inner.observer.clone())
		};

		debug!(count = definitions.len(), runtime, changed, "registered type definitions");
		if let Some(observer) = observer {
			for definition in definitions {
				observer.on_registered(definition);
			}
		}
		Ok(changed)
	}
}

impl TypeDictionaryRead for TypeDictionary {
	fn lookup_by_name(&self, type_name: &str) -> Option<Arc<TypeDefinition>> {
		self.inner.lock().state.lookup_by_name(type_name)
	}

	fn lookup_by_id(&self, type_id: TypeId) -> Option<Arc<TypeDefinition>> {
		self.inner.lock().state.lookup_by_id(type_id)
	}

	fn lookup_lineage(&self, type_name: &str) -> Option<Arc<TypeLineage>> {
		self.inner.lock().state.lookup_lineage(type_name)
	}

	fn determine_highest_type_id(&self) -> Option<TypeId> {
		self.inner.lock().state.highest_type_id()
	}

	fn len(&self) -> usize {
		self.inner.lock().state.by_id.len()
	}

	fn all_definitions(&self) -> Vec<Arc<TypeDefinition>> {
		self.inner.lock().state.all_definitions()
	}

	fn lineages(&self) -> Vec<Arc<TypeLineage>> {
		self.inner.lock().state.lineages()
	}
}

/// Immutable snapshot of a [`TypeDictionary`]. Offers the query surface only.
#[derive(Clone, Debug, Default)]
pub struct TypeDictionaryView {
	state: DictionaryState,
}

impl TypeDictionaryRead for TypeDictionaryView {
	fn lookup_by_name(&self, type_name: &str) -> Option<Arc<TypeDefinition>> {
		self.state.lookup_by_name(type_name)
	}

	fn lookup_by_id(&self, type_id: TypeId) -> Option<Arc<TypeDefinition>> {
		self.state.lookup_by_id(type_id)
	}

	fn lookup_lineage(&self, type_name: &str) -> Option<Arc<TypeLineage>> {
		self.state.lookup_lineage(type_name)
	}

	fn determine_highest_type_id(&self) -> Option<TypeId> {
		self.state.highest_type_id()
	}

	fn len(&self) -> usize {
		self.state.by_id.len()
	}

	fn all_definitions(&self) -> Vec<Arc<TypeDefinition>> {
		self.state.all_definitions()
	}

	fn lineages(&self) -> Vec<Arc<TypeLineage>> {
		self.state.lineages()
	}
}
