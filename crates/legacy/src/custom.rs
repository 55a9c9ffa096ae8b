//! Hand-written legacy handlers that replace generated member mappings.

use std::fmt;
use std::sync::Arc;

use lineage_schema::{TypeDefinition, TypeDescription};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{LegacyMappingError, Result};

/// A handler that knows how to load one legacy shape by itself.
///
/// The handler declares the legacy structure it handles through [`TypeDescription`]. An
/// unassigned type id means it applies to every legacy definition with that structure.
pub trait CustomLegacyHandler: TypeDescription + fmt::Debug + Send + Sync {}

/// Registered custom handlers, consulted before any member mapping is computed.
#[derive(Default)]
pub struct CustomHandlerRegistry {
	handlers: RwLock<Vec<Arc<dyn CustomLegacyHandler>>>,
}

impl fmt::Debug for CustomHandlerRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CustomHandlerRegistry")
			.field("handlers", &self.handlers.read().len())
			.finish()
	}
}

impl CustomHandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, handler: Arc<dyn CustomLegacyHandler>) {
		debug!(handler = %handler.type_identifier(), "registered custom legacy handler");
		self.handlers.write().push(handler);
	}

	pub fn len(&self) -> usize {
		self.handlers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.read().is_empty()
	}

	/// Finds the handler for `legacy`: by type id first, then by structure.
	///
	/// # Errors
	///
	/// [`LegacyMappingError::HandlerStructureMismatch`] if the handler registered for the type
	/// id declares a different structure.
	pub fn lookup(&self, legacy: &TypeDefinition) -> Result<Option<Arc<dyn CustomLegacyHandler>>> {
		let handlers = self.handlers.read();

		if legacy.type_id().is_assigned()
			&& let Some(by_id) = handlers.iter().find(|h| h.type_id() == legacy.type_id())
		{
			if !by_id.equals_structure(legacy) {
				return Err(LegacyMappingError::HandlerStructureMismatch {
					type_identifier: legacy.type_identifier(),
				});
			}
			return Ok(Some(by_id.clone()));
		}

		Ok(handlers.iter().find(|h| h.equals_structure(legacy)).cloned())
	}
}
