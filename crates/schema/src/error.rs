//! Error types for catalog construction and registration.

use crate::definition::TypeId;

/// Fatal catalog consistency errors.
///
/// Lookup misses are not errors; they are reported as `None` by the query surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	/// A definition was built or registered without an assigned type id.
	#[error("type {type_name} has no assigned type id")]
	UnassignedTypeId { type_name: String },

	/// Two members of one definition share an identifier.
	#[error("duplicate member {identifier} in type {type_name}")]
	DuplicateMember { type_name: String, identifier: String },

	/// The explicit persisted order does not name exactly the instance members.
	#[error("invalid instance member order for type {type_name}: {reason}")]
	InvalidInstanceOrder { type_name: String, reason: String },

	/// A type id is already bound to a structurally different definition.
	#[error("inconsistent definition for type id {type_id}: registered {existing}, incoming {incoming}")]
	InconsistentDefinition {
		type_id: TypeId,
		existing: String,
		incoming: String,
	},

	/// A definition does not belong to the lineage it is being added to.
	#[error("definition {incoming} does not fit lineage {lineage}: {reason}")]
	LineageMismatch {
		lineage: String,
		incoming: String,
		reason: String,
	},

	/// A lineage already has a different runtime definition.
	#[error("lineage {lineage} already has runtime definition {existing}, cannot mark {incoming}")]
	RuntimeDefinitionConflict {
		lineage: String,
		existing: String,
		incoming: String,
	},

	/// A runtime definition was marked before being registered in its lineage.
	#[error("runtime definition {type_identifier} is not registered in its lineage")]
	RuntimeDefinitionNotRegistered { type_identifier: String },

	/// A type id requested by the caller is not part of the dictionary.
	#[error("unknown type id {type_id}")]
	UnknownTypeId { type_id: TypeId },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
