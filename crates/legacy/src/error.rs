//! Error types for legacy member mapping.

/// Fatal mapping errors. Each one prevents loading data of the affected legacy shape only.
///
/// Type identifiers are `"<typeId> <typeName>"`, member identifiers as recorded.
#[derive(Debug, thiserror::Error)]
pub enum LegacyMappingError {
	/// A refactoring entry names a current member that does not exist.
	#[error("refactoring target {target} of legacy member {member} does not exist in {type_identifier}")]
	UnresolvableRefactoringTarget {
		type_identifier: String,
		member: String,
		target: String,
	},

	/// A legacy member is explicitly mapped onto a member explicitly declared new.
	#[error("duplicate target entry {target} for {type_identifier}: mapped from {member} but declared new")]
	TargetDeclaredNew {
		type_identifier: String,
		member: String,
		target: String,
	},

	/// Two legacy members are explicitly mapped onto the same current member.
	#[error("current member {target} of {type_identifier} is mapped from both {first} and {second}")]
	DuplicateTarget {
		type_identifier: String,
		target: String,
		first: String,
		second: String,
	},

	/// A custom handler registered for a type id declares a different structure.
	#[error("custom legacy handler structure mismatch for {type_identifier}")]
	HandlerStructureMismatch { type_identifier: String },

	/// A resultor refused the assembled mapping.
	#[error("mapping from {legacy} to {current} rejected: {reason}")]
	Rejected {
		legacy: String,
		current: String,
		reason: String,
	},

	#[error("invalid mapping configuration: {0}")]
	Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LegacyMappingError>;
