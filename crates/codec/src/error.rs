use lineage_schema::{SchemaError, TypeId};

/// Malformed dictionary text. Every variant carries the byte offset of the offending construct.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("incomplete input at offset {offset}")]
	IncompleteInput { offset: usize },

	#[error("missing type id at offset {offset}")]
	MissingTypeId { offset: usize },

	#[error("invalid type id {text:?} at offset {offset}")]
	InvalidTypeId { offset: usize, text: String },

	#[error("missing type name at offset {offset}")]
	MissingTypeName { offset: usize },

	#[error("missing type body at offset {offset}")]
	MissingTypeBody { offset: usize },

	#[error("missing member terminator at offset {offset}")]
	MissingMemberTerminator { offset: usize },

	#[error("missing member name at offset {offset}")]
	MissingMemberName { offset: usize },

	#[error("missing member type at offset {offset}")]
	MissingMemberType { offset: usize },

	#[error("member qualified twice at offset {offset}")]
	AmbiguousQualifier { offset: usize },

	#[error("missing primitive definition at offset {offset}")]
	MissingPrimitiveDefinition { offset: usize },

	#[error("unknown primitive definition {definition:?} at offset {offset}")]
	UnknownPrimitiveDefinition { offset: usize, definition: String },

	#[error("missing enum constant name at offset {offset}")]
	MissingEnumName { offset: usize },

	#[error("missing complex type body at offset {offset}")]
	MissingComplexTypeBody { offset: usize },
}

impl ParseError {
	/// Byte offset into the parsed text.
	pub fn offset(&self) -> usize {
		match self {
			Self::IncompleteInput { offset }
			| Self::MissingTypeId { offset }
			| Self::InvalidTypeId { offset, .. }
			| Self::MissingTypeName { offset }
			| Self::MissingTypeBody { offset }
			| Self::MissingMemberTerminator { offset }
			| Self::MissingMemberName { offset }
			| Self::MissingMemberType { offset }
			| Self::AmbiguousQualifier { offset }
			| Self::MissingPrimitiveDefinition { offset }
			| Self::UnknownPrimitiveDefinition { offset, .. }
			| Self::MissingEnumName { offset }
			| Self::MissingComplexTypeBody { offset } => *offset,
		}
	}
}

/// Errors of turning dictionary text into registered definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error("duplicate type id {type_id} in one batch: {first} and {second}")]
	DuplicateTypeId { type_id: TypeId, first: String, second: String },

	#[error(transparent)]
	Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
