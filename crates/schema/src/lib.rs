//! Versioned schema catalog for persisted types.
//!
//! # Role
//!
//! Every persistable type has one or more recorded shapes ([`TypeDefinition`]) identified by a
//! [`TypeId`] that is assigned once and never reused. Shapes of the same type name form a
//! [`TypeLineage`], and all lineages together form the [`TypeDictionary`].
//!
//! # Layers
//!
//! | Module         | Purpose                                                       |
//! |----------------|---------------------------------------------------------------|
//! | [`member`]     | Member descriptors and their identity/structure equality      |
//! | [`length`]     | Persisted length bounds per member kind                       |
//! | [`runtime`]    | Capabilities for resolving live types and fields by name      |
//! | [`definition`] | Immutable, resolved shape of one type at one schema version   |
//! | [`lineage`]    | Ascending history of shapes for one type name                 |
//! | [`dictionary`] | Shared catalog with all-or-nothing registration and snapshots |

pub mod definition;
pub mod dictionary;
pub mod error;
pub mod length;
pub mod lineage;
pub mod member;
pub mod runtime;

pub use definition::{TypeDefinition, TypeDefinitionBuilder, TypeDescription, TypeId};
pub use dictionary::{RegistrationObserver, TypeDictionary, TypeDictionaryRead, TypeDictionaryView};
pub use error::{Result, SchemaError};
pub use length::{BinaryFieldLengthResolver, FieldLengthResolver, LengthBounds};
pub use lineage::TypeLineage;
pub use member::{
	ComplexField, EnumConstant, FieldCore, Member, MemberIdentifier, MemberKind, PrimitiveDefinition, PrimitiveKind,
	ReflectiveField, SimpleField, VariableLengthField, VariableLengthKind,
};
pub use runtime::{FieldHandle, NoRuntimeTypes, SchemaTypeResolver, TypeHandle, TypeResolver};

