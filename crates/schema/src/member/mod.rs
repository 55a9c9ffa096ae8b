//! Member descriptors.
//!
//! A [`Member`] describes one persisted attribute of a type: a field, an enum constant, a
//! primitive definition, or a `[list]` group of nested members.
//!
//! # Equality
//!
//! | Relation                 | Compares                               |
//! |--------------------------|----------------------------------------|
//! | identity                 | [`Member::identifier`] only            |
//! | structural equality      | type name and name                     |
//! | descriptive equality     | type name, name and qualifier          |
//!
//! Identity is what sets and maps key on, through [`MemberIdentifier`]. Structural equality ignores
//! qualifiers so that a reflective field and a generic field with the same name and type are
//! interchangeable across schema versions.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::length::{BinaryFieldLengthResolver, FieldLengthResolver, LengthBounds};
use crate::runtime::FieldHandle;

#[cfg(test)]
mod tests;

/// Separates a qualifier from a field name in member identifiers.
pub const QUALIFIER_DELIMITER: char = '#';

/// Type name of primitive definition members.
pub const PRIMITIVE_TYPE_NAME: &str = "primitive";

/// Type name of enum constant members.
pub const ENUM_TYPE_NAME: &str = "enum";

/// Type name of complex `[list]` members.
pub const LIST_TYPE_NAME: &str = "[list]";

/// Identity key of a member within one type definition.
///
/// `qualifier#name` when qualified, otherwise `name`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberIdentifier(Arc<str>);

impl MemberIdentifier {
	pub fn new(identifier: impl Into<Arc<str>>) -> Self {
		Self(identifier.into())
	}

	pub fn of(qualifier: Option<&str>, name: &str) -> Self {
		match qualifier {
			Some(qualifier) => Self(Arc::from(format!("{qualifier}{QUALIFIER_DELIMITER}{name}"))),
			None => Self(Arc::from(name)),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Splits at the last delimiter into `(qualifier, name)`.
	pub fn split(&self) -> (Option<&str>, &str) {
		match self.0.rfind(QUALIFIER_DELIMITER) {
			Some(index) => (Some(&self.0[..index]), &self.0[index + 1..]),
			None => (None, &self.0),
		}
	}
}

impl Borrow<str> for MemberIdentifier {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for MemberIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for MemberIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", &*self.0)
	}
}

/// Fixed-size scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
	Boolean,
	Byte,
	Char,
	Short,
	Int,
	Float,
	Long,
	Double,
}

impl PrimitiveKind {
	pub const ALL: [Self; 8] = [
		Self::Boolean,
		Self::Byte,
		Self::Char,
		Self::Short,
		Self::Int,
		Self::Float,
		Self::Long,
		Self::Double,
	];

	pub const fn type_name(self) -> &'static str {
		match self {
			Self::Boolean => "boolean",
			Self::Byte => "byte",
			Self::Char => "char",
			Self::Short => "short",
			Self::Int => "int",
			Self::Float => "float",
			Self::Long => "long",
			Self::Double => "double",
		}
	}

	/// Catalog text of a `primitive` member of this kind.
	pub const fn definition(self) -> &'static str {
		match self {
			Self::Boolean => "1 byte boolean",
			Self::Byte => "8 bit integer signed",
			Self::Char => "16 bit integer unsigned",
			Self::Short => "16 bit integer signed",
			Self::Int => "32 bit integer signed",
			Self::Float => "32 bit decimal IEEE754",
			Self::Long => "64 bit integer signed",
			Self::Double => "64 bit decimal IEEE754",
		}
	}

	pub const fn byte_width(self) -> u64 {
		match self {
			Self::Boolean | Self::Byte => 1,
			Self::Char | Self::Short => 2,
			Self::Int | Self::Float => 4,
			Self::Long | Self::Double => 8,
		}
	}

	pub fn from_type_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.type_name() == name)
	}

	pub fn from_definition(definition: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.definition() == definition)
	}
}

/// Whether `type_name` names a value type that is stored inline rather than by reference.
pub fn is_primitive_type_name(type_name: &str) -> bool {
	PrimitiveKind::from_type_name(type_name).is_some()
}

/// Payload of a variable-length scalar field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableLengthKind {
	Chars,
	Bytes,
}

impl VariableLengthKind {
	pub const fn type_name(self) -> &'static str {
		match self {
			Self::Chars => "[char]",
			Self::Bytes => "[byte]",
		}
	}

	pub fn from_type_name(name: &str) -> Option<Self> {
		match name {
			"[char]" => Some(Self::Chars),
			"[byte]" => Some(Self::Bytes),
			_ => None,
		}
	}
}

/// Coarse member category, used to reject cross-kind matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
	PrimitiveDefinition,
	EnumConstant,
	Field,
	Complex,
}

/// Attributes shared by every field variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldCore {
	type_name: Arc<str>,
	qualifier: Option<Arc<str>>,
	name: Arc<str>,
	is_reference: bool,
	bounds: LengthBounds,
}

impl FieldCore {
	pub fn new(
		type_name: impl Into<Arc<str>>,
		qualifier: Option<Arc<str>>,
		name: impl Into<Arc<str>>,
		is_reference: bool,
		bounds: LengthBounds,
	) -> Self {
		Self {
			type_name: type_name.into(),
			qualifier,
			name: name.into(),
			is_reference,
			bounds,
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn qualifier(&self) -> Option<&str> {
		self.qualifier.as_deref()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_reference(&self) -> bool {
		self.is_reference
	}

	pub fn bounds(&self) -> LengthBounds {
		self.bounds
	}
}

/// `primitive <definition>`: the sole member of a primitive value type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveDefinition {
	kind: PrimitiveKind,
}

impl PrimitiveDefinition {
	pub fn kind(&self) -> PrimitiveKind {
		self.kind
	}
}

/// `enum <name>`: a positional enum constant marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConstant {
	name: Arc<str>,
}

/// A field whose declaring type resolved in the running program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectiveField {
	core: FieldCore,
	field: Option<FieldHandle>,
}

impl ReflectiveField {
	pub fn declaring_type_name(&self) -> &str {
		self.core.qualifier().unwrap_or_default()
	}

	pub fn field(&self) -> Option<&FieldHandle> {
		self.field.as_ref()
	}
}

/// A field described by name only, optionally qualified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleField {
	core: FieldCore,
}

/// A `[char]` or `[byte]` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableLengthField {
	kind: VariableLengthKind,
	core: FieldCore,
}

impl VariableLengthField {
	pub fn kind(&self) -> VariableLengthKind {
		self.kind
	}
}

/// A `[list]` field: a named group of nested members stored per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexField {
	core: FieldCore,
	members: Arc<[Member]>,
}

/// One persisted attribute of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
	Primitive(PrimitiveDefinition),
	EnumConstant(EnumConstant),
	Reflective(ReflectiveField),
	Simple(SimpleField),
	VariableLength(VariableLengthField),
	Complex(ComplexField),
}

impl Member {
	pub fn primitive(kind: PrimitiveKind) -> Self {
		Self::Primitive(PrimitiveDefinition { kind })
	}

	pub fn enum_constant(name: impl Into<Arc<str>>) -> Self {
		Self::EnumConstant(EnumConstant { name: name.into() })
	}

	/// Field of a resolved declaring type. `field` stays `None` when only the type resolved.
	pub fn reflective(
		declaring_type: impl Into<Arc<str>>,
		type_name: impl Into<Arc<str>>,
		name: impl Into<Arc<str>>,
		is_reference: bool,
		bounds: LengthBounds,
		field: Option<FieldHandle>,
	) -> Self {
		Self::Reflective(ReflectiveField {
			core: FieldCore::new(type_name, Some(declaring_type.into()), name, is_reference, bounds),
			field,
		})
	}

	pub fn simple(
		type_name: impl Into<Arc<str>>,
		qualifier: Option<Arc<str>>,
		name: impl Into<Arc<str>>,
		is_reference: bool,
		bounds: LengthBounds,
	) -> Self {
		Self::Simple(SimpleField {
			core: FieldCore::new(type_name, qualifier, name, is_reference, bounds),
		})
	}

	pub fn variable_length(
		kind: VariableLengthKind,
		qualifier: Option<Arc<str>>,
		name: impl Into<Arc<str>>,
		bounds: LengthBounds,
	) -> Self {
		Self::VariableLength(VariableLengthField {
			kind,
			core: FieldCore::new(kind.type_name(), qualifier, name, false, bounds),
		})
	}

	pub fn complex(
		qualifier: Option<Arc<str>>,
		name: impl Into<Arc<str>>,
		members: Vec<Member>,
		bounds: LengthBounds,
	) -> Self {
		Self::Complex(ComplexField {
			core: FieldCore::new(LIST_TYPE_NAME, qualifier, name, false, bounds),
			members: members.into(),
		})
	}

	/// Unqualified simple field with binary-layout bounds.
	pub fn field(type_name: &str, name: &str) -> Self {
		Self::qualified_field(None, type_name, name)
	}

	/// Simple field with binary-layout bounds and an optional qualifier.
	pub fn qualified_field(qualifier: Option<&str>, type_name: &str, name: &str) -> Self {
		let bounds = BinaryFieldLengthResolver.simple_field_bounds(type_name);
		Self::simple(
			type_name,
			qualifier.map(Arc::from),
			name,
			!is_primitive_type_name(type_name),
			bounds,
		)
	}

	fn core(&self) -> Option<&FieldCore> {
		match self {
			Self::Primitive(_) | Self::EnumConstant(_) => None,
			Self::Reflective(field) => Some(&field.core),
			Self::Simple(field) => Some(&field.core),
			Self::VariableLength(field) => Some(&field.core),
			Self::Complex(field) => Some(&field.core),
		}
	}

	pub fn kind(&self) -> MemberKind {
		match self {
			Self::Primitive(_) => MemberKind::PrimitiveDefinition,
			Self::EnumConstant(_) => MemberKind::EnumConstant,
			Self::Reflective(_) | Self::Simple(_) | Self::VariableLength(_) => MemberKind::Field,
			Self::Complex(_) => MemberKind::Complex,
		}
	}

	pub fn type_name(&self) -> &str {
		match self {
			Self::Primitive(_) => PRIMITIVE_TYPE_NAME,
			Self::EnumConstant(_) => ENUM_TYPE_NAME,
			_ => self.core().map(FieldCore::type_name).unwrap_or_default(),
		}
	}

	/// Declaring type name for reflective fields, the optional qualifier otherwise.
	pub fn qualifier(&self) -> Option<&str> {
		self.core().and_then(FieldCore::qualifier)
	}

	/// Member name. Primitive definitions are named by their definition text.
	pub fn name(&self) -> &str {
		match self {
			Self::Primitive(primitive) => primitive.kind.definition(),
			Self::EnumConstant(constant) => &constant.name,
			_ => self.core().map(FieldCore::name).unwrap_or_default(),
		}
	}

	pub fn identifier(&self) -> MemberIdentifier {
		MemberIdentifier::of(self.qualifier(), self.name())
	}

	pub fn is_reference(&self) -> bool {
		self.core().is_some_and(FieldCore::is_reference)
	}

	/// Whether persisted values of this member contain object references, directly or nested.
	pub fn has_references(&self) -> bool {
		match self {
			Self::Complex(complex) => complex.members.iter().any(Member::has_references),
			_ => self.is_reference(),
		}
	}

	/// Enum constants describe the type, not the state of its instances.
	pub fn is_instance_member(&self) -> bool {
		!matches!(self, Self::EnumConstant(_))
	}

	pub fn is_enum_constant(&self) -> bool {
		matches!(self, Self::EnumConstant(_))
	}

	pub fn is_primitive_definition(&self) -> bool {
		matches!(self, Self::Primitive(_))
	}

	pub fn bounds(&self) -> LengthBounds {
		match self {
			Self::Primitive(primitive) => LengthBounds::fixed(primitive.kind.byte_width()),
			Self::EnumConstant(_) => LengthBounds::ZERO,
			_ => self.core().map(FieldCore::bounds).unwrap_or_default(),
		}
	}

	pub fn is_variable_length(&self) -> bool {
		self.bounds().is_variable()
	}

	/// Nested members of a `[list]` field, empty for everything else.
	pub fn nested(&self) -> &[Member] {
		match self {
			Self::Complex(complex) => &complex.members,
			_ => &[],
		}
	}

	pub fn field_handle(&self) -> Option<&FieldHandle> {
		match self {
			Self::Reflective(field) => field.field(),
			_ => None,
		}
	}

	/// Identity equality: both members have the same [`identifier`](Self::identifier).
	pub fn is_identical(&self, other: &Member) -> bool {
		self.identifier() == other.identifier()
	}

	pub fn equals_structure(&self, other: &Member) -> bool {
		self.type_name() == other.type_name()
			&& self.name() == other.name()
			&& equal_structures(self.nested(), other.nested())
	}

	pub fn equals_description(&self, other: &Member) -> bool {
		self.equals_structure(other) && self.qualifier() == other.qualifier()
	}
}

impl fmt::Display for Member {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.type_name(), self.identifier())
	}
}

/// Pairwise structural equality of two ordered member lists.
pub fn equal_structures(left: &[Member], right: &[Member]) -> bool {
	left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.equals_structure(r))
}

/// Pairwise descriptive equality of two ordered member lists.
pub fn equal_descriptions(left: &[Member], right: &[Member]) -> bool {
	left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.equals_description(r))
}
