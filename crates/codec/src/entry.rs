//! Parsed catalog entries and the member resolution that produces them.

use std::sync::Arc;

use lineage_schema::member::is_primitive_type_name;
use lineage_schema::{FieldLengthResolver, Member, TypeDescription, TypeId, TypeResolver};
use tracing::info;

use crate::intern::StringInterner;
use crate::mapping::TypeNameMapper;
use crate::parser::{RawMember, RawType};

/// One type entry of a dictionary text, with members resolved against the running program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
	type_id: TypeId,
	type_name: Arc<str>,
	members: Vec<Member>,
}

impl TypeEntry {
	pub fn new(type_id: TypeId, type_name: impl Into<Arc<str>>, members: Vec<Member>) -> Self {
		Self {
			type_id,
			type_name: type_name.into(),
			members,
		}
	}

	pub fn type_name_arc(&self) -> &Arc<str> {
		&self.type_name
	}

	pub fn into_members(self) -> Vec<Member> {
		self.members
	}
}

impl TypeDescription for TypeEntry {
	fn type_id(&self) -> TypeId {
		self.type_id
	}

	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn all_members(&self) -> &[Member] {
		&self.members
	}
}

/// Turns raw syntax into [`TypeEntry`] values for one parse call.
pub(crate) struct EntryBuilder<'r> {
	pub types: &'r dyn TypeResolver,
	pub lengths: &'r dyn FieldLengthResolver,
	pub names: &'r dyn TypeNameMapper,
	pub interner: StringInterner,
}

impl EntryBuilder<'_> {
	pub fn build(&mut self, raw: RawType<'_>) -> TypeEntry {
		let members: Vec<Member> = raw.members.iter().map(|member| self.member(member)).collect();

		let has_instance_members = members.iter().any(Member::is_instance_member);
		let mapped = if has_instance_members {
			self.names.map_class_name(raw.type_name)
		} else {
			self.names.map_interface_name(raw.type_name)
		};
		let type_name = match mapped {
			Some(mapped) => self.interner.intern(&mapped),
			None => self.interner.intern(raw.type_name),
		};

		TypeEntry::new(raw.type_id, type_name, members)
	}

	fn member(&mut self, raw: &RawMember<'_>) -> Member {
		match *raw {
			RawMember::Primitive(kind) => Member::primitive(kind),
			RawMember::Enum(name) => Member::enum_constant(self.interner.intern(name)),
			RawMember::Field {
				qualifier,
				type_name,
				name,
			} => self.field(qualifier, type_name, name),
			RawMember::VariableLength { kind, qualifier, name } => {
				let qualifier = qualifier.map(|q| self.interner.intern(q));
				Member::variable_length(
					kind,
					qualifier,
					self.interner.intern(name),
					self.lengths.variable_length_bounds(kind),
				)
			}
			RawMember::Complex {
				qualifier,
				name,
				ref members,
			} => {
				let nested: Vec<Member> = members.iter().map(|member| self.member(member)).collect();
				let bounds = self.lengths.complex_bounds(&nested);
				let qualifier = qualifier.map(|q| self.interner.intern(q));
				Member::complex(qualifier, self.interner.intern(name), nested, bounds)
			}
		}
	}

	/// Reflective when the qualifier names a concrete runtime type, generic otherwise.
	fn field(&mut self, qualifier: Option<&str>, type_name: &str, name: &str) -> Member {
		let mapped = self
			.names
			.map_interface_name(type_name)
			.or_else(|| self.names.map_class_name(type_name));
		let type_name = mapped.as_deref().unwrap_or(type_name);
		let interned_type = self.interner.intern(type_name);
		let interned_name = self.interner.intern(name);
		let is_reference = !is_primitive_type_name(type_name);
		let bounds = self.lengths.simple_field_bounds(type_name);

		let Some(qualifier) = qualifier else {
			return Member::simple(interned_type, None, interned_name, is_reference, bounds);
		};
		let interned_qualifier = self.interner.intern(qualifier);

		match self.types.resolve_type(qualifier) {
			Some(declaring) if !declaring.is_interface() => {
				let field = self.types.resolve_field(&declaring, name);
				if field.is_none() {
					info!(declaring_type = qualifier, field = name, "field no longer exists in runtime type");
				}
				Member::reflective(interned_qualifier, interned_type, interned_name, is_reference, bounds, field)
			}
			_ => {
				info!(
					declaring_type = qualifier,
					field = name,
					"declaring type not resolvable, keeping generic field"
				);
				Member::simple(interned_type, Some(interned_qualifier), interned_name, is_reference, bounds)
			}
		}
	}
}
