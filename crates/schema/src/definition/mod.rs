//! Immutable type shapes.
//!
//! A [`TypeDefinition`] is one recorded shape of one type: its catalog name, the members in
//! catalog order, and the derived persisted-layout facts. It never changes once built; a changed
//! shape gets a new [`TypeId`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{Result, SchemaError};
use crate::length::LengthBounds;
use crate::member::{Member, MemberIdentifier, equal_structures};
use crate::runtime::TypeHandle;


/// Text used in place of a missing runtime type name.
pub const NO_RUNTIME_TYPE: &str = "[no runtime type]";

/// Schema version id of one type shape. Assigned once, never reused.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
	/// Placeholder for shapes that have not been assigned an id yet. Never registrable.
	pub const UNASSIGNED: Self = Self(0);

	pub const fn new(id: u64) -> Self {
		Self(id)
	}

	pub const fn get(self) -> u64 {
		self.0
	}

	pub const fn is_assigned(self) -> bool {
		self.0 != Self::UNASSIGNED.0
	}
}

impl fmt::Display for TypeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Common read surface of anything that describes a type by id, name and members.
///
/// Implemented by [`TypeDefinition`] and by raw parsed catalog entries.
pub trait TypeDescription {
	fn type_id(&self) -> TypeId;

	fn type_name(&self) -> &str;

	fn all_members(&self) -> &[Member];

	/// `"<typeId> <typeName>"`.
	fn type_identifier(&self) -> String {
		format!("{} {}", self.type_id(), self.type_name())
	}

	/// Same type name and pairwise structurally equal members.
	fn equals_structure(&self, other: &dyn TypeDescription) -> bool {
		self.type_name() == other.type_name() && equal_structures(self.all_members(), other.all_members())
	}
}

/// One immutable, resolved shape of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
	type_id: TypeId,
	type_name: Arc<str>,
	runtime_type_name: Option<Arc<str>>,
	runtime_type: Option<TypeHandle>,
	all_members: Arc<[Member]>,
	instance_members: Arc<[Member]>,
	has_persisted_references: bool,
	is_primitive_type: bool,
	has_varying_persisted_length: bool,
	persisted_length: LengthBounds,
}

impl TypeDefinition {
	pub fn builder(type_id: TypeId, type_name: impl Into<Arc<str>>) -> TypeDefinitionBuilder {
		TypeDefinitionBuilder {
			type_id,
			type_name: type_name.into(),
			runtime_type_name: None,
			runtime_type: None,
			members: Vec::new(),
			instance_order: None,
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Name recorded in the catalog, stable across runtime renames.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn type_name_arc(&self) -> &Arc<str> {
		&self.type_name
	}

	/// Name of the live counterpart; `None` once the type no longer exists in the program.
	pub fn runtime_type_name(&self) -> Option<&str> {
		self.runtime_type_name.as_deref()
	}

	pub fn runtime_type(&self) -> Option<&TypeHandle> {
		self.runtime_type.as_ref()
	}

	pub fn all_members(&self) -> &[Member] {
		&self.all_members
	}

	/// Members that make up stored instance state, in persisted order.
	pub fn instance_members(&self) -> &[Member] {
		&self.instance_members
	}

	pub fn member(&self, identifier: &str) -> Option<&Member> {
		self.all_members.iter().find(|member| member.identifier().as_str() == identifier)
	}

	pub fn has_persisted_references(&self) -> bool {
		self.has_persisted_references
	}

	/// Exactly one member, and it is a primitive definition.
	pub fn is_primitive_type(&self) -> bool {
		self.is_primitive_type
	}

	pub fn has_varying_persisted_length(&self) -> bool {
		self.has_varying_persisted_length
	}

	/// Summed instance member bounds, saturating at `u64::MAX`.
	pub fn persisted_length(&self) -> LengthBounds {
		self.persisted_length
	}

	pub fn equals_structure(&self, other: &TypeDefinition) -> bool {
		TypeDescription::equals_structure(self, other)
	}

	/// `"<typeId> <typeName>"`.
	pub fn type_identifier(&self) -> String {
		TypeDescription::type_identifier(self)
	}
}

impl TypeDescription for TypeDefinition {
	fn type_id(&self) -> TypeId {
		self.type_id
	}

	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn all_members(&self) -> &[Member] {
		&self.all_members
	}
}

/// `"<typeId> <runtimeTypeName>"`, or the placeholder when there is no runtime type.
impl fmt::Display for TypeDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.type_id, self.runtime_type_name().unwrap_or(NO_RUNTIME_TYPE))
	}
}

/// Builder for [`TypeDefinition`].
#[derive(Debug)]
pub struct TypeDefinitionBuilder {
	type_id: TypeId,
	type_name: Arc<str>,
	runtime_type_name: Option<Arc<str>>,
	runtime_type: Option<TypeHandle>,
	members: Vec<Member>,
	instance_order: Option<Vec<MemberIdentifier>>,
}

impl TypeDefinitionBuilder {
	pub fn runtime_type_name(mut self, name: impl Into<Arc<str>>) -> Self {
		self.runtime_type_name = Some(name.into());
		self
	}

	/// Sets the live type; also sets the runtime type name from the handle if none was given.
	pub fn runtime_type(mut self, handle: TypeHandle) -> Self {
		if self.runtime_type_name.is_none() {
			self.runtime_type_name = Some(Arc::from(handle.name()));
		}
		self.runtime_type = Some(handle);
		self
	}

	pub fn member(mut self, member: Member) -> Self {
		self.members.push(member);
		self
	}

	pub fn members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
		self.members.extend(members);
		self
	}

	/// Persisted order of instance members when it differs from declaration order.
	pub fn instance_order(mut self, order: impl IntoIterator<Item = MemberIdentifier>) -> Self {
		self.instance_order = Some(order.into_iter().collect());
		self
	}

	/// Validates member identity and derives the layout facts.
	///
	/// # Errors
	///
	/// - [`SchemaError::DuplicateMember`] if two members share an identifier.
	/// - [`SchemaError::InvalidInstanceOrder`] if an explicit order is not a permutation of the
	///   instance members.
	pub fn build(self) -> Result<TypeDefinition> {
		let mut seen = FxHashSet::default();
		for member in &self.members {
			let identifier = member.identifier();
			if !seen.insert(identifier.clone()) {
				return Err(SchemaError::DuplicateMember {
					type_name: self.type_name.to_string(),
					identifier: identifier.to_string(),
				});
			}
		}

		let declared: Vec<Member> = self.members.iter().filter(|m| m.is_instance_member()).cloned().collect();
		let instance_members = match self.instance_order {
			None => declared,
			Some(order) => reorder(&self.type_name, declared, &order)?,
		};

		let has_persisted_references = instance_members.iter().any(Member::has_references);
		let has_varying_persisted_length = instance_members.iter().any(Member::is_variable_length);
		let persisted_length = instance_members
			.iter()
			.fold(LengthBounds::ZERO, |sum, member| sum.saturating_add(member.bounds()));
		let is_primitive_type = self.members.len() == 1 && self.members[0].is_primitive_definition();

		Ok(TypeDefinition {
			type_id: self.type_id,
			type_name: self.type_name,
			runtime_type_name: self.runtime_type_name,
			runtime_type: self.runtime_type,
			all_members: self.members.into(),
			instance_members: instance_members.into(),
			has_persisted_references,
			is_primitive_type,
			has_varying_persisted_length,
			persisted_length,
		})
	}
}

fn reorder(type_name: &str, declared: Vec<Member>, order: &[MemberIdentifier]) -> Result<Vec<Member>> {
	let invalid = |reason: String| SchemaError::InvalidInstanceOrder {
		type_name: type_name.to_string(),
		reason,
	};
	if order.len() != declared.len() {
		return Err(invalid(format!(
			"{} identifiers given for {} instance members",
			order.len(),
			declared.len()
		)));
	}

	let mut slots: Vec<Option<Member>> = declared.into_iter().map(Some).collect();
	let mut ordered = Vec::with_capacity(slots.len());
	for identifier in order {
		let slot = slots
			.iter_mut()
			.find(|slot| slot.as_ref().is_some_and(|m| &m.identifier() == identifier))
			.ok_or_else(|| invalid(format!("{identifier} is not an unplaced instance member")))?;
		if let Some(member) = slot.take() {
			ordered.push(member);
		}
	}
	Ok(ordered)
}
