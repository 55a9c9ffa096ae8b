//! Runtime type resolution capabilities.
//!
//! The catalog never introspects live types itself. Whatever knows the running program's types
//! (reflection, generated descriptors, a hand-written table) is plugged in as a [`TypeResolver`].
//! Handles are opaque to the catalog and compared by value.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::member::PrimitiveKind;

/// Opaque handle to a type known by the running program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeHandle {
	name: Arc<str>,
	is_interface: bool,
}

impl TypeHandle {
	pub fn new(name: impl Into<Arc<str>>, is_interface: bool) -> Self {
		Self {
			name: name.into(),
			is_interface,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Interfaces cannot declare instance fields, so qualifiers naming them never resolve.
	pub fn is_interface(&self) -> bool {
		self.is_interface
	}
}

/// Opaque handle to a field of a live type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldHandle {
	declaring_type: Arc<str>,
	name: Arc<str>,
	type_name: Arc<str>,
}

impl FieldHandle {
	pub fn new(declaring_type: impl Into<Arc<str>>, name: impl Into<Arc<str>>, type_name: impl Into<Arc<str>>) -> Self {
		Self {
			declaring_type: declaring_type.into(),
			name: name.into(),
			type_name: type_name.into(),
		}
	}

	pub fn declaring_type(&self) -> &str {
		&self.declaring_type
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}
}

/// Resolves catalog names to live types and fields.
///
/// A `None` answer is a normal outcome: types disappear between program versions and their
/// recorded shapes must stay loadable.
pub trait TypeResolver: Send + Sync {
	fn resolve_type(&self, name: &str) -> Option<TypeHandle>;

	fn resolve_field(&self, declaring_type: &TypeHandle, name: &str) -> Option<FieldHandle>;
}

/// Resolver for a process without any live types, e.g. offline catalog inspection.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRuntimeTypes;

impl TypeResolver for NoRuntimeTypes {
	fn resolve_type(&self, _name: &str) -> Option<TypeHandle> {
		None
	}

	fn resolve_field(&self, _declaring_type: &TypeHandle, _name: &str) -> Option<FieldHandle> {
		None
	}
}

#[derive(Debug)]
struct DeclaredType {
	handle: TypeHandle,
	fields: FxHashMap<Arc<str>, FieldHandle>,
}

/// Descriptor-based resolver over an explicitly declared set of types.
///
/// Primitive type names always resolve.
#[derive(Debug, Default)]
pub struct SchemaTypeResolver {
	types: FxHashMap<Arc<str>, DeclaredType>,
}

impl SchemaTypeResolver {
	pub fn builder() -> SchemaTypeResolverBuilder {
		SchemaTypeResolverBuilder::default()
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl TypeResolver for SchemaTypeResolver {
	fn resolve_type(&self, name: &str) -> Option<TypeHandle> {
		if let Some(declared) = self.types.get(name) {
			return Some(declared.handle.clone());
		}
		PrimitiveKind::from_type_name(name).map(|kind| TypeHandle::new(kind.type_name(), false))
	}

	fn resolve_field(&self, declaring_type: &TypeHandle, name: &str) -> Option<FieldHandle> {
		let declared = self.types.get(declaring_type.name())?;
		if declared.handle.is_interface() {
			return None;
		}
		declared.fields.get(name).cloned()
	}
}

/// Builder for [`SchemaTypeResolver`].
#[derive(Debug, Default)]
pub struct SchemaTypeResolverBuilder {
	types: FxHashMap<Arc<str>, DeclaredType>,
}

impl SchemaTypeResolverBuilder {
	/// Declares a concrete type with `(field name, field type name)` pairs.
	pub fn class(mut self, name: &str, fields: &[(&str, &str)]) -> Self {
		let name: Arc<str> = Arc::from(name);
		let fields = fields
			.iter()
			.map(|&(field, type_name)| (Arc::from(field), FieldHandle::new(name.clone(), field, type_name)))
			.collect();
		self.types.insert(
			name.clone(),
			DeclaredType {
				handle: TypeHandle::new(name, false),
				fields,
			},
		);
		self
	}

	/// Declares an interface; it resolves as a type but never yields fields.
	pub fn interface(mut self, name: &str) -> Self {
		let name: Arc<str> = Arc::from(name);
		self.types.insert(
			name.clone(),
			DeclaredType {
				handle: TypeHandle::new(name, true),
				fields: FxHashMap::default(),
			},
		);
		self
	}

	pub fn build(self) -> SchemaTypeResolver {
		SchemaTypeResolver { types: self.types }
	}
}
