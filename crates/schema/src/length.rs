//! Persisted length bounds.
//!
//! How many bytes a member occupies in a stored record is decided by the storage encoding, not by
//! the catalog. The catalog only records the bounds it is handed by a [`FieldLengthResolver`].

use crate::member::{Member, PrimitiveKind, VariableLengthKind};

/// Byte width of a persisted object id.
pub const REFERENCE_LENGTH: u64 = 8;

/// Byte width of the header in front of every variable-length payload.
pub const LIST_HEADER_LENGTH: u64 = 16;

/// Upper bound used for payloads without a static maximum.
pub const UNBOUNDED_LENGTH: u64 = i64::MAX as u64;

/// Minimum and maximum persisted byte length of a member or type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LengthBounds {
	pub min: u64,
	pub max: u64,
}

impl LengthBounds {
	pub const ZERO: Self = Self { min: 0, max: 0 };

	pub const fn new(min: u64, max: u64) -> Self {
		Self { min, max }
	}

	pub const fn fixed(length: u64) -> Self {
		Self {
			min: length,
			max: length,
		}
	}

	pub const fn is_variable(&self) -> bool {
		self.min != self.max
	}

	/// Adds both bounds, capping at `u64::MAX` instead of overflowing.
	pub const fn saturating_add(self, other: Self) -> Self {
		Self {
			min: self.min.saturating_add(other.min),
			max: self.max.saturating_add(other.max),
		}
	}
}

/// Resolves persisted length bounds while members are being built.
pub trait FieldLengthResolver: Send + Sync {
	/// Bounds of a simple field of `type_name`.
	fn simple_field_bounds(&self, type_name: &str) -> LengthBounds;

	/// Bounds of a `[char]` or `[byte]` field.
	fn variable_length_bounds(&self, kind: VariableLengthKind) -> LengthBounds;

	/// Bounds of a `[list]` field holding `members` per element.
	fn complex_bounds(&self, members: &[Member]) -> LengthBounds;

	/// Bounds of a primitive definition.
	fn primitive_bounds(&self, kind: PrimitiveKind) -> LengthBounds {
		LengthBounds::fixed(kind.byte_width())
	}
}

/// Length resolver for the binary storage layout.
///
/// | Member              | min                    | max                 |
/// |---------------------|------------------------|---------------------|
/// | primitive field     | byte width             | byte width          |
/// | reference field     | [`REFERENCE_LENGTH`]   | [`REFERENCE_LENGTH`] |
/// | `[char]` / `[byte]` | [`LIST_HEADER_LENGTH`] | [`UNBOUNDED_LENGTH`] |
/// | `[list]`            | [`LIST_HEADER_LENGTH`] | [`UNBOUNDED_LENGTH`] |
#[derive(Copy, Clone, Debug, Default)]
pub struct BinaryFieldLengthResolver;

impl FieldLengthResolver for BinaryFieldLengthResolver {
	fn simple_field_bounds(&self, type_name: &str) -> LengthBounds {
		match PrimitiveKind::from_type_name(type_name) {
			Some(kind) => LengthBounds::fixed(kind.byte_width()),
			None => LengthBounds::fixed(REFERENCE_LENGTH),
		}
	}

	fn variable_length_bounds(&self, _kind: VariableLengthKind) -> LengthBounds {
		LengthBounds::new(LIST_HEADER_LENGTH, UNBOUNDED_LENGTH)
	}

	fn complex_bounds(&self, _members: &[Member]) -> LengthBounds {
		LengthBounds::new(LIST_HEADER_LENGTH, UNBOUNDED_LENGTH)
	}
}
