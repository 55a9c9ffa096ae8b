use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::length::{LIST_HEADER_LENGTH, REFERENCE_LENGTH, UNBOUNDED_LENGTH};

fn qualified(qualifier: &str, type_name: &str, name: &str) -> Member {
	Member::qualified_field(Some(qualifier), type_name, name)
}

#[test]
fn identifier_joins_qualifier_and_name() {
	assert_eq!(Member::field("long", "id").identifier().as_str(), "id");
	assert_eq!(
		qualified("com.example.Person", "long", "id").identifier().as_str(),
		"com.example.Person#id"
	);
}

#[test]
fn identifier_split_uses_last_delimiter() {
	let id = MemberIdentifier::new("a#b#c");
	assert_eq!(id.split(), (Some("a#b"), "c"));
	assert_eq!(MemberIdentifier::new("plain").split(), (None, "plain"));
}

#[test]
fn structure_ignores_qualifier_description_does_not() {
	let reflective = Member::reflective(
		"com.example.Person",
		"long",
		"id",
		false,
		LengthBounds::fixed(8),
		None,
	);
	let generic = Member::field("long", "id");

	assert!(reflective.equals_structure(&generic));
	assert!(!reflective.equals_description(&generic));
	assert!(!reflective.is_identical(&generic));
	assert!(reflective.equals_description(&qualified("com.example.Person", "long", "id")));
}

#[test]
fn structure_requires_same_type_name() {
	assert!(!Member::field("long", "id").equals_structure(&Member::field("int", "id")));
}

#[rstest]
#[case("long", false, 8)]
#[case("boolean", false, 1)]
#[case("char", false, 2)]
#[case("java.lang.String", true, REFERENCE_LENGTH)]
fn field_reference_flag_and_bounds(#[case] type_name: &str, #[case] reference: bool, #[case] length: u64) {
	let member = Member::field(type_name, "value");
	assert_eq!(member.is_reference(), reference);
	assert_eq!(member.has_references(), reference);
	assert_eq!(member.bounds(), LengthBounds::fixed(length));
	assert!(!member.is_variable_length());
}

#[test]
fn enum_constant_is_not_instance_state() {
	let constant = Member::enum_constant("RED");
	assert_eq!(constant.type_name(), ENUM_TYPE_NAME);
	assert_eq!(constant.kind(), MemberKind::EnumConstant);
	assert!(!constant.is_instance_member());
	assert_eq!(constant.bounds(), LengthBounds::ZERO);
}

#[test]
fn primitive_definition_is_named_by_its_definition() {
	let member = Member::primitive(PrimitiveKind::Int);
	assert_eq!(member.type_name(), PRIMITIVE_TYPE_NAME);
	assert_eq!(member.name(), "32 bit integer signed");
	assert_eq!(member.bounds(), LengthBounds::fixed(4));
	assert!(member.is_primitive_definition());
	assert_eq!(PrimitiveKind::from_definition(member.name()), Some(PrimitiveKind::Int));
}

#[test]
fn complex_member_references_come_from_nested_members() {
	let bounds = LengthBounds::new(LIST_HEADER_LENGTH, UNBOUNDED_LENGTH);
	let values = Member::complex(None, "entries", vec![Member::field("long", "key")], bounds);
	assert!(!values.has_references());
	assert!(values.is_variable_length());

	let refs = Member::complex(
		None,
		"entries",
		vec![Member::field("long", "key"), Member::field("java.lang.Object", "value")],
		bounds,
	);
	assert!(refs.has_references());
	assert!(!refs.is_reference());
	assert_eq!(refs.nested().len(), 2);
	assert!(!values.equals_structure(&refs));
}

#[test]
fn variable_length_field_type_names() {
	let chars = Member::variable_length(VariableLengthKind::Chars, None, "text", LengthBounds::new(16, 32));
	assert_eq!(chars.type_name(), "[char]");
	assert_eq!(VariableLengthKind::from_type_name("[byte]"), Some(VariableLengthKind::Bytes));
	assert!(chars.is_variable_length());
	assert!(!chars.is_reference());
}

#[test]
fn equal_structures_requires_same_length_and_order() {
	let a = [Member::field("long", "id"), Member::field("int", "age")];
	let b = [Member::field("int", "age"), Member::field("long", "id")];
	assert!(equal_structures(&a, &a));
	assert!(!equal_structures(&a, &b));
	assert!(!equal_structures(&a, &a[..1]));
	assert!(equal_descriptions(&a, &a));
}

fn segment() -> impl Strategy<Value = String> {
	"[a-z#]{1,6}"
}

proptest! {
	#[test]
	fn identity_equality_follows_identifier(
		q1 in proptest::option::of(segment()),
		n1 in segment(),
		q2 in proptest::option::of(segment()),
		n2 in segment(),
	) {
		let m1 = Member::simple("long", q1.as_deref().map(Arc::from), n1.as_str(), false, LengthBounds::fixed(8));
		let m2 = Member::simple("int", q2.as_deref().map(Arc::from), n2.as_str(), false, LengthBounds::fixed(4));
		prop_assert_eq!(m1.is_identical(&m2), m1.identifier() == m2.identifier());
	}
}
