use lineage_schema::{Member, NoRuntimeTypes, SchemaTypeResolver};
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn close(actual: f64, expected: f64) -> bool {
	(actual - expected).abs() < 1e-9
}

#[test]
fn table_is_symmetric() {
	let table = TypeSimilarityTable::new().with("int", "long", 0.8);
	assert_eq!(table.similarity("int", "long"), Some(0.8));
	assert_eq!(table.similarity("long", "int"), Some(0.8));
	assert_eq!(table.similarity("int", "short"), None);
	assert_eq!(table.len(), 1);
}

#[test]
fn table_values_are_clamped() {
	let table = TypeSimilarityTable::new().with("a", "b", 3.0).with("c", "d", -1.0);
	assert_eq!(table.similarity("b", "a"), Some(1.0));
	assert_eq!(table.similarity("c", "d"), Some(0.0));
}

#[test]
fn numeric_widening_has_five_pairs() {
	let table = TypeSimilarityTable::numeric_widening();
	assert_eq!(table.len(), 5);
	assert_eq!(table.similarity("double", "float"), Some(0.8));
	assert_eq!(table.similarity("int", "char"), Some(0.5));
}

#[rstest]
#[case("id", "id", 1.0)]
#[case("firstname", "firstName", 1.0 - 1.0 / 9.0)]
#[case("abc", "xyz", 0.0)]
fn unqualified_name_similarity(#[case] legacy: &str, #[case] current: &str, #[case] expected: f64) {
	let score = name_similarity(&Member::field("int", legacy), &Member::field("int", current));
	assert!(close(score, expected), "{score} != {expected}");
}

#[test]
fn qualifier_mismatch_halves_name_similarity() {
	let legacy = Member::qualified_field(Some("a.Base"), "int", "count");
	let same = Member::qualified_field(Some("a.Base"), "int", "count");
	let moved = Member::qualified_field(Some("b.Base"), "int", "count");
	let unqualified = Member::field("int", "count");

	assert!(close(name_similarity(&legacy, &same), 1.0));
	assert!(close(name_similarity(&legacy, &moved), 0.5));
	assert!(close(name_similarity(&legacy, &unqualified), 0.5));
}

#[test]
fn resolved_types_use_identity_then_table() {
	let types = SchemaTypeResolver::builder().class("java.lang.String", &[]).build();
	let table = TypeSimilarityTable::numeric_widening();
	let similator = MemberSimilator::new(&types, &table);

	assert!(close(similator.type_similarity("int", "int"), 1.0));
	assert!(close(similator.type_similarity("int", "long"), 0.8));
	assert!(close(similator.type_similarity("boolean", "long"), 0.0));
	assert!(close(similator.type_similarity("java.lang.String", "long"), 0.0));
}

#[test]
fn unresolved_types_are_never_totally_dissimilar() {
	let table = TypeSimilarityTable::new();
	let similator = MemberSimilator::new(&NoRuntimeTypes, &table);

	assert!(close(similator.type_similarity("a.Thing", "a.Thing"), 1.0));
	assert!(close(similator.type_similarity("a.Thing", "b.Other"), 0.5));
	// One resolvable side is not enough for a table lookup.
	let types = SchemaTypeResolver::default();
	let similator = MemberSimilator::new(&types, &table);
	assert!(close(similator.type_similarity("int", "a.Gone"), 0.5));
}

#[test]
fn score_averages_name_and_type() {
	let table = TypeSimilarityTable::new();
	let similator = MemberSimilator::new(&NoRuntimeTypes, &table);

	let score = similator.evaluate(
		&Member::field("java.lang.String", "firstname"),
		&Member::field("java.lang.String", "firstName"),
	);
	assert!(close(score, (1.0 - 1.0 / 9.0 + 1.0) / 2.0));
}

#[test]
fn enum_constants_only_match_enum_constants() {
	let table = TypeSimilarityTable::new();
	let similator = MemberSimilator::new(&NoRuntimeTypes, &table);
	let red = Member::enum_constant("RED");

	assert!(close(similator.evaluate(&red, &Member::field("enum", "RED")), 0.0));
	assert!(close(similator.evaluate(&Member::field("int", "RED"), &red), 0.0));
	assert!(close(similator.evaluate(&red, &Member::enum_constant("RED")), 1.0));
	assert!(close(similator.evaluate(&red, &Member::enum_constant("REDS")), 0.875));
	assert!(close(similator.evaluate(&Member::enum_constant("BLUE"), &Member::enum_constant("GREEN")), 0.6));
}

#[test]
fn equalator_requires_matching_qualifiers() {
	let plain = Member::field("long", "id");
	assert!(MemberEqualator.equal(&plain, &Member::field("long", "id")));
	assert!(!MemberEqualator.equal(&plain, &Member::field("int", "id")));
	assert!(!MemberEqualator.equal(&plain, &Member::qualified_field(Some("a.B"), "long", "id")));
}

#[test]
fn validator_rejects_cross_kind_pairs() {
	let field = Member::field("int", "RED");
	let constant = Member::enum_constant("RED");
	assert!(!MemberKindValidator.is_valid_match(&field, &constant, 1.0, 1, 1));
	assert!(MemberKindValidator.is_valid_match(&field, &Member::field("long", "RED"), 0.9, 1, 1));
}

fn member() -> impl Strategy<Value = Member> {
	let name = "[a-zA-Z]{0,8}";
	let type_name = prop_oneof![
		Just("int"),
		Just("long"),
		Just("double"),
		Just("java.lang.String"),
		Just("a.Thing")
	];
	let qualifier = proptest::option::of(prop_oneof![Just("a.Base"), Just("b.Base")]);
	prop_oneof![
		name.prop_map(Member::enum_constant),
		(qualifier, type_name, name).prop_map(|(q, t, n)| Member::qualified_field(q, t, &n)),
	]
}

proptest! {
	#[test]
	fn scores_stay_in_unit_range(legacy in member(), current in member(), widening: bool) {
		let table = if widening { TypeSimilarityTable::numeric_widening() } else { TypeSimilarityTable::new() };
		let types = SchemaTypeResolver::builder().class("java.lang.String", &[]).build();

		for similator in [MemberSimilator::new(&types, &table), MemberSimilator::new(&NoRuntimeTypes, &table)] {
			let score = similator.evaluate(&legacy, &current);
			prop_assert!((0.0..=1.0).contains(&score), "{score}");
			if legacy.is_enum_constant() != current.is_enum_constant() {
				prop_assert_eq!(score, 0.0);
			}
		}
	}
}
