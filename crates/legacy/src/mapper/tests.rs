use std::sync::Arc;

use lineage_codec::DictionaryCodec;
use lineage_schema::{Member, TypeDefinition, TypeDescription, TypeId};
use pretty_assertions::assert_eq;

use super::*;
use crate::refactoring::RefactoringMapping;
use crate::resolver::RefactoringResolver;
use crate::resultor::StrictResultor;
use crate::similarity::EXPLICIT_MATCH_SIMILARITY;

fn definition(text: &str) -> Arc<TypeDefinition> {
	let codec = DictionaryCodec::new();
	let mut definitions = codec.create_definitions(codec.parse(text).unwrap()).unwrap();
	assert_eq!(definitions.len(), 1);
	definitions.remove(0)
}

fn with_rules(mapping: RefactoringMapping) -> LegacyTypeMapper {
	LegacyTypeMapper::new().with_member_resolver(Arc::new(RefactoringResolver::new(mapping)))
}

fn identifiers<'a>(members: impl Iterator<Item = &'a Member>) -> Vec<String> {
	members.map(|member| member.identifier().to_string()).collect()
}

#[derive(Debug)]
struct DeclaredHandler {
	type_id: TypeId,
	type_name: String,
	members: Vec<Member>,
}

impl TypeDescription for DeclaredHandler {
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

impl CustomLegacyHandler for DeclaredHandler {}

#[test]
fn identical_shapes_map_one_to_one() {
	let legacy = definition("1 a.P { long id, java.lang.String name, }");
	let current = definition("2 a.P { java.lang.String name, long id, }");

	let result = LegacyTypeMapper::new().map_members(&legacy, &current).unwrap();

	assert_eq!(result.current_for("id").map(|m| m.partner().name()), Some("id"));
	assert_eq!(result.current_for("name").map(MemberMatch::similarity), Some(1.0));
	assert_eq!(result.legacy_for("id").map(|m| m.partner().name()), Some("id"));
	assert!(!result.has_discarded_members());
	assert_eq!(result.new_current_members().count(), 0);
}

#[test]
fn explicit_mapping_beats_a_better_heuristic_candidate() {
	let legacy = definition("1 a.P { int count, }");
	let current = definition("2 a.P { int count, int total, }");
	let mapper = with_rules(RefactoringMapping::new().rename("count", "total"));

	let result = mapper.map_members(&legacy, &current).unwrap();

	let partner = result.current_for("count").unwrap();
	assert_eq!(partner.partner().name(), "total");
	assert_eq!(partner.similarity(), EXPLICIT_MATCH_SIMILARITY);
	assert!(partner.is_explicit());
	assert_eq!(result.legacy_for("total").map(|m| m.partner().name()), Some("count"));
	// The equal-named current member is not matched to anything.
	assert_eq!(result.legacy_for("count"), None);
	assert_eq!(identifiers(result.new_current_members()), ["count"]);
}

#[test]
fn two_legacy_members_onto_one_target_is_an_error() {
	let legacy = definition("1 a.P { int a, int b, }");
	let current = definition("2 a.P { int x, }");
	let mapper = with_rules(RefactoringMapping::new().rename("a", "x").rename("b", "x"));

	let err = mapper.map_members(&legacy, &current).unwrap_err();
	match err {
		LegacyMappingError::DuplicateTarget {
			type_identifier,
			target,
			first,
			second,
		} => {
			assert_eq!(type_identifier, "2 a.P");
			assert_eq!((target.as_str(), first.as_str(), second.as_str()), ("x", "a", "b"));
		}
		other => panic!("unexpected error {other}"),
	}
}

#[test]
fn mapping_onto_a_declared_new_member_is_an_error() {
	let legacy = definition("1 a.P { int a, }");
	let current = definition("2 a.P { int x, }");
	let mapper = with_rules(RefactoringMapping::new().rename("a", "x").add("#x"));

	let err = mapper.map_members(&legacy, &current).unwrap_err();
	assert!(matches!(err, LegacyMappingError::TargetDeclaredNew { .. }), "{err}");
}

#[test]
fn declared_new_members_are_never_matched() {
	let legacy = definition("1 a.P { long id, java.lang.String email, }");
	let current = definition("2 a.P { long id, java.lang.String email, }");
	let mapper = with_rules(RefactoringMapping::new().add("email"));

	let result = mapper.map_members(&legacy, &current).unwrap();

	assert_eq!(identifiers(result.new_current_members()), ["email"]);
	assert_eq!(identifiers(result.discarded_legacy_members()), ["email"]);
	assert!(result.current_for("id").is_some());
}

#[test]
fn enum_constants_never_map_onto_fields() {
	let legacy = definition("1 a.Color { enum RED, int rgb, }");
	let current = definition("2 a.Color { int RED, int rgb, }");

	let result = LegacyTypeMapper::new().map_members(&legacy, &current).unwrap();

	assert_eq!(identifiers(result.discarded_legacy_members()), ["RED"]);
	assert_eq!(identifiers(result.new_current_members()), ["RED"]);
	assert_eq!(result.current_for("rgb").map(|m| m.partner().name()), Some("rgb"));
}

#[test]
fn renamed_enum_constant_is_matched() {
	let legacy = definition("1 a.Color { enum RED, enum BLUE, }");
	let current = definition("2 a.Color { enum RED, enum GREEN, }");

	let result = LegacyTypeMapper::new().map_members(&legacy, &current).unwrap();

	let green = result.current_for("BLUE").unwrap();
	assert_eq!(green.partner().name(), "GREEN");
	assert!((green.similarity() - 0.6).abs() < 1e-9, "{}", green.similarity());
	assert_eq!(result.current_for("RED").map(MemberMatch::similarity), Some(1.0));
	assert!(!result.has_discarded_members());
	assert_eq!(result.new_current_members().count(), 0);
}

#[test]
fn empty_legacy_shape_makes_everything_new() {
	let legacy = definition("1 a.P { }");
	let current = definition("2 a.P { int a, int b, }");

	let result = LegacyTypeMapper::new().map_members(&legacy, &current).unwrap();

	assert!(result.legacy_to_current().is_empty());
	assert_eq!(identifiers(result.new_current_members()), ["a", "b"]);
}

#[test]
fn custom_handler_by_type_id_short_circuits_mapping() {
	let legacy = definition("7 a.P { int a, }");
	let current = definition("8 a.P { int b, }");
	let mapper = LegacyTypeMapper::new();
	mapper.custom_handlers().register(Arc::new(DeclaredHandler {
		type_id: TypeId::new(7),
		type_name: "a.P".into(),
		members: vec![Member::field("int", "a")],
	}));

	let handler = mapper.ensure_legacy_handler(&legacy, &current).unwrap();
	assert!(matches!(handler, LegacyTypeHandler::Custom(ref h) if h.type_id() == TypeId::new(7)));
	assert!(handler.mapping().is_none());
}

#[test]
fn custom_handler_by_structure_applies_to_any_type_id() {
	let legacy = definition("7 a.P { int a, }");
	let current = definition("8 a.P { int b, }");
	let registry = Arc::new(CustomHandlerRegistry::new());
	registry.register(Arc::new(DeclaredHandler {
		type_id: TypeId::UNASSIGNED,
		type_name: "a.P".into(),
		members: vec![Member::field("int", "a")],
	}));
	let mapper = LegacyTypeMapper::new().with_custom_handlers(registry);

	assert!(matches!(
		mapper.ensure_legacy_handler(&legacy, &current).unwrap(),
		LegacyTypeHandler::Custom(_)
	));

	let other = definition("9 a.P { long a, }");
	assert!(matches!(
		mapper.ensure_legacy_handler(&other, &current).unwrap(),
		LegacyTypeHandler::Mapped(_)
	));
}

#[test]
fn custom_handler_with_wrong_structure_is_an_error() {
	let legacy = definition("7 a.P { int a, }");
	let current = definition("8 a.P { int b, }");
	let mapper = LegacyTypeMapper::new();
	mapper.custom_handlers().register(Arc::new(DeclaredHandler {
		type_id: TypeId::new(7),
		type_name: "a.P".into(),
		members: vec![Member::field("int", "b")],
	}));

	let err = mapper.ensure_legacy_handler(&legacy, &current).unwrap_err();
	assert!(matches!(err, LegacyMappingError::HandlerStructureMismatch { .. }), "{err}");
}

#[test]
fn resultor_sees_and_may_reject_every_result() {
	let legacy = definition("1 a.P { int gone, }");
	let current = definition("2 a.P { java.lang.String added, }");

	let strict = LegacyTypeMapper::new().with_resultor(Arc::new(StrictResultor));
	let err = strict.map_members(&legacy, &current).unwrap_err();
	assert!(matches!(err, LegacyMappingError::Rejected { ref reason, .. } if reason.contains("gone")));

	let observing = LegacyTypeMapper::new().with_resultor(Arc::new(|result: MappingResult| -> Result<MappingResult> {
		assert_eq!(result.current_definition().type_id(), TypeId::new(2));
		Ok(result)
	}));
	assert!(observing.map_members(&legacy, &current).is_ok());
}

#[test]
fn display_renders_one_line_per_member() {
	let legacy = definition("1 a.P { long id, int age, int obsolete, }");
	let current = definition("2 a.P { long id, int years, java.lang.String email, }");
	let mapper = with_rules(RefactoringMapping::new().rename("age", "years"));

	let text = mapper.map_members(&legacy, &current).unwrap().to_string();
	let lines: Vec<&str> = text.lines().collect();

	assert_eq!(lines[0], "1 a.P -> 2 a.P");
	assert_eq!(lines[1], "\tlong id      -1.00->   long id");
	assert_eq!(lines[2], "\tint age      -mapped-> int years");
	assert_eq!(lines[3], "\tint obsolete  REMOVED ");
	assert_eq!(lines[4], "\t              NEW    > java.lang.String email");
	assert_eq!(lines.len(), 5);
}
