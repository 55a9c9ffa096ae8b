//! Mapping stored shapes of `com.example.Person` onto the current one.

use std::sync::Arc;

use lineage_codec::DictionaryCodec;
use lineage_legacy::{
	LegacyMappingConfig, LegacyTypeMapper, LoggingResultor, MappingResult, PassthroughResultor, RefactoringMapping,
	RefactoringResolver, StrictResultor,
};
use lineage_schema::{Member, SchemaTypeResolver, TypeDefinition, TypeDictionary, TypeDictionaryRead, TypeId};
use pretty_assertions::assert_eq;

/// Loads both versions into one dictionary and returns `(legacy, current)`.
fn versions(legacy: &str, current: &str) -> (Arc<TypeDefinition>, Arc<TypeDefinition>) {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	codec.load_into(&format!("{legacy}\n{current}"), &dictionary).unwrap();
	let lineage = dictionary.lookup_lineage("com.example.Person").unwrap();
	assert_eq!(lineage.len(), 2);
	(
		dictionary.lookup_by_id(TypeId::new(1)).unwrap(),
		dictionary.lookup_by_id(TypeId::new(2)).unwrap(),
	)
}

fn resolver() -> Arc<SchemaTypeResolver> {
	Arc::new(SchemaTypeResolver::builder().class("java.lang.String", &[]).build())
}

fn identifiers<'a>(members: impl Iterator<Item = &'a Member>) -> Vec<String> {
	members.map(|member| member.identifier().to_string()).collect()
}

fn partner_name(result: &MappingResult, legacy_member: &str) -> Option<String> {
	result.current_for(legacy_member).map(|m| m.partner().name().to_string())
}

#[test]
fn renamed_member_is_matched_heuristically() {
	let (legacy, current) = versions(
		"1 com.example.Person{ long id, java.lang.String firstname, }",
		"2 com.example.Person{ long id, java.lang.String firstName, }",
	);
	let mapper = LegacyTypeMapper::new().with_type_resolver(resolver());

	let result = mapper.map_members(&legacy, &current).unwrap();

	assert_eq!(partner_name(&result, "firstname").as_deref(), Some("firstName"));
	assert_eq!(partner_name(&result, "id").as_deref(), Some("id"));
	let similarity = result.current_for("firstname").unwrap().similarity();
	assert!(similarity > 0.9 && similarity < 1.0, "{similarity}");
	assert_eq!(result.discarded_legacy_members().count(), 0);
	assert_eq!(result.new_current_members().count(), 0);
}

#[test]
fn unrelated_members_are_discarded_and_new() {
	let (legacy, current) = versions(
		"1 com.example.Person{ long id, int obsoleteField, }",
		"2 com.example.Person{ long id, java.lang.String addedField, }",
	);
	let mapper = LegacyTypeMapper::new().with_type_resolver(resolver());

	let result = mapper.map_members(&legacy, &current).unwrap();

	assert_eq!(identifiers(result.discarded_legacy_members()), ["obsoleteField"]);
	assert_eq!(identifiers(result.new_current_members()), ["addedField"]);
	assert_eq!(result.current_for("obsoleteField"), None);
	assert_eq!(result.legacy_for("addedField"), None);
}

#[test]
fn explicit_deletion_prevents_rematching_an_equal_member() {
	let (legacy, current) = versions(
		"1 com.example.Person{ long id, int age, }",
		"2 com.example.Person{ long id, int age, }",
	);
	let rules = RefactoringMapping::new().delete("com.example.Person#age");
	let mapper = LegacyTypeMapper::new().with_member_resolver(Arc::new(RefactoringResolver::new(rules)));

	let result = mapper.map_members(&legacy, &current).unwrap();

	assert_eq!(identifiers(result.discarded_legacy_members()), ["age"]);
	assert_eq!(identifiers(result.new_current_members()), ["age"]);
	assert_eq!(partner_name(&result, "id").as_deref(), Some("id"));
}

#[test]
fn rules_and_tuning_loaded_from_toml() {
	let (legacy, current) = versions(
		"1 com.example.Person{ long id, java.lang.String firstname, int age, }",
		"2 com.example.Person{ long id, java.lang.String givenName, java.lang.String email, }",
	);
	let config = LegacyMappingConfig::from_toml_str(
		r#"
		[matcher]
		similarity_threshold = 0.7
		"#,
	)
	.unwrap();
	let rules = RefactoringMapping::from_toml_str(
		r##"
		deleted = ["com.example.Person#age"]
		new = ["#email"]

		[entries]
		"com.example.Person#firstname" = "#givenName"
		"##,
	)
	.unwrap();
	let mapper = LegacyTypeMapper::from_config(&config)
		.with_type_resolver(resolver())
		.with_member_resolver(Arc::new(RefactoringResolver::new(rules)))
		.with_resultor(Arc::new(LoggingResultor::new(PassthroughResultor)));

	let result = mapper.map_members(&legacy, &current).unwrap();

	let given = result.current_for("firstname").unwrap();
	assert_eq!(given.partner().name(), "givenName");
	assert!(given.is_explicit());
	assert_eq!(identifiers(result.discarded_legacy_members()), ["age"]);
	assert_eq!(identifiers(result.new_current_members()), ["email"]);
	assert!(result.to_string().starts_with("1 com.example.Person -> 2 com.example.Person\n"));
}

#[test]
fn strict_finalization_only_rejects_lossy_mappings() {
	let (legacy, current) = versions(
		"1 com.example.Person{ long id, }",
		"2 com.example.Person{ long id, java.lang.String email, }",
	);
	let mapper = LegacyTypeMapper::new().with_resultor(Arc::new(StrictResultor));

	let result = mapper.map_members(&legacy, &current).unwrap();
	assert_eq!(identifiers(result.new_current_members()), ["email"]);

	let err = mapper.map_members(&current, &legacy).unwrap_err();
	assert!(err.to_string().contains("email"), "{err}");
}
