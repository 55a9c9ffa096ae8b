//! Loading dictionary text against a running program.

use std::sync::Arc;

use lineage_codec::{CodecError, DictionaryCodec, ParseError, TableTypeNameMapper};
use lineage_schema::{
	Member, SchemaError, SchemaTypeResolver, TypeDescription, TypeDictionary, TypeDictionaryRead, TypeId,
};
use pretty_assertions::assert_eq;

const PERSON: &str = "1 com.example.Person{ long id, java.lang.String name, }";

#[test]
fn person_loads_as_one_definition_with_references() {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	assert!(codec.load_into(PERSON, &dictionary).unwrap());

	let person = dictionary.lookup_by_id(TypeId::new(1)).unwrap();
	assert_eq!(person.type_name(), "com.example.Person");
	let members: Vec<_> = person
		.instance_members()
		.iter()
		.map(|m| (m.name().to_string(), m.type_name().to_string()))
		.collect();
	assert_eq!(
		members,
		[
			("id".to_string(), "long".to_string()),
			("name".to_string(), "java.lang.String".to_string())
		]
	);
	assert!(person.has_persisted_references());
	assert!(!person.is_primitive_type());
	assert_eq!(person.runtime_type_name(), None);
	assert_eq!(person.to_string(), "1 [no runtime type]");
}

#[test]
fn length_prefixed_member_notation_is_not_part_of_the_grammar() {
	// `2L id` reads as a field of type `2L`; `3 java.lang.String name` then has a stray token.
	let err = DictionaryCodec::new()
		.parse("1 com.example.Person{2L id,3 java.lang.String name,}")
		.unwrap_err();
	assert_eq!(err, ParseError::MissingMemberTerminator { offset: 46 });
}

#[test]
fn qualified_fields_resolve_against_runtime_types() {
	let types = SchemaTypeResolver::builder()
		.class("com.example.Person", &[("id", "long"), ("name", "java.lang.String")])
		.interface("com.example.Named")
		.build();
	let codec = DictionaryCodec::new().with_type_resolver(Arc::new(types));
	let text = "1 com.example.Person {\n\
	            \tlong com.example.Person#id,\n\
	            \tjava.lang.String com.example.Person#gone,\n\
	            \tjava.lang.String com.example.Named#label,\n\
	            \tint com.example.Missing#count,\n\
	            }";

	let entries = codec.parse(text).unwrap();
	let members = entries[0].all_members();

	assert!(matches!(members[0], Member::Reflective(_)));
	assert_eq!(members[0].field_handle().map(|f| f.type_name()), Some("long"));
	// The declaring type still exists, the field does not.
	assert!(matches!(members[1], Member::Reflective(_)));
	assert_eq!(members[1].field_handle(), None);
	// Interfaces and unknown types keep generic fields.
	assert!(matches!(members[2], Member::Simple(_)));
	assert!(matches!(members[3], Member::Simple(_)));
	assert_eq!(members[3].qualifier(), Some("com.example.Missing"));

	let definitions = codec.create_definitions(entries).unwrap();
	assert_eq!(definitions[0].runtime_type_name(), Some("com.example.Person"));
	assert_eq!(definitions[0].to_string(), "1 com.example.Person");
}

#[test]
fn primitive_types_resolve_to_their_runtime_counterpart() {
	let codec = DictionaryCodec::new().with_type_resolver(Arc::new(SchemaTypeResolver::default()));
	let entries = codec.parse("3 int { primitive 32 bit integer signed, }").unwrap();
	let definitions = codec.create_definitions(entries).unwrap();

	assert!(definitions[0].is_primitive_type());
	assert!(!definitions[0].has_persisted_references());
	assert_eq!(definitions[0].runtime_type_name(), Some("int"));
	assert_eq!(definitions[0].persisted_length().min, 4);
}

#[test]
fn type_names_are_mapped_by_member_shape() {
	let names = TableTypeNameMapper::new()
		.class("old.Person", "com.example.Person")
		.interface("old.Marker", "com.example.Marker")
		.interface("old.Person", "com.example.PersonView");
	let codec = DictionaryCodec::new().with_type_name_mapper(Arc::new(names));

	let entries = codec
		.parse("1 old.Person { long id, old.Marker tag, } 2 old.Marker { } 3 old.Status { enum ON, }")
		.unwrap();
	let names: Vec<&str> = entries.iter().map(|e| e.type_name()).collect();
	assert_eq!(names, ["com.example.Person", "com.example.Marker", "old.Status"]);
	// Field types try the interface mapping first.
	assert_eq!(entries[0].all_members()[1].type_name(), "com.example.Marker");
	assert_eq!(entries[0].all_members()[0].type_name(), "long");
}

#[test]
fn repeated_names_share_one_allocation() {
	let codec = DictionaryCodec::new();
	let entries = codec
		.parse("1 A { java.lang.String a, } 2 B { java.lang.String b, } 3 A { java.lang.String a, int c, }")
		.unwrap();

	let field_type = |entry: usize| entries[entry].all_members()[0].type_name().as_ptr();
	assert_eq!(field_type(0), field_type(1));
	assert_eq!(field_type(0), field_type(2));
	assert!(Arc::ptr_eq(entries[0].type_name_arc(), entries[2].type_name_arc()));
}

#[test]
fn duplicate_type_ids_reject_the_whole_batch() {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	let err = codec
		.load_into("1 A { int a, } 1 B { int b, }", &dictionary)
		.unwrap_err();

	assert!(matches!(err, CodecError::DuplicateTypeId { type_id, .. } if type_id == TypeId::new(1)));
	assert!(dictionary.is_empty());
}

#[test]
fn parse_failure_registers_nothing() {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	let err = codec.load_into("1 A { int a, } 2 B { int b ", &dictionary).unwrap_err();

	assert!(matches!(err, CodecError::Parse(ParseError::IncompleteInput { .. })));
	assert!(dictionary.is_empty());
}

#[test]
fn conflicting_shape_for_known_id_is_rejected() {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	codec.load_into(PERSON, &dictionary).unwrap();

	let err = codec
		.load_into("1 com.example.Person { long id, } 2 com.example.Other { }", &dictionary)
		.unwrap_err();
	assert!(matches!(
		err,
		CodecError::Schema(SchemaError::InconsistentDefinition { .. })
	));
	assert_eq!(dictionary.len(), 1);
	assert!(dictionary.lookup_by_name("com.example.Other").is_none());
}

#[test]
fn later_versions_extend_the_lineage() {
	let codec = DictionaryCodec::new();
	let dictionary = TypeDictionary::new();
	codec.load_into(PERSON, &dictionary).unwrap();
	codec
		.load_into("5 com.example.Person { long id, java.lang.String fullName, }", &dictionary)
		.unwrap();

	let lineage = dictionary.lookup_lineage("com.example.Person").unwrap();
	assert_eq!(lineage.len(), 2);
	assert_eq!(lineage.latest().map(|d| d.type_id()), Some(TypeId::new(5)));
	assert_eq!(dictionary.determine_highest_type_id(), Some(TypeId::new(5)));
	assert!(
		dictionary
			.lookup_by_name("com.example.Person")
			.is_some_and(|latest| latest.member("fullName").is_some())
	);
}
