//! Concurrent registration against one shared dictionary.

use std::sync::Arc;
use std::thread;

use lineage_schema::{Member, TypeDefinition, TypeDictionary, TypeDictionaryRead, TypeId};

fn numbered(type_id: u64) -> Arc<TypeDefinition> {
	let type_name = format!("com.example.T{}", type_id % 7);
	Arc::new(
		TypeDefinition::builder(TypeId::new(type_id), type_name.as_str())
			.runtime_type_name(type_name.as_str())
			.member(Member::field("long", &format!("v{type_id}")))
			.build()
			.expect("valid definition"),
	)
}

/// Every thread's definitions land in both indexes; no update is lost.
#[test]
fn concurrent_registrations_are_linearizable() {
	let dictionary = Arc::new(TypeDictionary::new());

	let handles: Vec<_> = (0..8u64)
		.map(|worker| {
			let dictionary = dictionary.clone();
			thread::spawn(move || {
				for n in 0..25u64 {
					let type_id = 1 + worker * 25 + n;
					dictionary.register_definition(numbered(type_id)).expect("distinct ids");
					// Re-registration of a published shape never changes anything.
					assert!(!dictionary.register_definition(numbered(type_id)).expect("same shape"));
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().expect("worker panicked");
	}

	assert_eq!(dictionary.len(), 200);
	assert_eq!(dictionary.determine_highest_type_id(), Some(TypeId::new(200)));
	let lineage_total: usize = dictionary.lineages().iter().map(|lineage| lineage.len()).sum();
	assert_eq!(lineage_total, 200);
}
