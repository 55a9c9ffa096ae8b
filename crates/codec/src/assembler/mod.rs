//! Dictionary text output, the inverse of the parser.
//!
//! Output is stable: types in the given order, one member per line, tab indentation.
//!
//! ```text
//! 1 com.example.Person
//! {
//! 	long id,
//! 	java.lang.String com.example.Person#name,
//! 	[list] entries
//! 	(
//! 		long key,
//! 	),
//! }
//! ```

use lineage_schema::member::{ENUM_TYPE_NAME, PRIMITIVE_TYPE_NAME};
use lineage_schema::{Member, TypeDescription, TypeDictionaryRead};


#[derive(Copy, Clone, Debug, Default)]
pub struct DictionaryAssembler;

impl DictionaryAssembler {
	/// All definitions of `dictionary` in ascending type id order.
	pub fn assemble_dictionary(&self, dictionary: &dyn TypeDictionaryRead) -> String {
		let definitions = dictionary.all_definitions();
		self.assemble_types(definitions.iter().map(|definition| &**definition as &dyn TypeDescription))
	}

	pub fn assemble_types<'a>(&self, types: impl IntoIterator<Item = &'a dyn TypeDescription>) -> String {
		let mut out = String::new();
		for description in types {
			self.assemble_type(&mut out, description);
		}
		out
	}

	pub fn assemble_type(&self, out: &mut String, description: &dyn TypeDescription) {
		out.push_str(&description.type_identifier());
		out.push_str("\n{\n");
		for member in description.all_members() {
			assemble_member(out, member, 1);
		}
		out.push_str("}\n");
	}
}

fn indent(out: &mut String, level: usize) {
	for _ in 0..level {
		out.push('\t');
	}
}

fn assemble_member(out: &mut String, member: &Member, level: usize) {
	indent(out, level);
	match member {
		Member::Primitive(primitive) => {
			out.push_str(PRIMITIVE_TYPE_NAME);
			out.push(' ');
			out.push_str(primitive.kind().definition());
		}
		Member::EnumConstant(_) => {
			out.push_str(ENUM_TYPE_NAME);
			out.push(' ');
			out.push_str(member.name());
		}
		Member::Complex(_) => {
			out.push_str(member.type_name());
			out.push(' ');
			out.push_str(member.identifier().as_str());
			out.push('\n');
			indent(out, level);
			out.push_str("(\n");
			for nested in member.nested() {
				assemble_member(out, nested, level + 1);
			}
			indent(out, level);
			out.push(')');
		}
		Member::Reflective(_) | Member::Simple(_) | Member::VariableLength(_) => {
			out.push_str(member.type_name());
			out.push(' ');
			out.push_str(member.identifier().as_str());
		}
	}
	out.push_str(",\n");
}
