//! # Parser
//!
//! Single left-to-right scan of dictionary text into raw, unresolved type entries. No
//! backtracking; the first malformed construct aborts the parse with its byte offset.
//!
//! ## Syntax
//!
//! ```text
//! dictionary    = type*
//! type          = type-id type-name "{" member* "}"
//! member        = primitive | enum | field
//! primitive     = "primitive" definition ","
//! enum          = "enum" name ","
//! field         = complex | variable | simple
//! simple        = type-name [qualifier "#"] name ","
//!               | qualifier "#" type-name name ","
//! variable      = ("[char]" | "[byte]") [qualifier "#"] name ","
//! complex       = "[list]" [qualifier "#"] name "(" field* ")" ","
//! ```
//!
//! Any character up to and including `' '` is whitespace and may appear between any two tokens,
//! including around `#`. Names run until whitespace or the next structural character.

use lineage_schema::member::{LIST_TYPE_NAME, QUALIFIER_DELIMITER};
use lineage_schema::{PrimitiveKind, TypeId, VariableLengthKind};

use crate::error::ParseError;


const TYPE_BODY_START: u8 = b'{';
const TYPE_BODY_END: u8 = b'}';
const MEMBER_TERMINATOR: u8 = b',';
const COMPLEX_BODY_START: u8 = b'(';
const COMPLEX_BODY_END: u8 = b')';
const QUALIFIER: u8 = QUALIFIER_DELIMITER as u8;

const KEYWORD_PRIMITIVE: &str = "primitive";
const KEYWORD_ENUM: &str = "enum";

/// One type entry as written, before name mapping and runtime resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawType<'a> {
	pub type_id: TypeId,
	pub type_name: &'a str,
	pub members: Vec<RawMember<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawMember<'a> {
	Primitive(PrimitiveKind),
	Enum(&'a str),
	Field {
		qualifier: Option<&'a str>,
		type_name: &'a str,
		name: &'a str,
	},
	VariableLength {
		kind: VariableLengthKind,
		qualifier: Option<&'a str>,
		name: &'a str,
	},
	Complex {
		qualifier: Option<&'a str>,
		name: &'a str,
		members: Vec<RawMember<'a>>,
	},
}

/// Parses a whole dictionary text.
pub(crate) fn parse(input: &str) -> Result<Vec<RawType<'_>>, ParseError> {
	let mut parser = Parser::new(input);
	let mut types = Vec::new();
	loop {
		parser.skip_whitespace();
		if parser.is_end() {
			return Ok(types);
		}
		types.push(parser.parse_type()?);
	}
}

fn is_whitespace(byte: u8) -> bool {
	byte <= b' '
}

/// Scanner state. Structural characters are ASCII, so every slice boundary is a char boundary.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<u8> {
		self.input.as_bytes().get(self.position).copied()
	}

	fn is_end(&self) -> bool {
		self.position >= self.input.len()
	}

	fn skip_whitespace(&mut self) {
		while self.peek().is_some_and(is_whitespace) {
			self.position += 1;
		}
	}

	/// Consumes everything up to whitespace or one of `terminators`.
	fn take_token(&mut self, terminators: &[u8]) -> &'a str {
		let start = self.position;
		while let Some(byte) = self.peek() {
			if is_whitespace(byte) || terminators.contains(&byte) {
				break;
			}
			self.position += 1;
		}
		&self.input[start..self.position]
	}

	/// Consumes everything up to one of `terminators`, trimmed.
	fn take_until(&mut self, terminators: &[u8]) -> &'a str {
		let start = self.position;
		while self.peek().is_some_and(|byte| !terminators.contains(&byte)) {
			self.position += 1;
		}
		self.input[start..self.position].trim()
	}

	/// Skips whitespace, then consumes `expected` or reports `missing` at the current offset.
	fn expect(&mut self, expected: u8, missing: fn(usize) -> ParseError) -> Result<(), ParseError> {
		self.skip_whitespace();
		match self.peek() {
			Some(byte) if byte == expected => {
				self.position += 1;
				Ok(())
			}
			Some(_) => Err(missing(self.position)),
			None => Err(self.incomplete()),
		}
	}

	fn incomplete(&self) -> ParseError {
		ParseError::IncompleteInput { offset: self.position }
	}

	/// Non-empty token, or `missing` (or incomplete input at the end).
	fn require_token(&mut self, terminators: &[u8], missing: fn(usize) -> ParseError) -> Result<&'a str, ParseError> {
		self.skip_whitespace();
		let offset = self.position;
		let token = self.take_token(terminators);
		if !token.is_empty() {
			return Ok(token);
		}
		if self.is_end() {
			return Err(self.incomplete());
		}
		Err(missing(offset))
	}

	fn parse_type(&mut self) -> Result<RawType<'a>, ParseError> {
		let offset = self.position;
		let id_text = self.require_token(&[TYPE_BODY_START], |offset| ParseError::MissingTypeId { offset })?;
		let type_id = id_text.parse::<u64>().map_err(|_| ParseError::InvalidTypeId {
			offset,
			text: id_text.to_string(),
		})?;

		let type_name = self.require_token(&[TYPE_BODY_START], |offset| ParseError::MissingTypeName { offset })?;
		self.expect(TYPE_BODY_START, |offset| ParseError::MissingTypeBody { offset })?;

		let mut members = Vec::new();
		loop {
			self.skip_whitespace();
			match self.peek() {
				None => return Err(self.incomplete()),
				Some(TYPE_BODY_END) => {
					self.position += 1;
					break;
				}
				Some(_) => members.push(self.parse_member()?),
			}
		}

		Ok(RawType {
			type_id: TypeId::new(type_id),
			type_name,
			members,
		})
	}

	fn parse_member(&mut self) -> Result<RawMember<'a>, ParseError> {
		let checkpoint = self.position;
		let keyword = self.take_token(&[MEMBER_TERMINATOR, TYPE_BODY_END, QUALIFIER]);
		match keyword {
			KEYWORD_PRIMITIVE if self.peek().is_some_and(is_whitespace) => self.parse_primitive(),
			KEYWORD_ENUM if self.peek().is_some_and(is_whitespace) => self.parse_enum(),
			_ => {
				self.position = checkpoint;
				self.parse_field()
			}
		}
	}

	fn parse_primitive(&mut self) -> Result<RawMember<'a>, ParseError> {
		self.skip_whitespace();
		let offset = self.position;
		let definition = self.take_until(&[MEMBER_TERMINATOR, TYPE_BODY_END]);
		if definition.is_empty() {
			return Err(if self.is_end() {
				self.incomplete()
			} else {
				ParseError::MissingPrimitiveDefinition { offset }
			});
		}
		let kind = PrimitiveKind::from_definition(definition).ok_or_else(|| ParseError::UnknownPrimitiveDefinition {
			offset,
			definition: definition.to_string(),
		})?;
		self.expect(MEMBER_TERMINATOR, |offset| ParseError::MissingMemberTerminator { offset })?;
		Ok(RawMember::Primitive(kind))
	}

	fn parse_enum(&mut self) -> Result<RawMember<'a>, ParseError> {
		let name = self.require_token(&[MEMBER_TERMINATOR, TYPE_BODY_END], |offset| ParseError::MissingEnumName {
			offset,
		})?;
		self.expect(MEMBER_TERMINATOR, |offset| ParseError::MissingMemberTerminator { offset })?;
		Ok(RawMember::Enum(name))
	}

	fn parse_field(&mut self) -> Result<RawMember<'a>, ParseError> {
		let terminators = [MEMBER_TERMINATOR, TYPE_BODY_END, QUALIFIER, COMPLEX_BODY_START, COMPLEX_BODY_END];
		let (_, type_qualifier, type_name) =
			self.qualified_token(&terminators, |offset| ParseError::MissingMemberType { offset })?;

		if type_qualifier.is_none() {
			if type_name == LIST_TYPE_NAME {
				return self.parse_complex();
			}
			if let Some(kind) = VariableLengthKind::from_type_name(type_name) {
				let (qualifier, name) = self.parse_field_name(None)?;
				self.expect(MEMBER_TERMINATOR, |offset| ParseError::MissingMemberTerminator { offset })?;
				return Ok(RawMember::VariableLength { kind, qualifier, name });
			}
		}

		let (qualifier, name) = self.parse_field_name(type_qualifier)?;
		self.expect(MEMBER_TERMINATOR, |offset| ParseError::MissingMemberTerminator { offset })?;
		Ok(RawMember::Field {
			qualifier,
			type_name,
			name,
		})
	}

	/// `[qualifier#]name`, merged with a qualifier already given in front of the type name.
	fn parse_field_name(
		&mut self,
		prefix_qualifier: Option<&'a str>,
	) -> Result<(Option<&'a str>, &'a str), ParseError> {
		let (offset, qualifier, name) = self.qualified_token(
			&[MEMBER_TERMINATOR, TYPE_BODY_END, COMPLEX_BODY_END, QUALIFIER],
			|offset| ParseError::MissingMemberName { offset },
		)?;
		match (prefix_qualifier, qualifier) {
			(Some(_), Some(_)) => Err(ParseError::AmbiguousQualifier { offset }),
			(prefix, qualifier) => Ok((prefix.or(qualifier), name)),
		}
	}

	/// `token` or `qualifier # token`, whitespace allowed around the `#`. Returns the offset of
	/// the first token. `terminators` must contain the qualifier delimiter.
	fn qualified_token(
		&mut self,
		terminators: &[u8],
		missing: fn(usize) -> ParseError,
	) -> Result<(usize, Option<&'a str>, &'a str), ParseError> {
		self.skip_whitespace();
		let offset = self.position;
		let first = self.require_token(terminators, missing)?;
		self.skip_whitespace();
		if self.peek() != Some(QUALIFIER) {
			return Ok((offset, None, first));
		}
		self.position += 1;
		self.skip_whitespace();
		let second = self.take_token(terminators);
		if second.is_empty() {
			return Err(if self.is_end() { self.incomplete() } else { missing(offset) });
		}
		Ok((offset, Some(first), second))
	}

	fn parse_complex(&mut self) -> Result<RawMember<'a>, ParseError> {
		let (_, qualifier, name) = self.qualified_token(
			&[MEMBER_TERMINATOR, TYPE_BODY_END, COMPLEX_BODY_START, QUALIFIER],
			|offset| ParseError::MissingMemberName { offset },
		)?;
		self.expect(COMPLEX_BODY_START, |offset| ParseError::MissingComplexTypeBody { offset })?;

		let mut members = Vec::new();
		loop {
			self.skip_whitespace();
			match self.peek() {
				None => return Err(self.incomplete()),
				Some(COMPLEX_BODY_END) => {
					self.position += 1;
					break;
				}
				Some(_) => members.push(self.parse_field()?),
			}
		}
		self.expect(MEMBER_TERMINATOR, |offset| ParseError::MissingMemberTerminator { offset })?;

		Ok(RawMember::Complex {
			qualifier,
			name,
			members,
		})
	}
}
