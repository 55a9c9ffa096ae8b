//! Text format of the type dictionary.
//!
//! # Role
//!
//! Dictionary text is the persisted form of the catalog. [`DictionaryCodec::parse`] turns text
//! into [`TypeEntry`] values, resolving qualified fields against the running program.
//! [`DictionaryCodec::assemble`] writes a dictionary back out. Parsing the assembled text of
//! any set of definitions yields structurally equal entries.
//!
//! # Pipeline
//!
//! | Stage        | Input → output                          | Failure                           |
//! |--------------|-----------------------------------------|-----------------------------------|
//! | `parser`     | text → raw entries                      | [`ParseError`] with byte offset   |
//! | `entry`      | raw entries → [`TypeEntry`]             | none, missing runtime types logged |
//! | `codec`      | entries → [`TypeDefinition`] batch      | [`CodecError`]                    |
//! | `assembler`  | definitions → text                      | none                              |
//!
//! [`TypeDefinition`]: lineage_schema::TypeDefinition

pub mod assembler;
mod codec;
mod entry;
pub mod error;
mod intern;
pub mod mapping;
mod parser;

pub use assembler::DictionaryAssembler;
pub use codec::DictionaryCodec;
pub use entry::TypeEntry;
pub use error::{CodecError, ParseError, Result};
pub use mapping::{NoTypeNameMapping, TableTypeNameMapper, TypeNameMapper};
