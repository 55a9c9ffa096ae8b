//! Member mapping between a legacy type definition and the current one.
//!
//! # Role
//!
//! When stored data was written with an older shape of a type, the loader needs to know which
//! stored member feeds which current member. [`LegacyTypeMapper`] answers that with a
//! [`MappingResult`]: every legacy member is mapped or discarded, every current member is mapped
//! or new.
//!
//! # Layers
//!
//! | Module         | Purpose                                                          |
//! |----------------|------------------------------------------------------------------|
//! | [`similarity`] | Member scoring, equality fast path, cross-kind validation        |
//! | [`refactoring`]| Explicit rename/delete/new rules, loadable from TOML             |
//! | [`resolver`]   | Turns rules into per-member decisions against a current type     |
//! | [`custom`]     | Hand-written handlers that bypass mapping                        |
//! | [`mapper`]     | Explicit pass, heuristic pass, combination                       |
//! | [`result`]     | Queryable bidirectional mapping                                  |
//! | [`resultor`]   | Finalization hook: passthrough, logging, strict                  |
//! | [`config`]     | Matcher tuning and type similarity table                         |

pub mod config;
pub mod custom;
pub mod error;
pub mod mapper;
pub mod refactoring;
pub mod resolver;
pub mod result;
pub mod resultor;
pub mod similarity;

pub use config::{LegacyMappingConfig, TypeSimilarityEntry};
pub use custom::{CustomHandlerRegistry, CustomLegacyHandler};
pub use error::{LegacyMappingError, Result};
pub use mapper::{LegacyTypeHandler, LegacyTypeMapper};
pub use refactoring::RefactoringMapping;
pub use resolver::{MemberMappingResolver, MemberResolution, NoExplicitMappings, RefactoringResolver};
pub use result::{MappingResult, MemberMatch};
pub use resultor::{LoggingResultor, MappingResultor, PassthroughResultor, StrictResultor};
pub use similarity::{
	EXPLICIT_MATCH_SIMILARITY, MemberEqualator, MemberKindValidator, MemberSimilator, TypeSimilarityTable,
};
