//! Extension point between the assembled mapping and its use.
//!
//! A resultor sees every mapping before it is handed out and may pass it through, log it,
//! rewrite it or reject it.

use tracing::info;

use crate::error::{LegacyMappingError, Result};
use crate::result::MappingResult;

pub trait MappingResultor: Send + Sync {
	fn create_mapping_result(&self, result: MappingResult) -> Result<MappingResult>;
}

impl<F> MappingResultor for F
where
	F: Fn(MappingResult) -> Result<MappingResult> + Send + Sync,
{
	fn create_mapping_result(&self, result: MappingResult) -> Result<MappingResult> {
		self(result)
	}
}

/// Returns every mapping unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassthroughResultor;

impl MappingResultor for PassthroughResultor {
	fn create_mapping_result(&self, result: MappingResult) -> Result<MappingResult> {
		Ok(result)
	}
}

/// Logs the mapping table of every result, then delegates.
#[derive(Clone, Debug, Default)]
pub struct LoggingResultor<R = PassthroughResultor> {
	inner: R,
}

impl<R: MappingResultor> LoggingResultor<R> {
	pub fn new(inner: R) -> Self {
		Self { inner }
	}
}

impl<R: MappingResultor> MappingResultor for LoggingResultor<R> {
	fn create_mapping_result(&self, result: MappingResult) -> Result<MappingResult> {
		info!(
			legacy = %result.legacy_definition().type_identifier(),
			current = %result.current_definition().type_identifier(),
			discarded = result.discarded_legacy_members().count(),
			new = result.new_current_members().count(),
			"legacy type mapping\n{result}"
		);
		self.inner.create_mapping_result(result)
	}
}

/// Rejects mappings that would drop stored data.
#[derive(Copy, Clone, Debug, Default)]
pub struct StrictResultor;

impl MappingResultor for StrictResultor {
	fn create_mapping_result(&self, result: MappingResult) -> Result<MappingResult> {
		if !result.has_discarded_members() {
			return Ok(result);
		}
		let discarded: Vec<String> = result
			.discarded_legacy_members()
			.map(|member| member.identifier().to_string())
			.collect();
		Err(LegacyMappingError::Rejected {
			legacy: result.legacy_definition().type_identifier(),
			current: result.current_definition().type_identifier(),
			reason: format!("discards {}", discarded.join(", ")),
		})
	}
}
