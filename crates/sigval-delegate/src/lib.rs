//! Delegate call module for the signature validator.
//!
//! Wallet, validator and EIP-1271 contracts decide signature validity
//! themselves. This crate provides the read-only call capability the
//! validator uses to ask them, behind an interface that tests can script.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use sigval_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that prevent a delegate call from producing an outcome.
///
/// A delegate that reverts is not an error here; it is a
/// [`StaticCallResult`] with `success == false`.
#[derive(Debug, Error)]
pub enum DelegateError {
	/// The node could not be reached or answered with a non-execution error.
	#[error("Transport error: {0}")]
	Transport(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Outcome of a read-only call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticCallResult {
	/// Whether the call completed without reverting.
	pub success: bool,
	/// Return data on success, revert data on failure.
	pub return_data: Bytes,
}

impl StaticCallResult {
	pub fn success(return_data: impl Into<Bytes>) -> Self {
		Self {
			success: true,
			return_data: return_data.into(),
		}
	}

	pub fn failure(revert_data: impl Into<Bytes>) -> Self {
		Self {
			success: false,
			return_data: revert_data.into(),
		}
	}
}

/// Read-only call capability.
///
/// Implementations must execute `calldata` against `target` without any
/// possibility of persisting state changes.
#[async_trait]
pub trait DelegateInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Executes a read-only call.
	async fn static_call(
		&self,
		target: Address,
		calldata: Bytes,
	) -> Result<StaticCallResult, DelegateError>;
}

/// Factory for delegate implementations. The address is the contract the
/// delegates are called on behalf of (the exchange).
pub type DelegateFactory =
	fn(&toml::Value, &Address) -> Result<Box<dyn DelegateInterface>, DelegateError>;

/// Registry trait for delegate implementations.
pub trait DelegateRegistry: ImplementationRegistry<Factory = DelegateFactory> {}

/// Get all registered delegate implementations.
pub fn get_all_implementations() -> Vec<(&'static str, DelegateFactory)> {
	use implementations::evm::alloy;

	vec![(alloy::Registry::NAME, alloy::Registry::factory())]
}

/// Logging wrapper around the configured delegate implementation.
pub struct DelegateService {
	implementation: Box<dyn DelegateInterface>,
}

impl DelegateService {
	pub fn new(implementation: Box<dyn DelegateInterface>) -> Self {
		Self { implementation }
	}

	pub async fn static_call(
		&self,
		target: Address,
		calldata: Bytes,
	) -> Result<StaticCallResult, DelegateError> {
		let selector = calldata
			.get(..4)
			.map(hex::encode)
			.unwrap_or_default();

		let result = self.implementation.static_call(target, calldata).await;
		match &result {
			Ok(outcome) => tracing::debug!(
				delegate = %target,
				selector = %selector,
				success = outcome.success,
				return_len = outcome.return_data.len(),
				"Delegate call completed"
			),
			Err(e) => tracing::warn!(
				delegate = %target,
				selector = %selector,
				error = %e,
				"Delegate call could not be executed"
			),
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["evm"]);
	}

	#[test]
	fn test_outcome_constructors() {
		let ok = StaticCallResult::success(vec![1u8; 32]);
		assert!(ok.success);
		assert_eq!(ok.return_data.len(), 32);

		let failed = StaticCallResult::failure(Bytes::new());
		assert!(!failed.success);
		assert!(failed.return_data.is_empty());
	}
}
