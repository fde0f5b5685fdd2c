//! Read-only delegate calls over JSON-RPC using Alloy.
//!
//! Calls go through `eth_call`, so nothing is ever committed. On top of that
//! the call is routed through a forwarder whose code is installed with a
//! state override and which reaches the delegate with `STATICCALL`: a
//! delegate that tries to write state fails the call instead of seeing its
//! writes succeed in the simulation.
//!
//! Forwarder calldata is `target (20 bytes) ‖ payload`. It returns the
//! delegate's return data on success and reverts with the delegate's revert
//! data on failure.

use crate::{DelegateError, DelegateFactory, DelegateInterface, DelegateRegistry, StaticCallResult};
use alloy_primitives::{hex, Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::state::{AccountOverride, StateOverride};
use alloy_rpc_types::TransactionRequest;
use alloy_transport::TransportError;
use alloy_transport_http::Http;
use async_trait::async_trait;
use sigval_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use std::sync::Arc;

/// Runtime code of the STATICCALL forwarder.
///
/// ```text
/// CALLDATACOPY(0, 20, size - 20)
/// ok := STATICCALL(gas, calldata[0..20], 0, size - 20, 0, 0)
/// RETURNDATACOPY(0, 0, returndatasize)
/// ok ? RETURN(0, returndatasize) : REVERT(0, returndatasize)
/// ```
pub const FORWARDER_CODE: [u8; 43] =
	hex!("601436038060146000376000600082600060003560601c5afa3d600060003e6026573d6000fd5b3d6000f3");

pub struct AlloyDelegate {
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	/// Address the forwarder code is installed at; the delegate sees it as
	/// `msg.sender`.
	forwarder: Address,
	gas_limit: Option<u64>,
}

impl AlloyDelegate {
	pub fn new(
		rpc_url: &str,
		forwarder: Address,
		gas_limit: Option<u64>,
	) -> Result<Self, DelegateError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DelegateError::Configuration(format!("Invalid RPC URL: {}", e)))?;
		let provider = ProviderBuilder::new().on_http(url);

		Ok(Self {
			provider: Arc::new(provider),
			forwarder,
			gas_limit,
		})
	}

	fn request(&self, target: Address, calldata: &[u8]) -> TransactionRequest {
		let mut input = Vec::with_capacity(20 + calldata.len());
		input.extend_from_slice(target.as_slice());
		input.extend_from_slice(calldata);

		let request = TransactionRequest::default()
			.to(self.forwarder)
			.input(input.into());
		match self.gas_limit {
			Some(gas) => request.gas_limit(gas),
			None => request,
		}
	}

	fn overrides(&self) -> StateOverride {
		let mut overrides = StateOverride::default();
		overrides.insert(
			self.forwarder,
			AccountOverride {
				code: Some(Bytes::from_static(&FORWARDER_CODE)),
				..Default::default()
			},
		);
		overrides
	}
}

/// Whether a JSON-RPC error message describes a failed execution rather
/// than a node problem.
fn is_execution_failure(message: &str) -> bool {
	let message = message.to_ascii_lowercase();
	["revert", "out of gas", "invalid opcode", "invalid jump", "stack", "static"]
		.iter()
		.any(|needle| message.contains(needle))
}

/// Maps an `eth_call` error to a failed outcome when the call itself failed,
/// or to a transport error otherwise.
fn classify_error(err: TransportError) -> Result<StaticCallResult, DelegateError> {
	if let Some(payload) = err.as_error_resp() {
		if let Some(revert_data) = payload.as_revert_data() {
			return Ok(StaticCallResult::failure(revert_data));
		}
		if is_execution_failure(&payload.message) {
			return Ok(StaticCallResult::failure(Bytes::new()));
		}
	}
	Err(DelegateError::Transport(err.to_string()))
}

#[async_trait]
impl DelegateInterface for AlloyDelegate {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyDelegateSchema)
	}

	async fn static_call(
		&self,
		target: Address,
		calldata: Bytes,
	) -> Result<StaticCallResult, DelegateError> {
		let request = self.request(target, &calldata);
		let overrides = self.overrides();

		match self.provider.call(&request).overrides(&overrides).await {
			Ok(return_data) => Ok(StaticCallResult::success(return_data)),
			Err(e) => classify_error(e),
		}
	}
}

pub struct AlloyDelegateSchema;

impl ConfigSchema for AlloyDelegateSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("rpc_url", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
						Ok(())
					},
					_ => Err("rpc_url must be an http(s) URL".to_string()),
				}
			})],
			vec![
				Field::new("forwarder_address", FieldType::Address),
				Field::new(
					"call_gas_limit",
					FieldType::Integer {
						min: Some(21_000),
						max: None,
					},
				),
			],
		);
		schema.validate(config)
	}
}

/// Creates the EVM delegate backend.
///
/// Configuration parameters:
/// - `rpc_url` (required): JSON-RPC endpoint
/// - `forwarder_address` (optional): where the forwarder is installed;
///   defaults to `caller`, so delegates observe the exchange as `msg.sender`
/// - `call_gas_limit` (optional): gas limit for each call
pub fn create_delegate(
	config: &toml::Value,
	caller: &Address,
) -> Result<Box<dyn DelegateInterface>, DelegateError> {
	AlloyDelegateSchema
		.validate(config)
		.map_err(|e| DelegateError::Configuration(format!("Invalid configuration: {}", e)))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| DelegateError::Configuration("rpc_url is required".to_string()))?;

	let forwarder = match config.get("forwarder_address").and_then(|v| v.as_str()) {
		Some(address) => address
			.parse()
			.map_err(|e| DelegateError::Configuration(format!("Invalid forwarder: {}", e)))?,
		None => *caller,
	};

	let gas_limit = config
		.get("call_gas_limit")
		.and_then(|v| v.as_integer())
		.map(|gas| gas as u64);

	tracing::info!(rpc_url = %rpc_url, forwarder = %forwarder, "Configured EVM delegate");
	Ok(Box::new(AlloyDelegate::new(rpc_url, forwarder, gas_limit)?))
}

pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "evm";
	type Factory = DelegateFactory;

	fn factory() -> Self::Factory {
		create_delegate
	}
}

impl DelegateRegistry for Registry {}
