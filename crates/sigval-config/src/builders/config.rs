//! Fluent builder for test and development configurations.

use crate::{ApiConfig, Config, DelegateConfig, StorageConfig, VerifierConfig};
use sigval_types::Address;
use std::collections::HashMap;

/// Builds a [`Config`] with in-memory storage and a local delegate endpoint.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	verifier_id: String,
	chain_id: u64,
	exchange_address: Address,
	max_signature_length: usize,
	storage_primary: String,
	rpc_url: String,
	api: Option<ApiConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self {
			verifier_id: "test-verifier".to_string(),
			chain_id: 1337,
			exchange_address: Address::repeat_byte(0xee),
			max_signature_length: 8 * 1024,
			storage_primary: "memory".to_string(),
			rpc_url: "http://localhost:8545".to_string(),
			api: None,
		}
	}

	pub fn verifier_id(mut self, id: impl Into<String>) -> Self {
		self.verifier_id = id.into();
		self
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn exchange_address(mut self, exchange_address: Address) -> Self {
		self.exchange_address = exchange_address;
		self
	}

	pub fn max_signature_length(mut self, max: usize) -> Self {
		self.max_signature_length = max;
		self
	}

	pub fn storage_primary(mut self, primary: impl Into<String>) -> Self {
		self.storage_primary = primary.into();
		self
	}

	pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
		self.rpc_url = rpc_url.into();
		self
	}

	pub fn api(mut self, api: Option<ApiConfig>) -> Self {
		self.api = api;
		self
	}

	pub fn build(self) -> Config {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			self.storage_primary.clone(),
			toml::Value::Table(toml::map::Map::new()),
		);

		let mut evm = toml::map::Map::new();
		evm.insert("rpc_url".to_string(), toml::Value::String(self.rpc_url));
		let mut delegate_implementations = HashMap::new();
		delegate_implementations.insert("evm".to_string(), toml::Value::Table(evm));

		Config {
			verifier: VerifierConfig {
				id: self.verifier_id,
				chain_id: self.chain_id,
				exchange_address: self.exchange_address,
				max_signature_length: self.max_signature_length,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: storage_implementations,
			},
			delegate: DelegateConfig {
				primary: "evm".to_string(),
				implementations: delegate_implementations,
			},
			api: self.api,
		}
	}
}
