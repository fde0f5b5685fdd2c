//! Builder for constructing a [`SignatureValidator`] from configuration.
//!
//! Storage and delegate backends are created through factory maps keyed by
//! implementation name, so the caller decides which implementations exist.

use crate::hashing::{Eip712OrderHasher, OrderHasher};
use crate::SignatureValidator;
use sigval_config::Config;
use sigval_delegate::{DelegateError, DelegateInterface, DelegateService};
use sigval_storage::{StorageError, StorageInterface, StorageService};
use sigval_types::Address;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during validator construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions for every pluggable component.
pub struct ValidatorFactories<SF, DF> {
	pub storage_factories: HashMap<String, SF>,
	pub delegate_factories: HashMap<String, DF>,
}

pub struct SignatureValidatorBuilder {
	config: Config,
	order_hasher: Option<Arc<dyn OrderHasher>>,
}

impl SignatureValidatorBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			order_hasher: None,
		}
	}

	/// Replaces the default EIP-712 order hasher.
	pub fn with_order_hasher(mut self, hasher: Arc<dyn OrderHasher>) -> Self {
		self.order_hasher = Some(hasher);
		self
	}

	pub fn build<SF, DF>(
		self,
		factories: ValidatorFactories<SF, DF>,
	) -> Result<SignatureValidator, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
		DF: Fn(&toml::Value, &Address) -> Result<Box<dyn DelegateInterface>, DelegateError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = factories.storage_factories.get(name) else {
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					if let Err(e) = implementation.config_schema().validate(config) {
						tracing::error!(
							component = "storage",
							implementation = %name,
							error = %e,
							"Invalid configuration for storage implementation"
						);
						return Err(BuilderError::Config(format!(
							"Invalid configuration for storage implementation '{}': {}",
							name, e
						)));
					}
					storage_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary storage '{}' failed to load or has no registered factory",
				primary_storage
			))
		})?;
		let storage = Arc::new(StorageService::new(storage_backend));

		// Delegates are called on behalf of the exchange
		let exchange = self.config.verifier.exchange_address;
		let mut delegate_impls = HashMap::new();
		for (name, config) in &self.config.delegate.implementations {
			let Some(factory) = factories.delegate_factories.get(name) else {
				continue;
			};
			match factory(config, &exchange) {
				Ok(implementation) => {
					if let Err(e) = implementation.config_schema().validate(config) {
						tracing::error!(
							component = "delegate",
							implementation = %name,
							error = %e,
							"Invalid configuration for delegate implementation"
						);
						return Err(BuilderError::Config(format!(
							"Invalid configuration for delegate implementation '{}': {}",
							name, e
						)));
					}
					delegate_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.delegate.primary == name;
					tracing::info!(component = "delegate", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "delegate",
						implementation = %name,
						error = %e,
						"Failed to create delegate implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create delegate implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary_delegate = &self.config.delegate.primary;
		let delegate_backend = delegate_impls.remove(primary_delegate).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary delegate '{}' failed to load or has no registered factory",
				primary_delegate
			))
		})?;
		let delegate = Arc::new(DelegateService::new(delegate_backend));

		let order_hasher = self.order_hasher.unwrap_or_else(|| {
			Arc::new(Eip712OrderHasher::new(
				self.config.verifier.chain_id,
				exchange,
			))
		});

		Ok(SignatureValidator::new(
			self.config,
			storage,
			delegate,
			order_hasher,
		))
	}
}
