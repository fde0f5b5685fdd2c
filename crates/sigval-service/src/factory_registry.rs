//! Dynamic factory registry for validator implementations.
//!
//! Collects every storage and delegate implementation the crates export, so
//! configuration can refer to them by name.

use sigval_config::Config;
use sigval_core::{SignatureValidator, SignatureValidatorBuilder, ValidatorFactories};
use sigval_delegate::DelegateFactory;
use sigval_storage::StorageFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
	pub delegate: HashMap<String, DelegateFactory>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self {
			storage: HashMap::new(),
			delegate: HashMap::new(),
		}
	}

	pub fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}

	pub fn register_delegate(&mut self, name: impl Into<String>, factory: DelegateFactory) {
		self.delegate.insert(name.into(), factory);
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Initialize the global registry with all available implementations
pub fn initialize_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in sigval_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}

		for (name, factory) in sigval_delegate::get_all_implementations() {
			tracing::debug!("Registering delegate implementation: {}", name);
			registry.register_delegate(name, factory);
		}

		registry
	})
}

pub fn get_registry() -> &'static FactoryRegistry {
	initialize_registry()
}

/// Picks the factory of every configured implementation, failing on names
/// nothing registered.
macro_rules! build_factories {
	($registry:expr, $config_impls:expr, $registry_field:ident, $type_name:literal) => {{
		let mut factories = HashMap::new();
		for name in $config_impls.keys() {
			if let Some(factory) = $registry.$registry_field.get(name) {
				factories.insert(name.clone(), *factory);
			} else {
				let mut available: Vec<_> = $registry.$registry_field.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown {} implementation '{}'. Available: [{}]",
					$type_name,
					name,
					available.join(", ")
				)
				.into());
			}
		}
		factories
	}};
}

/// Build the validator using the registry and config
pub fn build_validator_from_config(
	config: Config,
) -> Result<SignatureValidator, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let storage_factories =
		build_factories!(registry, config.storage.implementations, storage, "storage");
	let delegate_factories = build_factories!(
		registry,
		config.delegate.implementations,
		delegate,
		"delegate"
	);

	let factories = ValidatorFactories {
		storage_factories,
		delegate_factories,
	};

	Ok(SignatureValidatorBuilder::new(config).build(factories)?)
}
