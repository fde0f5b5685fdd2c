//! Configuration module for the signature validator.
//!
//! Loads the validator configuration from TOML, resolves `${VAR}` and
//! `${VAR:-default}` environment references and validates the result.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(any(test, feature = "testing"))]
mod builders;
mod loader;

#[cfg(any(test, feature = "testing"))]
pub use builders::config::ConfigBuilder;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sigval_types::Address;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only; the full error embeds the whole input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the validator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Deployment the validator verifies signatures for.
	pub verifier: VerifierConfig,
	/// Persistence for the registries.
	pub storage: StorageConfig,
	/// Read-only call backend for wallet and validator delegates.
	pub delegate: DelegateConfig,
	/// HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Deployment identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifierConfig {
	/// Unique identifier for this validator instance.
	pub id: String,
	/// Chain ID of the exchange deployment, part of the EIP-712 domain.
	pub chain_id: u64,
	/// Exchange contract address, the EIP-712 verifying contract.
	pub exchange_address: Address,
	/// Largest signature payload accepted by the API, in bytes.
	#[serde(default = "default_max_signature_length")]
	pub max_signature_length: usize,
}

/// Returns the default maximum signature payload length (8 KiB).
fn default_max_signature_length() -> usize {
	8 * 1024
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for delegate calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegateConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of delegate implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
	/// Maximum request size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

fn default_api_timeout() -> u64 {
	30
}

fn default_max_request_size() -> usize {
	1024 * 1024 // 1MB
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut replacements = Vec::new();
	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply in reverse so earlier offsets stay valid
	let mut result = input.to_string();
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates cross-field constraints that serde cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.verifier.id.is_empty() {
			return Err(ConfigError::Validation("Verifier ID cannot be empty".into()));
		}
		if self.verifier.chain_id == 0 {
			return Err(ConfigError::Validation(
				"Verifier chain_id must be greater than 0".into(),
			));
		}
		if self.verifier.exchange_address == Address::ZERO {
			return Err(ConfigError::Validation(
				"Verifier exchange_address cannot be the zero address".into(),
			));
		}
		// Must admit a full ECDSA payload
		if self.verifier.max_signature_length < 66 {
			return Err(ConfigError::Validation(
				"Verifier max_signature_length must be at least 66".into(),
			));
		}

		validate_primary("storage", &self.storage.primary, &self.storage.implementations)?;
		validate_primary(
			"delegate",
			&self.delegate.primary,
			&self.delegate.implementations,
		)?;

		if let Some(ref api) = self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation(
					"API port must be greater than 0".into(),
				));
			}
		}

		Ok(())
	}
}

fn validate_primary(
	section: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
) -> Result<(), ConfigError> {
	if implementations.is_empty() {
		return Err(ConfigError::Validation(format!(
			"At least one {} implementation must be configured",
			section
		)));
	}
	if primary.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{} primary implementation cannot be empty",
			section
		)));
	}
	if !implementations.contains_key(primary) {
		return Err(ConfigError::Validation(format!(
			"Primary {} '{}' not found in implementations",
			section, primary
		)));
	}
	Ok(())
}

/// Parses a TOML string, resolving environment variables and validating the
/// result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
[verifier]
id = "${TEST_VERIFIER_ID:-test-verifier}"
chain_id = 1337
exchange_address = "0x48bacb9266a570d521063ef5dd96e61686dbe788"

[storage]
primary = "memory"
[storage.implementations.memory]

[delegate]
primary = "evm"
[delegate.implementations.evm]
rpc_url = "http://localhost:8545"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_HOST", "localhost");
		std::env::set_var("TEST_PORT", "5432");

		let input = "host = \"${TEST_HOST}:${TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("TEST_HOST");
		std::env::remove_var("TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
	}

	#[test]
	fn test_parse_base_config() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.verifier.id, "test-verifier");
		assert_eq!(config.verifier.chain_id, 1337);
		assert_eq!(config.verifier.max_signature_length, 8 * 1024);
		assert_eq!(config.storage.primary, "memory");
		assert_eq!(config.delegate.primary, "evm");
		assert!(config.api.is_none());
	}

	#[test]
	fn test_api_defaults() {
		let config_str = format!("{}\n[api]\nenabled = true\n", BASE_CONFIG);
		let config: Config = config_str.parse().unwrap();
		let api = config.api.unwrap();
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 3000);
		assert_eq!(api.max_request_size, 1024 * 1024);
	}

	#[test]
	fn test_unknown_primary_rejected() {
		let config_str = BASE_CONFIG.replace("primary = \"evm\"", "primary = \"ipc\"");
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err
			.to_string()
			.contains("Primary delegate 'ipc' not found in implementations"));
	}

	#[test]
	fn test_zero_exchange_rejected() {
		let config_str = BASE_CONFIG.replace(
			"0x48bacb9266a570d521063ef5dd96e61686dbe788",
			"0x0000000000000000000000000000000000000000",
		);
		let err = Config::from_str(&config_str).unwrap_err();
		assert!(err.to_string().contains("zero address"));
	}

	#[test]
	fn test_invalid_exchange_address_rejected() {
		let config_str = BASE_CONFIG.replace(
			"0x48bacb9266a570d521063ef5dd96e61686dbe788",
			"0x1234",
		);
		assert!(matches!(
			Config::from_str(&config_str),
			Err(ConfigError::Parse(_))
		));
	}

	#[tokio::test]
	async fn test_shipped_config_loads() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/sigval.toml");
		let config = Config::from_file(path).await.unwrap();
		assert_eq!(config.storage.primary, "file");
		assert_eq!(config.delegate.primary, "evm");
		assert!(config.api.unwrap().enabled);
	}
}
