//! Main entry point for the signature validator service.
//!
//! Loads the configuration, builds the validator with the configured storage
//! and delegate implementations, logs every registry event and serves the
//! HTTP API.

use clap::Parser;
use sigval_config::Config;
use sigval_core::SignatureValidator;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

mod apis;
mod factory_registry;
mod server;

use factory_registry::build_validator_from_config;

/// Command-line arguments for the validator service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started signature validator");

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.verifier.id);

	let validator = Arc::new(build_validator_from_config(config.clone())?);
	let event_task = tokio::spawn(log_events(Arc::clone(&validator)));

	match config.api.filter(|api| api.enabled) {
		Some(api_config) => {
			let api_task = server::start_server(api_config, Arc::clone(&validator));
			tokio::select! {
				result = api_task => {
					tracing::info!("API server finished");
					result?;
				}
				_ = tokio::signal::ctrl_c() => {
					tracing::info!("Received shutdown signal");
				}
			}
		},
		None => {
			tracing::warn!("API server is disabled; waiting for shutdown signal");
			tokio::signal::ctrl_c().await?;
		},
	}

	event_task.abort();
	tracing::info!("Stopped signature validator");
	Ok(())
}

/// Logs registry events until the bus closes.
async fn log_events(validator: Arc<SignatureValidator>) {
	let mut events = validator.subscribe();
	loop {
		match events.recv().await {
			Ok(event) => match serde_json::to_string(&event) {
				Ok(json) => tracing::info!(signer = %event.signer(), event = %json, "Registry event"),
				Err(e) => tracing::warn!(error = %e, "Failed to serialize registry event"),
			},
			Err(RecvError::Lagged(skipped)) => {
				tracing::warn!(skipped, "Event log fell behind");
			},
			Err(RecvError::Closed) => break,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["sigval"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from(["sigval", "--config", "custom.toml", "-l", "debug"]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[tokio::test]
	async fn test_build_validator_with_file_config() {
		let temp_dir = tempdir().unwrap();
		let config_path = temp_dir.path().join("validator.toml");
		let storage_path = temp_dir.path().join("registry");

		let config_content = format!(
			r#"
[verifier]
id = "test-file-validator"
chain_id = 1
exchange_address = "0x61935CbDd02287B511119DDb11Aeb42F1593b7Ef"

[storage]
primary = "file"

[storage.implementations.file]
storage_path = "{}"

[delegate]
primary = "evm"

[delegate.implementations.evm]
rpc_url = "http://localhost:8545"
call_gas_limit = 500000

[api]
enabled = false
"#,
			storage_path.display()
		);
		std::fs::write(&config_path, config_content).unwrap();

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.verifier.id, "test-file-validator");
		assert_eq!(config.verifier.max_signature_length, 8 * 1024);

		let validator = build_validator_from_config(config).unwrap();
		assert_eq!(validator.config().storage.primary, "file");
	}

	#[tokio::test]
	async fn test_events_are_logged_until_closed() {
		let config = sigval_config::ConfigBuilder::new().build();
		let validator = Arc::new(build_validator_from_config(config).unwrap());
		let task = tokio::spawn(log_events(Arc::clone(&validator)));

		validator
			.pre_sign(sigval_types::Address::repeat_byte(1), sigval_types::B256::ZERO)
			.await
			.unwrap();

		// The bus lives as long as the validator
		drop(validator);
		task.await.unwrap();
	}
}
