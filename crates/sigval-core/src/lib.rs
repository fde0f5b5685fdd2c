//! Signature validation engine for the exchange.
//!
//! [`SignatureValidator`] decides whether a signature payload is valid for a
//! (commitment, signer) pair or for an (order, signer) pair. The payload's
//! trailing tag selects the scheme: direct-key ECDSA, a delegate contract
//! call, or a lookup in the pre-signed registry. It also owns the
//! signer-controlled registries those schemes read, and applies signed
//! registry actions.

use crate::actions::RegistryAction;
use crate::event_bus::EventBus;
use crate::hashing::OrderHasher;
use crate::registry::SignatureRegistry;
use crate::schemes::SchemeVerifier;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use sigval_config::Config;
use sigval_delegate::DelegateService;
use sigval_storage::StorageService;
use sigval_types::{
	current_timestamp, exchange_domain, truncate_id, Order, SignatureScheme, ValidatorEvent,
	ZeroExTransaction,
};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

pub mod actions;
pub mod builder;
pub mod decoder;
pub mod error;
pub mod event_bus;
pub mod hashing;
pub mod protocol;
pub mod registry;
pub mod schemes;

pub use builder::{BuilderError, SignatureValidatorBuilder, ValidatorFactories};
pub use error::{SignatureError, SignatureErrorKind, ValidatorError};

fn short(hash: &B256) -> String {
	truncate_id(&hash.to_string())
}

/// Logs a verification that ended in an error rather than a verdict.
fn log_rejection(
	entry: &'static str,
	hash: B256,
	signer: Address,
	signature: &[u8],
	error: &ValidatorError,
) {
	let tag = signature.last().copied();
	match error {
		ValidatorError::Signature(e) => tracing::debug!(
			entry,
			hash = %short(&hash),
			signer = %signer,
			tag = ?tag,
			kind = e.kind().as_str(),
			error = %e,
			"Rejected signature"
		),
		other => tracing::warn!(
			entry,
			hash = %short(&hash),
			signer = %signer,
			tag = ?tag,
			error = %other,
			"Signature verification failed"
		),
	}
}

/// Signature validator for one exchange deployment.
pub struct SignatureValidator {
	config: Config,
	registry: Arc<SignatureRegistry>,
	verifier: SchemeVerifier,
	order_hasher: Arc<dyn OrderHasher>,
	/// Domain signed actions are hashed under.
	domain: Eip712Domain,
	event_bus: EventBus,
	/// Serialises signed actions so a replay check and its record cannot
	/// interleave with another execution of the same action.
	action_lock: Mutex<()>,
}

impl SignatureValidator {
	pub fn new(
		config: Config,
		storage: Arc<StorageService>,
		delegate: Arc<DelegateService>,
		order_hasher: Arc<dyn OrderHasher>,
	) -> Self {
		let registry = Arc::new(SignatureRegistry::new(storage));
		let domain = exchange_domain(
			config.verifier.chain_id,
			config.verifier.exchange_address,
		);
		Self {
			config,
			verifier: SchemeVerifier::new(registry.clone(), delegate),
			registry,
			order_hasher,
			domain,
			event_bus: EventBus::new(1000),
			action_lock: Mutex::new(()),
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn domain(&self) -> &Eip712Domain {
		&self.domain
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ValidatorEvent> {
		self.event_bus.subscribe()
	}

	/// Canonical hash of `order`.
	pub fn get_order_hash(&self, order: &Order) -> B256 {
		self.order_hasher.order_hash(order)
	}

	/// Verifies `signature` over `hash` for `signer`.
	///
	/// Order-aware schemes are rejected with
	/// [`SignatureError::InappropriateSignatureType`].
	pub async fn is_valid_hash_signature(
		&self,
		hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		self.hash_signature_verdict(hash, signer, signature)
			.await
			.inspect_err(|e| log_rejection("hash", hash, signer, signature, e))
	}

	async fn hash_signature_verdict(
		&self,
		hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let scheme = match decoder::decode(hash, signer, signature)? {
			SignatureScheme::Hash(scheme) => scheme,
			SignatureScheme::Order(_) => {
				return Err(SignatureError::InappropriateSignatureType {
					hash,
					signer,
					signature: signature.to_vec().into(),
				}
				.into());
			},
		};

		let is_valid = self
			.verifier
			.verify_hash(scheme, hash, signer, signature)
			.await?;
		tracing::debug!(
			hash = %short(&hash),
			signer = %signer,
			signature_type = %scheme.signature_type(),
			is_valid,
			"Verified hash signature"
		);
		Ok(is_valid)
	}

	/// Verifies `signature` over `order` for `signer`. Hash-only schemes are
	/// checked against the order hash.
	pub async fn is_valid_order_signature(
		&self,
		order: &Order,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let order_hash = self.get_order_hash(order);
		self.order_signature_verdict(order, order_hash, signer, signature)
			.await
			.inspect_err(|e| log_rejection("order", order_hash, signer, signature, e))
	}

	async fn order_signature_verdict(
		&self,
		order: &Order,
		order_hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let scheme = decoder::decode(order_hash, signer, signature)?;

		let is_valid = match scheme {
			SignatureScheme::Order(scheme) => {
				self.verifier
					.verify_order(scheme, order, order_hash, signer, signature)
					.await?
			},
			SignatureScheme::Hash(scheme) => {
				self.verifier
					.verify_hash(scheme, order_hash, signer, signature)
					.await?
			},
		};
		tracing::debug!(
			hash = %short(&order_hash),
			signer = %signer,
			signature_type = %scheme.signature_type(),
			is_valid,
			"Verified order signature"
		);
		Ok(is_valid)
	}

	/// Whether the payload's scheme needs the full order, so that the
	/// signature has to be checked on every fill. Reads no state.
	pub fn requires_regular_validation(
		&self,
		hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, SignatureError> {
		let scheme = decoder::decode(hash, signer, signature)?;
		Ok(matches!(scheme, SignatureScheme::Order(_)))
	}

	pub async fn is_pre_signed(&self, hash: B256, signer: Address) -> Result<bool, ValidatorError> {
		self.registry.is_pre_signed(hash, signer).await
	}

	pub async fn is_signature_validator_approved(
		&self,
		signer: Address,
		validator: Address,
	) -> Result<bool, ValidatorError> {
		self.registry.is_validator_approved(signer, validator).await
	}

	pub async fn is_order_validator_approved(
		&self,
		signer: Address,
		validator: Address,
	) -> Result<bool, ValidatorError> {
		self.registry
			.is_order_validator_approved(signer, validator)
			.await
	}

	/// Marks `hash` as pre-signed by `actor`. There is no way back.
	pub async fn pre_sign(
		&self,
		actor: Address,
		hash: B256,
	) -> Result<ValidatorEvent, ValidatorError> {
		self.registry.pre_sign(hash, actor).await?;
		tracing::info!(hash = %short(&hash), signer = %actor, "Pre-signed hash");

		let event = ValidatorEvent::PreSigned {
			hash,
			signer_address: actor,
		};
		self.event_bus.publish(event.clone()).ok();
		Ok(event)
	}

	/// Sets whether `validator` may verify `Validator` signatures for `actor`.
	pub async fn set_signature_validator_approval(
		&self,
		actor: Address,
		validator: Address,
		approved: bool,
	) -> Result<ValidatorEvent, ValidatorError> {
		self.registry
			.set_validator_approval(actor, validator, approved)
			.await?;
		tracing::info!(
			signer = %actor,
			validator = %validator,
			approved,
			"Updated signature validator approval"
		);

		let event = ValidatorEvent::SignatureValidatorApproval {
			signer_address: actor,
			validator_address: validator,
			approved,
		};
		self.event_bus.publish(event.clone()).ok();
		Ok(event)
	}

	/// Sets whether `validator` may verify `OrderValidator` signatures for
	/// `actor`.
	pub async fn set_order_validator_approval(
		&self,
		actor: Address,
		validator: Address,
		approved: bool,
	) -> Result<ValidatorEvent, ValidatorError> {
		self.registry
			.set_order_validator_approval(actor, validator, approved)
			.await?;
		tracing::info!(
			signer = %actor,
			validator = %validator,
			approved,
			"Updated order validator approval"
		);

		let event = ValidatorEvent::OrderValidatorApproval {
			signer_address: actor,
			validator_address: validator,
			approved,
		};
		self.event_bus.publish(event.clone()).ok();
		Ok(event)
	}

	/// Executes a signed registry action on behalf of its signer.
	///
	/// The action must be unexpired, not yet executed and carry a valid
	/// signature of its signer over its EIP-712 hash. Returns that hash and
	/// the resulting event.
	pub async fn execute_action(
		&self,
		transaction: &ZeroExTransaction,
		signature: &[u8],
	) -> Result<(B256, ValidatorEvent), ValidatorError> {
		let _guard = self.action_lock.lock().await;

		if transaction.expirationTimeSeconds <= U256::from(current_timestamp()) {
			return Err(ValidatorError::Action(format!(
				"Action expired at {}",
				transaction.expirationTimeSeconds
			)));
		}

		let action_hash = transaction.eip712_signing_hash(&self.domain);
		if self.registry.is_action_executed(action_hash).await? {
			return Err(ValidatorError::Action(format!(
				"Action {} was already executed",
				action_hash
			)));
		}

		let action = RegistryAction::decode(&transaction.data)?;
		let signer = transaction.signerAddress;
		if !self
			.is_valid_hash_signature(action_hash, signer, signature)
			.await?
		{
			tracing::warn!(
				hash = %short(&action_hash),
				signer = %signer,
				"Rejected action with invalid signature"
			);
			return Err(ValidatorError::Action(format!(
				"Invalid signature for action {} by {}",
				action_hash, signer
			)));
		}

		self.registry.record_action(action_hash, signer).await?;
		let event = match action {
			RegistryAction::PreSign { hash } => self.pre_sign(signer, hash).await?,
			RegistryAction::SetSignatureValidatorApproval {
				validator,
				approved,
			} => {
				self.set_signature_validator_approval(signer, validator, approved)
					.await?
			},
			RegistryAction::SetOrderValidatorApproval {
				validator,
				approved,
			} => {
				self.set_order_validator_approval(signer, validator, approved)
					.await?
			},
		};
		Ok((action_hash, event))
	}
}
