//! Persistent signer registries.
//!
//! Three independent tables live here: validator approvals, order validator
//! approvals and pre-signatures. A fourth records which signed actions have
//! already been executed. Entries are only ever written for the acting
//! signer, and pre-signatures are never cleared.

use crate::error::ValidatorError;
use alloy_primitives::{hex, Address, B256};
use serde::{Deserialize, Serialize};
use sigval_storage::{StorageError, StorageService};
use sigval_types::{current_timestamp, StorageKey};
use std::sync::Arc;

/// Record kept for every executed signed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedAction {
	pub signer: Address,
	pub executed_at: u64,
}

pub struct SignatureRegistry {
	storage: Arc<StorageService>,
}

fn pair_id(first: &[u8], second: &[u8]) -> String {
	format!("{}_{}", hex::encode(first), hex::encode(second))
}

fn storage_error(e: StorageError) -> ValidatorError {
	ValidatorError::Storage(e.to_string())
}

impl SignatureRegistry {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	async fn flag(&self, namespace: StorageKey, id: &str) -> Result<bool, ValidatorError> {
		let value: Option<bool> = self
			.storage
			.retrieve_optional(namespace, id)
			.await
			.map_err(storage_error)?;
		Ok(value.unwrap_or(false))
	}

	async fn set_flag(
		&self,
		namespace: StorageKey,
		id: &str,
		value: bool,
	) -> Result<(), ValidatorError> {
		self.storage
			.store(namespace, id, &value)
			.await
			.map_err(storage_error)
	}

	/// Whether `signer` pre-signed `hash`. Absence reads as `false`.
	pub async fn is_pre_signed(&self, hash: B256, signer: Address) -> Result<bool, ValidatorError> {
		self.flag(StorageKey::PreSigned, &pair_id(hash.as_slice(), signer.as_slice()))
			.await
	}

	pub async fn pre_sign(&self, hash: B256, signer: Address) -> Result<(), ValidatorError> {
		self.set_flag(
			StorageKey::PreSigned,
			&pair_id(hash.as_slice(), signer.as_slice()),
			true,
		)
		.await
	}

	pub async fn is_validator_approved(
		&self,
		signer: Address,
		validator: Address,
	) -> Result<bool, ValidatorError> {
		self.flag(
			StorageKey::ValidatorApprovals,
			&pair_id(signer.as_slice(), validator.as_slice()),
		)
		.await
	}

	pub async fn set_validator_approval(
		&self,
		signer: Address,
		validator: Address,
		approved: bool,
	) -> Result<(), ValidatorError> {
		self.set_flag(
			StorageKey::ValidatorApprovals,
			&pair_id(signer.as_slice(), validator.as_slice()),
			approved,
		)
		.await
	}

	pub async fn is_order_validator_approved(
		&self,
		signer: Address,
		validator: Address,
	) -> Result<bool, ValidatorError> {
		self.flag(
			StorageKey::OrderValidatorApprovals,
			&pair_id(signer.as_slice(), validator.as_slice()),
		)
		.await
	}

	pub async fn set_order_validator_approval(
		&self,
		signer: Address,
		validator: Address,
		approved: bool,
	) -> Result<(), ValidatorError> {
		self.set_flag(
			StorageKey::OrderValidatorApprovals,
			&pair_id(signer.as_slice(), validator.as_slice()),
			approved,
		)
		.await
	}

	pub async fn is_action_executed(&self, action_hash: B256) -> Result<bool, ValidatorError> {
		self.storage
			.exists(StorageKey::ExecutedActions, &hex::encode(action_hash))
			.await
			.map_err(storage_error)
	}

	pub async fn record_action(
		&self,
		action_hash: B256,
		signer: Address,
	) -> Result<(), ValidatorError> {
		let record = ExecutedAction {
			signer,
			executed_at: current_timestamp(),
		};
		self.storage
			.store(StorageKey::ExecutedActions, &hex::encode(action_hash), &record)
			.await
			.map_err(storage_error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sigval_storage::implementations::memory::MemoryStorage;

	fn registry() -> SignatureRegistry {
		SignatureRegistry::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	#[tokio::test]
	async fn test_pre_sign_is_keyed_by_hash_and_signer() {
		let registry = registry();
		let hash = B256::repeat_byte(1);
		let signer = Address::repeat_byte(2);

		assert!(!registry.is_pre_signed(hash, signer).await.unwrap());
		registry.pre_sign(hash, signer).await.unwrap();
		assert!(registry.is_pre_signed(hash, signer).await.unwrap());

		assert!(!registry
			.is_pre_signed(hash, Address::repeat_byte(3))
			.await
			.unwrap());
		assert!(!registry
			.is_pre_signed(B256::repeat_byte(4), signer)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_approval_tables_are_independent() {
		let registry = registry();
		let signer = Address::repeat_byte(1);
		let validator = Address::repeat_byte(2);

		registry
			.set_validator_approval(signer, validator, true)
			.await
			.unwrap();
		assert!(registry
			.is_validator_approved(signer, validator)
			.await
			.unwrap());
		assert!(!registry
			.is_order_validator_approved(signer, validator)
			.await
			.unwrap());
		// Approval is directional
		assert!(!registry
			.is_validator_approved(validator, signer)
			.await
			.unwrap());

		registry
			.set_validator_approval(signer, validator, false)
			.await
			.unwrap();
		assert!(!registry
			.is_validator_approved(signer, validator)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_executed_actions() {
		let registry = registry();
		let action = B256::repeat_byte(9);

		assert!(!registry.is_action_executed(action).await.unwrap());
		registry
			.record_action(action, Address::repeat_byte(1))
			.await
			.unwrap();
		assert!(registry.is_action_executed(action).await.unwrap());
	}
}
