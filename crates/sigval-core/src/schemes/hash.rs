//! Schemes verifiable against a bare 32-byte commitment.

use super::{ecdsa, split_delegate, strip_tag, SchemeVerifier};
use crate::error::{SignatureError, ValidatorError};
use crate::protocol;
use alloy_primitives::{Address, Bytes, B256};
use sigval_types::{EcdsaScheme, HashScheme};

impl SchemeVerifier {
	/// Verifies `signature` over `hash` for `signer` with a hash-only scheme.
	///
	/// When reached from the order entry point `hash` is the order hash, and
	/// errors carry it as their context.
	pub async fn verify_hash(
		&self,
		scheme: HashScheme,
		hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		match scheme {
			HashScheme::Invalid => {
				if signature.len() != 1 {
					return Err(invalid_length(hash, signer, signature).into());
				}
				Ok(false)
			},
			HashScheme::EIP712 => Ok(ecdsa::verify(EcdsaScheme::EIP712, hash, signer, signature)?),
			HashScheme::EthSign => {
				Ok(ecdsa::verify(EcdsaScheme::EthSign, hash, signer, signature)?)
			},
			HashScheme::Wallet => self.verify_wallet(hash, signer, signature).await,
			HashScheme::Validator => self.verify_validator(hash, signer, signature).await,
			HashScheme::PreSigned => self.registry.is_pre_signed(hash, signer).await,
			HashScheme::EIP1271Wallet => self.verify_eip1271_wallet(hash, signer, signature).await,
		}
	}

	async fn verify_wallet(
		&self,
		hash: B256,
		wallet: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let inner = strip_tag(signature);
		let result = self
			.call(wallet, protocol::wallet_calldata(hash, inner))
			.await?;

		protocol::interpret_bool_word(&result).ok_or_else(|| {
			SignatureError::WalletError {
				hash,
				wallet,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}

	async fn verify_validator(
		&self,
		hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let (inner, validator) =
			split_delegate(signature).ok_or_else(|| invalid_length(hash, signer, signature))?;

		if !self.registry.is_validator_approved(signer, validator).await? {
			return Err(SignatureError::ValidatorNotApproved { signer, validator }.into());
		}

		let result = self
			.call(validator, protocol::validator_calldata(hash, signer, inner))
			.await?;

		protocol::interpret_bool_word(&result).ok_or_else(|| {
			SignatureError::ValidatorError {
				hash,
				signer,
				validator,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}

	async fn verify_eip1271_wallet(
		&self,
		hash: B256,
		wallet: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let inner = strip_tag(signature);
		let calldata = protocol::eip1271_calldata(protocol::eip1271_hash_data(hash), inner);
		let result = self.call(wallet, calldata).await?;

		protocol::interpret_magic_value(&result).ok_or_else(|| {
			SignatureError::WalletError {
				hash,
				wallet,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}
}

pub(crate) fn invalid_length(hash: B256, signer: Address, signature: &[u8]) -> SignatureError {
	SignatureError::InvalidLength {
		hash,
		signer,
		signature: Bytes::copy_from_slice(signature),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::SignatureRegistry;
	use crate::schemes::testing::{MockDelegate, Script};
	use sigval_delegate::{DelegateService, StaticCallResult};
	use sigval_storage::implementations::memory::MemoryStorage;
	use sigval_storage::StorageService;
	use sigval_types::standards::exchange::IValidator;
	use sigval_types::{SignaturePayload, SignatureType, EIP1271_MAGIC_VALUE};
	use alloy_sol_types::SolCall;
	use std::sync::Arc;

	fn verifier(mock: &MockDelegate) -> (SchemeVerifier, Arc<SignatureRegistry>) {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let registry = Arc::new(SignatureRegistry::new(storage));
		let delegate = Arc::new(DelegateService::new(Box::new(mock.clone())));
		(SchemeVerifier::new(registry.clone(), delegate), registry)
	}

	const HASH: B256 = B256::repeat_byte(0x11);
	const SIGNER: Address = Address::repeat_byte(0x22);
	const VALIDATOR: Address = Address::repeat_byte(0x33);

	#[tokio::test]
	async fn test_invalid_scheme() {
		let mock = MockDelegate::answering_bool(true);
		let (verifier, _) = verifier(&mock);

		assert!(!verifier
			.verify_hash(HashScheme::Invalid, HASH, SIGNER, &[1])
			.await
			.unwrap());
		let err = verifier
			.verify_hash(HashScheme::Invalid, HASH, SIGNER, &[0, 1])
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			ValidatorError::Signature(SignatureError::InvalidLength { .. })
		));
	}

	#[tokio::test]
	async fn test_wallet_uses_signer_as_delegate() {
		let mock = MockDelegate::answering_bool(true);
		let (verifier, _) = verifier(&mock);
		let payload = SignaturePayload::tagged(&[9, 9], SignatureType::Wallet);

		assert!(verifier
			.verify_hash(HashScheme::Wallet, HASH, SIGNER, &payload)
			.await
			.unwrap());

		let (target, calldata) = mock.last_call().unwrap();
		assert_eq!(target, SIGNER);
		assert_eq!(calldata, protocol::wallet_calldata(HASH, &[9, 9]));
	}

	#[tokio::test]
	async fn test_wallet_failures_carry_return_data() {
		let mock = MockDelegate::new(StaticCallResult::failure(vec![0xde, 0xad]));
		let (verifier, _) = verifier(&mock);
		let payload = SignaturePayload::tagged(&[1], SignatureType::Wallet);

		let err = verifier
			.verify_hash(HashScheme::Wallet, HASH, SIGNER, &payload)
			.await
			.unwrap_err();
		match err {
			ValidatorError::Signature(SignatureError::WalletError {
				wallet, error_data, ..
			}) => {
				assert_eq!(wallet, SIGNER);
				assert_eq!(error_data, Bytes::from(vec![0xde, 0xad]));
			},
			other => panic!("unexpected error: {other:?}"),
		}

		// A successful call with a short answer is malformed, not false
		mock.set_script(Script::Outcome(StaticCallResult::success(vec![1u8; 16])));
		assert!(matches!(
			verifier
				.verify_hash(HashScheme::Wallet, HASH, SIGNER, &payload)
				.await,
			Err(ValidatorError::Signature(SignatureError::WalletError { .. }))
		));
	}

	#[tokio::test]
	async fn test_unapproved_validator_is_never_called() {
		let mock = MockDelegate::answering_bool(true);
		let (verifier, _) = verifier(&mock);
		let payload = SignaturePayload::with_delegate(&[7], VALIDATOR, SignatureType::Validator);

		let err = verifier
			.verify_hash(HashScheme::Validator, HASH, SIGNER, &payload)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			ValidatorError::Signature(SignatureError::ValidatorNotApproved { signer, validator })
				if signer == SIGNER && validator == VALIDATOR
		));
		assert_eq!(mock.calls(), 0);
	}

	#[tokio::test]
	async fn test_approved_validator() {
		let mock = MockDelegate::answering_bool(false);
		let (verifier, registry) = verifier(&mock);
		registry
			.set_validator_approval(SIGNER, VALIDATOR, true)
			.await
			.unwrap();
		let payload = SignaturePayload::with_delegate(&[7, 8], VALIDATOR, SignatureType::Validator);

		assert!(!verifier
			.verify_hash(HashScheme::Validator, HASH, SIGNER, &payload)
			.await
			.unwrap());

		let (target, calldata) = mock.last_call().unwrap();
		assert_eq!(target, VALIDATOR);
		let decoded = IValidator::isValidSignatureCall::abi_decode(&calldata, true).unwrap();
		assert_eq!(decoded.signerAddress, SIGNER);
		assert_eq!(decoded.signature, Bytes::from(vec![7, 8]));
	}

	#[tokio::test]
	async fn test_validator_payload_too_short() {
		let mock = MockDelegate::answering_bool(true);
		let (verifier, _) = verifier(&mock);

		let err = verifier
			.verify_hash(HashScheme::Validator, HASH, SIGNER, &[0u8; 20])
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			ValidatorError::Signature(SignatureError::InvalidLength { .. })
		));

		// A bare address and tag is the shortest legal payload
		let (verifier, registry) = self::verifier(&mock);
		registry
			.set_validator_approval(SIGNER, VALIDATOR, true)
			.await
			.unwrap();
		let bare = SignaturePayload::with_delegate(&[], VALIDATOR, SignatureType::Validator);
		assert!(verifier
			.verify_hash(HashScheme::Validator, HASH, SIGNER, &bare)
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn test_eip1271_wallet() {
		let mock = MockDelegate::new(StaticCallResult::success(EIP1271_MAGIC_VALUE.to_vec()));
		let (verifier, _) = verifier(&mock);
		let payload = SignaturePayload::tagged(&[5], SignatureType::EIP1271Wallet);

		assert!(verifier
			.verify_hash(HashScheme::EIP1271Wallet, HASH, SIGNER, &payload)
			.await
			.unwrap());
		let (_, calldata) = mock.last_call().unwrap();
		assert_eq!(
			calldata,
			protocol::eip1271_calldata(protocol::eip1271_hash_data(HASH), &[5])
		);

		mock.set_script(Script::Outcome(StaticCallResult::success(vec![0u8; 32])));
		assert!(!verifier
			.verify_hash(HashScheme::EIP1271Wallet, HASH, SIGNER, &payload)
			.await
			.unwrap());

		mock.set_script(Script::Outcome(StaticCallResult::success(vec![0u8; 33])));
		assert!(matches!(
			verifier
				.verify_hash(HashScheme::EIP1271Wallet, HASH, SIGNER, &payload)
				.await,
			Err(ValidatorError::Signature(SignatureError::WalletError { .. }))
		));
	}

	#[tokio::test]
	async fn test_transport_failure_is_not_a_verdict() {
		let mock = MockDelegate::unreachable();
		let (verifier, _) = verifier(&mock);
		let payload = SignaturePayload::tagged(&[], SignatureType::Wallet);

		assert!(matches!(
			verifier
				.verify_hash(HashScheme::Wallet, HASH, SIGNER, &payload)
				.await,
			Err(ValidatorError::Delegate(_))
		));
	}

	#[tokio::test]
	async fn test_pre_signed_never_calls_out() {
		let mock = MockDelegate::answering_bool(true);
		let (verifier, registry) = verifier(&mock);
		let payload = SignaturePayload::pre_signed();

		assert!(!verifier
			.verify_hash(HashScheme::PreSigned, HASH, SIGNER, &payload)
			.await
			.unwrap());
		registry.pre_sign(HASH, SIGNER).await.unwrap();
		assert!(verifier
			.verify_hash(HashScheme::PreSigned, HASH, SIGNER, &payload)
			.await
			.unwrap());
		assert_eq!(mock.calls(), 0);
	}
}
