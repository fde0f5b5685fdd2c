//! Error types of the validation engine.
//!
//! [`SignatureError`] is the protocol-level rejection of a payload: it
//! carries the full context and encodes to the exchange's rich revert data.
//! [`ValidatorError`] wraps it together with infrastructure failures.

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolError;
use serde::{Deserialize, Serialize};
use sigval_types::standards::exchange;
use sigval_types::SignatureErrorCode;
use thiserror::Error;

/// Coarse classification of a [`SignatureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureErrorKind {
	InvalidLength,
	Unsupported,
	Illegal,
	InappropriateSignatureType,
	DelegateNotApproved,
	DelegateCallFailed,
}

impl SignatureErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::InvalidLength => "invalidLength",
			Self::Unsupported => "unsupported",
			Self::Illegal => "illegal",
			Self::InappropriateSignatureType => "inappropriateSignatureType",
			Self::DelegateNotApproved => "delegateNotApproved",
			Self::DelegateCallFailed => "delegateCallFailed",
		}
	}
}

/// Rejection of a signature payload.
///
/// `hash` is the commitment under verification; for order-aware schemes it
/// is the order hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
	#[error("Invalid signature length for signer {signer}")]
	InvalidLength {
		hash: B256,
		signer: Address,
		signature: Bytes,
	},
	#[error("Unsupported signature type for signer {signer}")]
	Unsupported {
		hash: B256,
		signer: Address,
		signature: Bytes,
	},
	#[error("Illegal signature type for signer {signer}")]
	Illegal {
		hash: B256,
		signer: Address,
		signature: Bytes,
	},
	#[error("Signature type requires an order for signer {signer}")]
	InappropriateSignatureType {
		hash: B256,
		signer: Address,
		signature: Bytes,
	},
	#[error("Validator {validator} is not approved by {signer}")]
	ValidatorNotApproved { signer: Address, validator: Address },
	#[error("Order validator {validator} is not approved by {signer}")]
	OrderValidatorNotApproved { signer: Address, validator: Address },
	#[error("Wallet {wallet} failed to verify signature")]
	WalletError {
		hash: B256,
		wallet: Address,
		signature: Bytes,
		error_data: Bytes,
	},
	#[error("Validator {validator} failed to verify signature for {signer}")]
	ValidatorError {
		hash: B256,
		signer: Address,
		validator: Address,
		signature: Bytes,
		error_data: Bytes,
	},
	#[error("Wallet {wallet} failed to verify order signature")]
	OrderWalletError {
		order_hash: B256,
		wallet: Address,
		signature: Bytes,
		error_data: Bytes,
	},
	#[error("Order validator {validator} failed to verify order signature for {signer}")]
	OrderValidatorError {
		order_hash: B256,
		signer: Address,
		validator: Address,
		signature: Bytes,
		error_data: Bytes,
	},
}

impl SignatureError {
	pub fn kind(&self) -> SignatureErrorKind {
		match self {
			Self::InvalidLength { .. } => SignatureErrorKind::InvalidLength,
			Self::Unsupported { .. } => SignatureErrorKind::Unsupported,
			Self::Illegal { .. } => SignatureErrorKind::Illegal,
			Self::InappropriateSignatureType { .. } => {
				SignatureErrorKind::InappropriateSignatureType
			},
			Self::ValidatorNotApproved { .. } | Self::OrderValidatorNotApproved { .. } => {
				SignatureErrorKind::DelegateNotApproved
			},
			Self::WalletError { .. }
			| Self::ValidatorError { .. }
			| Self::OrderWalletError { .. }
			| Self::OrderValidatorError { .. } => SignatureErrorKind::DelegateCallFailed,
		}
	}

	/// ABI-encoded rich revert data, as the exchange contract would revert
	/// with.
	pub fn revert_data(&self) -> Bytes {
		let encoded = match self {
			Self::InvalidLength {
				hash,
				signer,
				signature,
			} => generic(SignatureErrorCode::InvalidLength, *hash, *signer, signature),
			Self::Unsupported {
				hash,
				signer,
				signature,
			} => generic(SignatureErrorCode::Unsupported, *hash, *signer, signature),
			Self::Illegal {
				hash,
				signer,
				signature,
			} => generic(SignatureErrorCode::Illegal, *hash, *signer, signature),
			Self::InappropriateSignatureType {
				hash,
				signer,
				signature,
			} => generic(
				SignatureErrorCode::InappropriateSignatureType,
				*hash,
				*signer,
				signature,
			),
			Self::ValidatorNotApproved { signer, validator } => {
				exchange::SignatureValidatorNotApprovedError {
					signerAddress: *signer,
					validatorAddress: *validator,
				}
				.abi_encode()
			},
			Self::OrderValidatorNotApproved { signer, validator } => {
				exchange::SignatureOrderValidatorNotApprovedError {
					signerAddress: *signer,
					validatorAddress: *validator,
				}
				.abi_encode()
			},
			Self::WalletError {
				hash,
				wallet,
				signature,
				error_data,
			} => exchange::SignatureWalletError {
				hash: *hash,
				walletAddress: *wallet,
				signature: signature.clone(),
				errorData: error_data.clone(),
			}
			.abi_encode(),
			Self::ValidatorError {
				hash,
				signer,
				validator,
				signature,
				error_data,
			} => exchange::SignatureValidatorError {
				hash: *hash,
				signerAddress: *signer,
				validatorAddress: *validator,
				signature: signature.clone(),
				errorData: error_data.clone(),
			}
			.abi_encode(),
			Self::OrderWalletError {
				order_hash,
				wallet,
				signature,
				error_data,
			} => exchange::SignatureOrderWalletError {
				orderHash: *order_hash,
				walletAddress: *wallet,
				signature: signature.clone(),
				errorData: error_data.clone(),
			}
			.abi_encode(),
			Self::OrderValidatorError {
				order_hash,
				signer,
				validator,
				signature,
				error_data,
			} => exchange::SignatureOrderValidatorError {
				orderHash: *order_hash,
				signerAddress: *signer,
				validatorAddress: *validator,
				signature: signature.clone(),
				errorData: error_data.clone(),
			}
			.abi_encode(),
		};
		encoded.into()
	}
}

fn generic(code: SignatureErrorCode, hash: B256, signer: Address, signature: &Bytes) -> Vec<u8> {
	exchange::SignatureError {
		errorCode: code as u8,
		hash,
		signerAddress: signer,
		signature: signature.clone(),
	}
	.abi_encode()
}

/// Errors returned by the validation engine.
#[derive(Debug, Error)]
pub enum ValidatorError {
	/// The payload was rejected.
	#[error(transparent)]
	Signature(#[from] SignatureError),
	/// Registry persistence failed.
	#[error("Storage error: {0}")]
	Storage(String),
	/// The delegate could not be reached. A delegate verdict is never
	/// reported here.
	#[error("Delegate error: {0}")]
	Delegate(String),
	/// A signed action was rejected.
	#[error("Action error: {0}")]
	Action(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generic_revert_data() {
		let err = SignatureError::Unsupported {
			hash: B256::repeat_byte(1),
			signer: Address::repeat_byte(2),
			signature: Bytes::from(vec![0xff]),
		};
		let data = err.revert_data();

		assert_eq!(&data[..4], exchange::SignatureError::SELECTOR.as_slice());
		let decoded = exchange::SignatureError::abi_decode(&data, true).unwrap();
		assert_eq!(decoded.errorCode, SignatureErrorCode::Unsupported as u8);
		assert_eq!(decoded.hash, B256::repeat_byte(1));
		assert_eq!(decoded.signerAddress, Address::repeat_byte(2));
		assert_eq!(decoded.signature, Bytes::from(vec![0xff]));
	}

	#[test]
	fn test_delegate_revert_data_keeps_error_data() {
		let err = SignatureError::OrderValidatorError {
			order_hash: B256::repeat_byte(3),
			signer: Address::repeat_byte(4),
			validator: Address::repeat_byte(5),
			signature: Bytes::from(vec![1, 2]),
			error_data: Bytes::from(vec![0xde, 0xad]),
		};
		let decoded =
			exchange::SignatureOrderValidatorError::abi_decode(&err.revert_data(), true).unwrap();
		assert_eq!(decoded.validatorAddress, Address::repeat_byte(5));
		assert_eq!(decoded.errorData, Bytes::from(vec![0xde, 0xad]));
	}

	#[test]
	fn test_kinds() {
		let not_approved = SignatureError::ValidatorNotApproved {
			signer: Address::ZERO,
			validator: Address::ZERO,
		};
		assert_eq!(not_approved.kind(), SignatureErrorKind::DelegateNotApproved);
		assert_eq!(
			exchange::SignatureValidatorNotApprovedError::SELECTOR.as_slice(),
			&not_approved.revert_data()[..4]
		);

		let wallet = SignatureError::WalletError {
			hash: B256::ZERO,
			wallet: Address::ZERO,
			signature: Bytes::new(),
			error_data: Bytes::new(),
		};
		assert_eq!(wallet.kind(), SignatureErrorKind::DelegateCallFailed);
		assert_eq!(wallet.kind().as_str(), "delegateCallFailed");
	}
}
