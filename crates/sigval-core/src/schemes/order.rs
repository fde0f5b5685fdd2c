//! Schemes that need the full order record.

use super::hash::invalid_length;
use super::{split_delegate, strip_tag, SchemeVerifier};
use crate::error::{SignatureError, ValidatorError};
use crate::protocol;
use alloy_primitives::{Address, Bytes, B256};
use sigval_types::{Order, OrderScheme};

impl SchemeVerifier {
	/// Verifies `signature` over `order` for `signer` with an order-aware
	/// scheme. `order_hash` must be the order's canonical hash.
	pub async fn verify_order(
		&self,
		scheme: OrderScheme,
		order: &Order,
		order_hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		match scheme {
			OrderScheme::OrderValidator => {
				self.verify_order_validator(order, order_hash, signer, signature)
					.await
			},
			OrderScheme::OrderWallet => {
				self.verify_order_wallet(order, order_hash, signer, signature)
					.await
			},
			OrderScheme::EIP1271OrderWallet => {
				self.verify_eip1271_order_wallet(order, order_hash, signer, signature)
					.await
			},
		}
	}

	async fn verify_order_validator(
		&self,
		order: &Order,
		order_hash: B256,
		signer: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let (inner, validator) = split_delegate(signature)
			.ok_or_else(|| invalid_length(order_hash, signer, signature))?;

		if !self
			.registry
			.is_order_validator_approved(signer, validator)
			.await?
		{
			return Err(SignatureError::OrderValidatorNotApproved { signer, validator }.into());
		}

		let calldata = protocol::order_validator_calldata(order, order_hash, inner);
		let result = self.call(validator, calldata).await?;

		protocol::interpret_bool_word(&result).ok_or_else(|| {
			SignatureError::OrderValidatorError {
				order_hash,
				signer,
				validator,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}

	async fn verify_order_wallet(
		&self,
		order: &Order,
		order_hash: B256,
		wallet: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let inner = strip_tag(signature);
		let calldata = protocol::order_validator_calldata(order, order_hash, inner);
		let result = self.call(wallet, calldata).await?;

		protocol::interpret_bool_word(&result).ok_or_else(|| {
			SignatureError::OrderWalletError {
				order_hash,
				wallet,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}

	async fn verify_eip1271_order_wallet(
		&self,
		order: &Order,
		order_hash: B256,
		wallet: Address,
		signature: &[u8],
	) -> Result<bool, ValidatorError> {
		let inner = strip_tag(signature);
		// The message is the encoded order itself, not its hash
		let calldata = protocol::eip1271_calldata(protocol::eip1271_order_data(order), inner);
		let result = self.call(wallet, calldata).await?;

		protocol::interpret_magic_value(&result).ok_or_else(|| {
			SignatureError::OrderWalletError {
				order_hash,
				wallet,
				signature: Bytes::copy_from_slice(inner),
				error_data: result.return_data.clone(),
			}
			.into()
		})
	}
}
