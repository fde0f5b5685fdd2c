//! Account module for the signature validator.
//!
//! Key holders use an account to produce wire-format `EIP712` and `EthSign`
//! signature payloads and to sign registry actions. The validator itself
//! never holds keys; this crate is the signing side of the same wire format.

use alloy_primitives::{Bytes, B256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use async_trait::async_trait;
use sigval_types::{Address, EcdsaScheme, SignaturePayload, ZeroExTransaction};
use thiserror::Error;

pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// A recoverable secp256k1 signature split into its wire components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
	/// Recovery byte, 27 or 28.
	pub v: u8,
	pub r: B256,
	pub s: B256,
}

impl EcdsaSignature {
	/// Splits a 65-byte `r ‖ s ‖ v` signature, normalizing `v` to 27/28.
	pub fn from_rsv(bytes: &[u8; 65]) -> Self {
		let v = bytes[64];
		Self {
			v: if v < 27 { v + 27 } else { v },
			r: B256::from_slice(&bytes[0..32]),
			s: B256::from_slice(&bytes[32..64]),
		}
	}
}

/// Interface for account implementations.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Address controlled by this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a 32-byte digest as is.
	async fn sign_hash(&self, hash: &B256) -> Result<EcdsaSignature, AccountError>;

	/// Signs `message` under the `"\x19Ethereum Signed Message:\n"` prefix.
	async fn sign_message(&self, message: &[u8]) -> Result<EcdsaSignature, AccountError>;
}

/// Produces signature payloads with an account implementation.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a commitment and encodes the result as a tagged payload.
	///
	/// `EIP712` signs the commitment directly. `EthSign` signs the 32 bytes of
	/// the commitment as a personal message, which is the prefixed digest the
	/// validator recovers against.
	pub async fn sign_commitment(
		&self,
		scheme: EcdsaScheme,
		commitment: B256,
	) -> Result<Bytes, AccountError> {
		let signature = match scheme {
			EcdsaScheme::EIP712 => self.implementation.sign_hash(&commitment).await?,
			EcdsaScheme::EthSign => {
				self.implementation
					.sign_message(commitment.as_slice())
					.await?
			},
		};
		Ok(SignaturePayload::ecdsa(
			scheme,
			signature.v,
			signature.r,
			signature.s,
		))
	}

	/// Signs a registry action for submission. Returns the action hash and
	/// an `EIP712` payload over it.
	pub async fn sign_transaction(
		&self,
		transaction: &ZeroExTransaction,
		domain: &Eip712Domain,
	) -> Result<(B256, Bytes), AccountError> {
		let signer = self.get_address().await?;
		if transaction.signerAddress != signer {
			return Err(AccountError::SigningFailed(format!(
				"Action names signer {} but account is {}",
				transaction.signerAddress, signer
			)));
		}

		let hash = transaction.eip712_signing_hash(domain);
		let payload = self.sign_commitment(EcdsaScheme::EIP712, hash).await?;
		Ok((hash, payload))
	}
}
