//! Direct-key ECDSA schemes.
//!
//! Payload layout is `v ‖ r ‖ s ‖ tag`. A payload that cannot be recovered
//! (bad `v`, `r`/`s` out of range) is a false verdict, not an error.

use crate::error::SignatureError;
use alloy_primitives::{eip191_hash_message, Address, Bytes, PrimitiveSignature, B256, U256};
use sigval_types::{EcdsaScheme, ECDSA_SIGNATURE_LENGTH};

/// The digest a scheme's signature is made over.
pub fn signed_digest(scheme: EcdsaScheme, hash: B256) -> B256 {
	match scheme {
		EcdsaScheme::EIP712 => hash,
		EcdsaScheme::EthSign => eip191_hash_message(hash),
	}
}

/// Recovers the signer of `digest` from a 66-byte payload.
pub fn recover(digest: B256, signature: &[u8]) -> Option<Address> {
	if signature.len() != ECDSA_SIGNATURE_LENGTH {
		return None;
	}
	let parity = match signature[0] {
		27 => false,
		28 => true,
		_ => return None,
	};
	let r = U256::from_be_slice(&signature[1..33]);
	let s = U256::from_be_slice(&signature[33..65]);

	PrimitiveSignature::new(r, s, parity)
		.recover_address_from_prehash(&digest)
		.ok()
}

pub fn verify(
	scheme: EcdsaScheme,
	hash: B256,
	signer: Address,
	signature: &[u8],
) -> Result<bool, SignatureError> {
	if signature.len() != ECDSA_SIGNATURE_LENGTH {
		return Err(SignatureError::InvalidLength {
			hash,
			signer,
			signature: Bytes::copy_from_slice(signature),
		});
	}

	let recovered = recover(signed_digest(scheme, hash), signature);
	Ok(recovered.is_some_and(|address| address == signer))
}
