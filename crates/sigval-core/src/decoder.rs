//! Signature type decoding.
//!
//! Reads the trailing tag of a payload and maps it to a scheme. Performs no
//! cryptography and touches no state.

use crate::error::SignatureError;
use alloy_primitives::{Address, Bytes, B256};
use sigval_types::{SignatureScheme, SignatureType};

/// Decodes the scheme of `signature`.
///
/// `hash` and `signer` only provide context for the error.
pub fn decode(
	hash: B256,
	signer: Address,
	signature: &[u8],
) -> Result<SignatureScheme, SignatureError> {
	let Some(&tag) = signature.last() else {
		return Err(SignatureError::InvalidLength {
			hash,
			signer,
			signature: Bytes::new(),
		});
	};

	let signature_type =
		SignatureType::from_tag(tag).ok_or_else(|| SignatureError::Unsupported {
			hash,
			signer,
			signature: Bytes::copy_from_slice(signature),
		})?;

	SignatureScheme::from_type(signature_type).ok_or_else(|| SignatureError::Illegal {
		hash,
		signer,
		signature: Bytes::copy_from_slice(signature),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use sigval_types::{HashScheme, OrderScheme};

	fn decode_tag(payload: &[u8]) -> Result<SignatureScheme, SignatureError> {
		decode(B256::ZERO, Address::ZERO, payload)
	}

	#[test]
	fn test_empty_payload() {
		assert!(matches!(
			decode_tag(&[]),
			Err(SignatureError::InvalidLength { .. })
		));
	}

	#[test]
	fn test_unknown_tags() {
		for tag in [11u8, 12, 0x80, 0xff] {
			assert!(matches!(
				decode_tag(&[0xaa, tag]),
				Err(SignatureError::Unsupported { .. })
			));
		}
	}

	#[test]
	fn test_illegal_tag() {
		let err = decode_tag(&[1, 2, 3, 0]).unwrap_err();
		assert!(matches!(
			err,
			SignatureError::Illegal { ref signature, .. } if signature[..] == [1u8, 2, 3, 0]
		));
	}

	#[test]
	fn test_only_tag_is_read() {
		// Leading bytes never influence the decoded scheme
		assert_eq!(
			decode_tag(&[0xff, 0x00, 8]).unwrap(),
			SignatureScheme::Hash(HashScheme::PreSigned)
		);
		assert_eq!(
			decode_tag(&[10]).unwrap(),
			SignatureScheme::Order(OrderScheme::EIP1271OrderWallet)
		);
	}
}
