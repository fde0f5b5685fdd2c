//! Signature type tags and payload layout.
//!
//! Every signature payload ends with a one-byte type tag that selects the
//! verification scheme. The bytes before the tag are scheme-specific:
//!
//! ```text
//! [scheme-specific bytes][optional 20-byte delegate address][1-byte type tag]
//! ```
//!
//! The delegate address suffix is only present for `Validator` and
//! `OrderValidator` payloads.

use alloy_primitives::{Address, Bytes, FixedBytes, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an ECDSA payload: v (1) + r (32) + s (32) + tag (1).
pub const ECDSA_SIGNATURE_LENGTH: usize = 66;

/// Length of the trailing delegate address plus the type tag.
pub const DELEGATE_SUFFIX_LENGTH: usize = 21;

/// `bytes4(keccak256("isValidSignature(bytes,bytes)"))`, echoed back by
/// EIP-1271 wallets that accept a signature.
pub const EIP1271_MAGIC_VALUE: FixedBytes<4> = FixedBytes([0x20, 0xc1, 0x3b, 0x0b]);

/// Signature schemes understood by the validator, in stable tag order.
///
/// `NSignatureTypes` is not a scheme: it is the upper bound used to reject
/// unknown tags.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureType {
	/// Reserved zero value. Always rejected.
	Illegal = 0,
	/// Always invalid. Payload must be the tag alone.
	Invalid = 1,
	/// ECDSA over the raw commitment.
	EIP712 = 2,
	/// ECDSA over the `\x19Ethereum Signed Message:\n32` framed commitment.
	EthSign = 3,
	/// Verified by the signer's own wallet contract.
	Wallet = 4,
	/// Verified by a validator contract the signer approved.
	Validator = 5,
	/// Verified by an approved order validator, given the full order.
	OrderValidator = 6,
	/// Verified by the signer's wallet contract, given the full order.
	OrderWallet = 7,
	/// Looked up in the pre-signed registry.
	PreSigned = 8,
	/// Verified by the signer's EIP-1271 wallet over the commitment.
	EIP1271Wallet = 9,
	/// Verified by the signer's EIP-1271 wallet over the encoded order.
	EIP1271OrderWallet = 10,
	/// Number of defined signature types.
	NSignatureTypes = 11,
}

impl SignatureType {
	/// Number of defined tags. Any raw tag at or above this is unsupported.
	pub const COUNT: u8 = SignatureType::NSignatureTypes as u8;

	/// Maps a raw tag to its type. Returns `None` for tags at or above
	/// [`SignatureType::COUNT`].
	pub fn from_tag(tag: u8) -> Option<Self> {
		let signature_type = match tag {
			0 => Self::Illegal,
			1 => Self::Invalid,
			2 => Self::EIP712,
			3 => Self::EthSign,
			4 => Self::Wallet,
			5 => Self::Validator,
			6 => Self::OrderValidator,
			7 => Self::OrderWallet,
			8 => Self::PreSigned,
			9 => Self::EIP1271Wallet,
			10 => Self::EIP1271OrderWallet,
			_ => return None,
		};
		Some(signature_type)
	}

	/// The raw tag byte.
	pub fn tag(self) -> u8 {
		self as u8
	}

	/// Whether this type can only be verified against a full order.
	pub fn is_order_only(self) -> bool {
		matches!(
			self,
			Self::OrderValidator | Self::OrderWallet | Self::EIP1271OrderWallet
		)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Illegal => "illegal",
			Self::Invalid => "invalid",
			Self::EIP712 => "eip712",
			Self::EthSign => "eth_sign",
			Self::Wallet => "wallet",
			Self::Validator => "validator",
			Self::OrderValidator => "order_validator",
			Self::OrderWallet => "order_wallet",
			Self::PreSigned => "pre_signed",
			Self::EIP1271Wallet => "eip1271_wallet",
			Self::EIP1271OrderWallet => "eip1271_order_wallet",
			Self::NSignatureTypes => "n_signature_types",
		}
	}
}

impl fmt::Display for SignatureType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Schemes that can be verified against a bare 32-byte hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashScheme {
	Invalid,
	EIP712,
	EthSign,
	Wallet,
	Validator,
	PreSigned,
	EIP1271Wallet,
}

/// Schemes that need the full order to be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderScheme {
	OrderValidator,
	OrderWallet,
	EIP1271OrderWallet,
}

/// A decoded, legal signature type.
///
/// Produced by the signature decoder. `Illegal` and unknown tags never make
/// it into this type, so verifiers can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
	Hash(HashScheme),
	Order(OrderScheme),
}

impl SignatureScheme {
	/// Converts a raw type into a scheme. `Illegal` and the sentinel have no
	/// scheme.
	pub fn from_type(signature_type: SignatureType) -> Option<Self> {
		let scheme = match signature_type {
			SignatureType::Invalid => Self::Hash(HashScheme::Invalid),
			SignatureType::EIP712 => Self::Hash(HashScheme::EIP712),
			SignatureType::EthSign => Self::Hash(HashScheme::EthSign),
			SignatureType::Wallet => Self::Hash(HashScheme::Wallet),
			SignatureType::Validator => Self::Hash(HashScheme::Validator),
			SignatureType::PreSigned => Self::Hash(HashScheme::PreSigned),
			SignatureType::EIP1271Wallet => Self::Hash(HashScheme::EIP1271Wallet),
			SignatureType::OrderValidator => Self::Order(OrderScheme::OrderValidator),
			SignatureType::OrderWallet => Self::Order(OrderScheme::OrderWallet),
			SignatureType::EIP1271OrderWallet => Self::Order(OrderScheme::EIP1271OrderWallet),
			SignatureType::Illegal | SignatureType::NSignatureTypes => return None,
		};
		Some(scheme)
	}

	pub fn signature_type(&self) -> SignatureType {
		match self {
			Self::Hash(scheme) => scheme.signature_type(),
			Self::Order(scheme) => scheme.signature_type(),
		}
	}
}

impl HashScheme {
	pub fn signature_type(&self) -> SignatureType {
		match self {
			Self::Invalid => SignatureType::Invalid,
			Self::EIP712 => SignatureType::EIP712,
			Self::EthSign => SignatureType::EthSign,
			Self::Wallet => SignatureType::Wallet,
			Self::Validator => SignatureType::Validator,
			Self::PreSigned => SignatureType::PreSigned,
			Self::EIP1271Wallet => SignatureType::EIP1271Wallet,
		}
	}
}

impl OrderScheme {
	pub fn signature_type(&self) -> SignatureType {
		match self {
			Self::OrderValidator => SignatureType::OrderValidator,
			Self::OrderWallet => SignatureType::OrderWallet,
			Self::EIP1271OrderWallet => SignatureType::EIP1271OrderWallet,
		}
	}
}

/// ECDSA variants that share the `v ‖ r ‖ s ‖ tag` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaScheme {
	EIP712,
	EthSign,
}

impl From<EcdsaScheme> for SignatureType {
	fn from(scheme: EcdsaScheme) -> Self {
		match scheme {
			EcdsaScheme::EIP712 => SignatureType::EIP712,
			EcdsaScheme::EthSign => SignatureType::EthSign,
		}
	}
}

/// Builders for wire-format signature payloads.
pub struct SignaturePayload;

impl SignaturePayload {
	/// `v ‖ r ‖ s ‖ tag`.
	pub fn ecdsa(scheme: EcdsaScheme, v: u8, r: B256, s: B256) -> Bytes {
		let mut out = Vec::with_capacity(ECDSA_SIGNATURE_LENGTH);
		out.push(v);
		out.extend_from_slice(r.as_slice());
		out.extend_from_slice(s.as_slice());
		out.push(SignatureType::from(scheme).tag());
		out.into()
	}

	/// `inner ‖ tag`, for schemes that carry no delegate address.
	pub fn tagged(inner: &[u8], signature_type: SignatureType) -> Bytes {
		let mut out = Vec::with_capacity(inner.len() + 1);
		out.extend_from_slice(inner);
		out.push(signature_type.tag());
		out.into()
	}

	/// `inner ‖ validator ‖ tag`, for `Validator` and `OrderValidator`.
	pub fn with_delegate(inner: &[u8], delegate: Address, signature_type: SignatureType) -> Bytes {
		let mut out = Vec::with_capacity(inner.len() + DELEGATE_SUFFIX_LENGTH);
		out.extend_from_slice(inner);
		out.extend_from_slice(delegate.as_slice());
		out.push(signature_type.tag());
		out.into()
	}

	/// A payload that is just the `PreSigned` tag.
	pub fn pre_signed() -> Bytes {
		Self::tagged(&[], SignatureType::PreSigned)
	}
}
