//! Storage namespaces for persisted validator state.

use std::str::FromStr;

/// Storage namespaces.
///
/// Each registry lives in its own namespace so that an entry in one can never
/// be read as an entry in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// (signer, validator) approvals for the `Validator` scheme
	ValidatorApprovals,
	/// (signer, validator) approvals for the `OrderValidator` scheme
	OrderValidatorApprovals,
	/// (hash, signer) pre-signatures
	PreSigned,
	/// Hashes of signed actions that were already executed
	ExecutedActions,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::ValidatorApprovals => "validator_approvals",
			StorageKey::OrderValidatorApprovals => "order_validator_approvals",
			StorageKey::PreSigned => "presigned",
			StorageKey::ExecutedActions => "executed_actions",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::ValidatorApprovals,
			Self::OrderValidatorApprovals,
			Self::PreSigned,
			Self::ExecutedActions,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"validator_approvals" => Ok(Self::ValidatorApprovals),
			"order_validator_approvals" => Ok(Self::OrderValidatorApprovals),
			"presigned" => Ok(Self::PreSigned),
			"executed_actions" => Ok(Self::ExecutedActions),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
