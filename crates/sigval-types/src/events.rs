//! Events emitted when validator state changes.
//!
//! Registry mutations publish an event on the event bus after the new state
//! has been persisted. Verification never emits events.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// State changes of the signature registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidatorEvent {
	/// A signer pre-signed a hash.
	#[serde(rename_all = "camelCase")]
	PreSigned { hash: B256, signer_address: Address },
	/// A signer changed the approval of a `Validator` contract.
	#[serde(rename_all = "camelCase")]
	SignatureValidatorApproval {
		signer_address: Address,
		validator_address: Address,
		approved: bool,
	},
	/// A signer changed the approval of an `OrderValidator` contract.
	#[serde(rename_all = "camelCase")]
	OrderValidatorApproval {
		signer_address: Address,
		validator_address: Address,
		approved: bool,
	},
}

impl ValidatorEvent {
	/// The signer whose registry entry changed.
	pub fn signer(&self) -> Address {
		match self {
			Self::PreSigned { signer_address, .. }
			| Self::SignatureValidatorApproval { signer_address, .. }
			| Self::OrderValidatorApproval { signer_address, .. } => *signer_address,
		}
	}
}
