//! Registry mutations carried by signed actions.

use crate::error::ValidatorError;
use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::{SolCall, SolInterface};
use sigval_types::standards::exchange::IExchangeRegistry::{self, IExchangeRegistryCalls};

/// A decoded registry mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryAction {
	PreSign { hash: B256 },
	SetSignatureValidatorApproval { validator: Address, approved: bool },
	SetOrderValidatorApproval { validator: Address, approved: bool },
}

impl RegistryAction {
	/// Decodes the call data of a signed action.
	pub fn decode(data: &[u8]) -> Result<Self, ValidatorError> {
		let call = IExchangeRegistryCalls::abi_decode(data, true)
			.map_err(|e| ValidatorError::Action(format!("Undecodable action data: {}", e)))?;

		let action = match call {
			IExchangeRegistryCalls::preSign(call) => Self::PreSign { hash: call.hash },
			IExchangeRegistryCalls::setSignatureValidatorApproval(call) => {
				Self::SetSignatureValidatorApproval {
					validator: call.validatorAddress,
					approved: call.approval,
				}
			},
			IExchangeRegistryCalls::setOrderValidatorApproval(call) => {
				Self::SetOrderValidatorApproval {
					validator: call.validatorAddress,
					approved: call.approval,
				}
			},
		};
		Ok(action)
	}

	/// Call data for this action, as placed in a signed action.
	pub fn encode(&self) -> Bytes {
		let encoded = match *self {
			Self::PreSign { hash } => IExchangeRegistry::preSignCall { hash }.abi_encode(),
			Self::SetSignatureValidatorApproval {
				validator,
				approved,
			} => IExchangeRegistry::setSignatureValidatorApprovalCall {
				validatorAddress: validator,
				approval: approved,
			}
			.abi_encode(),
			Self::SetOrderValidatorApproval {
				validator,
				approved,
			} => IExchangeRegistry::setOrderValidatorApprovalCall {
				validatorAddress: validator,
				approval: approved,
			}
			.abi_encode(),
		};
		encoded.into()
	}
}
