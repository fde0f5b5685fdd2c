//! ABI definitions for the exchange protocol.
//!
//! The order record, the delegate verification interfaces, the rich revert
//! errors and the signed-action envelope all live in one `sol!` block because
//! the delegate interfaces take the order struct as an argument.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, Eip712Domain};

sol! {
	/// Exchange order record. Its EIP-712 hash is the order's commitment.
	#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
	struct Order {
		address makerAddress;
		address takerAddress;
		address feeRecipientAddress;
		address senderAddress;
		uint256 makerAssetAmount;
		uint256 takerAssetAmount;
		uint256 makerFee;
		uint256 takerFee;
		uint256 expirationTimeSeconds;
		uint256 salt;
		bytes makerAssetData;
		bytes takerAssetData;
		bytes makerFeeAssetData;
		bytes takerFeeAssetData;
	}

	/// Envelope for registry mutations performed on behalf of a signer.
	#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
	struct ZeroExTransaction {
		uint256 salt;
		uint256 expirationTimeSeconds;
		uint256 gasPrice;
		address signerAddress;
		bytes data;
	}

	/// Wallet contract that verifies signatures over a hash.
	interface IWallet {
		function isValidSignature(bytes32 hash, bytes signature) external view returns (bool isValid);
	}

	/// Validator contract approved by a signer.
	interface IValidator {
		function isValidSignature(bytes32 hash, address signerAddress, bytes signature) external view returns (bool isValid);
	}

	/// Wallet or validator contract that verifies signatures over a full order.
	interface IOrderValidator {
		function isValidOrderSignature(Order order, bytes32 orderHash, bytes signature) external view returns (bool isValid);
	}

	/// EIP-1271 wallet.
	interface IEIP1271Wallet {
		function isValidSignature(bytes data, bytes signature) external view returns (bytes4 magicValue);
	}

	/// Registry mutations a signed action may carry.
	interface IExchangeRegistry {
		function preSign(bytes32 hash) external;
		function setSignatureValidatorApproval(address validatorAddress, bool approval) external;
		function setOrderValidatorApproval(address validatorAddress, bool approval) external;
	}

	/// Rich revert errors.
	error SignatureError(uint8 errorCode, bytes32 hash, address signerAddress, bytes signature);
	error SignatureValidatorNotApprovedError(address signerAddress, address validatorAddress);
	error SignatureOrderValidatorNotApprovedError(address signerAddress, address validatorAddress);
	error SignatureValidatorError(bytes32 hash, address signerAddress, address validatorAddress, bytes signature, bytes errorData);
	error SignatureWalletError(bytes32 hash, address walletAddress, bytes signature, bytes errorData);
	error SignatureOrderValidatorError(bytes32 orderHash, address signerAddress, address validatorAddress, bytes signature, bytes errorData);
	error SignatureOrderWalletError(bytes32 orderHash, address walletAddress, bytes signature, bytes errorData);
}

/// EIP-712 domain name of the exchange.
pub const EXCHANGE_DOMAIN_NAME: &str = "0x Protocol";
/// EIP-712 domain version of the exchange.
pub const EXCHANGE_DOMAIN_VERSION: &str = "3.0.0";

/// Builds the exchange EIP-712 domain for a deployment.
pub fn exchange_domain(chain_id: u64, exchange: Address) -> Eip712Domain {
	Eip712Domain::new(
		Some(EXCHANGE_DOMAIN_NAME.into()),
		Some(EXCHANGE_DOMAIN_VERSION.into()),
		Some(U256::from(chain_id)),
		Some(exchange),
		None,
	)
}

/// Error codes carried by the generic `SignatureError` revert.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureErrorCode {
	BadSignature = 0,
	InvalidLength = 1,
	Unsupported = 2,
	Illegal = 3,
	InappropriateSignatureType = 4,
	InvalidSigner = 5,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{keccak256, Bytes};
	use alloy_sol_types::{SolCall, SolError, SolStruct};

	#[test]
	fn test_wallet_selectors() {
		assert_eq!(
			IWallet::isValidSignatureCall::SELECTOR,
			keccak256("isValidSignature(bytes32,bytes)")[..4]
		);
		assert_eq!(
			IEIP1271Wallet::isValidSignatureCall::SELECTOR,
			crate::EIP1271_MAGIC_VALUE.0
		);
	}

	#[test]
	fn test_error_selector() {
		assert_eq!(
			SignatureError::SELECTOR,
			keccak256("SignatureError(uint8,bytes32,address,bytes)")[..4]
		);
	}

	#[test]
	fn test_transaction_type_matches_exchange() {
		assert_eq!(
			ZeroExTransaction::eip712_encode_type(),
			"ZeroExTransaction(uint256 salt,uint256 expirationTimeSeconds,uint256 gasPrice,address signerAddress,bytes data)"
		);
	}

	#[test]
	fn test_order_hash_depends_on_domain() {
		let order = Order {
			makerAddress: Address::repeat_byte(1),
			takerAddress: Address::ZERO,
			feeRecipientAddress: Address::ZERO,
			senderAddress: Address::ZERO,
			makerAssetAmount: U256::from(100),
			takerAssetAmount: U256::from(200),
			makerFee: U256::ZERO,
			takerFee: U256::ZERO,
			expirationTimeSeconds: U256::from(1_700_000_000u64),
			salt: U256::from(7),
			makerAssetData: Bytes::new(),
			takerAssetData: Bytes::new(),
			makerFeeAssetData: Bytes::new(),
			takerFeeAssetData: Bytes::new(),
		};
		let mainnet = order.eip712_signing_hash(&exchange_domain(1, Address::repeat_byte(9)));
		let testnet = order.eip712_signing_hash(&exchange_domain(3, Address::repeat_byte(9)));
		assert_ne!(mainnet, testnet);
	}
}
