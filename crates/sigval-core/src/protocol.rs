//! Delegate call payloads and return conventions.
//!
//! Two conventions exist. Wallets and validators answer with one ABI-encoded
//! `bool` word; EIP-1271 wallets echo a 4-byte magic value. In both cases a
//! failed call or a return of unexpected length is not a verdict but an
//! error, and the caller reports it with the raw return data attached.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use sigval_delegate::StaticCallResult;
use sigval_types::standards::exchange::{IEIP1271Wallet, IOrderValidator, IValidator, IWallet};
use sigval_types::{Order, EIP1271_MAGIC_VALUE};

/// `isValidSignature(bytes32 hash, bytes signature)` on a wallet.
pub fn wallet_calldata(hash: B256, signature: &[u8]) -> Bytes {
	IWallet::isValidSignatureCall {
		hash,
		signature: Bytes::copy_from_slice(signature),
	}
	.abi_encode()
	.into()
}

/// `isValidSignature(bytes32 hash, address signerAddress, bytes signature)`
/// on a validator.
pub fn validator_calldata(hash: B256, signer: Address, signature: &[u8]) -> Bytes {
	IValidator::isValidSignatureCall {
		hash,
		signerAddress: signer,
		signature: Bytes::copy_from_slice(signature),
	}
	.abi_encode()
	.into()
}

/// `isValidOrderSignature(Order order, bytes32 orderHash, bytes signature)`,
/// used for both order validators and order wallets.
pub fn order_validator_calldata(order: &Order, order_hash: B256, signature: &[u8]) -> Bytes {
	IOrderValidator::isValidOrderSignatureCall {
		order: order.clone(),
		orderHash: order_hash,
		signature: Bytes::copy_from_slice(signature),
	}
	.abi_encode()
	.into()
}

/// `isValidSignature(bytes data, bytes signature)` on an EIP-1271 wallet.
pub fn eip1271_calldata(data: Bytes, signature: &[u8]) -> Bytes {
	IEIP1271Wallet::isValidSignatureCall {
		data,
		signature: Bytes::copy_from_slice(signature),
	}
	.abi_encode()
	.into()
}

/// EIP-1271 message for a bare hash: `abi.encode(hash)`.
pub fn eip1271_hash_data(hash: B256) -> Bytes {
	hash.abi_encode().into()
}

/// EIP-1271 message for an order: `abi.encode(order)`, the whole record.
pub fn eip1271_order_data(order: &Order) -> Bytes {
	order.abi_encode().into()
}

/// Interprets a `bool` answer. `None` means the call failed or the return
/// data is not exactly one word.
pub fn interpret_bool_word(result: &StaticCallResult) -> Option<bool> {
	if !result.success || result.return_data.len() != 32 {
		return None;
	}
	Some(U256::from_be_slice(&result.return_data) == U256::from(1))
}

/// Interprets an EIP-1271 answer. `None` means the call failed or the return
/// data is shorter than 4 or longer than 32 bytes.
pub fn interpret_magic_value(result: &StaticCallResult) -> Option<bool> {
	let len = result.return_data.len();
	if !result.success || !(4..=32).contains(&len) {
		return None;
	}
	Some(result.return_data[..4] == EIP1271_MAGIC_VALUE[..])
}
