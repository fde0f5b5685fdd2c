//! Parsing of hex-encoded protocol values.
//!
//! Requests and configuration carry addresses, hashes and signature payloads
//! as hex strings. These helpers turn them into typed values with a
//! readable error message on failure.

use super::formatting::without_0x_prefix;
use alloy_primitives::{hex, Address, Bytes, B256};

/// Parses a 20-byte hex address, with or without "0x".
pub fn parse_address(value: &str) -> Result<Address, String> {
	let bytes = hex::decode(without_0x_prefix(value))
		.map_err(|e| format!("Invalid hex in address '{}': {}", value, e))?;
	if bytes.len() != 20 {
		return Err(format!(
			"Invalid address '{}': expected 20 bytes, got {}",
			value,
			bytes.len()
		));
	}
	Ok(Address::from_slice(&bytes))
}

/// Parses a 32-byte hex hash, with or without "0x".
pub fn parse_b256(value: &str) -> Result<B256, String> {
	let bytes = hex::decode(without_0x_prefix(value))
		.map_err(|e| format!("Invalid hex in hash '{}': {}", value, e))?;
	if bytes.len() != 32 {
		return Err(format!(
			"Invalid hash '{}': expected 32 bytes, got {}",
			value,
			bytes.len()
		));
	}
	Ok(B256::from_slice(&bytes))
}

/// Parses arbitrary-length hex bytes, with or without "0x". An empty string
/// (or a bare "0x") is zero bytes.
pub fn parse_bytes(value: &str) -> Result<Bytes, String> {
	hex::decode(without_0x_prefix(value))
		.map(Bytes::from)
		.map_err(|e| format!("Invalid hex bytes: {}", e))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_address() {
		let address = parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
		assert_eq!(
			hex::encode(address),
			"5fbdb2315678afecb367f032d93f642f64180aa3"
		);
		assert!(parse_address("0x1234").unwrap_err().contains("expected 20 bytes"));
		assert!(parse_address("0xzz").is_err());
	}

	#[test]
	fn test_parse_b256() {
		let hash = parse_b256(&format!("0x{}", "11".repeat(32))).unwrap();
		assert_eq!(hash, B256::repeat_byte(0x11));
		assert!(parse_b256("0x11").is_err());
	}

	#[test]
	fn test_parse_empty_bytes() {
		assert!(parse_bytes("0x").unwrap().is_empty());
		assert!(parse_bytes("").unwrap().is_empty());
		assert_eq!(parse_bytes("0x0102").unwrap().as_ref(), &[1, 2]);
	}
}
