//! Request processing for the validator API.
//!
//! Handlers parse hex fields themselves so that malformed input maps to a
//! 400, while rejected signatures map to a 422 carrying the exchange's rich
//! revert data.

pub mod registry;
pub mod signatures;

use serde_json::json;
use sigval_core::{SignatureError, ValidatorError};
use sigval_types::{parse_address, parse_b256, parse_bytes, APIError, Address, Bytes, B256};

pub(crate) fn parse_hash_field(field: &str, value: &str) -> Result<B256, APIError> {
	parse_b256(value).map_err(|e| APIError::bad_request(format!("Invalid {}: {}", field, e)))
}

pub(crate) fn parse_address_field(field: &str, value: &str) -> Result<Address, APIError> {
	parse_address(value).map_err(|e| APIError::bad_request(format!("Invalid {}: {}", field, e)))
}

/// Parses a signature payload, refusing anything above `max_length` before
/// it reaches the decoder.
pub(crate) fn parse_signature(value: &str, max_length: usize) -> Result<Bytes, APIError> {
	let signature =
		parse_bytes(value).map_err(|e| APIError::bad_request(format!("Invalid signature: {}", e)))?;
	if signature.len() > max_length {
		return Err(APIError::BadRequest {
			error_type: "SIGNATURE_TOO_LONG".to_string(),
			message: format!(
				"Signature is {} bytes, the maximum is {}",
				signature.len(),
				max_length
			),
			details: None,
		});
	}
	Ok(signature)
}

pub(crate) fn signature_error(e: SignatureError) -> APIError {
	APIError::UnprocessableEntity {
		error_type: "SIGNATURE_ERROR".to_string(),
		message: e.to_string(),
		details: Some(json!({
			"kind": e.kind().as_str(),
			"revertData": e.revert_data().to_string(),
		})),
	}
}

pub(crate) fn validator_error(e: ValidatorError) -> APIError {
	match e {
		ValidatorError::Signature(e) => signature_error(e),
		ValidatorError::Action(message) => APIError::UnprocessableEntity {
			error_type: "ACTION_REJECTED".to_string(),
			message,
			details: None,
		},
		ValidatorError::Delegate(message) => APIError::ServiceUnavailable {
			error_type: "DELEGATE_UNAVAILABLE".to_string(),
			message,
			retry_after: Some(5),
		},
		ValidatorError::Storage(message) => APIError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_signature_length_limit() {
		assert!(parse_signature("0x0102", 2).is_ok());
		let err = parse_signature("0x010203", 2).unwrap_err();
		assert_eq!(err.status_code(), 400);
		assert_eq!(parse_signature("0xzz", 10).unwrap_err().status_code(), 400);
	}

	#[test]
	fn test_error_statuses() {
		let rejected = validator_error(ValidatorError::Signature(SignatureError::Illegal {
			hash: B256::ZERO,
			signer: Address::ZERO,
			signature: Bytes::from(vec![0]),
		}));
		assert_eq!(rejected.status_code(), 422);
		let body = rejected.to_error_response();
		let details = body.details.unwrap();
		assert_eq!(details["kind"], "illegal");
		assert!(details["revertData"].as_str().unwrap().starts_with("0x"));

		assert_eq!(
			validator_error(ValidatorError::Delegate("down".into())).status_code(),
			503
		);
		assert_eq!(
			validator_error(ValidatorError::Storage("disk".into())).status_code(),
			500
		);
		assert_eq!(
			validator_error(ValidatorError::Action("replay".into())).status_code(),
			422
		);
	}
}
