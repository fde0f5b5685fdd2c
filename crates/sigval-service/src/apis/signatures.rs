//! Signature verification endpoints.

use super::{parse_address_field, parse_hash_field, parse_signature, signature_error, validator_error};
use sigval_core::SignatureValidator;
use sigval_types::{
	APIError, HashSignatureRequest, OrderHashRequest, OrderHashResponse, OrderSignatureRequest,
	RegularValidationResponse, SignatureValidityResponse,
};

/// Handles POST /api/signatures/hash.
pub async fn verify_hash_signature(
	request: HashSignatureRequest,
	validator: &SignatureValidator,
) -> Result<SignatureValidityResponse, APIError> {
	let hash = parse_hash_field("hash", &request.hash)?;
	let signer = parse_address_field("signerAddress", &request.signer_address)?;
	let signature = parse_signature(
		&request.signature,
		validator.config().verifier.max_signature_length,
	)?;

	let is_valid = validator
		.is_valid_hash_signature(hash, signer, &signature)
		.await
		.map_err(validator_error)?;

	Ok(SignatureValidityResponse {
		is_valid,
		order_hash: None,
	})
}

/// Handles POST /api/signatures/order.
pub async fn verify_order_signature(
	request: OrderSignatureRequest,
	validator: &SignatureValidator,
) -> Result<SignatureValidityResponse, APIError> {
	let signer = parse_address_field("signerAddress", &request.signer_address)?;
	let signature = parse_signature(
		&request.signature,
		validator.config().verifier.max_signature_length,
	)?;

	let is_valid = validator
		.is_valid_order_signature(&request.order, signer, &signature)
		.await
		.map_err(validator_error)?;

	Ok(SignatureValidityResponse {
		is_valid,
		order_hash: Some(validator.get_order_hash(&request.order).to_string()),
	})
}

/// Handles POST /api/signatures/regular-validation.
pub fn requires_regular_validation(
	request: HashSignatureRequest,
	validator: &SignatureValidator,
) -> Result<RegularValidationResponse, APIError> {
	let hash = parse_hash_field("hash", &request.hash)?;
	let signer = parse_address_field("signerAddress", &request.signer_address)?;
	let signature = parse_signature(
		&request.signature,
		validator.config().verifier.max_signature_length,
	)?;

	let requires_regular_validation = validator
		.requires_regular_validation(hash, signer, &signature)
		.map_err(signature_error)?;

	Ok(RegularValidationResponse {
		requires_regular_validation,
	})
}

/// Handles POST /api/orders/hash.
pub fn order_hash(request: OrderHashRequest, validator: &SignatureValidator) -> OrderHashResponse {
	OrderHashResponse {
		order_hash: validator.get_order_hash(&request.order).to_string(),
	}
}
