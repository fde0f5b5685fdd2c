//! Registry endpoints: signed actions and read-only lookups.

use super::{parse_address_field, parse_hash_field, parse_signature, validator_error};
use sigval_core::SignatureValidator;
use sigval_types::{
	APIError, ApprovalResponse, ExecuteActionRequest, ExecuteActionResponse, PreSignedResponse,
};

/// Handles POST /api/actions.
///
/// The action's signer is the only actor; there is no other way to write a
/// registry entry over HTTP.
pub async fn execute_action(
	request: ExecuteActionRequest,
	validator: &SignatureValidator,
) -> Result<ExecuteActionResponse, APIError> {
	let signature = parse_signature(
		&request.signature,
		validator.config().verifier.max_signature_length,
	)?;

	let (hash, event) = validator
		.execute_action(&request.transaction, &signature)
		.await
		.map_err(validator_error)?;

	Ok(ExecuteActionResponse {
		transaction_hash: hash.to_string(),
		event,
	})
}

/// Handles GET /api/presigned/{hash}/{signer}.
pub async fn get_pre_signed(
	hash: &str,
	signer: &str,
	validator: &SignatureValidator,
) -> Result<PreSignedResponse, APIError> {
	let hash = parse_hash_field("hash", hash)?;
	let signer = parse_address_field("signer", signer)?;

	let is_pre_signed = validator
		.is_pre_signed(hash, signer)
		.await
		.map_err(validator_error)?;
	Ok(PreSignedResponse { is_pre_signed })
}

/// Handles GET /api/approvals/validators/{signer}/{validator}.
pub async fn get_validator_approval(
	signer: &str,
	validator_address: &str,
	validator: &SignatureValidator,
) -> Result<ApprovalResponse, APIError> {
	let signer = parse_address_field("signer", signer)?;
	let validator_address = parse_address_field("validator", validator_address)?;

	let is_approved = validator
		.is_signature_validator_approved(signer, validator_address)
		.await
		.map_err(validator_error)?;
	Ok(ApprovalResponse { is_approved })
}

/// Handles GET /api/approvals/order-validators/{signer}/{validator}.
pub async fn get_order_validator_approval(
	signer: &str,
	validator_address: &str,
	validator: &SignatureValidator,
) -> Result<ApprovalResponse, APIError> {
	let signer = parse_address_field("signer", signer)?;
	let validator_address = parse_address_field("validator", validator_address)?;

	let is_approved = validator
		.is_order_validator_approved(signer, validator_address)
		.await
		.map_err(validator_error)?;
	Ok(ApprovalResponse { is_approved })
}
