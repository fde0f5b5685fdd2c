//! API types for the validator HTTP API.
//!
//! Hashes, addresses and signature payloads travel as 0x-prefixed hex
//! strings and are parsed by the handlers, so malformed hex is reported as a
//! bad request rather than a deserialization failure.

use crate::{Order, ValidatorEvent, ZeroExTransaction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request for verifying a signature over a bare hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashSignatureRequest {
	pub hash: String,
	#[serde(rename = "signerAddress")]
	pub signer_address: String,
	pub signature: String,
}

/// Request for verifying a signature over an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSignatureRequest {
	pub order: Order,
	#[serde(rename = "signerAddress")]
	pub signer_address: String,
	pub signature: String,
}

/// Verification verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureValidityResponse {
	#[serde(rename = "isValid")]
	pub is_valid: bool,
	/// Present for order requests.
	#[serde(rename = "orderHash", skip_serializing_if = "Option::is_none")]
	pub order_hash: Option<String>,
}

/// Whether a signature must be re-checked on every fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularValidationResponse {
	#[serde(rename = "requiresRegularValidation")]
	pub requires_regular_validation: bool,
}

/// Request for computing an order's hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHashRequest {
	pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHashResponse {
	#[serde(rename = "orderHash")]
	pub order_hash: String,
}

/// Signed registry mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteActionRequest {
	pub transaction: ZeroExTransaction,
	pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteActionResponse {
	#[serde(rename = "transactionHash")]
	pub transaction_hash: String,
	pub event: ValidatorEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreSignedResponse {
	#[serde(rename = "isPreSigned")]
	pub is_pre_signed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalResponse {
	#[serde(rename = "isApproved")]
	pub is_approved: bool,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Additional error context
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds
	#[serde(rename = "retryAfter")]
	pub retry_after: Option<u64>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request with validation errors (400)
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Rejected signature or action (422)
	UnprocessableEntity {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Service unavailable with optional retry information (503)
	ServiceUnavailable {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Shorthand for a 400 caused by an unparsable request field.
	pub fn bad_request(message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: "INVALID_REQUEST".to_string(),
			message: message.into(),
			details: None,
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::UnprocessableEntity { .. } => 422,
			APIError::ServiceUnavailable { .. } => 503,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			}
			| APIError::UnprocessableEntity {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
				retry_after: None,
			},
			APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: *retry_after,
			},
			APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::UnprocessableEntity { message, .. } => {
				write!(f, "Unprocessable Entity: {}", message)
			},
			APIError::ServiceUnavailable { message, .. } => {
				write!(f, "Service Unavailable: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = match self.status_code() {
			400 => StatusCode::BAD_REQUEST,
			422 => StatusCode::UNPROCESSABLE_ENTITY,
			503 => StatusCode::SERVICE_UNAVAILABLE,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		(status, Json(self.to_error_response())).into_response()
	}
}
