//! HTTP server for the signature validator API.

use axum::{
	extract::{DefaultBodyLimit, Path, State},
	response::Json,
	routing::{get, post},
	Router,
};
use serde_json::{json, Value};
use sigval_config::ApiConfig;
use sigval_core::SignatureValidator;
use sigval_types::{
	APIError, ApprovalResponse, ExecuteActionRequest, ExecuteActionResponse,
	HashSignatureRequest, OrderHashRequest, OrderHashResponse, OrderSignatureRequest,
	PreSignedResponse, RegularValidationResponse, SignatureValidityResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub validator: Arc<SignatureValidator>,
}

/// Builds the API router.
pub fn router(api_config: &ApiConfig, validator: Arc<SignatureValidator>) -> Router {
	let app_state = AppState { validator };

	Router::new()
		.route("/health", get(handle_health))
		.nest(
			"/api",
			Router::new()
				.route("/signatures/hash", post(handle_hash_signature))
				.route("/signatures/order", post(handle_order_signature))
				.route(
					"/signatures/regular-validation",
					post(handle_regular_validation),
				)
				.route("/orders/hash", post(handle_order_hash))
				.route("/actions", post(handle_action))
				.route("/presigned/{hash}/{signer}", get(handle_pre_signed))
				.route(
					"/approvals/validators/{signer}/{validator}",
					get(handle_validator_approval),
				)
				.route(
					"/approvals/order-validators/{signer}/{validator}",
					get(handle_order_validator_approval),
				),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive())
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				)))
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(app_state)
}

/// Starts the HTTP server and serves until the listener fails.
pub async fn start_server(
	api_config: ApiConfig,
	validator: Arc<SignatureValidator>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(&api_config, validator);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Signature validator API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

async fn handle_health(State(state): State<AppState>) -> Json<Value> {
	let verifier = &state.validator.config().verifier;
	Json(json!({
		"status": "ok",
		"id": verifier.id,
		"chainId": verifier.chain_id,
		"exchangeAddress": verifier.exchange_address.to_string(),
	}))
}

async fn handle_hash_signature(
	State(state): State<AppState>,
	Json(request): Json<HashSignatureRequest>,
) -> Result<Json<SignatureValidityResponse>, APIError> {
	match crate::apis::signatures::verify_hash_signature(request, &state.validator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Hash signature request failed: {}", e);
			Err(e)
		},
	}
}

async fn handle_order_signature(
	State(state): State<AppState>,
	Json(request): Json<OrderSignatureRequest>,
) -> Result<Json<SignatureValidityResponse>, APIError> {
	match crate::apis::signatures::verify_order_signature(request, &state.validator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order signature request failed: {}", e);
			Err(e)
		},
	}
}

async fn handle_regular_validation(
	State(state): State<AppState>,
	Json(request): Json<HashSignatureRequest>,
) -> Result<Json<RegularValidationResponse>, APIError> {
	crate::apis::signatures::requires_regular_validation(request, &state.validator).map(Json)
}

async fn handle_order_hash(
	State(state): State<AppState>,
	Json(request): Json<OrderHashRequest>,
) -> Json<OrderHashResponse> {
	Json(crate::apis::signatures::order_hash(request, &state.validator))
}

async fn handle_action(
	State(state): State<AppState>,
	Json(request): Json<ExecuteActionRequest>,
) -> Result<Json<ExecuteActionResponse>, APIError> {
	match crate::apis::registry::execute_action(request, &state.validator).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Action request failed: {}", e);
			Err(e)
		},
	}
}

async fn handle_pre_signed(
	Path((hash, signer)): Path<(String, String)>,
	State(state): State<AppState>,
) -> Result<Json<PreSignedResponse>, APIError> {
	crate::apis::registry::get_pre_signed(&hash, &signer, &state.validator)
		.await
		.map(Json)
}

async fn handle_validator_approval(
	Path((signer, validator)): Path<(String, String)>,
	State(state): State<AppState>,
) -> Result<Json<ApprovalResponse>, APIError> {
	crate::apis::registry::get_validator_approval(&signer, &validator, &state.validator)
		.await
		.map(Json)
}

async fn handle_order_validator_approval(
	Path((signer, validator)): Path<(String, String)>,
	State(state): State<AppState>,
) -> Result<Json<ApprovalResponse>, APIError> {
	crate::apis::registry::get_order_validator_approval(&signer, &validator, &state.validator)
		.await
		.map(Json)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory_registry::build_validator_from_config;
	use axum::body::{to_bytes, Body};
	use axum::http::{Request, StatusCode};
	use sigval_account::implementations::local::LocalWallet;
	use sigval_account::AccountService;
	use sigval_config::ConfigBuilder;
	use sigval_core::actions::RegistryAction;
	use sigval_types::{
		current_timestamp, Address, EcdsaScheme, SignaturePayload, ZeroExTransaction, B256,
	};
	use alloy_primitives::U256;
	use tower::ServiceExt;

	const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn api_config() -> ApiConfig {
		ApiConfig {
			enabled: true,
			host: "127.0.0.1".to_string(),
			port: 3000,
			timeout_seconds: 30,
			max_request_size: 1024 * 1024,
		}
	}

	fn app() -> (Router, Arc<SignatureValidator>) {
		let config = ConfigBuilder::new().max_signature_length(128).build();
		let validator = Arc::new(build_validator_from_config(config).unwrap());
		(router(&api_config(), validator.clone()), validator)
	}

	async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
		let response = app.oneshot(request).await.unwrap();
		let status = response.status();
		let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		(status, serde_json::from_slice(&body).unwrap())
	}

	fn post_json(uri: &str, body: Value) -> Request<Body> {
		Request::builder()
			.method("POST")
			.uri(uri)
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	fn get_request(uri: &str) -> Request<Body> {
		Request::builder().uri(uri).body(Body::empty()).unwrap()
	}

	#[tokio::test]
	async fn test_health() {
		let (app, _) = app();
		let (status, body) = send(app, get_request("/health")).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["status"], "ok");
		assert_eq!(body["chainId"], 1337);
	}

	#[tokio::test]
	async fn test_hash_signature_verdicts() {
		let (app, _) = app();
		let account = AccountService::new(Box::new(LocalWallet::new(KEY).unwrap()));
		let signer = account.get_address().await.unwrap();
		let hash = B256::repeat_byte(0x42);
		let payload = account
			.sign_commitment(EcdsaScheme::EIP712, hash)
			.await
			.unwrap();

		let (status, body) = send(
			app.clone(),
			post_json(
				"/api/signatures/hash",
				json!({
					"hash": hash.to_string(),
					"signerAddress": signer.to_string(),
					"signature": payload.to_string(),
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["isValid"], true);

		let (status, body) = send(
			app,
			post_json(
				"/api/signatures/hash",
				json!({
					"hash": B256::ZERO.to_string(),
					"signerAddress": signer.to_string(),
					"signature": payload.to_string(),
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["isValid"], false);
	}

	#[tokio::test]
	async fn test_rejected_signature_is_unprocessable() {
		let (app, _) = app();
		let (status, body) = send(
			app,
			post_json(
				"/api/signatures/hash",
				json!({
					"hash": B256::ZERO.to_string(),
					"signerAddress": Address::ZERO.to_string(),
					"signature": "0x00",
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["error"], "SIGNATURE_ERROR");
		assert_eq!(body["details"]["kind"], "illegal");
	}

	#[tokio::test]
	async fn test_malformed_requests() {
		let (app, _) = app();
		let (status, _) = send(
			app.clone(),
			post_json(
				"/api/signatures/regular-validation",
				json!({
					"hash": "0x1234",
					"signerAddress": Address::ZERO.to_string(),
					"signature": "0x06",
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);

		let oversized = format!("0x{}", "ab".repeat(129));
		let (status, body) = send(
			app,
			post_json(
				"/api/signatures/hash",
				json!({
					"hash": B256::ZERO.to_string(),
					"signerAddress": Address::ZERO.to_string(),
					"signature": oversized,
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "SIGNATURE_TOO_LONG");
	}

	#[tokio::test]
	async fn test_regular_validation() {
		let (app, _) = app();
		let (status, body) = send(
			app,
			post_json(
				"/api/signatures/regular-validation",
				json!({
					"hash": B256::ZERO.to_string(),
					"signerAddress": Address::ZERO.to_string(),
					"signature": "0x07",
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["requiresRegularValidation"], true);
	}

	#[tokio::test]
	async fn test_signed_action_updates_registry() {
		let (app, validator) = app();
		let account = AccountService::new(Box::new(LocalWallet::new(KEY).unwrap()));
		let signer = account.get_address().await.unwrap();
		let hash = B256::repeat_byte(0x10);

		let transaction = ZeroExTransaction {
			salt: U256::from(1u64),
			expirationTimeSeconds: U256::from(current_timestamp() + 600),
			gasPrice: U256::from(1_000_000_000u64),
			signerAddress: signer,
			data: RegistryAction::PreSign { hash }.encode(),
		};
		let (action_hash, payload) = account
			.sign_transaction(&transaction, validator.domain())
			.await
			.unwrap();

		let uri = format!("/api/presigned/{}/{}", hash, signer);
		let (_, body) = send(app.clone(), get_request(&uri)).await;
		assert_eq!(body["isPreSigned"], false);

		let (status, body) = send(
			app.clone(),
			post_json(
				"/api/actions",
				json!({
					"transaction": transaction,
					"signature": payload.to_string(),
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["transactionHash"], action_hash.to_string());
		assert_eq!(body["event"]["type"], "preSigned");

		let (_, body) = send(app.clone(), get_request(&uri)).await;
		assert_eq!(body["isPreSigned"], true);

		let (_, body) = send(
			app.clone(),
			post_json(
				"/api/signatures/hash",
				json!({
					"hash": hash.to_string(),
					"signerAddress": signer.to_string(),
					"signature": SignaturePayload::pre_signed().to_string(),
				}),
			),
		)
		.await;
		assert_eq!(body["isValid"], true);

		// Replaying the same signed action is refused
		let (status, body) = send(
			app,
			post_json(
				"/api/actions",
				json!({
					"transaction": transaction,
					"signature": payload.to_string(),
				}),
			),
		)
		.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(body["error"], "ACTION_REJECTED");
	}

	#[tokio::test]
	async fn test_approval_lookups() {
		let (app, validator) = app();
		let signer = Address::repeat_byte(1);
		let delegate = Address::repeat_byte(2);
		validator
			.set_order_validator_approval(signer, delegate, true)
			.await
			.unwrap();

		let (_, body) = send(
			app.clone(),
			get_request(&format!("/api/approvals/order-validators/{}/{}", signer, delegate)),
		)
		.await;
		assert_eq!(body["isApproved"], true);

		let (_, body) = send(
			app.clone(),
			get_request(&format!("/api/approvals/validators/{}/{}", signer, delegate)),
		)
		.await;
		assert_eq!(body["isApproved"], false);

		let (status, _) = send(app, get_request("/api/approvals/validators/0xnope/0x00")).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}
}
