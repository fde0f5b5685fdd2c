//! Per-scheme verification.
//!
//! [`SchemeVerifier`] owns the two capabilities a scheme may need: the
//! registries and the delegate call backend. Hash-only schemes live in
//! [`hash`], order-aware ones in [`order`].

use crate::error::ValidatorError;
use crate::registry::SignatureRegistry;
use alloy_primitives::{Address, Bytes};
use sigval_delegate::{DelegateService, StaticCallResult};
use std::sync::Arc;

pub mod ecdsa;
pub mod hash;
pub mod order;

pub struct SchemeVerifier {
	registry: Arc<SignatureRegistry>,
	delegate: Arc<DelegateService>,
}

impl SchemeVerifier {
	pub fn new(registry: Arc<SignatureRegistry>, delegate: Arc<DelegateService>) -> Self {
		Self { registry, delegate }
	}

	/// Issues one read-only delegate call. Only transport failures are
	/// errors; a reverting delegate is a normal outcome.
	async fn call(
		&self,
		target: Address,
		calldata: Bytes,
	) -> Result<StaticCallResult, ValidatorError> {
		self.delegate
			.static_call(target, calldata)
			.await
			.map_err(|e| ValidatorError::Delegate(e.to_string()))
	}
}

/// Splits `inner ‖ delegate ‖ tag` into the inner signature and the
/// delegate address. `None` when the payload is too short to carry one.
fn split_delegate(signature: &[u8]) -> Option<(&[u8], Address)> {
	let len = signature.len();
	if len < sigval_types::DELEGATE_SUFFIX_LENGTH {
		return None;
	}
	let split = len - sigval_types::DELEGATE_SUFFIX_LENGTH;
	Some((
		&signature[..split],
		Address::from_slice(&signature[split..len - 1]),
	))
}

/// The payload without its type tag.
fn strip_tag(signature: &[u8]) -> &[u8] {
	&signature[..signature.len().saturating_sub(1)]
}
