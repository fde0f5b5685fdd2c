//! Canonical order hashing.

use alloy_primitives::{Address, B256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use sigval_types::{exchange_domain, Order};

/// Computes the commitment an order signature is made over.
pub trait OrderHasher: Send + Sync {
	fn order_hash(&self, order: &Order) -> B256;
}

/// EIP-712 hash under the exchange domain.
pub struct Eip712OrderHasher {
	domain: Eip712Domain,
}

impl Eip712OrderHasher {
	pub fn new(chain_id: u64, exchange: Address) -> Self {
		Self {
			domain: exchange_domain(chain_id, exchange),
		}
	}

	pub fn domain(&self) -> &Eip712Domain {
		&self.domain
	}
}

impl OrderHasher for Eip712OrderHasher {
	fn order_hash(&self, order: &Order) -> B256 {
		order.eip712_signing_hash(&self.domain)
	}
}
