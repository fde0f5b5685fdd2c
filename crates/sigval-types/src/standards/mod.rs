//! Protocol-specific ABI types.
//!
//! - **exchange**: order record, delegate verification interfaces, rich
//!   revert errors and the signed-action envelope

pub mod exchange;

pub use exchange::{exchange_domain, Order, SignatureErrorCode, ZeroExTransaction};
