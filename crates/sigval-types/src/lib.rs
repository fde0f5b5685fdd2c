//! Common types for the exchange signature validator.
//!
//! This crate defines the signature type tags and payload layout, the
//! exchange ABI definitions, events, storage namespaces, API types and the
//! configuration validation framework shared by every other crate.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Events emitted on registry changes.
pub mod events;
/// Base trait for self-registering implementations.
pub mod registry;
/// Signature type tags, decoded schemes and payload builders.
pub mod signature;
/// Protocol ABI definitions.
pub mod standards;
/// Storage namespaces.
pub mod storage;
/// Hex parsing and formatting helpers.
pub mod utils;
/// Configuration validation types.
pub mod validation;

// Protocol primitives used throughout the workspace
pub use alloy_primitives::{Address, Bytes, B256};

pub use api::*;
pub use events::*;
pub use registry::ImplementationRegistry;
pub use signature::*;
pub use standards::{exchange_domain, Order, SignatureErrorCode, ZeroExTransaction};
pub use storage::*;
pub use utils::{
	current_timestamp, parse_address, parse_b256, parse_bytes, truncate_id, with_0x_prefix,
	without_0x_prefix,
};
pub use validation::*;
