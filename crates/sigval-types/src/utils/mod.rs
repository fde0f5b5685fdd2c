//! Utility functions for common type conversions and transformations.

pub mod conversion;
pub mod formatting;
pub mod helpers;

pub use conversion::{parse_address, parse_b256, parse_bytes};
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
pub use helpers::current_timestamp;
