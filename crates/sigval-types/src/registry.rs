//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Each pluggable backend (storage, delegate caller, account) provides a
/// `Registry` struct implementing this trait, tying the name used under
/// `implementations.<name>` in the configuration to its factory function.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// for example "memory" for `storage.implementations.memory` or "evm" for
	/// `delegate.implementations.evm`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
