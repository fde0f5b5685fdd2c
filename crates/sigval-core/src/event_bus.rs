//! Broadcast channel for registry events.

use sigval_types::ValidatorEvent;
use tokio::sync::broadcast;

/// Fan-out of [`ValidatorEvent`]s to any number of subscribers.
///
/// Publishing with no subscribers is not an error for callers; they ignore
/// the result with `.ok()`.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<ValidatorEvent>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ValidatorEvent> {
		self.sender.subscribe()
	}

	/// Returns the number of subscribers that received the event.
	pub fn publish(
		&self,
		event: ValidatorEvent,
	) -> Result<usize, broadcast::error::SendError<ValidatorEvent>> {
		self.sender.send(event)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{Address, B256};

	#[tokio::test]
	async fn test_subscribers_receive_events() {
		let bus = EventBus::new(8);
		assert!(bus
			.publish(ValidatorEvent::PreSigned {
				hash: B256::ZERO,
				signer_address: Address::ZERO,
			})
			.is_err());

		let mut receiver = bus.subscribe();
		let event = ValidatorEvent::SignatureValidatorApproval {
			signer_address: Address::repeat_byte(1),
			validator_address: Address::repeat_byte(2),
			approved: true,
		};
		assert_eq!(bus.publish(event.clone()).unwrap(), 1);
		assert_eq!(receiver.recv().await.unwrap(), event);
	}
}
