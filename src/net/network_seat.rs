use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::net::protocol::{send_to, ServerMessage};
use crate::players::{Channel, PlayerKey, SeatPort, SeatResponse, TurnPrompt};

pub type PendingResponse = Arc<Mutex<Option<oneshot::Sender<SeatResponse>>>>;

/// Seat for a participant connected over TCP. A prompt parks a oneshot
/// sender that the connection thread completes when the answer arrives.
pub struct NetworkSeat {
	key: PlayerKey,
	channel: Arc<dyn Channel>,
	pending: PendingResponse,
}

impl NetworkSeat {
	pub fn new(key: PlayerKey, channel: Arc<dyn Channel>) -> Self {
		Self {
			key,
			channel,
			pending: Arc::new(Mutex::new(None)),
		}
	}

	pub fn pending_sender(&self) -> PendingResponse {
		Arc::clone(&self.pending)
	}
}

#[async_trait]
impl SeatPort for NetworkSeat {
	async fn request_action(&self, prompt: TurnPrompt) -> SeatResponse {
		let (tx, rx) = oneshot::channel();
		*self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);

		send_to(self.channel.as_ref(), &ServerMessage::YourTurn {
			value: prompt.value,
			split_value: prompt.split_value,
			can_split: prompt.can_split,
		});

		// A dropped sender means the connection went away.
		rx.await.unwrap_or(SeatResponse::Leave)
	}

	fn reject(&self, reason: &str) {
		send_to(self.channel.as_ref(), &ServerMessage::Error {
			message: reason.to_string(),
		});
	}

	fn key(&self) -> &PlayerKey {
		&self.key
	}
}

/// Completes the parked prompt, if any. Fails when it is not this seat's turn.
pub fn submit_response(pending: &PendingResponse, response: SeatResponse) -> Result<(), String> {
	let mut guard = pending.lock().unwrap_or_else(|e| e.into_inner());
	match guard.take() {
		Some(tx) => tx.send(response).map_err(|_| "turn already ended".to_string()),
		None => Err("it is not your turn".to_string()),
	}
}
