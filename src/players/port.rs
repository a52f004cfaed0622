use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::events::GameOption;
use crate::players::PlayerKey;

/// Where a real participant's choices come from.
#[async_trait]
pub trait SeatPort: Send + Sync {
	async fn request_action(&self, prompt: TurnPrompt) -> SeatResponse;

	/// Tells the participant their last choice was refused.
	fn reject(&self, reason: &str);

	fn key(&self) -> &PlayerKey;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPrompt {
	pub player: PlayerKey,
	pub value: u32,
	#[serde(default)]
	pub split_value: Option<u32>,
	pub can_split: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeatResponse {
	Action {
		option: GameOption,
		split_hand: bool,
	},
	Leave,
	Timeout,
}
