use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::events::GameOption;
use crate::players::port::{SeatPort, SeatResponse, TurnPrompt};
use crate::players::PlayerKey;

/// Seat that replays a fixed list of options, then falls back to a default.
pub struct ScriptedSeat {
	key: PlayerKey,
	scripted: Mutex<VecDeque<SeatResponse>>,
	default_option: GameOption,
	prompts: Mutex<Vec<TurnPrompt>>,
	rejections: Mutex<Vec<String>>,
}

impl ScriptedSeat {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: PlayerKey(key.into()),
			scripted: Mutex::new(VecDeque::new()),
			default_option: GameOption::Stay,
			prompts: Mutex::new(Vec::new()),
			rejections: Mutex::new(Vec::new()),
		}
	}

	pub fn with_options(self, options: Vec<GameOption>) -> Self {
		let responses = options.into_iter()
			.map(|option| SeatResponse::Action { option, split_hand: false })
			.collect();
		self.with_responses(responses)
	}

	pub fn with_responses(mut self, responses: Vec<SeatResponse>) -> Self {
		self.scripted = Mutex::new(responses.into());
		self
	}

	pub fn with_default(mut self, option: GameOption) -> Self {
		self.default_option = option;
		self
	}

	pub fn prompts(&self) -> Vec<TurnPrompt> {
		self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}

	pub fn rejections(&self) -> Vec<String> {
		self.rejections.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}
}

#[async_trait]
impl SeatPort for ScriptedSeat {
	async fn request_action(&self, prompt: TurnPrompt) -> SeatResponse {
		self.prompts.lock().unwrap_or_else(|e| e.into_inner()).push(prompt);
		self.scripted
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.pop_front()
			.unwrap_or(SeatResponse::Action {
				option: self.default_option,
				split_hand: false,
			})
	}

	fn reject(&self, reason: &str) {
		self.rejections.lock().unwrap_or_else(|e| e.into_inner()).push(reason.to_string());
	}

	fn key(&self) -> &PlayerKey {
		&self.key
	}
}
