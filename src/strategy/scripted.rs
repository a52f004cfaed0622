use std::collections::VecDeque;
use std::sync::Mutex;

use crate::cards::Card;
use crate::events::GameOption;
use crate::strategy::{DecisionPolicy, SeatView};

/// Answers from a queue; once empty every seat stays.
pub struct ScriptedPolicy {
	automated: Mutex<VecDeque<GameOption>>,
	dealer: Mutex<VecDeque<GameOption>>,
	seen: Mutex<Vec<usize>>,
}

impl ScriptedPolicy {
	pub fn new(automated: Vec<GameOption>, dealer: Vec<GameOption>) -> Self {
		Self {
			automated: Mutex::new(automated.into()),
			dealer: Mutex::new(dealer.into()),
			seen: Mutex::new(Vec::new()),
		}
	}

	pub fn always_stay() -> Self {
		Self::new(Vec::new(), Vec::new())
	}

	/// Number of other seats visible at each automated decision.
	pub fn seen_others(&self) -> Vec<usize> {
		self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}

	fn pop(queue: &Mutex<VecDeque<GameOption>>) -> GameOption {
		queue
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.pop_front()
			.unwrap_or(GameOption::Stay)
	}
}

impl DecisionPolicy for ScriptedPolicy {
	fn decide_for_automated(&self, _cards: &[Card], others: &[SeatView]) -> GameOption {
		self.seen.lock().unwrap_or_else(|e| e.into_inner()).push(others.len());
		Self::pop(&self.automated)
	}

	fn decide_for_dealer(&self, _cards: &[Card]) -> GameOption {
		Self::pop(&self.dealer)
	}

	fn name(&self) -> &str {
		"scripted"
	}
}
