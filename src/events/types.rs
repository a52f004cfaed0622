use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;
use crate::players::PlayerKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOption {
	Hit,
	Stay,
	Split,
}

impl GameOption {
	pub fn description(&self) -> &'static str {
		match self {
			GameOption::Hit => "hits",
			GameOption::Stay => "stays",
			GameOption::Split => "splits",
		}
	}
}

impl fmt::Display for GameOption {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GameOption::Hit => write!(f, "HIT"),
			GameOption::Stay => write!(f, "STAY"),
			GameOption::Split => write!(f, "SPLIT"),
		}
	}
}

/// Options arrive from clients as text; anything unrecognised is an invalid
/// argument.
impl FromStr for GameOption {
	type Err = GameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"hit" => Ok(GameOption::Hit),
			"stay" | "stand" => Ok(GameOption::Stay),
			"split" => Ok(GameOption::Split),
			_ => Err(GameError::InvalidOption(s.to_string())),
		}
	}
}

/// One display event in the per-participant reveal sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandMessage {
	DealingCards,
	AddPlayerCard {
		card: String,
	},
	PlayerValue {
		value: u32,
	},
	AddDealerCard {
		card: String,
	},
	DealerValue {
		value: u32,
	},
	AddOtherPlayerCard {
		card: String,
		index: usize,
		owner: PlayerKey,
	},
	OtherValue {
		index: usize,
		value: u32,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
	Win,
	Lose,
	Push,
}

impl Outcome {
	/// Compares a finished hand against the dealer's.
	pub fn settle(value: u32, bust: bool, dealer_value: u32, dealer_bust: bool) -> Self {
		if bust {
			Outcome::Lose
		} else if dealer_bust || value > dealer_value {
			Outcome::Win
		} else if value < dealer_value {
			Outcome::Lose
		} else {
			Outcome::Push
		}
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Outcome::Win => write!(f, "win"),
			Outcome::Lose => write!(f, "lose"),
			Outcome::Push => write!(f, "push"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
	pub player: PlayerKey,
	pub value: u32,
	pub outcome: Outcome,
	#[serde(default)]
	pub split_value: Option<u32>,
	#[serde(default)]
	pub split_outcome: Option<Outcome>,
}
