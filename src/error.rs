use thiserror::Error;

use crate::engine::GameState;
use crate::players::PlayerKey;

#[derive(Debug, Error)]
pub enum GameError {
	#[error("expected exactly one admin, found {0}")]
	AdminNotUnique(usize),

	#[error("expected exactly one dealer, found {0}")]
	DealerNotUnique(usize),

	#[error("no players remaining in the turn order")]
	TurnOrderExhausted,

	#[error("can't split a split hand")]
	SplitOfSplit,

	#[error("hand is not a splittable pair")]
	CannotSplit,

	#[error("hand has no split sub-hand")]
	NoSplitHand,

	#[error("unknown option '{0}'")]
	InvalidOption(String),

	#[error("player {0} is not seated at this table")]
	UnknownPlayer(PlayerKey),

	#[error("player {0} is not an automated player")]
	NotAutomated(PlayerKey),

	#[error("operation requires a round in play, table is {0:?}")]
	NotPlaying(GameState),

	#[error("config error: {0}")]
	Config(String),

	#[error("protocol error: {0}")]
	Protocol(#[from] serde_json::Error),
}

impl GameError {
	/// Errors caused by what a real participant asked for, which a caller can
	/// answer by asking again instead of abandoning the round.
	pub fn is_player_mistake(&self) -> bool {
		matches!(
			self,
			GameError::SplitOfSplit
				| GameError::CannotSplit
				| GameError::NoSplitHand
				| GameError::InvalidOption(_)
		)
	}
}

pub type GameResult<T> = Result<T, GameError>;
