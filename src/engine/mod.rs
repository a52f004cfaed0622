use serde::{Deserialize, Serialize};

mod game;
mod reveal;
mod runner;
mod turns;

pub use game::GameEngine;
pub use runner::TableRunner;
pub use turns::TurnHandler;

/// Table lifecycle. `Finished` holds settled hands until the round is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
	WaitingForAdmin,
	WaitingForPlayers,
	Playing,
	Finished,
}
