use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GameError, GameResult};
use crate::players::{Player, PlayerKey};

/// Per-round serving order: real participants, then automated seats, then
/// the dealer. Consumed one key at a time.
#[derive(Debug, Default)]
pub struct TurnHandler {
	ordering: Option<VecDeque<PlayerKey>>,
}

impl TurnHandler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn initialize_new_round<'a>(
		&mut self,
		players: impl IntoIterator<Item = &'a Player>,
		rng: &mut impl Rng,
	) -> GameResult<()> {
		let mut real = Vec::new();
		let mut automated = Vec::new();
		let mut dealers = Vec::new();

		for player in players {
			let key = player.key().clone();
			if player.is_real() {
				real.push(key);
			} else if player.is_dealer() {
				dealers.push(key);
			} else {
				automated.push(key);
			}
		}

		if dealers.len() != 1 {
			return Err(GameError::DealerNotUnique(dealers.len()));
		}

		real.shuffle(rng);
		automated.shuffle(rng);

		let mut ordering = VecDeque::with_capacity(real.len() + automated.len() + 1);
		ordering.extend(real);
		ordering.extend(automated);
		ordering.extend(dealers);
		self.ordering = Some(ordering);
		Ok(())
	}

	pub fn next_player(&mut self) -> GameResult<PlayerKey> {
		self.ordering
			.as_mut()
			.and_then(|ordering| ordering.pop_front())
			.ok_or(GameError::TurnOrderExhausted)
	}

	pub fn requires_reinitialization(&self) -> bool {
		self.ordering.as_ref().is_none_or(|ordering| ordering.is_empty())
	}

	pub fn remaining(&self) -> usize {
		self.ordering.as_ref().map_or(0, |ordering| ordering.len())
	}

	pub fn clear(&mut self) {
		self.ordering = None;
	}
}
