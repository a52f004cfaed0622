use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::cards::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 52;

/// Single 52-card deck dealt from the front. Drawn cards stay out until the
/// next `reset`.
#[derive(Debug, Clone)]
pub struct Deck {
	cards: VecDeque<Card>,
}

impl Deck {
	/// Unshuffled full deck, suit by suit.
	pub fn new() -> Self {
		let mut deck = Self { cards: VecDeque::with_capacity(DECK_SIZE) };
		deck.fill();
		deck
	}

	pub fn shuffled(rng: &mut impl Rng) -> Self {
		let mut deck = Self::new();
		deck.shuffle(rng);
		deck
	}

	fn fill(&mut self) {
		self.cards.clear();
		for suit in Suit::ALL {
			for rank in Rank::ALL {
				self.cards.push_back(Card::new(rank, suit));
			}
		}
	}

	/// Repopulates all 52 cards and shuffles them.
	pub fn reset(&mut self, rng: &mut impl Rng) {
		self.fill();
		self.shuffle(rng);
	}

	pub fn shuffle(&mut self, rng: &mut impl Rng) {
		self.cards.make_contiguous().shuffle(rng);
	}

	/// `None` once the deck is exhausted.
	pub fn draw(&mut self) -> Option<Card> {
		self.cards.pop_front()
	}

	pub fn remaining(&self) -> usize {
		self.cards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cards.is_empty()
	}

	#[cfg(test)]
	pub fn contains(&self, card: &Card) -> bool {
		self.cards.contains(card)
	}
}

impl Default for Deck {
	fn default() -> Self {
		Self::new()
	}
}
