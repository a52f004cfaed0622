use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::error::{GameError, GameResult};

pub const BLACKJACK: u32 = 21;

/// Sum of rank values, with aces dropping from 11 to 1 while the total is
/// over 21.
pub fn hand_value<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
	let mut value = 0;
	let mut soft_aces = 0;
	for card in cards {
		value += card.rank().value();
		if card.rank() == Rank::Ace {
			soft_aces += 1;
		}
	}
	while value > BLACKJACK && soft_aces > 0 {
		value -= 10;
		soft_aces -= 1;
	}
	value
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
	cards: Vec<Card>,
	split: Option<Vec<Card>>,
}

impl Hand {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_card(&mut self, card: Card) {
		self.cards.push(card);
	}

	pub fn add_split_card(&mut self, card: Card) {
		self.split.get_or_insert_with(Vec::new).push(card);
	}

	pub fn cards(&self) -> &[Card] {
		&self.cards
	}

	pub fn split_cards(&self) -> Option<&[Card]> {
		self.split.as_deref()
	}

	pub fn is_split(&self) -> bool {
		self.split.is_some()
	}

	pub fn len(&self) -> usize {
		self.cards.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cards.is_empty()
	}

	pub fn value(&self) -> u32 {
		hand_value(&self.cards)
	}

	/// Value of the face-up cards only, as other participants see it.
	pub fn visible_value(&self) -> u32 {
		hand_value(self.cards.iter().filter(|c| !c.is_hidden()))
	}

	pub fn split_value(&self) -> Option<u32> {
		self.split.as_ref().map(|cards| hand_value(cards))
	}

	pub fn is_bust(&self) -> bool {
		self.value() > BLACKJACK
	}

	pub fn is_split_bust(&self) -> bool {
		self.split_value().is_some_and(|v| v > BLACKJACK)
	}

	/// A two-card pair that has not been split yet.
	pub fn can_split(&self) -> bool {
		!self.is_split() && self.cards.len() == 2 && self.cards[0].rank() == self.cards[1].rank()
	}

	/// Moves the second card of a pair into the split sub-hand. Only one level
	/// of splitting exists.
	pub fn split(&mut self) -> GameResult<()> {
		if self.is_split() {
			return Err(GameError::SplitOfSplit);
		}
		if !self.can_split() {
			return Err(GameError::CannotSplit);
		}
		let second = self.cards.remove(1);
		self.split = Some(vec![second]);
		Ok(())
	}

	pub fn reveal_all(&mut self) {
		self.cards.iter_mut()
			.chain(self.split.iter_mut().flatten())
			.for_each(|c| c.set_hidden(false));
	}

	pub fn clear(&mut self) {
		self.cards.clear();
		self.split = None;
	}

	/// True when every card of `other` is also held here. One-directional:
	/// `a.covers(&b)` does not imply `b.covers(&a)`.
	pub fn covers(&self, other: &Hand) -> bool {
		other.cards.iter().all(|c| self.cards.contains(c))
	}
}
