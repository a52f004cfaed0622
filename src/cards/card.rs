use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
	Clubs,
	Diamonds,
	Hearts,
	Spades,
}

impl Suit {
	pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

	pub fn symbol(&self) -> &'static str {
		match self {
			Suit::Clubs => "♣",
			Suit::Diamonds => "♦",
			Suit::Hearts => "♥",
			Suit::Spades => "♠",
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Suit::Clubs => "clubs",
			Suit::Diamonds => "diams",
			Suit::Hearts => "hearts",
			Suit::Spades => "spades",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
	Two = 2,
	Three,
	Four,
	Five,
	Six,
	Seven,
	Eight,
	Nine,
	Ten,
	Jack,
	Queen,
	King,
	Ace,
}

impl Rank {
	pub const ALL: [Rank; 13] = [
		Rank::Two,
		Rank::Three,
		Rank::Four,
		Rank::Five,
		Rank::Six,
		Rank::Seven,
		Rank::Eight,
		Rank::Nine,
		Rank::Ten,
		Rank::Jack,
		Rank::Queen,
		Rank::King,
		Rank::Ace,
	];

	/// Scoring value. Face cards count 10 and an ace counts 11; the soft-ace
	/// reduction is applied at the hand level.
	pub fn value(&self) -> u32 {
		match self {
			Rank::Jack | Rank::Queen | Rank::King => 10,
			Rank::Ace => 11,
			r => *r as u32,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Rank::Two => "2",
			Rank::Three => "3",
			Rank::Four => "4",
			Rank::Five => "5",
			Rank::Six => "6",
			Rank::Seven => "7",
			Rank::Eight => "8",
			Rank::Nine => "9",
			Rank::Ten => "10",
			Rank::Jack => "J",
			Rank::Queen => "Q",
			Rank::King => "K",
			Rank::Ace => "A",
		}
	}
}

/// A playing card. Rank and suit never change; only the hidden flag does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
	rank: Rank,
	suit: Suit,
	hidden: bool,
}

impl Card {
	pub const fn new(rank: Rank, suit: Suit) -> Self {
		Self { rank, suit, hidden: false }
	}

	pub const fn hidden(rank: Rank, suit: Suit) -> Self {
		Self { rank, suit, hidden: true }
	}

	pub const fn rank(&self) -> Rank {
		self.rank
	}

	pub const fn suit(&self) -> Suit {
		self.suit
	}

	pub const fn is_hidden(&self) -> bool {
		self.hidden
	}

	pub fn set_hidden(&mut self, hidden: bool) {
		self.hidden = hidden;
	}

	/// Face-up copy, used when showing a participant their own hole card.
	pub fn revealed(&self) -> Card {
		Card { hidden: false, ..*self }
	}
}

// Identity is rank and suit; visibility is presentation state.
impl PartialEq for Card {
	fn eq(&self, other: &Self) -> bool {
		self.rank == other.rank && self.suit == other.suit
	}
}

impl Eq for Card {}

impl fmt::Display for Card {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} of {:?}", self.rank, self.suit)
	}
}
