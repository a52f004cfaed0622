use crate::cards::{hand_value, Card, Rank};
use crate::events::GameOption;
use crate::strategy::{DecisionPolicy, SeatView};
use crate::table::TableConfig;

const DEALER_WEAK_BELOW: u32 = 7;
const WEAK_DEALER_STAND: u32 = 12;

/// Fixed table rules: the dealer draws to a threshold, automated players play
/// a simplified basic strategy against the dealer's up card.
#[derive(Debug, Clone, Copy)]
pub struct HouseRules {
	dealer_stands_on: u32,
	ai_stands_on: u32,
}

impl HouseRules {
	pub fn new(dealer_stands_on: u32, ai_stands_on: u32) -> Self {
		Self { dealer_stands_on, ai_stands_on }
	}

	pub fn from_config(config: &TableConfig) -> Self {
		Self::new(config.dealer_stands_on, config.ai_stands_on)
	}

	fn wants_split(cards: &[Card]) -> bool {
		match cards {
			[a, b] => a.rank() == b.rank() && matches!(a.rank(), Rank::Ace | Rank::Eight),
			_ => false,
		}
	}
}

impl Default for HouseRules {
	fn default() -> Self {
		Self::from_config(&TableConfig::default())
	}
}

impl DecisionPolicy for HouseRules {
	fn decide_for_automated(&self, cards: &[Card], others: &[SeatView]) -> GameOption {
		if Self::wants_split(cards) {
			return GameOption::Split;
		}

		// Unknown dealer is treated as strong.
		let dealer_up = SeatView::dealer_up_value(others).unwrap_or(DEALER_WEAK_BELOW);
		let stand_on = if dealer_up >= DEALER_WEAK_BELOW {
			self.ai_stands_on
		} else {
			WEAK_DEALER_STAND
		};

		if hand_value(cards) < stand_on {
			GameOption::Hit
		} else {
			GameOption::Stay
		}
	}

	fn decide_for_dealer(&self, cards: &[Card]) -> GameOption {
		if hand_value(cards) < self.dealer_stands_on {
			GameOption::Hit
		} else {
			GameOption::Stay
		}
	}

	fn name(&self) -> &str {
		"house_rules"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cards::Suit;

	fn card(rank: Rank) -> Card {
		Card::new(rank, Suit::Spades)
	}

	fn dealer_showing(value: u32) -> Vec<SeatView> {
		vec![SeatView {
			key: "AI-DEALER".into(),
			is_dealer: true,
			visible_cards: vec![],
			visible_value: value,
		}]
	}

	#[test]
	fn test_dealer_draws_to_seventeen() {
		let rules = HouseRules::default();
		assert_eq!(rules.decide_for_dealer(&[card(Rank::Ten), card(Rank::Six)]), GameOption::Hit);
		assert_eq!(rules.decide_for_dealer(&[card(Rank::Ten), card(Rank::Seven)]), GameOption::Stay);
		assert_eq!(rules.decide_for_dealer(&[card(Rank::Ace), card(Rank::Six)]), GameOption::Stay);
	}

	#[test]
	fn test_splits_aces_and_eights() {
		let rules = HouseRules::default();
		let others = dealer_showing(10);
		assert_eq!(rules.decide_for_automated(&[card(Rank::Eight), card(Rank::Eight)], &others), GameOption::Split);
		assert_eq!(rules.decide_for_automated(&[card(Rank::Ace), card(Rank::Ace)], &others), GameOption::Split);
		assert_eq!(rules.decide_for_automated(&[card(Rank::Ten), card(Rank::Ten)], &others), GameOption::Stay);
	}

	#[test]
	fn test_plays_against_up_card() {
		let rules = HouseRules::default();
		let thirteen = [card(Rank::Ten), card(Rank::Three)];
		assert_eq!(rules.decide_for_automated(&thirteen, &dealer_showing(10)), GameOption::Hit);
		assert_eq!(rules.decide_for_automated(&thirteen, &dealer_showing(5)), GameOption::Stay);

		let eleven = [card(Rank::Five), card(Rank::Six)];
		assert_eq!(rules.decide_for_automated(&eleven, &dealer_showing(5)), GameOption::Hit);
	}

	#[test]
	fn test_no_dealer_visible() {
		let rules = HouseRules::new(17, 15);
		let fourteen = [card(Rank::Ten), card(Rank::Four)];
		assert_eq!(rules.decide_for_automated(&fourteen, &[]), GameOption::Hit);
		let sixteen = [card(Rank::Ten), card(Rank::Six)];
		assert_eq!(rules.decide_for_automated(&sixteen, &[]), GameOption::Stay);
	}
}
