use crate::cards::Card;
use crate::events::GameOption;
use crate::players::PlayerKey;

/// What an automated participant may see of another seat.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatView {
	pub key: PlayerKey,
	pub is_dealer: bool,
	pub visible_cards: Vec<Card>,
	pub visible_value: u32,
}

impl SeatView {
	pub fn dealer_up_value<'a>(views: impl IntoIterator<Item = &'a SeatView>) -> Option<u32> {
		views.into_iter()
			.find(|v| v.is_dealer)
			.map(|v| v.visible_value)
	}
}

pub trait DecisionPolicy: Send + Sync {
	fn decide_for_automated(&self, cards: &[Card], others: &[SeatView]) -> GameOption;

	fn decide_for_dealer(&self, cards: &[Card]) -> GameOption;

	fn name(&self) -> &str {
		"policy"
	}
}
