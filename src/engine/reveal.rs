use std::collections::BTreeMap;

use crate::engine::GameEngine;
use crate::error::GameResult;
use crate::events::HandMessage;
use crate::players::{Player, PlayerKey};

impl GameEngine {
	/// Builds, for every real participant, the messages that redraw the table
	/// from their point of view: own hand face up, the dealer's exposed cards,
	/// then every other contender tagged with a 1-based seat index.
	pub fn build_hand_messages(&self) -> GameResult<BTreeMap<PlayerKey, Vec<HandMessage>>> {
		let dealer = self.dealer()?;

		let mut messages = BTreeMap::new();
		for player in self.players.values().filter(|p| p.is_real()) {
			let mut out = vec![HandMessage::DealingCards];

			for card in player.hand().cards() {
				out.push(HandMessage::AddPlayerCard {
					card: self.format.render(&card.revealed()),
				});
			}
			out.push(HandMessage::PlayerValue {
				value: player.hand().value(),
			});

			for card in dealer.hand().cards().iter().filter(|c| !c.is_hidden()) {
				out.push(HandMessage::AddDealerCard {
					card: self.format.render(card),
				});
			}
			out.push(HandMessage::DealerValue {
				value: dealer.hand().visible_value(),
			});

			let others = self.players
				.values()
				.filter(|other| other.key() != player.key() && other.is_contender());
			for (i, other) in others.enumerate() {
				self.push_other(&mut out, other, i + 1);
			}

			messages.insert(player.key().clone(), out);
		}

		Ok(messages)
	}

	fn push_other(&self, out: &mut Vec<HandMessage>, other: &Player, index: usize) {
		for card in other.hand().cards() {
			out.push(HandMessage::AddOtherPlayerCard {
				card: self.format.render(card),
				index,
				owner: other.key().clone(),
			});
		}
		out.push(HandMessage::OtherValue {
			index,
			value: other.hand().visible_value(),
		});
	}
}
