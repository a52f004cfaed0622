use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::cards::Hand;
use crate::events::GameOption;
use crate::players::{Channel, ChannelId};

/// Registry key: the channel id of a real participant, or a synthesized
/// name such as `AI-1243513` / `AI-DEALER`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerKey(pub String);

impl PlayerKey {
	pub const UNRESOLVED: &'static str = "Invalid UID";

	pub fn unresolved() -> Self {
		Self(Self::UNRESOLVED.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PlayerKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PlayerKey {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<&ChannelId> for PlayerKey {
	fn from(id: &ChannelId) -> Self {
		Self(id.0.clone())
	}
}

#[derive(Clone)]
pub enum Role {
	Real(Arc<dyn Channel>),
	Automated,
	Dealer,
}

impl fmt::Debug for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Real(channel) => write!(f, "Real({})", channel.id()),
			Role::Automated => write!(f, "Automated"),
			Role::Dealer => write!(f, "Dealer"),
		}
	}
}

/// A seated participant. Real, automated and dealer seats share one record
/// and are told apart by `role`.
#[derive(Debug, Clone)]
pub struct Player {
	key: PlayerKey,
	hand: Hand,
	role: Role,
	is_admin: bool,
	last_option: Option<GameOption>,
	stayed: bool,
	split_stayed: bool,
}

impl Player {
	pub fn real(channel: Arc<dyn Channel>) -> Self {
		Self::with_role(PlayerKey::from(&channel.id()), Role::Real(channel))
	}

	pub fn automated(key: PlayerKey) -> Self {
		Self::with_role(key, Role::Automated)
	}

	pub fn dealer(key: PlayerKey) -> Self {
		Self::with_role(key, Role::Dealer)
	}

	fn with_role(key: PlayerKey, role: Role) -> Self {
		Self {
			key,
			hand: Hand::new(),
			role,
			is_admin: false,
			last_option: None,
			stayed: false,
			split_stayed: false,
		}
	}

	pub fn key(&self) -> &PlayerKey {
		&self.key
	}

	pub fn hand(&self) -> &Hand {
		&self.hand
	}

	pub fn hand_mut(&mut self) -> &mut Hand {
		&mut self.hand
	}

	pub fn role(&self) -> &Role {
		&self.role
	}

	pub fn is_real(&self) -> bool {
		matches!(self.role, Role::Real(_))
	}

	pub fn is_dealer(&self) -> bool {
		matches!(self.role, Role::Dealer)
	}

	/// Real participants and automated non-dealer seats.
	pub fn is_contender(&self) -> bool {
		!self.is_dealer()
	}

	pub fn is_admin(&self) -> bool {
		self.is_admin
	}

	pub fn set_admin(&mut self, admin: bool) {
		self.is_admin = admin;
	}

	pub fn channel(&self) -> Option<&Arc<dyn Channel>> {
		match &self.role {
			Role::Real(channel) => Some(channel),
			_ => None,
		}
	}

	pub fn last_option(&self) -> Option<GameOption> {
		self.last_option
	}

	/// Records an applied option. A stay closes only the hand it was played
	/// on.
	pub fn record_option(&mut self, option: GameOption, is_split_hand: bool) {
		self.last_option = Some(option);
		if option == GameOption::Stay {
			if is_split_hand {
				self.split_stayed = true;
			} else {
				self.stayed = true;
			}
		}
	}

	pub fn hand_done(&self) -> bool {
		self.stayed || self.hand.is_bust()
	}

	/// True when there is no split sub-hand or it has stayed or bust.
	pub fn split_hand_done(&self) -> bool {
		!self.hand.is_split() || self.split_stayed || self.hand.is_split_bust()
	}

	/// Both hands finished; the round driver stops serving finished players.
	pub fn is_done(&self) -> bool {
		self.hand_done() && self.split_hand_done()
	}

	pub fn reset_for_round(&mut self) {
		self.hand.clear();
		self.last_option = None;
		self.stayed = false;
		self.split_stayed = false;
	}
}

impl PartialEq for Player {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Player {}
