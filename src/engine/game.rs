use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cards::{CardFormat, Deck};
use crate::engine::{GameState, TurnHandler};
use crate::error::{GameError, GameResult};
use crate::events::{GameOption, Outcome, RoundResult};
use crate::logging;
use crate::players::{Channel, ChannelId, Player, PlayerKey};
use crate::strategy::{DecisionPolicy, HouseRules, SeatView};
use crate::table::TableConfig;

/// One table: lifecycle, registry, deck and turn order. Not internally
/// synchronised; callers drive it from a single flow at a time.
pub struct GameEngine {
	config: TableConfig,
	state: GameState,
	round_players: Option<usize>,
	pub(super) players: BTreeMap<PlayerKey, Player>,
	ai_counter: u64,
	deck: Deck,
	turns: TurnHandler,
	policy: Box<dyn DecisionPolicy>,
	pub(super) format: Box<dyn CardFormat>,
	rng: StdRng,
}

impl GameEngine {
	pub fn new(config: TableConfig) -> Self {
		let mut rng = match config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => StdRng::from_os_rng(),
		};
		let deck = Deck::shuffled(&mut rng);

		Self {
			policy: Box::new(HouseRules::from_config(&config)),
			format: config.card_format.formatter(),
			ai_counter: config.ai_counter_start,
			config,
			state: GameState::WaitingForAdmin,
			round_players: None,
			players: BTreeMap::new(),
			deck,
			turns: TurnHandler::new(),
			rng,
		}
	}

	pub fn with_policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
		self.policy = policy;
		self
	}

	pub fn with_format(mut self, format: Box<dyn CardFormat>) -> Self {
		self.format = format;
		self
	}

	pub fn config(&self) -> &TableConfig {
		&self.config
	}

	pub fn state(&self) -> GameState {
		self.state
	}

	pub fn set_state(&mut self, state: GameState) {
		self.state = state;
	}

	pub fn round_players(&self) -> usize {
		self.round_players.unwrap_or(self.config.max_players)
	}

	pub fn deck_remaining(&self) -> usize {
		self.deck.remaining()
	}

	// Lobby

	/// Sets the real-player target for the coming round. Calling it again
	/// overwrites the previous target.
	pub fn open_lobby(&mut self, requested: usize) {
		let target = self.config.clamp_players(requested);
		self.round_players = Some(target);
		self.state = GameState::WaitingForPlayers;
		logging::engine::lobby_opened(requested, target);
	}

	pub fn ready_to_start(&self) -> bool {
		let required = self.round_players();
		logging::engine::ready_check(self.players.len(), required);
		self.players.len() == required
	}

	/// Seats a real participant for `Some(channel)`, or a freshly named
	/// automated one for `None`. The first real participant into an empty
	/// table becomes admin.
	pub fn register_player(&mut self, channel: Option<Arc<dyn Channel>>) -> bool {
		if self.players.len() >= self.config.max_players {
			logging::engine::table_full(self.config.max_players);
			return false;
		}

		let player = match channel {
			Some(channel) => {
				let mut player = Player::real(channel);
				if self.players.is_empty() {
					player.set_admin(true);
				}
				player
			}
			None => {
				let key = self.next_ai_key();
				Player::automated(key)
			}
		};

		if self.players.contains_key(player.key()) {
			return false;
		}

		if player.is_real() {
			logging::engine::player_added(player.key().as_str(), player.is_admin());
		} else {
			logging::engine::ai_added(player.key().as_str());
		}
		self.players.insert(player.key().clone(), player);
		true
	}

	/// Fills the table up to its maximum with automated players for the
	/// current target, then seats the dealer. Returns how many automated
	/// players were added.
	pub fn register_ai(&mut self) -> usize {
		let needed = self.config.max_players.saturating_sub(self.round_players());
		let added = (0..needed).filter(|_| self.register_player(None)).count();
		self.register_dealer();
		added
	}

	pub fn register_dealer(&mut self) -> bool {
		let key = PlayerKey(self.config.dealer_key.clone());
		if self.players.contains_key(&key) {
			return false;
		}
		logging::engine::dealer_added(key.as_str());
		self.players.insert(key.clone(), Player::dealer(key));
		true
	}

	pub fn deregister_player(&mut self, channel: &ChannelId) -> bool {
		self.remove_player(&PlayerKey::from(channel))
	}

	/// Removes any seat by key. When the admin leaves, the real participant
	/// with the lowest key inherits the role.
	pub fn remove_player(&mut self, key: &PlayerKey) -> bool {
		let Some(removed) = self.players.remove(key) else {
			return false;
		};
		logging::engine::player_removed(key.as_str());

		if removed.is_admin() {
			if let Some(next) = self.players.values_mut().find(|p| p.is_real()) {
				next.set_admin(true);
				logging::engine::admin_promoted(next.key().as_str());
			}
		}
		true
	}

	/// Drops every automated seat, dealer included.
	pub fn deregister_ai(&mut self) -> bool {
		let before = self.players.len();
		self.players.retain(|key, player| {
			if player.is_real() {
				true
			} else {
				logging::engine::player_removed(key.as_str());
				false
			}
		});
		self.players.len() < before
	}

	fn next_ai_key(&mut self) -> PlayerKey {
		self.ai_counter += 1;
		PlayerKey(format!("{}-{}", self.config.ai_prefix, self.ai_counter))
	}

	// Round

	/// Starts play: every seat gets a fresh two-card hand, first card face
	/// down.
	pub fn deal_initial_hands(&mut self) {
		self.state = GameState::Playing;
		self.turns.clear();

		for player in self.players.values_mut() {
			player.reset_for_round();
			for i in 0..2 {
				match self.deck.draw() {
					Some(mut card) => {
						card.set_hidden(i == 0);
						player.hand_mut().add_card(card);
					}
					None => logging::engine::deck_exhausted(player.key().as_str()),
				}
			}
			let dealt: Vec<String> = player.hand().cards().iter().map(|c| c.to_string()).collect();
			logging::engine::dealt(player.key().as_str(), &dealt.join(", "));
		}
	}

	/// Next seat to act, rebuilding the turn order when it runs out. Fails
	/// with `NotPlaying` outside a round.
	pub fn next_player(&mut self) -> GameResult<PlayerKey> {
		self.require_playing()?;
		if self.turns.requires_reinitialization() {
			self.turns.initialize_new_round(self.players.values(), &mut self.rng)?;
		}
		let key = self.turns.next_player()?;
		logging::engine::turn(key.as_str(), self.turns.remaining());
		Ok(key)
	}

	/// Applies `option` to the seat's primary hand, or to its split sub-hand
	/// when `is_split_hand` is set. Only valid while a round is in play;
	/// `NotPlaying` otherwise. A hit against an empty deck is logged and
	/// dropped.
	pub fn perform_option(&mut self, key: &PlayerKey, option: GameOption, is_split_hand: bool) -> GameResult<()> {
		self.require_playing()?;
		let player = self.players
			.get_mut(key)
			.ok_or_else(|| GameError::UnknownPlayer(key.clone()))?;

		match option {
			GameOption::Hit => {
				if is_split_hand && !player.hand().is_split() {
					return Err(GameError::NoSplitHand);
				}
				match self.deck.draw() {
					Some(card) => {
						logging::engine::drew(key.as_str(), &card.to_string());
						if is_split_hand {
							player.hand_mut().add_split_card(card);
						} else {
							player.hand_mut().add_card(card);
						}
					}
					None => logging::engine::deck_exhausted(key.as_str()),
				}
			}
			GameOption::Stay => {}
			GameOption::Split => {
				if is_split_hand {
					return Err(GameError::SplitOfSplit);
				}
				player.hand_mut().split()?;
			}
		}

		player.record_option(option, is_split_hand);
		logging::engine::option(key.as_str(), option.description(), is_split_hand);
		Ok(())
	}

	/// Plays one turn for an automated seat through the decision policy,
	/// including a second decision for its split sub-hand. Hands that have
	/// already stayed or bust are not asked again; the returned option is the
	/// one applied to the primary hand, `Stay` when it was already finished.
	pub fn do_ai_turn(&mut self, key: &PlayerKey) -> GameResult<GameOption> {
		self.require_playing()?;
		let player = self.players
			.get(key)
			.ok_or_else(|| GameError::UnknownPlayer(key.clone()))?;
		if player.is_real() {
			return Err(GameError::NotAutomated(key.clone()));
		}

		let others = self.seat_views_except(key);
		let option = if player.hand_done() {
			GameOption::Stay
		} else {
			let (option, source) = if player.is_dealer() {
				(self.policy.decide_for_dealer(player.hand().cards()), "dealer")
			} else {
				(self.policy.decide_for_automated(player.hand().cards(), &others), self.policy.name())
			};
			logging::ai::decision(key.as_str(), source, &option.to_string());

			let option = if option == GameOption::Split && !player.hand().can_split() {
				logging::ai::split_refused(key.as_str());
				GameOption::Stay
			} else {
				option
			};
			self.perform_option(key, option, false)?;
			option
		};

		if option != GameOption::Split {
			let split_cards = self.players
				.get(key)
				.filter(|p| !p.split_hand_done())
				.and_then(|p| p.hand().split_cards())
				.map(|cards| cards.to_vec());

			if let Some(cards) = split_cards {
				let mut split_option = self.policy.decide_for_automated(&cards, &others);
				logging::ai::split_decision(key.as_str(), &split_option.to_string());
				if split_option == GameOption::Split {
					logging::ai::split_refused(key.as_str());
					split_option = GameOption::Stay;
				}
				self.perform_option(key, split_option, true)?;
			}
		}

		Ok(option)
	}

	/// Every seat has stayed or bust, or the deck can no longer serve a hit.
	pub fn round_complete(&self) -> bool {
		self.deck.is_empty() || self.players.values().all(|p| p.is_done())
	}

	/// Turns every card face up and settles each contender against the
	/// dealer.
	pub fn finish_round(&mut self) -> GameResult<Vec<RoundResult>> {
		self.require_playing()?;
		self.dealer()?;

		for player in self.players.values_mut() {
			player.hand_mut().reveal_all();
		}

		let dealer = self.dealer()?;
		let dealer_value = dealer.hand().value();
		let dealer_bust = dealer.hand().is_bust();

		let results: Vec<RoundResult> = self.players
			.values()
			.filter(|p| p.is_contender())
			.map(|p| {
				let hand = p.hand();
				let value = hand.value();
				let outcome = Outcome::settle(value, hand.is_bust(), dealer_value, dealer_bust);
				let split_value = hand.split_value();
				let split_outcome = split_value
					.map(|v| Outcome::settle(v, hand.is_split_bust(), dealer_value, dealer_bust));
				logging::engine::round_settled(p.key().as_str(), &outcome.to_string(), value);
				RoundResult {
					player: p.key().clone(),
					value,
					outcome,
					split_value,
					split_outcome,
				}
			})
			.collect();

		self.state = GameState::Finished;
		Ok(results)
	}

	/// Clears hands and turn order and reshuffles a full deck. The registry
	/// is kept.
	pub fn reset_round(&mut self) {
		for player in self.players.values_mut() {
			player.reset_for_round();
		}
		self.deck.reset(&mut self.rng);
		self.turns.clear();
		self.state = GameState::WaitingForPlayers;
		logging::engine::round_reset();
	}

	fn require_playing(&self) -> GameResult<()> {
		if self.state == GameState::Playing {
			Ok(())
		} else {
			Err(GameError::NotPlaying(self.state))
		}
	}

	// Accessors

	pub fn connected_players(&self) -> Vec<&Player> {
		self.players.values().collect()
	}

	pub fn connected_real_players(&self) -> Vec<&Player> {
		self.players.values().filter(|p| p.is_real()).collect()
	}

	pub fn connected_ai_players(&self) -> Vec<&Player> {
		self.players.values().filter(|p| !p.is_real()).collect()
	}

	pub fn all_players_except(&self, key: &PlayerKey) -> Vec<&Player> {
		self.players.values().filter(|p| p.key() != key).collect()
	}

	pub fn admin(&self) -> GameResult<&Player> {
		let admins: Vec<&Player> = self.players.values().filter(|p| p.is_admin()).collect();
		match admins.as_slice() {
			[admin] => Ok(*admin),
			_ => Err(GameError::AdminNotUnique(admins.len())),
		}
	}

	pub fn dealer(&self) -> GameResult<&Player> {
		let dealers: Vec<&Player> = self.players.values().filter(|p| p.is_dealer()).collect();
		match dealers.as_slice() {
			[dealer] => Ok(*dealer),
			_ => Err(GameError::DealerNotUnique(dealers.len())),
		}
	}

	/// Registry key for a channel, or the unresolved sentinel.
	pub fn key_for(&self, channel: &ChannelId) -> PlayerKey {
		self.player_for(channel)
			.map(|p| p.key().clone())
			.unwrap_or_else(PlayerKey::unresolved)
	}

	pub fn player_for(&self, channel: &ChannelId) -> Option<&Player> {
		self.players.get(&PlayerKey::from(channel)).filter(|p| p.is_real())
	}

	pub fn player(&self, key: &PlayerKey) -> Option<&Player> {
		self.players.get(key)
	}

	/// Visible state of every seat but `key`, as handed to the decision policy.
	pub fn seat_views_except(&self, key: &PlayerKey) -> Vec<SeatView> {
		self.all_players_except(key)
			.into_iter()
			.map(|p| SeatView {
				key: p.key().clone(),
				is_dealer: p.is_dealer(),
				visible_cards: p.hand().cards().iter().filter(|c| !c.is_hidden()).copied().collect(),
				visible_value: p.hand().visible_value(),
			})
			.collect()
	}
}
