use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::engine::GameEngine;
use crate::error::GameResult;
use crate::events::{GameOption, RoundResult};
use crate::logging;
use crate::net::protocol::{send_to, ServerMessage};
use crate::players::{Channel, PlayerKey, SeatPort, SeatResponse, TurnPrompt};

fn lock_mutex<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|e| e.into_inner())
}

enum Turn {
	Skip,
	Automated,
	Real(TurnPrompt),
}

/// Drives one round of a shared engine from deal to settlement. The engine
/// lock is never held while a real participant is deciding.
pub struct TableRunner {
	engine: Arc<Mutex<GameEngine>>,
	seats: HashMap<PlayerKey, Arc<dyn SeatPort>>,
	runtime_handle: Handle,
	action_timeout: Option<Duration>,
}

impl TableRunner {
	pub fn new(engine: Arc<Mutex<GameEngine>>, runtime_handle: Handle) -> Self {
		let action_timeout = lock_mutex(&engine).config().action_timeout();
		Self {
			engine,
			seats: HashMap::new(),
			runtime_handle,
			action_timeout,
		}
	}

	pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.action_timeout = timeout;
		self
	}

	pub fn add_seat(&mut self, seat: Arc<dyn SeatPort>) {
		self.seats.insert(seat.key().clone(), seat);
	}

	pub fn run_round(&self) -> GameResult<Vec<RoundResult>> {
		lock_mutex(&self.engine).deal_initial_hands();
		self.broadcast_hands()?;

		loop {
			let (key, turn) = {
				let mut engine = lock_mutex(&self.engine);
				if engine.round_complete() {
					break;
				}
				let key = engine.next_player()?;
				let turn = match engine.player(&key) {
					None => Turn::Skip,
					Some(p) if p.is_done() => Turn::Skip,
					Some(p) if p.is_real() => {
						let hand = p.hand();
						Turn::Real(TurnPrompt {
							player: key.clone(),
							value: hand.value(),
							split_value: hand.split_value(),
							can_split: hand.can_split(),
						})
					}
					Some(_) => Turn::Automated,
				};
				if let Turn::Automated = turn {
					engine.do_ai_turn(&key)?;
				}
				(key, turn)
			};

			match turn {
				Turn::Skip => continue,
				Turn::Automated => {}
				Turn::Real(prompt) => self.play_real_turn(&key, prompt)?,
			}
			self.broadcast_hands()?;
		}

		let results = lock_mutex(&self.engine).finish_round()?;
		self.broadcast(&ServerMessage::RoundOver { results: results.clone() });
		Ok(results)
	}

	/// Asks the seat until the engine accepts its choice. Refused choices are
	/// reported back to the seat; silence counts as staying.
	fn play_real_turn(&self, key: &PlayerKey, prompt: TurnPrompt) -> GameResult<()> {
		let Some(seat) = self.seats.get(key).cloned() else {
			return lock_mutex(&self.engine).perform_option(key, GameOption::Stay, false);
		};

		loop {
			match self.ask(&seat, prompt.clone()) {
				SeatResponse::Action { option, split_hand } => {
					let result = lock_mutex(&self.engine).perform_option(key, option, split_hand);
					match result {
						Err(e) if e.is_player_mistake() => seat.reject(&e.to_string()),
						other => return other,
					}
				}
				SeatResponse::Leave => {
					lock_mutex(&self.engine).remove_player(key);
					return Ok(());
				}
				SeatResponse::Timeout => {
					logging::net::timed_out(key.as_str());
					return lock_mutex(&self.engine).perform_option(key, GameOption::Stay, false);
				}
			}
		}
	}

	fn ask(&self, seat: &Arc<dyn SeatPort>, prompt: TurnPrompt) -> SeatResponse {
		let request = seat.request_action(prompt);
		match self.action_timeout {
			Some(limit) => self.runtime_handle.block_on(async {
				tokio::time::timeout(limit, request)
					.await
					.unwrap_or(SeatResponse::Timeout)
			}),
			None => self.runtime_handle.block_on(request),
		}
	}

	fn broadcast_hands(&self) -> GameResult<()> {
		let deliveries: Vec<(Arc<dyn Channel>, ServerMessage)> = {
			let engine = lock_mutex(&self.engine);
			let mut messages = engine.build_hand_messages()?;
			engine.connected_real_players()
				.into_iter()
				.filter_map(|p| {
					let channel = Arc::clone(p.channel()?);
					let messages = messages.remove(p.key())?;
					Some((channel, ServerMessage::Hand { messages }))
				})
				.collect()
		};

		for (channel, msg) in &deliveries {
			send_to(channel.as_ref(), msg);
		}
		Ok(())
	}

	fn broadcast(&self, msg: &ServerMessage) {
		let channels: Vec<Arc<dyn Channel>> = lock_mutex(&self.engine)
			.connected_real_players()
			.into_iter()
			.filter_map(|p| p.channel().cloned())
			.collect();
		for channel in &channels {
			send_to(channel.as_ref(), msg);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::GameState;
	use crate::error::GameError;
	use crate::events::Outcome;
	use crate::players::{MemoryChannel, ScriptedSeat};
	use crate::strategy::ScriptedPolicy;
	use crate::table::TableConfig;

	struct Table {
		runtime: tokio::runtime::Runtime,
		engine: Arc<Mutex<GameEngine>>,
		channel: Arc<MemoryChannel>,
	}

	fn table(policy: ScriptedPolicy) -> Table {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		let config = TableConfig {
			seed: Some(5),
			..TableConfig::default()
		};
		let mut engine = GameEngine::new(config).with_policy(Box::new(policy));
		let channel = Arc::new(MemoryChannel::new("conn-1"));
		let dyn_channel: Arc<dyn Channel> = channel.clone();
		engine.register_player(Some(dyn_channel));
		engine.open_lobby(1);
		engine.register_ai();

		Table {
			runtime,
			engine: Arc::new(Mutex::new(engine)),
			channel,
		}
	}

	fn decoded(channel: &MemoryChannel) -> Vec<ServerMessage> {
		channel.sent().iter().map(|s| serde_json::from_str(s).unwrap()).collect()
	}

	#[test]
	fn test_everyone_stays() {
		let t = table(ScriptedPolicy::always_stay());
		let mut runner = TableRunner::new(Arc::clone(&t.engine), t.runtime.handle().clone());
		let seat = Arc::new(ScriptedSeat::new("conn-1"));
		runner.add_seat(seat.clone());

		let results = runner.run_round().unwrap();

		assert_eq!(results.len(), 3);
		assert_eq!(seat.prompts().len(), 1);
		assert_eq!(lock_mutex(&t.engine).state(), GameState::Finished);

		let sent = decoded(&t.channel);
		// deal, one per turn, settlement
		assert_eq!(sent.len(), 1 + 4 + 1);
		assert!(matches!(sent[0], ServerMessage::Hand { .. }));
		assert!(matches!(sent.last(), Some(ServerMessage::RoundOver { .. })));
	}

	#[test]
	fn test_mistake_is_asked_again() {
		let t = table(ScriptedPolicy::always_stay());
		let mut runner = TableRunner::new(Arc::clone(&t.engine), t.runtime.handle().clone());
		let seat = Arc::new(ScriptedSeat::new("conn-1").with_responses(vec![
			SeatResponse::Action { option: GameOption::Split, split_hand: true },
			SeatResponse::Action { option: GameOption::Hit, split_hand: false },
			SeatResponse::Action { option: GameOption::Stay, split_hand: false },
		]));
		runner.add_seat(seat.clone());

		runner.run_round().unwrap();

		assert_eq!(seat.rejections(), vec![GameError::SplitOfSplit.to_string()]);
		let key = PlayerKey::from("conn-1");
		let engine = lock_mutex(&t.engine);
		let player = engine.player(&key).unwrap();
		assert!(player.hand().len() >= 3 || player.hand().is_bust());
	}

	#[test]
	fn test_timeout_counts_as_stay() {
		struct SilentSeat(PlayerKey);

		#[async_trait::async_trait]
		impl SeatPort for SilentSeat {
			async fn request_action(&self, _prompt: TurnPrompt) -> SeatResponse {
				std::future::pending().await
			}
			fn reject(&self, _reason: &str) {}
			fn key(&self) -> &PlayerKey {
				&self.0
			}
		}

		let t = table(ScriptedPolicy::always_stay());
		let mut runner = TableRunner::new(Arc::clone(&t.engine), t.runtime.handle().clone())
			.with_timeout(Some(Duration::from_millis(20)));
		runner.add_seat(Arc::new(SilentSeat("conn-1".into())));

		let results = runner.run_round().unwrap();
		assert_eq!(results.len(), 3);
		let engine = lock_mutex(&t.engine);
		let player = engine.player(&"conn-1".into()).unwrap();
		assert_eq!(player.last_option(), Some(GameOption::Stay));
		assert_eq!(player.hand().len(), 2);
	}

	#[test]
	fn test_leaving_mid_round() {
		let t = table(ScriptedPolicy::always_stay());
		let mut runner = TableRunner::new(Arc::clone(&t.engine), t.runtime.handle().clone());
		runner.add_seat(Arc::new(ScriptedSeat::new("conn-1").with_responses(vec![SeatResponse::Leave])));

		let results = runner.run_round().unwrap();
		assert_eq!(results.len(), 2);
		assert!(lock_mutex(&t.engine).player(&"conn-1".into()).is_none());
	}

	#[test]
	fn test_dealer_draws_until_policy_stays() {
		let t = table(ScriptedPolicy::new(vec![], vec![GameOption::Hit, GameOption::Hit]));
		let mut runner = TableRunner::new(Arc::clone(&t.engine), t.runtime.handle().clone());
		runner.add_seat(Arc::new(ScriptedSeat::new("conn-1")));

		let results = runner.run_round().unwrap();
		let engine = lock_mutex(&t.engine);
		let dealer = engine.dealer().unwrap();
		assert!(dealer.hand().len() >= 3);
		assert!(results.iter().all(|r| matches!(r.outcome, Outcome::Win | Outcome::Lose | Outcome::Push)));
	}
}
