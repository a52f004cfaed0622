use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use blackjack_table::cards::{Deck, DECK_SIZE};
use blackjack_table::engine::{GameEngine, GameState, TableRunner, TurnHandler};
use blackjack_table::error::GameError;
use blackjack_table::events::{GameOption, HandMessage};
use blackjack_table::net::{GameClient, ServerMessage, TableServer};
use blackjack_table::players::{Channel, MemoryChannel, PlayerKey, ScriptedSeat};
use blackjack_table::strategy::ScriptedPolicy;
use blackjack_table::table::TableConfig;

fn seeded(max_players: usize) -> TableConfig {
	TableConfig {
		max_players,
		seed: Some(2024),
		..TableConfig::default()
	}
}

fn real(id: &str) -> Option<Arc<dyn Channel>> {
	Some(Arc::new(MemoryChannel::new(id)))
}

#[test]
fn test_deck_draws_are_distinct() {
	let mut rng = StdRng::seed_from_u64(99);
	let mut deck = Deck::shuffled(&mut rng);
	assert_eq!(deck.remaining(), DECK_SIZE);

	let mut seen = HashSet::new();
	for k in 1..=DECK_SIZE {
		let card = deck.draw().expect("card available");
		assert!(seen.insert((card.rank(), card.suit())));
		assert_eq!(deck.remaining(), DECK_SIZE - k);
	}
	assert!(deck.draw().is_none());
}

#[test]
fn test_registry_never_exceeds_maximum() {
	let mut engine = GameEngine::new(seeded(3));
	assert!(engine.register_player(real("a")));
	assert!(engine.register_player(None));
	assert!(engine.register_player(real("b")));

	let before: Vec<PlayerKey> = engine.connected_players().iter().map(|p| p.key().clone()).collect();
	assert!(!engine.register_player(real("c")));
	let after: Vec<PlayerKey> = engine.connected_players().iter().map(|p| p.key().clone()).collect();
	assert_eq!(before, after);

	let admins: Vec<&str> = engine.connected_players()
		.iter()
		.filter(|p| p.is_admin())
		.map(|p| p.key().as_str())
		.collect();
	assert_eq!(admins, vec!["a"]);
}

#[test]
fn test_lobby_scenario() {
	let mut engine = GameEngine::new(seeded(3));
	assert!(engine.register_player(real("conn-1")));
	assert!(engine.admin().is_ok());

	engine.open_lobby(1);
	assert!(engine.ready_to_start());

	engine.register_ai();
	assert!(!engine.register_dealer());
	assert_eq!(engine.connected_players().len(), 4);
	assert_eq!(engine.connected_players().iter().filter(|p| p.is_dealer()).count(), 1);
	assert_eq!(engine.state(), GameState::WaitingForPlayers);
}

#[test]
fn test_turn_order_through_engine() {
	let mut engine = GameEngine::new(seeded(3)).with_policy(Box::new(ScriptedPolicy::always_stay()));
	engine.register_player(real("conn-1"));
	engine.register_player(real("conn-2"));
	engine.open_lobby(2);
	engine.register_ai();
	engine.deal_initial_hands();

	let order: Vec<PlayerKey> = (0..4).map(|_| engine.next_player().unwrap()).collect();
	let first_two: HashSet<&str> = order[..2].iter().map(|k| k.as_str()).collect();
	assert_eq!(first_two, HashSet::from(["conn-1", "conn-2"]));
	assert_eq!(order[3].as_str(), "AI-DEALER");

	// Exhausted orderings are rebuilt on the next pull.
	let again = engine.next_player().unwrap();
	assert!(again.as_str().starts_with("conn-"));
}

#[test]
fn test_turn_handler_fails_after_exhaustion() {
	let mut engine = GameEngine::new(seeded(2));
	engine.register_player(real("conn-1"));
	engine.open_lobby(1);
	engine.register_ai();

	let mut rng = StdRng::seed_from_u64(4);
	let mut turns = TurnHandler::new();
	turns.initialize_new_round(engine.connected_players(), &mut rng).unwrap();
	for _ in 0..3 {
		turns.next_player().unwrap();
	}
	assert!(matches!(turns.next_player(), Err(GameError::TurnOrderExhausted)));
}

#[test]
fn test_hit_on_exhausted_deck_is_dropped() {
	let mut engine = GameEngine::new(seeded(1));
	engine.register_player(real("conn-1"));
	engine.register_ai();
	engine.deal_initial_hands();

	let key = PlayerKey::from("conn-1");
	while engine.deck_remaining() > 0 {
		let size = engine.player(&key).unwrap().hand().len();
		let remaining = engine.deck_remaining();
		engine.perform_option(&key, GameOption::Hit, false).unwrap();
		assert_eq!(engine.player(&key).unwrap().hand().len(), size + 1);
		assert_eq!(engine.deck_remaining(), remaining - 1);
	}

	let size = engine.player(&key).unwrap().hand().len();
	assert!(engine.perform_option(&key, GameOption::Hit, false).is_ok());
	assert_eq!(engine.player(&key).unwrap().hand().len(), size);
	assert!(engine.round_complete());
}

#[test]
fn test_split_of_split_is_fatal() {
	let mut engine = GameEngine::new(seeded(1));
	engine.register_player(real("conn-1"));
	engine.register_ai();
	engine.deal_initial_hands();

	let result = engine.perform_option(&"conn-1".into(), GameOption::Split, true);
	assert!(matches!(result, Err(GameError::SplitOfSplit)));
}

#[test]
fn test_lone_player_reveal_sequence() {
	let mut engine = GameEngine::new(seeded(1));
	engine.register_player(real("conn-1"));
	engine.open_lobby(1);
	engine.register_ai();
	engine.deal_initial_hands();

	let messages = engine.build_hand_messages().unwrap().remove(&PlayerKey::from("conn-1")).unwrap();
	let count = |pred: fn(&HandMessage) -> bool| messages.iter().filter(|m| pred(m)).count();

	assert_eq!(messages[0], HandMessage::DealingCards);
	assert_eq!(count(|m| matches!(m, HandMessage::AddPlayerCard { .. })), 2);
	assert_eq!(count(|m| matches!(m, HandMessage::PlayerValue { .. })), 1);
	assert_eq!(count(|m| matches!(m, HandMessage::AddDealerCard { .. })), 1);
	assert_eq!(count(|m| matches!(m, HandMessage::DealerValue { .. })), 1);
	assert_eq!(count(|m| matches!(m, HandMessage::AddOtherPlayerCard { .. })), 0);
	assert_eq!(count(|m| matches!(m, HandMessage::OtherValue { .. })), 0);
}

#[test]
fn test_full_round_with_house_rules() {
	let runtime = tokio::runtime::Runtime::new().unwrap();
	let channel = Arc::new(MemoryChannel::new("conn-1"));
	let mut engine = GameEngine::new(seeded(3));
	let dyn_channel: Arc<dyn Channel> = channel.clone();
	engine.register_player(Some(dyn_channel));
	engine.open_lobby(1);
	engine.register_ai();

	let engine = Arc::new(Mutex::new(engine));
	let mut runner = TableRunner::new(Arc::clone(&engine), runtime.handle().clone());
	runner.add_seat(Arc::new(ScriptedSeat::new("conn-1").with_default(GameOption::Stay)));

	let results = runner.run_round().unwrap();
	assert_eq!(results.len(), 3);

	let engine = engine.lock().unwrap();
	assert_eq!(engine.state(), GameState::Finished);
	let dealer = engine.dealer().unwrap();
	assert!(dealer.hand().value() >= 17 || engine.deck_remaining() == 0);

	let sent = channel.sent();
	assert!(sent.len() >= 3);
	let last: ServerMessage = serde_json::from_str(sent.last().unwrap()).unwrap();
	assert!(matches!(last, ServerMessage::RoundOver { ref results } if results.len() == 3));
}

fn spawn_server(config: TableConfig) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = listener.local_addr().unwrap().to_string();
	let server = TableServer::new(config);
	thread::spawn(move || {
		let _ = server.run_with_listener(listener);
	});
	addr
}

#[test]
fn test_server_round() {
	let addr = spawn_server(TableConfig {
		action_timeout_seconds: Some(5),
		..seeded(3)
	});
	let wait = Duration::from_secs(10);

	let mut admin = GameClient::connect(&addr).unwrap();
	admin.join().unwrap();
	let welcome = admin.wait_for(wait, |m| matches!(m, ServerMessage::Welcome { .. })).unwrap();
	assert!(matches!(welcome, ServerMessage::Welcome { is_admin: true, .. }));

	let mut guest = GameClient::connect(&addr).unwrap();
	guest.join().unwrap();
	let welcome = guest.wait_for(wait, |m| matches!(m, ServerMessage::Welcome { .. })).unwrap();
	assert!(matches!(welcome, ServerMessage::Welcome { is_admin: false, .. }));

	guest.start().unwrap();
	let refused = guest.wait_for(wait, |m| matches!(m, ServerMessage::Error { .. })).unwrap();
	assert_eq!(refused, ServerMessage::Error { message: "only the admin may do that".to_string() });

	admin.open_lobby(2).unwrap();
	admin.wait_for(wait, |m| matches!(m, ServerMessage::LobbyOpened { players: 2 })).unwrap();
	admin.start().unwrap();
	admin.wait_for(wait, |m| matches!(m, ServerMessage::RoundStarting)).unwrap();

	let play = move |client: &mut GameClient| -> Vec<ServerMessage> {
		let mut seen = Vec::new();
		while let Some(msg) = client.recv_timeout(wait) {
			if matches!(msg, ServerMessage::YourTurn { .. }) {
				client.action(GameOption::Stay, false).unwrap();
			}
			let over = matches!(msg, ServerMessage::RoundOver { .. });
			seen.push(msg);
			if over {
				break;
			}
		}
		seen
	};

	let guest_thread = thread::spawn(move || play(&mut guest));
	let admin_seen = play(&mut admin);
	let guest_seen = guest_thread.join().unwrap();

	for seen in [&admin_seen, &guest_seen] {
		assert!(seen.iter().any(|m| matches!(m, ServerMessage::Hand { .. })));
		match seen.last() {
			Some(ServerMessage::RoundOver { results }) => assert_eq!(results.len(), 3),
			other => panic!("round did not finish: {:?}", other),
		}
	}
}
