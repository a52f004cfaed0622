use std::sync::{Arc, Mutex};

use blackjack_table::engine::{GameEngine, TableRunner};
use blackjack_table::events::{GameOption, HandMessage};
use blackjack_table::logging;
use blackjack_table::net::ServerMessage;
use blackjack_table::players::{Channel, MemoryChannel, ScriptedSeat};
use blackjack_table::table::TableConfig;

fn describe(msg: &HandMessage) -> String {
	match msg {
		HandMessage::DealingCards => "-- dealing --".to_string(),
		HandMessage::AddPlayerCard { card } => format!("  you: {}", card),
		HandMessage::PlayerValue { value } => format!("  you total {}", value),
		HandMessage::AddDealerCard { card } => format!("  dealer: {}", card),
		HandMessage::DealerValue { value } => format!("  dealer shows {}", value),
		HandMessage::AddOtherPlayerCard { card, index, owner } => format!("  #{} {}: {}", index, owner, card),
		HandMessage::OtherValue { index, value } => format!("  #{} shows {}", index, value),
	}
}

fn main() {
	logging::init();
	println!("=== Blackjack Engine Headless Test ===\n");

	let config = TableConfig {
		seed: std::env::args().nth(1).and_then(|s| s.parse().ok()),
		..TableConfig::default()
	};

	let runtime = match tokio::runtime::Runtime::new() {
		Ok(runtime) => runtime,
		Err(e) => {
			eprintln!("Runtime error: {}", e);
			std::process::exit(1);
		}
	};

	let channel = Arc::new(MemoryChannel::new("alice"));
	let mut engine = GameEngine::new(config);
	let seat_channel: Arc<dyn Channel> = channel.clone();
	engine.register_player(Some(seat_channel));
	engine.open_lobby(1);
	engine.register_ai();

	let engine = Arc::new(Mutex::new(engine));
	let mut runner = TableRunner::new(Arc::clone(&engine), runtime.handle().clone());
	runner.add_seat(Arc::new(
		ScriptedSeat::new("alice")
			.with_options(vec![GameOption::Hit])
			.with_default(GameOption::Stay),
	));

	let results = match runner.run_round() {
		Ok(results) => results,
		Err(e) => {
			eprintln!("Round error: {}", e);
			std::process::exit(1);
		}
	};

	for text in channel.sent() {
		match serde_json::from_str::<ServerMessage>(&text) {
			Ok(ServerMessage::Hand { messages }) => {
				for msg in &messages {
					println!("{}", describe(msg));
				}
			}
			Ok(other) => println!("{:?}", other),
			Err(e) => println!("unreadable message: {}", e),
		}
	}

	println!("\n=== Results ===");
	for r in &results {
		match (r.split_value, r.split_outcome) {
			(Some(v), Some(o)) => println!("{}: {} ({}), split {} ({})", r.player, r.outcome, r.value, o, v),
			_ => println!("{}: {} ({})", r.player, r.outcome, r.value),
		}
	}
}
