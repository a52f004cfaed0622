use std::io;
use std::time::Duration;

use clap::Parser;

use blackjack_table::events::GameOption;
use blackjack_table::net::{GameClient, ServerMessage};

#[derive(Parser)]
#[command(name = "test-client")]
#[command(about = "Join a blackjack table, start a one-player round and stay")]
struct Cli {
	#[arg(short, long, default_value = "127.0.0.1:9999")]
	server: String,
}

fn main() -> io::Result<()> {
	let cli = Cli::parse();
	println!("Connecting to {}...", cli.server);

	let mut client = GameClient::connect(&cli.server)?;
	println!("Connected!");

	client.join()?;
	client.open_lobby(1)?;
	client.start()?;

	while let Some(msg) = client.recv_timeout(Duration::from_secs(120)) {
		println!("< {:?}", msg);
		match msg {
			ServerMessage::YourTurn { .. } => client.action(GameOption::Stay, false)?,
			ServerMessage::RoundOver { .. } => break,
			_ => {}
		}
	}

	println!("Disconnected.");
	Ok(())
}
