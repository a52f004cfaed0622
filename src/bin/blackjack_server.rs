use std::path::PathBuf;

use clap::Parser;

use blackjack_table::defaults;
use blackjack_table::logging;
use blackjack_table::net::TableServer;
use blackjack_table::table::load_table_config;

#[derive(Parser)]
#[command(name = "blackjack-server")]
#[command(about = "Host a blackjack table")]
struct Cli {
	#[arg(short, long, default_value = "127.0.0.1:9999", env = "BLACKJACK_ADDR")]
	addr: String,

	#[arg(short, long)]
	config: Option<PathBuf>,
}

fn main() {
	let cli = Cli::parse();
	logging::init();
	defaults::ensure_config();

	let config = match load_table_config(cli.config.as_deref()) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{}", e);
			std::process::exit(1);
		}
	};

	let server = TableServer::new(config);
	if let Err(e) = server.run(&cli.addr) {
		eprintln!("Server error: {}", e);
		std::process::exit(1);
	}
}
