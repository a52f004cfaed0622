use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default
/// `info` filter. Safe to call more than once.
pub fn init() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init();
}

pub mod engine {
	use tracing::{info, warn};

	pub fn lobby_opened(requested: usize, target: usize) {
		info!(requested, target, "prepared new blackjack round");
	}

	pub fn ready_check(current: usize, required: usize) {
		info!(current, required, "checking table readiness");
	}

	pub fn table_full(max: usize) {
		warn!(max, "max players already reached");
	}

	pub fn player_added(player: &str, is_admin: bool) {
		info!(player, is_admin, "added player to the table");
	}

	pub fn ai_added(player: &str) {
		info!(player, "added AI to the table");
	}

	pub fn dealer_added(player: &str) {
		info!(player, "added dealer to the table");
	}

	pub fn player_removed(player: &str) {
		info!(player, "removed player from the table");
	}

	pub fn admin_promoted(player: &str) {
		info!(player, "admin left, promoted next real player");
	}

	pub fn dealt(player: &str, cards: &str) {
		info!(player, cards, "dealt initial hand");
	}

	pub fn option(player: &str, action: &str, split_hand: bool) {
		info!(player, action, split_hand, "performed option");
	}

	pub fn drew(player: &str, card: &str) {
		info!(player, card, "drew card");
	}

	pub fn deck_exhausted(player: &str) {
		warn!(player, "no cards remaining, hit dropped");
	}

	pub fn turn(player: &str, remaining: usize) {
		info!(player, remaining, "next turn");
	}

	pub fn round_settled(player: &str, outcome: &str, value: u32) {
		info!(player, outcome, value, "settled hand");
	}

	pub fn round_reset() {
		info!("round reset, deck reshuffled");
	}

	pub fn round_aborted(reason: &str) {
		warn!(reason, "round aborted");
	}
}

pub mod ai {
	use tracing::{info, warn};

	pub fn decision(player: &str, source: &str, option: &str) {
		info!(player, source, option, "AI decision");
	}

	pub fn split_decision(player: &str, option: &str) {
		info!(player, option, "AI decision for split hand");
	}

	pub fn split_refused(player: &str) {
		warn!(player, "policy asked for an impossible split, staying");
	}
}

pub mod net {
	use tracing::{info, warn};

	pub fn listening(addr: &str) {
		info!(addr, "blackjack server listening");
	}

	pub fn connected(conn: u64) {
		info!(conn, "client connected");
	}

	pub fn disconnected(conn: u64) {
		info!(conn, "client disconnected");
	}

	pub fn rejected(conn: u64, reason: &str) {
		warn!(conn, reason, "rejected client message");
	}

	pub fn send_failed(channel: &str, error: &str) {
		warn!(channel, error, "unable to send message");
	}

	pub fn timed_out(player: &str) {
		warn!(player, "player did not act in time, staying");
	}
}
