use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cards::CardStyle;
use crate::error::{GameError, GameResult};

pub const APP_DIR: &str = "blackjack-table";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
	#[serde(default = "default_max_players")]
	pub max_players: usize,

	#[serde(default = "default_dealer_key")]
	pub dealer_key: String,
	#[serde(default = "default_ai_prefix")]
	pub ai_prefix: String,
	#[serde(default = "default_ai_counter_start")]
	pub ai_counter_start: u64,

	#[serde(default = "default_stands_on")]
	pub dealer_stands_on: u32,
	#[serde(default = "default_stands_on")]
	pub ai_stands_on: u32,

	#[serde(default = "default_action_timeout")]
	pub action_timeout_seconds: Option<u64>,

	#[serde(default)]
	pub card_format: CardStyle,

	#[serde(default)]
	pub seed: Option<u64>,
}

fn default_max_players() -> usize {
	3
}

fn default_dealer_key() -> String {
	"AI-DEALER".to_string()
}

fn default_ai_prefix() -> String {
	"AI".to_string()
}

fn default_ai_counter_start() -> u64 {
	1243512
}

fn default_stands_on() -> u32 {
	17
}

fn default_action_timeout() -> Option<u64> {
	Some(60)
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			max_players: default_max_players(),
			dealer_key: default_dealer_key(),
			ai_prefix: default_ai_prefix(),
			ai_counter_start: default_ai_counter_start(),
			dealer_stands_on: default_stands_on(),
			ai_stands_on: default_stands_on(),
			action_timeout_seconds: default_action_timeout(),
			card_format: CardStyle::default(),
			seed: None,
		}
	}
}

impl TableConfig {
	pub fn action_timeout(&self) -> Option<Duration> {
		self.action_timeout_seconds.map(Duration::from_secs)
	}

	/// Clamps a requested real-player count into `1..=max_players`; anything
	/// outside the range becomes the table maximum.
	pub fn clamp_players(&self, requested: usize) -> usize {
		if requested < 1 || requested > self.max_players {
			self.max_players
		} else {
			requested
		}
	}

	fn validate(self) -> GameResult<Self> {
		if self.max_players == 0 {
			return Err(GameError::Config("max_players must be at least 1".to_string()));
		}
		if self.dealer_key.starts_with(&format!("{}-", self.ai_prefix))
			&& self.dealer_key[self.ai_prefix.len() + 1..].parse::<u64>().is_ok()
		{
			return Err(GameError::Config(format!(
				"dealer_key '{}' collides with generated AI names",
				self.dealer_key
			)));
		}
		Ok(self)
	}
}

pub fn parse_table_config(content: &str) -> GameResult<TableConfig> {
	let config: TableConfig = toml::from_str(content)
		.map_err(|e| GameError::Config(format!("Failed to parse table config: {}", e)))?;
	config.validate()
}

/// Loads the table settings from `path`, or from the first config file found,
/// or falls back to the built-in defaults.
pub fn load_table_config(path: Option<&Path>) -> GameResult<TableConfig> {
	let path = match path {
		Some(p) => p.to_path_buf(),
		None => match config_path() {
			Some(p) => p,
			None => return Ok(TableConfig::default()),
		},
	};

	let content = fs::read_to_string(&path)
		.map_err(|e| GameError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

	parse_table_config(&content)
}

fn config_path() -> Option<PathBuf> {
	if let Some(config_dir) = dirs::config_dir() {
		let user_path = config_dir.join(APP_DIR).join("table.toml");
		if user_path.exists() {
			return Some(user_path);
		}
	}
	let local = PathBuf::from("config/table.toml");
	local.exists().then_some(local)
}
