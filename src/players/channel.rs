use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ChannelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Per-participant text channel owned by the transport. The engine only reads
/// its id and delivers text through it.
pub trait Channel: Send + Sync {
	fn id(&self) -> ChannelId;

	fn send_text(&self, text: &str) -> io::Result<()>;
}

/// Channel that keeps everything sent to it.
pub struct MemoryChannel {
	id: ChannelId,
	sent: Mutex<Vec<String>>,
}

impl MemoryChannel {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: ChannelId(id.into()),
			sent: Mutex::new(Vec::new()),
		}
	}

	pub fn sent(&self) -> Vec<String> {
		self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}

	pub fn clear(&self) {
		self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
	}
}

impl Channel for MemoryChannel {
	fn id(&self) -> ChannelId {
		self.id.clone()
	}

	fn send_text(&self, text: &str) -> io::Result<()> {
		self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(text.to_string());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_memory_channel_records() {
		let channel = MemoryChannel::new("conn-9");
		channel.send_text("one").unwrap();
		channel.send_text("two").unwrap();
		assert_eq!(channel.id(), ChannelId("conn-9".to_string()));
		assert_eq!(channel.sent(), vec!["one", "two"]);

		channel.clear();
		assert!(channel.sent().is_empty());
	}
}
