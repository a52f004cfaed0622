use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::events::{HandMessage, RoundResult};
use crate::logging;
use crate::players::{Channel, PlayerKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
	Join,
	OpenLobby {
		players: usize,
	},
	Start,
	Action {
		option: String,
		#[serde(default)]
		split_hand: bool,
	},
	Leave,
	Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
	Welcome {
		player: PlayerKey,
		is_admin: bool,
	},
	Error {
		message: String,
	},
	LobbyOpened {
		players: usize,
	},
	PlayerJoined {
		player: PlayerKey,
	},
	PlayerLeft {
		player: PlayerKey,
	},
	RoundStarting,
	YourTurn {
		value: u32,
		#[serde(default)]
		split_value: Option<u32>,
		can_split: bool,
	},
	Hand {
		messages: Vec<HandMessage>,
	},
	RoundOver {
		results: Vec<RoundResult>,
	},
	RoundReset,
}

/// Big-endian u32 length followed by the JSON body.
pub fn encode_message<T: Serialize>(msg: &T) -> GameResult<Vec<u8>> {
	let json = serde_json::to_string(msg)?;
	Ok(frame(&json))
}

pub fn frame(text: &str) -> Vec<u8> {
	let len = text.len() as u32;
	let mut buf = len.to_be_bytes().to_vec();
	buf.extend(text.as_bytes());
	buf
}

pub fn decode_length(buf: &[u8]) -> Option<u32> {
	if buf.len() < 4 {
		return None;
	}
	Some(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

/// Takes one complete frame off the front of `buf`. `None` means more bytes
/// are needed; a body that is not a valid message is consumed and reported.
pub fn try_decode<T: DeserializeOwned>(buf: &mut Vec<u8>) -> Option<GameResult<T>> {
	let len = decode_length(buf)? as usize;
	if buf.len() < 4 + len {
		return None;
	}
	let decoded = serde_json::from_slice(&buf[4..4 + len]).map_err(Into::into);
	buf.drain(..4 + len);
	Some(decoded)
}

/// Serialises a server message and hands it to a participant's channel.
/// Delivery failures are logged, not propagated.
pub fn send_to(channel: &dyn Channel, msg: &ServerMessage) {
	let result = serde_json::to_string(msg)
		.map_err(|e| e.to_string())
		.and_then(|json| channel.send_text(&json).map_err(|e| e.to_string()));
	if let Err(e) = result {
		logging::net::send_failed(channel.id().as_str(), &e);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::Outcome;
	use crate::players::MemoryChannel;

	#[test]
	fn test_encode_decode_length() {
		let msg = ClientMessage::OpenLobby { players: 2 };
		let encoded = encode_message(&msg).unwrap();

		let len = decode_length(&encoded).expect("Should decode length");
		assert_eq!(len as usize, encoded.len() - 4);
	}

	#[test]
	fn test_client_action_wire_shape() {
		let msg: ClientMessage = serde_json::from_str(r#"{"type":"action","option":"hit"}"#).unwrap();
		assert_eq!(msg, ClientMessage::Action { option: "hit".to_string(), split_hand: false });

		let json = serde_json::to_string(&ClientMessage::Join).unwrap();
		assert_eq!(json, r#"{"type":"join"}"#);
	}

	#[test]
	fn test_hand_message_wire_shape() {
		let msg = ServerMessage::Hand {
			messages: vec![
				HandMessage::DealingCards,
				HandMessage::OtherValue { index: 1, value: 10 },
			],
		};
		let json = serde_json::to_string(&msg).unwrap();
		assert!(json.contains(r#""type":"hand""#));
		assert!(json.contains(r#"{"type":"dealing_cards"}"#));
		assert!(json.contains(r#"{"type":"other_value","index":1,"value":10}"#));
	}

	#[test]
	fn test_try_decode_partial_and_multiple() {
		let mut buf = encode_message(&ClientMessage::Join).unwrap();
		buf.extend(encode_message(&ClientMessage::Start).unwrap());
		let whole = buf.len();

		let mut partial = buf[..whole - 2].to_vec();
		let first: ClientMessage = try_decode(&mut partial).unwrap().unwrap();
		assert_eq!(first, ClientMessage::Join);
		assert!(try_decode::<ClientMessage>(&mut partial).is_none());

		let first: ClientMessage = try_decode(&mut buf).unwrap().unwrap();
		let second: ClientMessage = try_decode(&mut buf).unwrap().unwrap();
		assert_eq!((first, second), (ClientMessage::Join, ClientMessage::Start));
		assert!(buf.is_empty());
	}

	#[test]
	fn test_try_decode_garbage_is_consumed() {
		let mut buf = frame("{not json");
		assert!(try_decode::<ClientMessage>(&mut buf).unwrap().is_err());
		assert!(buf.is_empty());
	}

	#[test]
	fn test_send_to_channel() {
		let channel = MemoryChannel::new("conn-1");
		send_to(&channel, &ServerMessage::RoundOver {
			results: vec![RoundResult {
				player: "conn-1".into(),
				value: 20,
				outcome: Outcome::Win,
				split_value: None,
				split_outcome: None,
			}],
		});

		let sent = channel.sent();
		assert_eq!(sent.len(), 1);
		let back: ServerMessage = serde_json::from_str(&sent[0]).unwrap();
		assert!(matches!(back, ServerMessage::RoundOver { ref results } if results[0].outcome == Outcome::Win));
	}
}
