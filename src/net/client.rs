use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::events::GameOption;
use crate::logging;
use crate::net::protocol::*;

/// Blocking client for one table. Server messages are read on a background
/// thread and queued.
pub struct GameClient {
	stream: TcpStream,
	rx: Receiver<ServerMessage>,
}

impl GameClient {
	pub fn connect(addr: &str) -> std::io::Result<Self> {
		let stream = TcpStream::connect(addr)?;
		stream.set_read_timeout(Some(Duration::from_millis(100)))?;

		let reader = stream.try_clone()?;
		let (tx, rx) = mpsc::channel();

		thread::spawn(move || {
			read_loop(reader, tx);
		});

		Ok(Self { stream, rx })
	}

	pub fn send(&mut self, msg: &ClientMessage) -> std::io::Result<()> {
		let data = encode_message(msg).map_err(std::io::Error::other)?;
		self.stream.write_all(&data)
	}

	pub fn try_recv(&self) -> Option<ServerMessage> {
		self.rx.try_recv().ok()
	}

	pub fn recv(&self) -> Option<ServerMessage> {
		self.rx.recv().ok()
	}

	pub fn recv_timeout(&self, timeout: Duration) -> Option<ServerMessage> {
		self.rx.recv_timeout(timeout).ok()
	}

	/// Waits for the first message matching `pred`, dropping the rest.
	pub fn wait_for(&self, timeout: Duration, pred: impl Fn(&ServerMessage) -> bool) -> Option<ServerMessage> {
		let deadline = std::time::Instant::now() + timeout;
		loop {
			let left = deadline.checked_duration_since(std::time::Instant::now())?;
			let msg = self.recv_timeout(left)?;
			if pred(&msg) {
				return Some(msg);
			}
		}
	}

	pub fn join(&mut self) -> std::io::Result<()> {
		self.send(&ClientMessage::Join)
	}

	pub fn open_lobby(&mut self, players: usize) -> std::io::Result<()> {
		self.send(&ClientMessage::OpenLobby { players })
	}

	pub fn start(&mut self) -> std::io::Result<()> {
		self.send(&ClientMessage::Start)
	}

	pub fn action(&mut self, option: GameOption, split_hand: bool) -> std::io::Result<()> {
		self.send(&ClientMessage::Action {
			option: option.to_string().to_lowercase(),
			split_hand,
		})
	}

	pub fn leave(&mut self) -> std::io::Result<()> {
		self.send(&ClientMessage::Leave)
	}

	pub fn reset(&mut self) -> std::io::Result<()> {
		self.send(&ClientMessage::Reset)
	}
}

fn read_loop(mut reader: TcpStream, tx: Sender<ServerMessage>) {
	let mut buf = vec![0u8; 4096];
	let mut pending = Vec::new();

	loop {
		match reader.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => {
				pending.extend_from_slice(&buf[..n]);
				while let Some(decoded) = try_decode::<ServerMessage>(&mut pending) {
					match decoded {
						Ok(msg) => {
							if tx.send(msg).is_err() {
								return;
							}
						}
						Err(e) => logging::net::rejected(0, &e.to_string()),
					}
				}
			}
			Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
				continue;
			}
			Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
				continue;
			}
			Err(_) => break,
		}
	}
}
