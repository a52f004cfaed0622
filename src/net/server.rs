use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crate::engine::{GameEngine, GameState, TableRunner};
use crate::error::GameError;
use crate::events::GameOption;
use crate::logging;
use crate::net::network_seat::{submit_response, NetworkSeat, PendingResponse};
use crate::net::protocol::*;
use crate::players::{Channel, ChannelId, PlayerKey, SeatPort, SeatResponse};
use crate::table::TableConfig;

type ConnectionId = u64;

fn lock_mutex<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// One TCP client. Doubles as the participant's channel once seated.
struct Connection {
	id: ConnectionId,
	stream: Mutex<TcpStream>,
}

impl Channel for Connection {
	fn id(&self) -> ChannelId {
		ChannelId(format!("conn-{}", self.id))
	}

	fn send_text(&self, text: &str) -> io::Result<()> {
		lock_mutex(&self.stream).write_all(&frame(text))
	}
}

struct TableRoom {
	engine: Arc<Mutex<GameEngine>>,
	connections: HashMap<ConnectionId, Arc<Connection>>,
	pending: HashMap<PlayerKey, PendingResponse>,
}

impl TableRoom {
	fn broadcast(&self, msg: &ServerMessage) {
		for conn in self.connections.values() {
			send_to(conn.as_ref(), msg);
		}
	}

	fn broadcast_except(&self, exclude: ConnectionId, msg: &ServerMessage) {
		for conn in self.connections.values().filter(|c| c.id != exclude) {
			send_to(conn.as_ref(), msg);
		}
	}
}

/// Serves a single blackjack table over TCP, one thread per connection.
pub struct TableServer {
	room: Arc<Mutex<TableRoom>>,
	next_conn_id: AtomicU64,
}

impl TableServer {
	pub fn new(config: TableConfig) -> Self {
		Self::with_engine(GameEngine::new(config))
	}

	pub fn with_engine(engine: GameEngine) -> Self {
		let room = TableRoom {
			engine: Arc::new(Mutex::new(engine)),
			connections: HashMap::new(),
			pending: HashMap::new(),
		};
		Self {
			room: Arc::new(Mutex::new(room)),
			next_conn_id: AtomicU64::new(1),
		}
	}

	pub fn run(&self, addr: &str) -> io::Result<()> {
		let listener = TcpListener::bind(addr)?;
		logging::net::listening(addr);
		self.run_with_listener(listener)
	}

	pub fn run_with_listener(&self, listener: TcpListener) -> io::Result<()> {
		for stream in listener.incoming() {
			match stream {
				Ok(stream) => {
					let conn_id = self.next_conn_id.fetch_add(1, Ordering::SeqCst);
					let room = Arc::clone(&self.room);
					thread::spawn(move || {
						handle_connection(conn_id, stream, room);
					});
				}
				Err(e) => {
					logging::net::rejected(0, &e.to_string());
				}
			}
		}
		Ok(())
	}
}

fn handle_connection(conn_id: ConnectionId, stream: TcpStream, room: Arc<Mutex<TableRoom>>) {
	let writer = match stream.try_clone() {
		Ok(writer) => writer,
		Err(e) => {
			logging::net::rejected(conn_id, &e.to_string());
			return;
		}
	};
	let conn = Arc::new(Connection {
		id: conn_id,
		stream: Mutex::new(writer),
	});

	lock_mutex(&room).connections.insert(conn_id, Arc::clone(&conn));
	logging::net::connected(conn_id);

	let mut reader = stream;
	let mut buf = vec![0u8; 4096];
	let mut pending = Vec::new();

	loop {
		match reader.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => {
				pending.extend_from_slice(&buf[..n]);
				while let Some(decoded) = try_decode::<ClientMessage>(&mut pending) {
					let result = decoded
						.map_err(|e| e.to_string())
						.and_then(|msg| process_message(&conn, msg, &room));
					if let Err(reason) = result {
						logging::net::rejected(conn_id, &reason);
						send_to(conn.as_ref(), &ServerMessage::Error { message: reason });
					}
				}
			}
			Err(_) => break,
		}
	}

	leave(&conn, &room);
	lock_mutex(&room).connections.remove(&conn_id);
	logging::net::disconnected(conn_id);
}

fn process_message(
	conn: &Arc<Connection>,
	msg: ClientMessage,
	room: &Arc<Mutex<TableRoom>>,
) -> Result<(), String> {
	let key = PlayerKey::from(&conn.id());

	match msg {
		ClientMessage::Join => {
			let room = lock_mutex(room);
			let mut engine = lock_mutex(&room.engine);
			if engine.player(&key).is_some() {
				return Err("already seated".to_string());
			}
			let channel: Arc<dyn Channel> = conn.clone();
			if !engine.register_player(Some(channel)) {
				return Err("table is full".to_string());
			}
			let is_admin = engine.player(&key).is_some_and(|p| p.is_admin());
			drop(engine);

			send_to(conn.as_ref(), &ServerMessage::Welcome { player: key.clone(), is_admin });
			room.broadcast_except(conn.id, &ServerMessage::PlayerJoined { player: key });
		}

		ClientMessage::OpenLobby { players } => {
			let room = lock_mutex(room);
			let target = {
				let mut engine = lock_mutex(&room.engine);
				require_admin(&engine, &key)?;
				match engine.state() {
					GameState::Playing => return Err("a round is in progress".to_string()),
					GameState::Finished => engine.reset_round(),
					_ => {}
				}
				engine.open_lobby(players);
				engine.round_players()
			};
			room.broadcast(&ServerMessage::LobbyOpened { players: target });
		}

		ClientMessage::Start => {
			start_round(&key, room)?;
		}

		ClientMessage::Action { option, split_hand } => {
			let option: GameOption = option.parse().map_err(|e: GameError| e.to_string())?;
			let room = lock_mutex(room);
			let pending = room.pending.get(&key).ok_or("you are not in this round")?;
			submit_response(pending, SeatResponse::Action { option, split_hand })?;
		}

		ClientMessage::Leave => {
			leave(conn, room);
		}

		ClientMessage::Reset => {
			let room = lock_mutex(room);
			{
				let mut engine = lock_mutex(&room.engine);
				require_admin(&engine, &key)?;
				if engine.state() == GameState::Playing {
					return Err("a round is in progress".to_string());
				}
				engine.reset_round();
			}
			room.broadcast(&ServerMessage::RoundReset);
		}
	}

	Ok(())
}

fn require_admin(engine: &GameEngine, key: &PlayerKey) -> Result<(), String> {
	match engine.admin() {
		Ok(admin) if admin.key() == key => Ok(()),
		Ok(_) => Err("only the admin may do that".to_string()),
		Err(e) => Err(e.to_string()),
	}
}

/// Reshapes the table for the lobby target, then plays the round on its own
/// thread so connection threads stay free to deliver answers.
fn start_round(key: &PlayerKey, room: &Arc<Mutex<TableRoom>>) -> Result<(), String> {
	let mut guard = lock_mutex(room);
	let engine_ref = Arc::clone(&guard.engine);

	let seats = {
		let mut engine = lock_mutex(&engine_ref);
		require_admin(&engine, key)?;
		match engine.state() {
			GameState::WaitingForPlayers => {}
			GameState::Finished => engine.reset_round(),
			GameState::Playing => return Err("a round is in progress".to_string()),
			GameState::WaitingForAdmin => return Err("open a lobby first".to_string()),
		}

		engine.deregister_ai();
		if !engine.ready_to_start() {
			return Err(format!(
				"waiting for players: {} of {} seated",
				engine.connected_real_players().len(),
				engine.round_players()
			));
		}
		engine.register_ai();

		let seats: Vec<NetworkSeat> = engine.connected_real_players()
			.into_iter()
			.filter_map(|p| Some(NetworkSeat::new(p.key().clone(), Arc::clone(p.channel()?))))
			.collect();
		engine.set_state(GameState::Playing);
		seats
	};

	guard.pending = seats.iter()
		.map(|s| (s.key().clone(), s.pending_sender()))
		.collect();
	guard.broadcast(&ServerMessage::RoundStarting);
	drop(guard);

	let room = Arc::clone(room);
	thread::spawn(move || {
		let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
			Ok(runtime) => runtime,
			Err(e) => {
				abort_round(&room, &e.to_string());
				return;
			}
		};

		let mut runner = TableRunner::new(Arc::clone(&engine_ref), runtime.handle().clone());
		for seat in seats {
			runner.add_seat(Arc::new(seat));
		}

		if let Err(e) = runner.run_round() {
			abort_round(&room, &e.to_string());
		}
		lock_mutex(&room).pending.clear();
	});

	Ok(())
}

fn abort_round(room: &Arc<Mutex<TableRoom>>, reason: &str) {
	logging::engine::round_aborted(reason);
	let room = lock_mutex(room);
	lock_mutex(&room.engine).reset_round();
	room.broadcast(&ServerMessage::Error {
		message: format!("round aborted: {}", reason),
	});
}

/// Vacates the connection's seat. Mid-turn, the pending prompt is answered
/// with `Leave` so the runner removes the seat itself.
fn leave(conn: &Arc<Connection>, room: &Arc<Mutex<TableRoom>>) {
	let key = PlayerKey::from(&conn.id());
	let mut room = lock_mutex(room);

	let answered = room.pending
		.remove(&key)
		.is_some_and(|pending| submit_response(&pending, SeatResponse::Leave).is_ok());
	let removed = answered || lock_mutex(&room.engine).deregister_player(&conn.id());

	if removed {
		room.broadcast_except(conn.id, &ServerMessage::PlayerLeft { player: key });
	}
}
