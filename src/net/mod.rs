pub mod client;
pub mod network_seat;
pub mod protocol;
pub mod server;

pub use client::GameClient;
pub use network_seat::NetworkSeat;
pub use protocol::{ClientMessage, ServerMessage};
pub use server::TableServer;
