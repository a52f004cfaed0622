mod channel;
mod player;
mod port;
mod test_seat;

pub use channel::{Channel, ChannelId, MemoryChannel};
pub use player::{Player, PlayerKey, Role};
pub use port::{SeatPort, SeatResponse, TurnPrompt};
pub use test_seat::ScriptedSeat;
