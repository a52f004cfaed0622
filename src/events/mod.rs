mod types;

pub use types::{GameOption, HandMessage, Outcome, RoundResult};
