mod card;
mod deck;
mod format;
mod hand;

pub use card::{Card, Rank, Suit};
pub use deck::{Deck, DECK_SIZE};
pub use format::{CardFormat, CardStyle, HtmlFormat, ShortFormat};
pub use hand::{hand_value, Hand};
