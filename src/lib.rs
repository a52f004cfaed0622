#![allow(clippy::collapsible_if)]

pub mod cards;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod events;
pub mod logging;
pub mod net;
pub mod players;
pub mod strategy;
pub mod table;
