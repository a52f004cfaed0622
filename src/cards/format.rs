use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Renders a card into the display string carried by hand messages. Hidden
/// cards render face-down.
pub trait CardFormat: Send + Sync {
	fn render(&self, card: &Card) -> String;
}

pub struct ShortFormat;

impl CardFormat for ShortFormat {
	fn render(&self, card: &Card) -> String {
		if card.is_hidden() {
			return "??".to_string();
		}
		format!("{}{}", card.rank().label(), card.suit().symbol())
	}
}

/// Markup for the browser table client.
pub struct HtmlFormat;

impl CardFormat for HtmlFormat {
	fn render(&self, card: &Card) -> String {
		if card.is_hidden() {
			return "<div class=\"card back\"></div>".to_string();
		}
		let suit = card.suit().name();
		format!(
			"<div class=\"card rank-{} {}\"><span class=\"rank\">{}</span><span class=\"suit\">&{};</span></div>",
			card.rank().label().to_lowercase(),
			suit,
			card.rank().label(),
			suit,
		)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardStyle {
	#[default]
	Short,
	Html,
}

impl CardStyle {
	pub fn formatter(&self) -> Box<dyn CardFormat> {
		match self {
			CardStyle::Short => Box::new(ShortFormat),
			CardStyle::Html => Box::new(HtmlFormat),
		}
	}
}
