mod house_rules;
mod policy;
mod scripted;

pub use house_rules::HouseRules;
pub use policy::{DecisionPolicy, SeatView};
pub use scripted::ScriptedPolicy;
