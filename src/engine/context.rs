use rand::RngCore;

use crate::model::{GameState, Notification};
use crate::scenario::Scenario;

/// Context passed into every engine entry point for one turn.
///
/// All randomness flows through `rng`, so a seeded generator replays a turn
/// exactly. Notifications are appended fire-and-forget; the caller drains
/// them after turn processing.
pub struct TurnContext<'a> {
    pub state: &'a mut GameState,
    pub scenario: &'a Scenario,
    pub rng: &'a mut dyn RngCore,
    pub notifications: &'a mut Vec<Notification>,
}
