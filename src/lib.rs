pub mod engine;
pub mod flush;
pub mod id;
pub mod model;
pub mod scenario;
pub mod testutil;

pub use id::IdGenerator;
pub use model::{
    Combatant, GameState, Nation, Notification, Priority, Region, Side, War, WarOutcome, WarRole,
    WarScoreData,
};
pub use scenario::Scenario;
