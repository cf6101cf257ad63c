pub mod nation;
pub mod notification;
pub mod region;
pub mod state;
pub mod war;

pub use nation::{GovernmentType, Nation, Tag};
pub use notification::{Notification, Priority};
pub use region::{ImprovementSlot, Region, UnitSlot};
pub use state::{Alliance, AllianceKind, GameState, Truce};
pub use war::{
    Combatant, LogEntry, ScoreCategory, Side, War, WarOutcome, WarRole, WarScoreData,
    JUSTIFICATION_TBD,
};
