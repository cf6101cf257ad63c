mod combat;
mod context;
mod helpers;
mod lifecycle;
mod modifiers;
mod score;
mod strike;
mod surrender;
mod turn;

pub use combat::{resolve_encounter, CombatEncounter, EncounterOutcome};
pub use context::TurnContext;
pub use helpers::{bfs_nearest, regions_within, withdrawal_target};
pub use lifecycle::{
    add_claim, declare_war, end_war, JustificationChoice, JustificationPrompt,
    DEFAULT_TRUCE_TURNS,
};
pub use modifiers::{compute_modifiers, EncounterModifiers, SideModifiers};
pub use score::{
    award, award_occupation_scores, surrender_threshold, update_totals, OCCUPATION_SCORE_PER_REGION,
    SCORE_FROM_SUCCESSFUL_ATTACK, SCORE_FROM_VICTORY, SCORE_PER_CAPITAL_CAPTURE,
    SCORE_PER_IMPROVEMENT_DESTROYED, SCORE_PER_NUCLEAR_STRIKE, SCORE_PER_UNIT_DESTROYED,
    SURRENDER_BASE_THRESHOLD, UNYIELDING_THRESHOLD_BONUS,
};
pub use strike::{resolve_strike, StrikeOutcome};
pub use surrender::{run_forced_surrender_checks, FOREIGN_INVASION_WAR};
pub use turn::end_of_turn;
