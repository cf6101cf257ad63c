//! Per-turn forced-surrender scans. Run after all combat has been applied
//! and totals recomputed; both checks delegate the actual termination to
//! the lifecycle manager.

use crate::model::{Notification, Priority, Side, WarOutcome};

use super::context::TurnContext;
use super::lifecycle::{end_war, JustificationPrompt};
use super::score::surrender_threshold;

/// The scripted-event war that only ends by attrition or event resolution;
/// both surrender checks skip it.
pub const FOREIGN_INVASION_WAR: &str = "Foreign Invasion";

fn victory_against(holdout: Side) -> WarOutcome {
    match holdout {
        Side::Attacker => WarOutcome::DefenderVictory,
        Side::Defender => WarOutcome::AttackerVictory,
    }
}

/// A main combatant with every region they own under occupation — and none
/// free — is forced out of the war, with the outcome set by their role.
fn check_total_occupation(ctx: &mut TurnContext, war_id: u64, prompt: &mut dyn JustificationPrompt) {
    for side in [Side::Attacker, Side::Defender] {
        if !ctx.state.war(war_id).is_ongoing() {
            return;
        }
        let main = ctx.state.war(war_id).main_on(side).nation;
        let owned = ctx.state.regions_owned_by(main);
        let fully_occupied = !owned.is_empty()
            && owned
                .iter()
                .all(|&r| ctx.state.region(r).is_occupied());
        if !fully_occupied {
            continue;
        }
        let name = ctx.state.nation(main).name.clone();
        ctx.notifications.push(Notification::new(
            Priority::Urgent,
            format!("{name} has been fully occupied and is forced to surrender"),
        ));
        end_war(ctx, war_id, victory_against(side), prompt);
    }
}

/// A side whose total reaches the opposing side's computed threshold forces
/// that side to capitulate.
fn check_score_threshold(ctx: &mut TurnContext, war_id: u64, prompt: &mut dyn JustificationPrompt) {
    for holdout in [Side::Attacker, Side::Defender] {
        if !ctx.state.war(war_id).is_ongoing() {
            return;
        }
        let war = ctx.state.war(war_id);
        let Some(threshold) = surrender_threshold(ctx.state, war, holdout) else {
            continue;
        };
        if war.score(holdout.opposite()).total < threshold {
            continue;
        }
        let main = war.main_on(holdout).nation;
        let name = ctx.state.nation(main).name.clone();
        let war_name = war.name.clone();
        ctx.notifications.push(Notification::new(
            Priority::Urgent,
            format!("{name} can no longer sustain the {war_name} and surrenders"),
        ));
        end_war(ctx, war_id, victory_against(holdout), prompt);
    }
}

/// Run both forced-surrender checks over every ongoing war. Call once per
/// turn, strictly after combat and total recomputation.
pub fn run_forced_surrender_checks(ctx: &mut TurnContext, prompt: &mut dyn JustificationPrompt) {
    let war_ids: Vec<u64> = ctx
        .state
        .wars
        .values()
        .filter(|w| w.is_ongoing() && w.name != FOREIGN_INVASION_WAR)
        .map(|w| w.id)
        .collect();

    for war_id in war_ids {
        check_total_occupation(ctx, war_id, prompt);
        check_score_threshold(ctx, war_id, prompt);
    }
}
