//! End-of-turn sequencing. Combat resolution happens earlier in the turn,
//! driven by the action layer; everything here runs strictly after it, in
//! a fixed order: occupation awards, total recomputation, forced-surrender
//! checks, then the per-turn decays.

use crate::model::GameState;

use super::context::TurnContext;
use super::lifecycle::JustificationPrompt;
use super::score::{award_occupation_scores, update_totals};
use super::surrender::run_forced_surrender_checks;

fn expire_truces(state: &mut GameState) {
    let turn = state.turn;
    state.truces.retain(|t| t.until_turn > turn);
}

fn decay_fallout(state: &mut GameState) {
    for region in state.regions.values_mut() {
        region.fallout = region.fallout.saturating_sub(1);
    }
}

fn expire_tags(state: &mut GameState) {
    for nation in state.nations.values_mut() {
        for tag in &mut nation.tags {
            tag.turns_remaining = tag.turns_remaining.saturating_sub(1);
        }
        nation.tags.retain(|t| t.turns_remaining > 0);
    }
}

/// Close out the current turn and advance the counter. War-score totals and
/// surrender thresholds are only ever evaluated here, never interleaved
/// with combat.
pub fn end_of_turn(ctx: &mut TurnContext, prompt: &mut dyn JustificationPrompt) {
    award_occupation_scores(ctx);
    update_totals(ctx.state);
    run_forced_surrender_checks(ctx, prompt);

    ctx.state.turn += 1;
    expire_truces(ctx.state);
    decay_fallout(ctx.state);
    expire_tags(ctx.state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn fallout_decays_one_per_turn() {
        let mut state = GameState::new();
        let n = state.add_nation("Arcadia");
        let r = state.add_region("Glasslands", n);
        state.region_mut(r).fallout = 2;

        decay_fallout(&mut state);
        assert_eq!(state.region(r).fallout, 1);
        decay_fallout(&mut state);
        decay_fallout(&mut state);
        assert_eq!(state.region(r).fallout, 0);
    }

    #[test]
    fn tags_expire_after_their_duration() {
        let mut state = GameState::new();
        let n = state.add_nation("Arcadia");
        state.nation_mut(n).tags.push(Tag {
            name: "Humiliated".to_string(),
            turns_remaining: 2,
            rival: None,
            roll_bonus: 0,
            damage_bonus: 0,
        });

        expire_tags(&mut state);
        assert_eq!(state.nation(n).tags.len(), 1);
        expire_tags(&mut state);
        assert!(state.nation(n).tags.is_empty());
    }
}
