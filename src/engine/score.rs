//! War score ledger: the single award entry point, per-turn total
//! recomputation, surrender thresholds and occupation awards.

use crate::model::{GameState, GovernmentType, ScoreCategory, Side, War};
use crate::scenario::{SCORCHED_EARTH_TECH, UNYIELDING_TECH};

use super::context::TurnContext;

pub const SCORE_FROM_VICTORY: u32 = 5;
pub const SCORE_FROM_SUCCESSFUL_ATTACK: u32 = 3;
pub const SCORE_PER_UNIT_DESTROYED: u32 = 5;
pub const SCORE_PER_IMPROVEMENT_DESTROYED: u32 = 3;
pub const SCORE_PER_CAPITAL_CAPTURE: u32 = 10;
pub const SCORE_PER_NUCLEAR_STRIKE: u32 = 15;
pub const OCCUPATION_SCORE_PER_REGION: u32 = 2;
pub const SURRENDER_BASE_THRESHOLD: u32 = 100;
pub const UNYIELDING_THRESHOLD_BONUS: u32 = 50;

/// Award war score on behalf of `nation`. An encounter only knows its local
/// attacker and defender, which need not match the war's sides, so every
/// award resolves through the combatant's stored war role before touching
/// a ledger. Keep all score mutation on this path.
///
/// # Panics
/// Panics if `nation` is not on the war's roster.
pub fn award(war: &mut War, nation: u64, category: ScoreCategory, amount: u32) {
    let side = war.combatant(nation).side();
    war.score_mut(side).add(category, amount);
}

/// Recompute the cached totals of every ongoing war. Run once per turn,
/// strictly after all combat has been applied; totals are never maintained
/// incrementally, so drift cannot accumulate.
pub fn update_totals(state: &mut GameState) {
    for war in state.wars.values_mut().filter(|w| w.is_ongoing()) {
        war.attacker_score.recompute_total();
        war.defender_score.recompute_total();
    }
}

/// The score the side opposing `holdout` must reach to force `holdout` to
/// surrender. `None` means unreachable: a Crime Syndicate main combatant
/// never yields to score pressure.
pub fn surrender_threshold(
    state: &GameState,
    war: &War,
    holdout: Side,
) -> Option<u32> {
    let main = war.main_on(holdout);
    let nation = state.nation(main.nation);
    if nation.government == GovernmentType::CrimeSyndicate {
        return None;
    }
    let mut threshold = SURRENDER_BASE_THRESHOLD + war.score(holdout).total;
    if nation.has_research(UNYIELDING_TECH) {
        threshold += UNYIELDING_THRESHOLD_BONUS;
    }
    Some(threshold)
}

/// Per-turn occupation scoring: each region owned by one side of an ongoing
/// war and occupied by a nation from the other side earns the occupier's
/// side a flat award, doubled when the occupier has Scorched Earth.
pub fn award_occupation_scores(ctx: &mut TurnContext) {
    let war_ids: Vec<u64> = ctx
        .state
        .wars
        .values()
        .filter(|w| w.is_ongoing())
        .map(|w| w.id)
        .collect();

    for war_id in war_ids {
        // Collect (occupier, amount) first: the scan borrows regions and
        // nations while the award mutates the war.
        let awards: Vec<(u64, u32)> = {
            let war = ctx.state.war(war_id);
            ctx.state
                .regions
                .values()
                .filter_map(|region| {
                    let occupier = region.occupier?;
                    let owner_side = war.combatants.get(&region.owner)?.side();
                    let occupier_side = war.combatants.get(&occupier)?.side();
                    if owner_side == occupier_side {
                        return None;
                    }
                    let mut amount = OCCUPATION_SCORE_PER_REGION;
                    if ctx.state.nation(occupier).has_research(SCORCHED_EARTH_TECH) {
                        amount *= 2;
                    }
                    Some((occupier, amount))
                })
                .collect()
        };
        let war = ctx.state.war_mut(war_id);
        for (occupier, amount) in awards {
            award(war, occupier, ScoreCategory::Occupation, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::{Combatant, WarRole};
    use crate::scenario::Scenario;

    fn war_with_sides(state: &mut GameState) -> (u64, u64, u64) {
        let a = state.add_nation("Arcadia");
        let d = state.add_nation("Borova");
        let id = state.id_gen.next_id();
        let mut war = War::new(id, "Border War", 1);
        war.combatants
            .insert(a, Combatant::new(a, WarRole::MainAttacker, d));
        war.combatants
            .insert(d, Combatant::new(d, WarRole::MainDefender, a));
        state.wars.insert(id, war);
        (id, a, d)
    }

    #[test]
    fn award_translates_nation_to_war_side() {
        let mut state = GameState::new();
        let (war_id, attacker, defender) = war_with_sides(&mut state);
        let war = state.war_mut(war_id);

        award(war, defender, ScoreCategory::DecisiveBattle, SCORE_FROM_VICTORY);
        assert_eq!(war.defender_score.decisive_battles, SCORE_FROM_VICTORY);
        assert_eq!(war.attacker_score.decisive_battles, 0);

        award(war, attacker, ScoreCategory::UnitsDestroyed, 5);
        assert_eq!(war.attacker_score.enemy_units_destroyed, 5);
    }

    #[test]
    fn threshold_grows_with_the_holdouts_own_score() {
        let mut state = GameState::new();
        let (war_id, _, defender) = war_with_sides(&mut state);
        {
            let war = state.war_mut(war_id);
            award(war, defender, ScoreCategory::DecisiveBattle, 30);
            war.defender_score.recompute_total();
        }
        let war = state.war(war_id);
        assert_eq!(
            surrender_threshold(&state, war, Side::Defender),
            Some(SURRENDER_BASE_THRESHOLD + 30)
        );
    }

    #[test]
    fn crime_syndicate_mains_never_yield_to_score() {
        let mut state = GameState::new();
        let (war_id, _, defender) = war_with_sides(&mut state);
        state.nation_mut(defender).government = GovernmentType::CrimeSyndicate;
        let war = state.war(war_id);
        assert_eq!(surrender_threshold(&state, war, Side::Defender), None);
    }

    #[test]
    fn unyielding_research_raises_the_defense_threshold() {
        let mut state = GameState::new();
        let (war_id, attacker, _) = war_with_sides(&mut state);
        state
            .nation_mut(attacker)
            .research
            .insert(UNYIELDING_TECH.to_string());
        let war = state.war(war_id);
        assert_eq!(
            surrender_threshold(&state, war, Side::Attacker),
            Some(SURRENDER_BASE_THRESHOLD + UNYIELDING_THRESHOLD_BONUS)
        );
    }

    #[test]
    fn occupation_awards_go_to_the_occupiers_side() {
        let mut state = GameState::new();
        let (war_id, attacker, defender) = war_with_sides(&mut state);
        let theirs = state.add_region("Lowlands", defender);
        state.region_mut(theirs).occupier = Some(attacker);

        let scenario = Scenario::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut notifications = Vec::new();
        let mut ctx = TurnContext {
            state: &mut state,
            scenario: &scenario,
            rng: &mut rng,
            notifications: &mut notifications,
        };
        award_occupation_scores(&mut ctx);

        let war = state.war(war_id);
        assert_eq!(war.attacker_score.occupation, OCCUPATION_SCORE_PER_REGION);
        assert_eq!(war.defender_score.occupation, 0);
    }

    #[test]
    fn scorched_earth_doubles_occupation_awards() {
        let mut state = GameState::new();
        let (war_id, attacker, defender) = war_with_sides(&mut state);
        let theirs = state.add_region("Lowlands", defender);
        state.region_mut(theirs).occupier = Some(attacker);
        state
            .nation_mut(attacker)
            .research
            .insert(SCORCHED_EARTH_TECH.to_string());

        let scenario = Scenario::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut notifications = Vec::new();
        let mut ctx = TurnContext {
            state: &mut state,
            scenario: &scenario,
            rng: &mut rng,
            notifications: &mut notifications,
        };
        award_occupation_scores(&mut ctx);

        let war = state.war(war_id);
        assert_eq!(
            war.attacker_score.occupation,
            2 * OCCUPATION_SCORE_PER_REGION
        );
    }
}
