//! Strike resolver: missile and nuclear attacks on a region. Unlike ground
//! combat there are no opposed rolls — a defense search and interception
//! draw first, then accuracy rolls (standard) or unconditional destruction
//! (nuclear).

use rand::Rng;

use crate::model::{Notification, Priority, ScoreCategory};
use crate::scenario::{MissileStats, NO_HEALTH_BAR};

use super::combat::{destroy_improvement, destroy_unit};
use super::context::TurnContext;
use super::helpers::regions_within;
use super::score::{award, SCORE_PER_NUCLEAR_STRIKE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// A defender intercepted the missile; no damage was dealt.
    Intercepted,
    /// The missile arrived (which does not imply anything was hit).
    Delivered,
}

/// A strike in flight; discarded after resolution.
#[derive(Debug)]
struct Strike {
    war: u64,
    nation: u64,
    target_nation: u64,
    target_region: u64,
    missile: MissileStats,
}

/// Best interception chance the target nation can muster, searching every
/// unit/improvement type with a defense against this missile class within
/// that defender's own range of the target region. Standard missiles face
/// the *highest* value found (defense as success probability); nuclear
/// missiles the *lowest* (defense as a lower-is-better threshold).
fn find_defense(ctx: &TurnContext, strike: &Strike) -> Option<f64> {
    let nuclear = strike.missile.nuclear;
    let mut best: f64 = if nuclear { 99.0 } else { -1.0 };
    let mut found = false;

    let mut consider = |chance: f64| {
        found = true;
        best = if nuclear { best.min(chance) } else { best.max(chance) };
    };

    for (kind, stats) in &ctx.scenario.improvements {
        let Some(defense) = (if nuclear { stats.nuke_defense } else { stats.missile_defense })
        else {
            continue;
        };
        let in_range = regions_within(ctx.state, strike.target_region, defense.range);
        let present = in_range.iter().any(|&id| {
            let region = ctx.state.region(id);
            region.owner == strike.target_nation
                && region.occupier.is_none()
                && region
                    .improvement
                    .as_ref()
                    .is_some_and(|imp| imp.kind == *kind && imp.is_functional())
        });
        if present {
            consider(defense.chance);
        }
    }

    for (kind, stats) in &ctx.scenario.units {
        let Some(defense) = (if nuclear { stats.nuke_defense } else { stats.missile_defense })
        else {
            continue;
        };
        let in_range = regions_within(ctx.state, strike.target_region, defense.range);
        let present = in_range.iter().any(|&id| {
            ctx.state
                .region(id)
                .unit
                .as_ref()
                .is_some_and(|u| u.kind == *kind && u.owner == strike.target_nation)
        });
        if present {
            consider(defense.chance);
        }
    }

    found.then_some(best)
}

/// Launch `missile_kind` from `striker` at `target_region`.
///
/// # Panics
/// Panics if the striker and the target region's owner share no active
/// war — launch validation must already have established one.
pub fn resolve_strike(
    ctx: &mut TurnContext,
    striker: u64,
    target_region: u64,
    missile_kind: &str,
) -> StrikeOutcome {
    let target_nation = ctx.state.region(target_region).owner;
    let war = ctx
        .state
        .active_war_between(striker, target_nation)
        .unwrap_or_else(|| panic!("no active war between nations {striker} and {target_nation}"));
    let strike = Strike {
        war,
        nation: striker,
        target_nation,
        target_region,
        missile: ctx.scenario.missile(missile_kind).clone(),
    };

    {
        let cost = strike.missile.cost;
        let resource = strike.missile.cost_resource.clone();
        ctx.state.nation_mut(striker).adjust_stockpile(&resource, -cost);
        let combatant = ctx.state.war_mut(war).combatant_mut(striker);
        combatant.attacks_made += 1;
        if strike.missile.nuclear {
            combatant.nukes_launched += 1;
        } else {
            combatant.missiles_launched += 1;
        }
    }

    let turn = ctx.state.turn;
    let striker_name = ctx.state.nation(striker).name.clone();
    let target_name = ctx.state.region(target_region).name.clone();

    // Defense phase: one uniform draw against the selected defender.
    if let Some(chance) = find_defense(ctx, &strike) {
        if ctx.rng.random_range(0.0..1.0) < chance {
            ctx.state.war_mut(war).record(
                turn,
                format!("{missile_kind} from {striker_name} was intercepted over {target_name}"),
            );
            return StrikeOutcome::Intercepted;
        }
    }

    if strike.missile.nuclear {
        resolve_nuclear_damage(ctx, &strike);
        ctx.state.war_mut(war).record(
            turn,
            format!("{striker_name} detonated a {missile_kind} over {target_name}"),
        );
        ctx.notifications.push(Notification::new(
            Priority::Urgent,
            format!("{striker_name} has launched a nuclear strike on {target_name}"),
        ));
    } else {
        resolve_standard_damage(ctx, &strike);
        ctx.state.war_mut(war).record(
            turn,
            format!("{missile_kind} from {striker_name} struck {target_name}"),
        );
    }
    StrikeOutcome::Delivered
}

/// Standard missile: one independent accuracy roll per target kind, fixed
/// damage on a hit. Improvements without a health bar are destroyed
/// outright by any hit; a hit Capital only goes non-functional.
fn resolve_standard_damage(ctx: &mut TurnContext, strike: &Strike) {
    let region_id = strike.target_region;

    if let Some(imp) = ctx.state.region(region_id).improvement.clone() {
        if ctx.rng.random_range(0.0..1.0) >= strike.missile.improvement_accuracy {
            let no_health_bar =
                ctx.scenario.improvement(&imp.kind).max_health == NO_HEALTH_BAR;
            if no_health_bar {
                destroy_improvement(ctx, strike.war, region_id, strike.nation);
            } else {
                let slot = ctx
                    .state
                    .region_mut(region_id)
                    .improvement
                    .as_mut()
                    .unwrap();
                slot.health -= strike.missile.improvement_damage;
                if slot.health <= 0 {
                    destroy_improvement(ctx, strike.war, region_id, strike.nation);
                }
            }
        }
    }

    if ctx.state.region(region_id).unit.is_some() {
        if ctx.rng.random_range(0.0..1.0) >= strike.missile.unit_accuracy {
            let slot = ctx.state.region_mut(region_id).unit.as_mut().unwrap();
            slot.health -= strike.missile.unit_damage;
            if slot.health <= 0 {
                destroy_unit(ctx, strike.war, region_id, strike.nation);
            }
        }
    }
}

/// Nuclear missile: no accuracy roll, everything present is destroyed
/// (Capital retained as non-functional), and the region takes fallout
/// unless the target is a Capital. The per-strike score bonus is flat and
/// independent of what was actually hit.
fn resolve_nuclear_damage(ctx: &mut TurnContext, strike: &Strike) {
    let region_id = strike.target_region;
    let capital_target = ctx
        .state
        .region(region_id)
        .improvement
        .as_ref()
        .is_some_and(|imp| imp.is_capital());

    if ctx.state.region(region_id).improvement.is_some() {
        destroy_improvement(ctx, strike.war, region_id, strike.nation);
    }
    if ctx.state.region(region_id).unit.is_some() {
        destroy_unit(ctx, strike.war, region_id, strike.nation);
    }

    if !capital_target {
        ctx.state.region_mut(region_id).fallout = ctx.scenario.fallout_start;
    }

    let war = ctx.state.war_mut(strike.war);
    award(
        war,
        strike.nation,
        ScoreCategory::NuclearStrike,
        SCORE_PER_NUCLEAR_STRIKE,
    );
}
