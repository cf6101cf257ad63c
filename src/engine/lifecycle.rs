//! War lifecycle manager: declaration (naming, ally call-in), termination
//! (justification resolution, truces, occupation clearing, withdrawal) and
//! the injected justification prompt port.

use crate::model::{
    Combatant, GameState, Notification, Priority, Tag, War, WarOutcome, WarRole,
    JUSTIFICATION_TBD,
};

use super::context::TurnContext;
use super::helpers::withdrawal_target;

/// Truce length applied when no justification was resolved for the victor.
pub const DEFAULT_TRUCE_TURNS: u32 = 4;

/// Answer collected for a combatant whose justification was still
/// unresolved when their war ended.
#[derive(Debug, Clone)]
pub struct JustificationChoice {
    pub justification: String,
    pub claims: Vec<u64>,
}

/// Port through which the engine solicits a casus belli and territorial
/// claims. The engine blocks on `resolve` and cannot tell whether the
/// answer came from a human operator, a script or a test fixture.
pub trait JustificationPrompt {
    fn resolve(&mut self, state: &GameState, war: &War, nation: u64) -> JustificationChoice;
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Display name for a new war: the justification's pattern, prefixed with
/// an ordinal ("2nd", "3rd", …) until it collides with no existing war.
fn war_display_name(
    ctx: &TurnContext,
    attacker: u64,
    defender: u64,
    justification: Option<&str>,
) -> String {
    let attacker_name = &ctx.state.nation(attacker).name;
    let defender_name = &ctx.state.nation(defender).name;
    let pattern = justification
        .and_then(|j| ctx.scenario.justification(j))
        .map(|j| j.name_pattern.as_str())
        .unwrap_or("%A-%D War");
    let base = pattern
        .replace("%A", attacker_name)
        .replace("%D", defender_name);

    let mut n = 1;
    loop {
        let candidate = if n == 1 {
            base.clone()
        } else {
            format!("{} {base}", ordinal(n))
        };
        if ctx.state.war_by_name(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

/// A nation may be called into a war only if it has no existing war, truce
/// or alliance with the opposing main combatant.
fn eligible_for_call_in(state: &GameState, candidate: u64, opposing_main: u64) -> bool {
    candidate != opposing_main
        && !state.at_war(candidate, opposing_main)
        && !state.are_truced(candidate, opposing_main)
        && !state.are_allied(candidate, opposing_main)
}

/// Declare war. Registers the main combatants, auto-enlists each side's
/// obligated allies and returns the new war's id.
///
/// Call-ins: the attacker brings their puppet states; the defender brings
/// their puppet states, defense-pact allies and overlord. Every candidate
/// is filtered against the opposing main combatant.
pub fn declare_war(
    ctx: &mut TurnContext,
    attacker: u64,
    defender: u64,
    justification: Option<&str>,
) -> u64 {
    assert!(
        ctx.state.active_war_between(attacker, defender).is_none(),
        "nations {attacker} and {defender} are already at war"
    );
    let name = war_display_name(ctx, attacker, defender, justification);
    let id = ctx.state.id_gen.next_id();
    let turn = ctx.state.turn;
    let mut war = War::new(id, name.clone(), turn);

    let mut main_attacker = Combatant::new(attacker, WarRole::MainAttacker, defender);
    if let Some(j) = justification {
        main_attacker.justification = j.to_string();
    }
    war.combatants.insert(attacker, main_attacker);
    war.combatants
        .insert(defender, Combatant::new(defender, WarRole::MainDefender, attacker));

    for puppet in ctx.state.puppets_of(attacker) {
        if eligible_for_call_in(ctx.state, puppet, defender)
            && !war.combatants.contains_key(&puppet)
        {
            war.combatants
                .insert(puppet, Combatant::new(puppet, WarRole::SecondaryAttacker, defender));
        }
    }

    let mut defender_side: Vec<u64> = ctx.state.puppets_of(defender);
    defender_side.extend(ctx.state.defense_pact_allies(defender));
    defender_side.extend(ctx.state.nation(defender).overlord);
    for ally in defender_side {
        if eligible_for_call_in(ctx.state, ally, attacker) && !war.combatants.contains_key(&ally)
        {
            war.combatants
                .insert(ally, Combatant::new(ally, WarRole::SecondaryDefender, attacker));
        }
    }

    let attacker_name = ctx.state.nation(attacker).name.clone();
    let defender_name = ctx.state.nation(defender).name.clone();
    war.record(
        turn,
        format!("{attacker_name} declared war on {defender_name}"),
    );
    ctx.state.wars.insert(id, war);
    ctx.notifications.push(Notification::new(
        Priority::Alert,
        format!("{attacker_name} has declared war on {defender_name}: the {name}"),
    ));
    id
}

/// Record a territorial claim, freezing the region's current owner. Claims
/// whose owner changes before the war ends are dropped at resolution.
///
/// # Panics
/// Panics if `nation` is not a combatant of the war.
pub fn add_claim(state: &mut GameState, war_id: u64, nation: u64, region: u64) {
    let owner = state.region(region).owner;
    state
        .war_mut(war_id)
        .combatant_mut(nation)
        .claims
        .insert(region, owner);
}

/// End a war with the given outcome.
///
/// Victories resolve every winning combatant's justification (soliciting
/// unresolved ones through `prompt`); a white peace skips straight to the
/// shared wind-down: truces for every attacker/defender pair, occupation
/// clearing between the sides, and forced withdrawal of stranded units.
///
/// # Panics
/// Panics if the war already ended or `outcome` is `Pending`.
pub fn end_war(
    ctx: &mut TurnContext,
    war_id: u64,
    outcome: WarOutcome,
    prompt: &mut dyn JustificationPrompt,
) {
    assert!(
        outcome != WarOutcome::Pending,
        "cannot end war {war_id} with a pending outcome"
    );
    assert!(
        ctx.state.war(war_id).is_ongoing(),
        "war '{}' has already ended",
        ctx.state.war(war_id).name
    );

    let winning_side = match outcome {
        WarOutcome::AttackerVictory => Some(crate::model::Side::Attacker),
        WarOutcome::DefenderVictory => Some(crate::model::Side::Defender),
        _ => None,
    };

    let mut truce_length = DEFAULT_TRUCE_TURNS;
    if let Some(side) = winning_side {
        collect_justifications(ctx, war_id, side, prompt);
        let winners = ctx.state.war(war_id).nations_on(side);
        for nation in winners {
            resolve_justification(ctx, war_id, nation);
        }
        let main = ctx.state.war(war_id).main_on(side);
        if let Some(stats) = ctx.scenario.justification(&main.justification) {
            truce_length = stats.truce_length;
        }
    }

    // Truce between every attacker/defender combatant pair.
    let attackers = ctx.state.war(war_id).nations_on(crate::model::Side::Attacker);
    let defenders = ctx.state.war(war_id).nations_on(crate::model::Side::Defender);
    for &a in &attackers {
        for &d in &defenders {
            ctx.state.add_truce(a, d, truce_length);
        }
    }

    clear_occupations(ctx.state, war_id);
    withdraw_stranded_units(ctx, war_id);

    let turn = ctx.state.turn;
    let war = ctx.state.war_mut(war_id);
    war.outcome = outcome;
    war.end_turn = turn;
    let description = match outcome {
        WarOutcome::AttackerVictory => "attacker victory",
        WarOutcome::DefenderVictory => "defender victory",
        _ => "white peace",
    };
    war.record(turn, format!("the war ended in {description}"));
    let name = war.name.clone();
    ctx.notifications.push(Notification::new(
        Priority::Alert,
        format!("The {name} has ended in {description}"),
    ));
}

/// Solicit a casus belli (and claims) for every winning combatant still at
/// the placeholder. Claims arriving through the prompt are truncated to the
/// justification's claim limit and snapshotted immediately.
fn collect_justifications(
    ctx: &mut TurnContext,
    war_id: u64,
    side: crate::model::Side,
    prompt: &mut dyn JustificationPrompt,
) {
    let unresolved: Vec<u64> = ctx
        .state
        .war(war_id)
        .combatants
        .values()
        .filter(|c| c.side() == side && !c.has_justification())
        .map(|c| c.nation)
        .collect();

    for nation in unresolved {
        let choice = prompt.resolve(ctx.state, ctx.state.war(war_id), nation);
        if choice.justification == JUSTIFICATION_TBD {
            continue;
        }
        let Some(stats) = ctx.scenario.justification(&choice.justification) else {
            tracing::warn!(
                justification = %choice.justification,
                "prompt returned an unknown justification, ignoring"
            );
            continue;
        };
        let limit = stats.claim_limit as usize;
        ctx.state.war_mut(war_id).combatant_mut(nation).justification =
            choice.justification.clone();
        for region in choice.claims.into_iter().take(limit) {
            add_claim(ctx.state, war_id, nation, region);
        }
    }
}

/// Apply one winning combatant's justification: territorial claims,
/// stockpile transfers, penalty tags, and puppet/independence changes.
fn resolve_justification(ctx: &mut TurnContext, war_id: u64, nation: u64) {
    let (justification, target, claims) = {
        let combatant = ctx.state.war(war_id).combatant(nation);
        if !combatant.has_justification() {
            return;
        }
        (
            combatant.justification.clone(),
            combatant.target,
            combatant.claims.clone(),
        )
    };
    let Some(stats) = ctx.scenario.justification(&justification).cloned() else {
        tracing::warn!(%justification, "no justification table entry, skipping resolution");
        return;
    };

    let turn = ctx.state.turn;
    let nation_name = ctx.state.nation(nation).name.clone();

    // Claims transfer only while the snapshot still matches the current
    // owner; anything that changed hands mid-war is dropped.
    for (region_id, original_owner) in claims {
        let region = ctx.state.region_mut(region_id);
        if region.owner != original_owner {
            tracing::debug!(region = region_id, "stale claim skipped");
            continue;
        }
        region.owner = nation;
        region.occupier = None;
        let region_name = region.name.clone();
        ctx.state
            .war_mut(war_id)
            .record(turn, format!("{region_name} was annexed by {nation_name}"));
    }

    for (resource, amount) in &stats.winner_gains {
        ctx.state.nation_mut(nation).adjust_stockpile(resource, *amount);
    }
    for (resource, amount) in &stats.loser_penalties {
        ctx.state.nation_mut(target).adjust_stockpile(resource, -*amount);
    }
    if let Some((tag_name, duration)) = &stats.penalty_tag {
        ctx.state.nation_mut(target).tags.push(Tag {
            name: tag_name.clone(),
            turns_remaining: *duration,
            rival: None,
            roll_bonus: 0,
            damage_bonus: 0,
        });
    }

    if stats.grants_independence && ctx.state.nation(nation).overlord == Some(target) {
        let n = ctx.state.nation_mut(nation);
        n.overlord = None;
        n.status = "Independent".to_string();
        ctx.notifications.push(Notification::new(
            Priority::Alert,
            format!("{nation_name} has won its independence"),
        ));
    }
    if stats.frees_puppets {
        release_puppets(ctx.state, target);
    }
    if stats.puppets_loser {
        // Puppeting the loser cascades: their own clients go free first.
        release_puppets(ctx.state, target);
        let target_nation = ctx.state.nation_mut(target);
        target_nation.overlord = Some(nation);
        target_nation.status = format!("Puppet of {nation_name}");
    }
}

/// Release every puppet of `overlord`. Their own client states, if any,
/// keep their current obligations.
fn release_puppets(state: &mut GameState, overlord: u64) {
    for puppet in state.puppets_of(overlord) {
        let n = state.nation_mut(puppet);
        n.overlord = None;
        n.status = "Independent".to_string();
    }
}

/// Clear occupier flags between the two sides of a war.
fn clear_occupations(state: &mut GameState, war_id: u64) {
    let cleared: Vec<u64> = {
        let war = state.war(war_id);
        state
            .regions
            .values()
            .filter(|region| {
                let Some(occupier) = region.occupier else {
                    return false;
                };
                match (
                    war.combatants.get(&region.owner),
                    war.combatants.get(&occupier),
                ) {
                    (Some(owner), Some(occ)) => owner.side() != occ.side(),
                    _ => false,
                }
            })
            .map(|r| r.id)
            .collect()
    };
    for region in cleared {
        state.region_mut(region).occupier = None;
    }
}

/// Units of either side left standing in foreign territory with no
/// occupation rights fall back to the nearest friendly, unoccupied,
/// unit-free region; with nowhere to go, they disband.
fn withdraw_stranded_units(ctx: &mut TurnContext, war_id: u64) {
    let stranded: Vec<(u64, u64)> = {
        let war = ctx.state.war(war_id);
        ctx.state
            .regions
            .values()
            .filter_map(|region| {
                let unit = region.unit.as_ref()?;
                if !war.combatants.contains_key(&unit.owner) {
                    return None;
                }
                if region.owner == unit.owner || region.occupier == Some(unit.owner) {
                    return None;
                }
                Some((region.id, unit.owner))
            })
            .collect()
    };

    let turn = ctx.state.turn;
    for (region_id, owner) in stranded {
        match withdrawal_target(ctx.state, region_id, owner) {
            Some(destination) => {
                let unit = ctx.state.region_mut(region_id).unit.take().unwrap();
                ctx.state.region_mut(destination).unit = Some(unit);
            }
            None => {
                let unit = ctx.state.region_mut(region_id).unit.take().unwrap();
                let nation = ctx.state.nation_mut(owner);
                nation.unit_count = nation.unit_count.saturating_sub(1);
                let owner_name = ctx.state.nation(owner).name.clone();
                ctx.state.war_mut(war_id).record(
                    turn,
                    format!(
                        "{} of {owner_name} disbanded with no line of retreat",
                        unit.kind
                    ),
                );
            }
        }
    }
}
