//! Combat resolver: executes one encounter between an attacking unit-region
//! and a defending unit- or improvement-region, then settles the bookkeeping
//! (damage, destruction, counters, war score, combat log).

use rand::Rng;

use crate::model::{Notification, Priority, ScoreCategory};

use super::context::TurnContext;
use super::modifiers::{compute_modifiers, EncounterModifiers};
use super::score::{
    award, SCORE_FROM_SUCCESSFUL_ATTACK, SCORE_FROM_VICTORY, SCORE_PER_CAPITAL_CAPTURE,
    SCORE_PER_IMPROVEMENT_DESTROYED, SCORE_PER_UNIT_DESTROYED,
};

/// Net damage at or above this makes an assault on an improvement decisive.
pub const DECISIVE_DAMAGE_THRESHOLD: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    AttackerWin,
    DefenderWin,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    ModifiersComputed,
    RollsExecuted,
    DamageApplied,
    CleanupDone,
}

/// One encounter in flight. Built fresh per clash and discarded after
/// resolution; it never outlives the call that created it.
#[derive(Debug)]
pub struct CombatEncounter {
    pub war: u64,
    pub attacker_region: u64,
    pub defender_region: u64,
    /// Encounter-local roles. These are *not* the war's sides: a
    /// counter-raid's local attacker can be the war's defender.
    pub attacker: u64,
    pub defender: u64,
    phase: Phase,
    modifiers: EncounterModifiers,
}

impl CombatEncounter {
    fn advance(&mut self, from: Phase, to: Phase) {
        assert_eq!(
            self.phase, from,
            "encounter in war {} resolved out of order",
            self.war
        );
        self.phase = to;
    }
}

/// Resolve one attack from `attacker_region` into `defender_region`.
///
/// # Panics
/// Panics if the attacking region has no unit, the defending region has
/// neither unit nor improvement, or the owning nations share no active war.
/// All three are caller bugs: move/attack validation runs before resolution
/// and must have guaranteed them.
pub fn resolve_encounter(
    ctx: &mut TurnContext,
    attacker_region: u64,
    defender_region: u64,
) -> EncounterOutcome {
    let attacker = ctx
        .state
        .region(attacker_region)
        .unit
        .as_ref()
        .unwrap_or_else(|| panic!("region {attacker_region} attacks without a unit"))
        .owner;
    let def_region = ctx.state.region(defender_region);
    let defender = match (&def_region.unit, &def_region.improvement) {
        (Some(unit), _) => unit.owner,
        (None, Some(_)) => def_region.owner,
        (None, None) => panic!("region {defender_region} has nothing to attack"),
    };
    let war = ctx
        .state
        .active_war_between(attacker, defender)
        .unwrap_or_else(|| panic!("no active war between nations {attacker} and {defender}"));

    let mut encounter = CombatEncounter {
        war,
        attacker_region,
        defender_region,
        attacker,
        defender,
        phase: Phase::Created,
        modifiers: EncounterModifiers::default(),
    };

    ctx.state.war_mut(war).combatant_mut(attacker).attacks_made += 1;

    encounter.modifiers = compute_modifiers(
        ctx.state,
        ctx.scenario,
        ctx.state.war(war),
        attacker_region,
        defender_region,
    );
    encounter.advance(Phase::Created, Phase::ModifiersComputed);

    let against_unit = ctx.state.region(defender_region).unit.is_some();
    let outcome = if against_unit {
        resolve_unit_vs_unit(ctx, &mut encounter)
    } else {
        resolve_unit_vs_improvement(ctx, &mut encounter)
    };
    encounter.advance(Phase::DamageApplied, Phase::CleanupDone);
    outcome
}

fn resolve_unit_vs_unit(ctx: &mut TurnContext, enc: &mut CombatEncounter) -> EncounterOutcome {
    let (att_kind, def_kind) = {
        let att = ctx.state.region(enc.attacker_region).unit.as_ref().unwrap();
        let def = ctx.state.region(enc.defender_region).unit.as_ref().unwrap();
        (att.kind.clone(), def.kind.clone())
    };
    let att_stats = ctx.scenario.unit(&att_kind).clone();
    let def_stats = ctx.scenario.unit(&def_kind).clone();

    // Both sides roll an independent d10; a side hits when its modified
    // roll reaches its own unit's hit value.
    let att_roll = ctx.rng.random_range(1..=10) + enc.modifiers.attacker.roll;
    let def_roll = ctx.rng.random_range(1..=10) + enc.modifiers.defender.roll;
    let att_hits = att_roll >= att_stats.hit_value;
    let def_hits = def_roll >= def_stats.hit_value;
    enc.advance(Phase::ModifiersComputed, Phase::RollsExecuted);

    let outcome = match (att_hits, def_hits) {
        (true, false) => EncounterOutcome::AttackerWin,
        (false, true) => EncounterOutcome::DefenderWin,
        _ => EncounterOutcome::Draw,
    };

    // Damage to the defender's unit then the attacker's, never negative.
    let (damage_to_defender, damage_to_attacker) = match outcome {
        EncounterOutcome::AttackerWin => {
            ((att_stats.victory_damage + enc.modifiers.attacker.damage).max(0), 0)
        }
        EncounterOutcome::DefenderWin => {
            (0, (def_stats.victory_damage + enc.modifiers.defender.damage).max(0))
        }
        EncounterOutcome::Draw => (
            (att_stats.draw_damage + enc.modifiers.attacker.damage).max(0),
            (def_stats.draw_damage + enc.modifiers.defender.damage).max(0),
        ),
    };
    ctx.state
        .region_mut(enc.defender_region)
        .unit
        .as_mut()
        .unwrap()
        .health -= damage_to_defender;
    ctx.state
        .region_mut(enc.attacker_region)
        .unit
        .as_mut()
        .unwrap()
        .health -= damage_to_attacker;
    enc.advance(Phase::RollsExecuted, Phase::DamageApplied);

    let turn = ctx.state.turn;
    let att_name = ctx.state.nation(enc.attacker).name.clone();
    let def_name = ctx.state.nation(enc.defender).name.clone();
    match outcome {
        EncounterOutcome::AttackerWin | EncounterOutcome::DefenderWin => {
            let (winner, loser) = if outcome == EncounterOutcome::AttackerWin {
                (enc.attacker, enc.defender)
            } else {
                (enc.defender, enc.attacker)
            };
            let war = ctx.state.war_mut(enc.war);
            award(war, winner, ScoreCategory::DecisiveBattle, SCORE_FROM_VICTORY);
            war.combatant_mut(winner).battles_won += 1;
            war.combatant_mut(loser).battles_lost += 1;
            war.record(
                turn,
                format!(
                    "{att_kind} of {att_name} engaged {def_kind} of {def_name}: {} victory",
                    if winner == enc.attacker { &att_name } else { &def_name }
                ),
            );
        }
        EncounterOutcome::Draw => {
            ctx.state.war_mut(enc.war).record(
                turn,
                format!("{att_kind} of {att_name} engaged {def_kind} of {def_name}: stalemate"),
            );
        }
    }

    // Cleanup. When both units die in the same exchange the processing
    // order is a uniform random pick, not a preference.
    let att_dead = ctx.state.region(enc.attacker_region).unit.as_ref().unwrap().health <= 0;
    let def_dead = ctx.state.region(enc.defender_region).unit.as_ref().unwrap().health <= 0;
    let mut casualties: Vec<(u64, u64)> = Vec::new();
    if att_dead {
        casualties.push((enc.attacker_region, enc.defender));
    }
    if def_dead {
        casualties.push((enc.defender_region, enc.attacker));
    }
    if casualties.len() == 2 && ctx.rng.random_bool(0.5) {
        casualties.swap(0, 1);
    }
    for (region, destroyer) in casualties {
        destroy_unit(ctx, enc.war, region, destroyer);
    }

    outcome
}

fn resolve_unit_vs_improvement(
    ctx: &mut TurnContext,
    enc: &mut CombatEncounter,
) -> EncounterOutcome {
    let att_kind = ctx
        .state
        .region(enc.attacker_region)
        .unit
        .as_ref()
        .unwrap()
        .kind
        .clone();
    let imp_kind = ctx
        .state
        .region(enc.defender_region)
        .improvement
        .as_ref()
        .unwrap()
        .kind
        .clone();
    let att_stats = ctx.scenario.unit(&att_kind).clone();
    let imp_stats = ctx.scenario.improvement(&imp_kind).clone();

    // No opposed rolls against improvements; the assault is deterministic.
    enc.advance(Phase::ModifiersComputed, Phase::RollsExecuted);

    let armor = if att_stats.special_forces { 0 } else { imp_stats.armor };
    let net_damage = att_stats.damage + enc.modifiers.attacker.damage - armor;
    let decisive = net_damage >= DECISIVE_DAMAGE_THRESHOLD;

    ctx.state
        .region_mut(enc.defender_region)
        .improvement
        .as_mut()
        .unwrap()
        .health -= net_damage.max(0);

    if decisive {
        // A decisive breakthrough spares the attacker all counter-damage.
        let war = ctx.state.war_mut(enc.war);
        award(
            war,
            enc.attacker,
            ScoreCategory::DecisiveBattle,
            SCORE_FROM_SUCCESSFUL_ATTACK,
        );
    } else {
        ctx.state
            .region_mut(enc.attacker_region)
            .unit
            .as_mut()
            .unwrap()
            .health -= 1;
        let survives = ctx
            .state
            .region(enc.defender_region)
            .improvement
            .as_ref()
            .unwrap()
            .is_functional();
        if survives {
            let reply = (imp_stats.damage + enc.modifiers.defender.damage).max(0);
            ctx.state
                .region_mut(enc.attacker_region)
                .unit
                .as_mut()
                .unwrap()
                .health -= reply;
        }
    }
    enc.advance(Phase::RollsExecuted, Phase::DamageApplied);

    let turn = ctx.state.turn;
    let att_name = ctx.state.nation(enc.attacker).name.clone();
    ctx.state.war_mut(enc.war).record(
        turn,
        format!(
            "{att_kind} of {att_name} assaulted the {imp_kind}: {}",
            if decisive { "decisive" } else { "repelled with losses" }
        ),
    );

    if ctx
        .state
        .region(enc.defender_region)
        .improvement
        .as_ref()
        .unwrap()
        .health
        <= 0
    {
        destroy_improvement(ctx, enc.war, enc.defender_region, enc.attacker);
    }
    if ctx
        .state
        .region(enc.attacker_region)
        .unit
        .as_ref()
        .unwrap()
        .health
        <= 0
    {
        destroy_unit(ctx, enc.war, enc.attacker_region, enc.defender);
    }

    if decisive {
        EncounterOutcome::AttackerWin
    } else {
        EncounterOutcome::Draw
    }
}

/// Remove the dead unit in `region`, crediting `destroyer`. The destroyer
/// must be on the war's roster; the victim's tallies update only when the
/// victim is too (a bystander's unit has no ledger in this war).
pub(crate) fn destroy_unit(ctx: &mut TurnContext, war_id: u64, region: u64, destroyer: u64) {
    let unit = ctx
        .state
        .region_mut(region)
        .unit
        .take()
        .unwrap_or_else(|| panic!("no unit to destroy in region {region}"));
    let owner = unit.owner;
    let nation = ctx.state.nation_mut(owner);
    nation.unit_count = nation.unit_count.saturating_sub(1);

    let turn = ctx.state.turn;
    let owner_name = ctx.state.nation(owner).name.clone();
    let war = ctx.state.war_mut(war_id);
    war.combatant_mut(destroyer).enemy_units_destroyed += 1;
    if let Some(victim) = war.combatants.get_mut(&owner) {
        victim.units_lost += 1;
    }
    award(
        war,
        destroyer,
        ScoreCategory::UnitsDestroyed,
        SCORE_PER_UNIT_DESTROYED,
    );
    war.record(turn, format!("{} of {owner_name} was destroyed", unit.kind));
}

/// Destroy the improvement in `region`, crediting `destroyer`. A Capital is
/// never removed from the map: it is floored at 0 health instead and the
/// capture score is awarded. Returns whether the slot was actually cleared.
pub(crate) fn destroy_improvement(
    ctx: &mut TurnContext,
    war_id: u64,
    region: u64,
    destroyer: u64,
) -> bool {
    let owner = ctx.state.region(region).owner;
    let is_capital = ctx
        .state
        .region(region)
        .improvement
        .as_ref()
        .unwrap_or_else(|| panic!("no improvement to destroy in region {region}"))
        .is_capital();
    let turn = ctx.state.turn;
    let owner_name = ctx.state.nation(owner).name.clone();

    if is_capital {
        ctx.state
            .region_mut(region)
            .improvement
            .as_mut()
            .unwrap()
            .health = 0;
        let war = ctx.state.war_mut(war_id);
        war.combatant_mut(destroyer).enemy_improvements_destroyed += 1;
        if let Some(victim) = war.combatants.get_mut(&owner) {
            victim.improvements_lost += 1;
        }
        award(
            war,
            destroyer,
            ScoreCategory::Capture,
            SCORE_PER_CAPITAL_CAPTURE,
        );
        let war_name = war.name.clone();
        war.record(turn, format!("the Capital of {owner_name} fell"));
        ctx.notifications.push(Notification::new(
            Priority::Urgent,
            format!("The capital of {owner_name} has fallen in the {war_name}"),
        ));
        return false;
    }

    let imp = ctx.state.region_mut(region).improvement.take().unwrap();
    let nation = ctx.state.nation_mut(owner);
    nation.improvement_count = nation.improvement_count.saturating_sub(1);
    let war = ctx.state.war_mut(war_id);
    war.combatant_mut(destroyer).enemy_improvements_destroyed += 1;
    if let Some(victim) = war.combatants.get_mut(&owner) {
        victim.improvements_lost += 1;
    }
    award(
        war,
        destroyer,
        ScoreCategory::ImprovementsDestroyed,
        SCORE_PER_IMPROVEMENT_DESTROYED,
    );
    war.record(turn, format!("{} of {owner_name} was destroyed", imp.kind));
    true
}
