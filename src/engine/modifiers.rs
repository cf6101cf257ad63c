//! Combat modifier calculator. Pure: reads state and scenario tables,
//! returns per-side (roll, damage) bonuses, touches nothing.

use crate::model::{GameState, Side, War};
use crate::scenario::Scenario;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideModifiers {
    pub roll: i32,
    pub damage: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncounterModifiers {
    pub attacker: SideModifiers,
    pub defender: SideModifiers,
}

fn has_adjacent_friendly_unit(state: &GameState, region: u64, owner: u64, kind: &str) -> bool {
    state.adjacent_regions(region).iter().any(|&adj| {
        state
            .region(adj)
            .unit
            .as_ref()
            .is_some_and(|u| u.owner == owner && u.kind == kind)
    })
}

fn has_supporting_military_base(state: &GameState, region: u64, owner: u64) -> bool {
    let base_in = |id: u64| {
        let r = state.region(id);
        r.owner == owner
            && r.improvement
                .as_ref()
                .is_some_and(|imp| imp.kind == "Military Base" && imp.is_functional())
    };
    base_in(region) || state.adjacent_regions(region).iter().any(|&adj| base_in(adj))
}

/// Unit-type synergy: +1 roll for each supported pairing with an adjacent
/// friendly unit, and for anti-armor units engaging infantry.
fn synergy_roll_bonus(
    state: &GameState,
    region: u64,
    owner: u64,
    own_kind: &str,
    opposing_kind: Option<&str>,
) -> i32 {
    let mut bonus = 0;
    match own_kind {
        "Tank" if has_adjacent_friendly_unit(state, region, owner, "Mechanized Infantry") => {
            bonus += 1;
        }
        "Mechanized Infantry" if has_adjacent_friendly_unit(state, region, owner, "Tank") => {
            bonus += 1;
        }
        "Infantry" if has_adjacent_friendly_unit(state, region, owner, "Light Tank") => {
            bonus += 1;
        }
        "Light Tank" if has_adjacent_friendly_unit(state, region, owner, "Infantry") => {
            bonus += 1;
        }
        _ => {}
    }
    if own_kind == "Anti-Tank"
        && matches!(opposing_kind, Some("Infantry" | "Mechanized Infantry"))
    {
        bonus += 1;
    }
    bonus
}

/// Compute both sides' modifiers for one encounter. "Attacker" and
/// "defender" here are encounter-local; the research bonuses look at each
/// nation's role in the war instead, because a counter-raid's local
/// attacker can be the war's defender.
pub fn compute_modifiers(
    state: &GameState,
    scenario: &Scenario,
    war: &War,
    attacker_region: u64,
    defender_region: u64,
) -> EncounterModifiers {
    let att_region = state.region(attacker_region);
    let def_region = state.region(defender_region);
    let att_unit = att_region
        .unit
        .as_ref()
        .unwrap_or_else(|| panic!("region {attacker_region} attacks without a unit"));
    let attacker_nation = att_unit.owner;
    let (defender_nation, def_unit_kind) = match &def_region.unit {
        Some(u) => (u.owner, Some(u.kind.clone())),
        None => (def_region.owner, None),
    };
    let defending_improvement = def_region.unit.is_none();

    let mut mods = EncounterModifiers::default();

    // Role-conditioned doctrine research, judged by war role.
    for (nation_id, side_mods) in [
        (attacker_nation, &mut mods.attacker),
        (defender_nation, &mut mods.defender),
    ] {
        let nation = state.nation(nation_id);
        match war.side_of(nation_id) {
            Side::Attacker if nation.has_any_research(&scenario.offense_research) => {
                side_mods.roll += 1;
            }
            Side::Defender if nation.has_any_research(&scenario.defense_research) => {
                side_mods.roll += 1;
            }
            _ => {}
        }
    }

    // Unit-type synergies from adjacent friendly units.
    mods.attacker.roll += synergy_roll_bonus(
        state,
        attacker_region,
        attacker_nation,
        &att_unit.kind,
        def_unit_kind.as_deref(),
    );
    if let Some(def_kind) = &def_unit_kind {
        mods.defender.roll += synergy_roll_bonus(
            state,
            defender_region,
            defender_nation,
            def_kind,
            Some(&att_unit.kind),
        );
    }

    // Adjacent friendly artillery adds weight of fire.
    if has_adjacent_friendly_unit(state, attacker_region, attacker_nation, "Artillery") {
        mods.attacker.damage += 1;
    }
    if def_unit_kind.is_some()
        && has_adjacent_friendly_unit(state, defender_region, defender_nation, "Artillery")
    {
        mods.defender.damage += 1;
    }

    // Entrenchment in the defending region blunts the assault.
    if def_region
        .improvement
        .as_ref()
        .is_some_and(|imp| imp.kind == "Entrenchment" && imp.is_functional())
    {
        mods.attacker.damage -= 1;
    }

    if defending_improvement {
        // Military base support for assaults on improvements.
        if has_supporting_military_base(state, attacker_region, attacker_nation) {
            mods.attacker.damage += 1;
        }
        // Defensive doctrine hardens improvements.
        if state
            .nation(defender_nation)
            .has_any_research(&scenario.defense_research)
        {
            mods.attacker.damage -= 1;
        }
    }

    // Tag bonuses scoped to the specific opponent.
    let (att_roll, att_damage) = state
        .nation(attacker_nation)
        .tag_bonus_against(defender_nation);
    mods.attacker.roll += att_roll;
    mods.attacker.damage += att_damage;
    let (def_roll, def_damage) = state
        .nation(defender_nation)
        .tag_bonus_against(attacker_nation);
    mods.defender.roll += def_roll;
    mods.defender.damage += def_damage;

    mods
}
