use warsim::engine::{
    resolve_encounter, EncounterOutcome, SCORE_FROM_SUCCESSFUL_ATTACK, SCORE_FROM_VICTORY,
    SCORE_PER_CAPITAL_CAPTURE, SCORE_PER_UNIT_DESTROYED,
};
use warsim::model::WarOutcome;
use warsim::testutil::Harness;

/// Two nations at war, one unit facing the other across a border.
struct Front {
    h: Harness,
    attacker: u64,
    defender: u64,
    att_region: u64,
    def_region: u64,
    war: u64,
}

fn front(seed: u64, att_kind: &str, def_kind: Option<&str>) -> Front {
    let mut h = Harness::new(seed);
    let (attacker, att_region) = h.nation_with_region("Arcadia", "Northmark");
    let (defender, def_region) = h.nation_with_region("Borova", "Southmark");
    h.state.link_regions(att_region, def_region);
    h.place_unit(att_region, att_kind, attacker);
    if let Some(kind) = def_kind {
        h.place_unit(def_region, kind, defender);
    }
    let war = h.declared_war(attacker, defender, Some("Conquest"));
    Front {
        h,
        attacker,
        defender,
        att_region,
        def_region,
        war,
    }
}

fn force_hit(h: &mut Harness, kind: &str) {
    h.scenario.units.get_mut(kind).unwrap().hit_value = 1;
}

fn force_miss(h: &mut Harness, kind: &str) {
    h.scenario.units.get_mut(kind).unwrap().hit_value = 11;
}

#[test]
fn non_decisive_assault_hurts_both_sides() {
    // Attacker damage 2, no modifiers, armor 1: net damage 1, below the
    // decisive threshold. The attacker takes the 1-point penalty plus the
    // improvement's own damage; the improvement loses the net damage.
    let mut f = front(1, "Infantry", None);
    f.h.place_improvement(f.def_region, "Military Base");

    let outcome = resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);
    assert_eq!(outcome, EncounterOutcome::Draw);

    let improvement = f.h.state.region(f.def_region).improvement.as_ref().unwrap();
    assert_eq!(improvement.health, 7);
    let unit = f.h.state.region(f.att_region).unit.as_ref().unwrap();
    // 6 max, minus 1 penalty, minus the base's counter-attack of 2.
    assert_eq!(unit.health, 3);
}

#[test]
fn decisive_assault_spares_the_attacker() {
    // Special Forces ignore armor: net damage 3 meets the threshold, so no
    // penalty and no counter-attack come back.
    let mut f = front(2, "Special Forces", None);
    f.h.place_improvement(f.def_region, "Military Base");

    let outcome = resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);
    assert_eq!(outcome, EncounterOutcome::AttackerWin);

    let improvement = f.h.state.region(f.def_region).improvement.as_ref().unwrap();
    assert_eq!(improvement.health, 5);
    let unit = f.h.state.region(f.att_region).unit.as_ref().unwrap();
    assert_eq!(unit.health, f.h.scenario.unit("Special Forces").max_health);

    let war = f.h.state.war(f.war);
    assert_eq!(
        war.attacker_score.decisive_battles,
        SCORE_FROM_SUCCESSFUL_ATTACK
    );
}

#[test]
fn both_missing_is_a_draw_with_draw_damage() {
    let mut f = front(3, "Infantry", Some("Infantry"));
    force_miss(&mut f.h, "Infantry");

    let outcome = resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);
    assert_eq!(outcome, EncounterOutcome::Draw);

    let draw_damage = f.h.scenario.unit("Infantry").draw_damage;
    let max = f.h.scenario.unit("Infantry").max_health;
    let att = f.h.state.region(f.att_region).unit.as_ref().unwrap();
    let def = f.h.state.region(f.def_region).unit.as_ref().unwrap();
    assert_eq!(att.health, max - draw_damage);
    assert_eq!(def.health, max - draw_damage);

    // No war score moves on a draw.
    let war = f.h.state.war(f.war);
    assert_eq!(war.attacker_score.decisive_battles, 0);
    assert_eq!(war.defender_score.decisive_battles, 0);
}

#[test]
fn attacker_victory_awards_score_and_counters() {
    let mut f = front(4, "Tank", Some("Infantry"));
    force_hit(&mut f.h, "Tank");
    force_miss(&mut f.h, "Infantry");

    let outcome = resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);
    assert_eq!(outcome, EncounterOutcome::AttackerWin);

    let victory_damage = f.h.scenario.unit("Tank").victory_damage;
    let def = f.h.state.region(f.def_region).unit.as_ref().unwrap();
    assert_eq!(
        def.health,
        f.h.scenario.unit("Infantry").max_health - victory_damage
    );
    // The winner takes nothing on a clean victory.
    let att = f.h.state.region(f.att_region).unit.as_ref().unwrap();
    assert_eq!(att.health, f.h.scenario.unit("Tank").max_health);

    let war = f.h.state.war(f.war);
    assert_eq!(war.attacker_score.decisive_battles, SCORE_FROM_VICTORY);
    assert_eq!(war.combatant(f.attacker).battles_won, 1);
    assert_eq!(war.combatant(f.attacker).attacks_made, 1);
    assert_eq!(war.combatant(f.defender).battles_lost, 1);
}

#[test]
fn destroyed_units_are_removed_and_scored() {
    let mut f = front(5, "Tank", Some("Infantry"));
    force_hit(&mut f.h, "Tank");
    force_miss(&mut f.h, "Infantry");
    f.h.state
        .region_mut(f.def_region)
        .unit
        .as_mut()
        .unwrap()
        .health = 1;

    resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);

    assert!(f.h.state.region(f.def_region).unit.is_none());
    assert_eq!(f.h.state.nation(f.defender).unit_count, 0);
    let war = f.h.state.war(f.war);
    assert_eq!(
        war.attacker_score.enemy_units_destroyed,
        SCORE_PER_UNIT_DESTROYED
    );
    assert_eq!(war.combatant(f.attacker).enemy_units_destroyed, 1);
    assert_eq!(war.combatant(f.defender).units_lost, 1);
}

#[test]
fn a_fallen_capital_stays_on_the_map() {
    let mut f = front(6, "Special Forces", None);
    f.h.place_improvement(f.def_region, "Capital");
    f.h.state
        .region_mut(f.def_region)
        .improvement
        .as_mut()
        .unwrap()
        .health = 2;

    resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);

    let capital = f.h.state.region(f.def_region).improvement.as_ref().unwrap();
    assert_eq!(capital.kind, "Capital");
    assert_eq!(capital.health, 0);
    // The owner keeps the improvement on the books; only its function is gone.
    assert_eq!(f.h.state.nation(f.defender).improvement_count, 1);
    let war = f.h.state.war(f.war);
    assert_eq!(war.attacker_score.captures, SCORE_PER_CAPITAL_CAPTURE);
}

#[test]
fn counter_raid_awards_through_war_roles() {
    // The war's defender attacks locally; their winnings must land on the
    // defender ledger, not the attacker's.
    let mut f = front(7, "Infantry", Some("Tank"));
    force_miss(&mut f.h, "Infantry");
    force_hit(&mut f.h, "Tank");

    let outcome = resolve_encounter(&mut f.h.ctx(), f.def_region, f.att_region);
    assert_eq!(outcome, EncounterOutcome::AttackerWin);

    let war = f.h.state.war(f.war);
    assert_eq!(war.defender_score.decisive_battles, SCORE_FROM_VICTORY);
    assert_eq!(war.attacker_score.decisive_battles, 0);
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed: u64| {
        let mut f = front(seed, "Tank", Some("Infantry"));
        resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);
        serde_json::to_value(&f.h.state).unwrap()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn health_never_exceeds_maximum_under_negative_modifiers() {
    // A hostile rival tag with a negative damage bonus must not heal the
    // target: damage floors at zero.
    let mut f = front(8, "Infantry", Some("Infantry"));
    force_miss(&mut f.h, "Infantry");
    f.h.state
        .nation_mut(f.attacker)
        .tags
        .push(warsim::model::Tag {
            name: "Shattered Logistics".to_string(),
            turns_remaining: 3,
            rival: None,
            roll_bonus: 0,
            damage_bonus: -5,
        });

    resolve_encounter(&mut f.h.ctx(), f.att_region, f.def_region);

    let max = f.h.scenario.unit("Infantry").max_health;
    let def = f.h.state.region(f.def_region).unit.as_ref().unwrap();
    assert!(def.health <= max);
}

#[test]
#[should_panic(expected = "no active war")]
fn encounters_without_a_shared_war_are_a_caller_bug() {
    let mut h = Harness::new(9);
    let (a, ra) = h.nation_with_region("Arcadia", "Northmark");
    let (_b, rb) = h.nation_with_region("Borova", "Southmark");
    h.state.link_regions(ra, rb);
    h.place_unit(ra, "Infantry", a);
    h.place_unit(rb, "Infantry", _b);
    resolve_encounter(&mut h.ctx(), ra, rb);
}

#[test]
fn ended_wars_never_revert() {
    let mut f = front(10, "Infantry", Some("Infantry"));
    let mut prompt = warsim::testutil::ScriptedPrompt::default();
    warsim::engine::end_war(
        &mut f.h.ctx(),
        f.war,
        WarOutcome::WhitePeace,
        &mut prompt,
    );

    let war = f.h.state.war(f.war);
    assert!(!war.is_ongoing());
    assert_eq!(war.outcome, WarOutcome::WhitePeace);
    assert_ne!(war.end_turn, 0);
}
