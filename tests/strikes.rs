use warsim::engine::{resolve_strike, StrikeOutcome, SCORE_PER_NUCLEAR_STRIKE};
use warsim::testutil::Harness;

struct Theater {
    h: Harness,
    striker: u64,
    target_nation: u64,
    target_region: u64,
    war: u64,
}

fn theater(seed: u64) -> Theater {
    let mut h = Harness::new(seed);
    let (striker, _) = h.nation_with_region("Arcadia", "Launch Site");
    let (target_nation, target_region) = h.nation_with_region("Borova", "Harbor");
    h.state.nation_mut(striker).stockpiles.insert("money".to_string(), 5000.0);
    let war = h.declared_war(striker, target_nation, Some("Conquest"));
    Theater {
        h,
        striker,
        target_nation,
        target_region,
        war,
    }
}

/// Make the cruise missile always hit both target kinds.
fn perfect_accuracy(h: &mut Harness) {
    let missile = h.scenario.missiles.get_mut("Cruise Missile").unwrap();
    missile.improvement_accuracy = 0.0;
    missile.unit_accuracy = 0.0;
}

#[test]
fn standard_missile_wears_down_a_finite_health_bar() {
    let mut t = theater(1);
    perfect_accuracy(&mut t.h);
    t.h.place_improvement(t.target_region, "Military Base");

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");
    assert_eq!(outcome, StrikeOutcome::Delivered);

    let improvement = t.h.state.region(t.target_region).improvement.as_ref().unwrap();
    assert_eq!(improvement.health, 4); // 8 minus the missile's fixed 4
    assert_eq!(t.h.state.war(t.war).combatant(t.striker).missiles_launched, 1);
}

#[test]
fn standard_missile_removes_an_emptied_health_bar() {
    let mut t = theater(2);
    perfect_accuracy(&mut t.h);
    t.h.place_improvement(t.target_region, "Military Base");
    t.h.state
        .region_mut(t.target_region)
        .improvement
        .as_mut()
        .unwrap()
        .health = 3;

    resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");

    assert!(t.h.state.region(t.target_region).improvement.is_none());
    assert_eq!(t.h.state.nation(t.target_nation).improvement_count, 0);
}

#[test]
fn improvements_without_health_bars_die_to_any_hit() {
    let mut t = theater(3);
    perfect_accuracy(&mut t.h);
    t.h.place_improvement(t.target_region, "Oil Derrick");

    resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");

    assert!(t.h.state.region(t.target_region).improvement.is_none());
}

#[test]
fn a_struck_capital_only_goes_dark() {
    let mut t = theater(4);
    perfect_accuracy(&mut t.h);
    t.h.place_improvement(t.target_region, "Capital");
    t.h.state
        .region_mut(t.target_region)
        .improvement
        .as_mut()
        .unwrap()
        .health = 3;

    resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");

    let capital = t.h.state.region(t.target_region).improvement.as_ref().unwrap();
    assert_eq!(capital.health, 0);
    assert_eq!(t.h.state.nation(t.target_nation).improvement_count, 1);
}

#[test]
fn a_certain_defender_always_intercepts() {
    let mut t = theater(5);
    perfect_accuracy(&mut t.h);
    t.h.scenario
        .improvements
        .get_mut("Air Defense Battery")
        .unwrap()
        .missile_defense
        .as_mut()
        .unwrap()
        .chance = 1.0;
    t.h.place_improvement(t.target_region, "Military Base");
    let battery_region = t.h.state.add_region("Ridge", t.target_nation);
    t.h.state.link_regions(battery_region, t.target_region);
    t.h.place_improvement(battery_region, "Air Defense Battery");

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");
    assert_eq!(outcome, StrikeOutcome::Intercepted);

    let base = t.h.state.region(t.target_region).improvement.as_ref().unwrap();
    assert_eq!(base.health, 8);
}

#[test]
fn occupied_batteries_cannot_defend() {
    let mut t = theater(6);
    perfect_accuracy(&mut t.h);
    t.h.scenario
        .improvements
        .get_mut("Air Defense Battery")
        .unwrap()
        .missile_defense
        .as_mut()
        .unwrap()
        .chance = 1.0;
    t.h.place_improvement(t.target_region, "Military Base");
    let battery_region = t.h.state.add_region("Ridge", t.target_nation);
    t.h.state.link_regions(battery_region, t.target_region);
    t.h.place_improvement(battery_region, "Air Defense Battery");
    t.h.state.region_mut(battery_region).occupier = Some(t.striker);

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");
    assert_eq!(outcome, StrikeOutcome::Delivered);
}

#[test]
fn standard_defense_search_takes_the_strongest_defender() {
    // A perfect battery and a useless radar are both in range: the search
    // keeps the maximum for standard missiles, so the strike dies.
    let mut t = theater(7);
    perfect_accuracy(&mut t.h);
    t.h.scenario
        .improvements
        .get_mut("Air Defense Battery")
        .unwrap()
        .missile_defense
        .as_mut()
        .unwrap()
        .chance = 1.0;
    t.h.scenario
        .improvements
        .get_mut("Radar Station")
        .unwrap()
        .missile_defense
        .as_mut()
        .unwrap()
        .chance = 0.0;
    let battery_region = t.h.state.add_region("Ridge", t.target_nation);
    t.h.state.link_regions(battery_region, t.target_region);
    t.h.place_improvement(battery_region, "Air Defense Battery");
    let radar_region = t.h.state.add_region("Hilltop", t.target_nation);
    t.h.state.link_regions(radar_region, t.target_region);
    t.h.place_improvement(radar_region, "Radar Station");

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");
    assert_eq!(outcome, StrikeOutcome::Intercepted);
}

#[test]
fn nuclear_defense_search_takes_the_weakest_defender() {
    // Same layout against a nuke: the search keeps the minimum, the
    // useless defender is selected, and the strike goes through.
    let mut t = theater(8);
    t.h.scenario
        .improvements
        .get_mut("Bunker Complex")
        .unwrap()
        .nuke_defense
        .as_mut()
        .unwrap()
        .chance = 1.0;
    t.h.scenario
        .improvements
        .get_mut("Radar Station")
        .unwrap()
        .nuke_defense
        .as_mut()
        .unwrap()
        .chance = 0.0;
    let bunker_region = t.h.state.add_region("Ridge", t.target_nation);
    t.h.state.link_regions(bunker_region, t.target_region);
    t.h.place_improvement(bunker_region, "Bunker Complex");
    let radar_region = t.h.state.add_region("Hilltop", t.target_nation);
    t.h.state.link_regions(radar_region, t.target_region);
    t.h.place_improvement(radar_region, "Radar Station");

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Nuclear Missile");
    assert_eq!(outcome, StrikeOutcome::Delivered);
}

#[test]
fn nuclear_strike_flattens_the_region_and_leaves_fallout() {
    let mut t = theater(9);
    t.h.place_improvement(t.target_region, "Military Base");
    t.h.place_unit(t.target_region, "Infantry", t.target_nation);

    let outcome = resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Nuclear Missile");
    assert_eq!(outcome, StrikeOutcome::Delivered);

    let region = t.h.state.region(t.target_region);
    assert!(region.improvement.is_none());
    assert!(region.unit.is_none());
    assert_eq!(region.fallout, t.h.scenario.fallout_start);

    let war = t.h.state.war(t.war);
    assert_eq!(war.attacker_score.nuclear_strikes, SCORE_PER_NUCLEAR_STRIKE);
    assert_eq!(war.combatant(t.striker).nukes_launched, 1);
}

#[test]
fn nuclear_strike_on_a_capital_leaves_no_fallout() {
    let mut t = theater(10);
    t.h.place_improvement(t.target_region, "Capital");

    resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Nuclear Missile");

    let region = t.h.state.region(t.target_region);
    let capital = region.improvement.as_ref().unwrap();
    assert_eq!(capital.health, 0);
    assert_eq!(region.fallout, 0);
}

#[test]
fn launch_costs_come_out_of_the_stockpile() {
    let mut t = theater(11);
    perfect_accuracy(&mut t.h);

    resolve_strike(&mut t.h.ctx(), t.striker, t.target_region, "Cruise Missile");

    assert_eq!(t.h.state.nation(t.striker).stockpile("money"), 4700.0);
}

#[test]
#[should_panic(expected = "no active war")]
fn strikes_without_a_shared_war_are_a_caller_bug() {
    let mut h = Harness::new(12);
    let (striker, _) = h.nation_with_region("Arcadia", "Launch Site");
    let (_other, target) = h.nation_with_region("Borova", "Harbor");
    resolve_strike(&mut h.ctx(), striker, target, "Cruise Missile");
}
