//! Static scenario data: unit, improvement, missile and war-justification
//! tables. Loaded once per game and immutable afterward; the engine reads
//! these through a shared `&Scenario` and never mutates them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Improvement max-health sentinel meaning "no health bar": any successful
/// missile hit destroys the improvement outright, and ground assaults treat
/// it as indestructible-by-attrition.
pub const NO_HEALTH_BAR: i32 = 99;

/// Research granting a main combatant +50 on their own surrender threshold.
pub const UNYIELDING_TECH: &str = "Unyielding";

/// Research doubling the per-turn occupation score of its owner.
pub const SCORCHED_EARTH_TECH: &str = "Scorched Earth";

/// A defense a unit or improvement type offers against a missile class:
/// an interception chance, effective within `range` regions of the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    pub chance: f64,
    pub range: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Minimum d10 roll (after modifiers) that scores a hit.
    pub hit_value: i32,
    /// Base damage against improvements.
    pub damage: i32,
    pub victory_damage: i32,
    pub draw_damage: i32,
    pub max_health: i32,
    /// Special Forces ignore improvement armor entirely.
    pub special_forces: bool,
    pub missile_defense: Option<Defense>,
    pub nuke_defense: Option<Defense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementStats {
    /// `NO_HEALTH_BAR` for improvements without a health bar.
    pub max_health: i32,
    pub armor: i32,
    /// Damage dealt back to an attacking unit.
    pub damage: i32,
    pub missile_defense: Option<Defense>,
    pub nuke_defense: Option<Defense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissileStats {
    pub nuclear: bool,
    /// Accuracy difficulty per target kind: a uniform draw in [0, 1) hits
    /// when it is at or above this value, so 0.0 always hits.
    pub improvement_accuracy: f64,
    pub unit_accuracy: f64,
    pub improvement_damage: i32,
    pub unit_damage: i32,
    pub cost_resource: String,
    pub cost: f64,
}

/// Post-war effects of a casus belli. The main victor's entry also sets the
/// truce length and the war's display-name pattern (`%A` attacker,
/// `%D` defender).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JustificationStats {
    pub name_pattern: String,
    pub truce_length: u32,
    pub claim_limit: u32,
    pub winner_gains: BTreeMap<String, f64>,
    pub loser_penalties: BTreeMap<String, f64>,
    /// Timed tag applied to the loser, with its duration in turns.
    pub penalty_tag: Option<(String, u32)>,
    /// Loser becomes a puppet of the winner; the loser's own puppets are
    /// released in the process.
    pub puppets_loser: bool,
    /// All of the loser's puppet states are released.
    pub frees_puppets: bool,
    /// A winner that was the loser's puppet gains independence.
    pub grants_independence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub units: BTreeMap<String, UnitStats>,
    pub improvements: BTreeMap<String, ImprovementStats>,
    pub missiles: BTreeMap<String, MissileStats>,
    pub justifications: BTreeMap<String, JustificationStats>,
    /// Research names that count as offensive doctrine.
    pub offense_research: BTreeSet<String>,
    /// Research names that count as defensive doctrine.
    pub defense_research: BTreeSet<String>,
    /// Fallout counter a region receives after a nuclear strike.
    pub fallout_start: u32,
}

impl Scenario {
    /// # Panics
    /// Panics on an unknown unit type. Slot kinds are written from this
    /// table, so a miss is a scenario-data bug.
    pub fn unit(&self, kind: &str) -> &UnitStats {
        self.units
            .get(kind)
            .unwrap_or_else(|| panic!("unknown unit type '{kind}'"))
    }

    /// # Panics
    /// Panics on an unknown improvement type.
    pub fn improvement(&self, kind: &str) -> &ImprovementStats {
        self.improvements
            .get(kind)
            .unwrap_or_else(|| panic!("unknown improvement type '{kind}'"))
    }

    /// # Panics
    /// Panics on an unknown missile type.
    pub fn missile(&self, kind: &str) -> &MissileStats {
        self.missiles
            .get(kind)
            .unwrap_or_else(|| panic!("unknown missile type '{kind}'"))
    }

    pub fn justification(&self, key: &str) -> Option<&JustificationStats> {
        self.justifications.get(key)
    }

    /// The default ruleset.
    pub fn standard() -> Self {
        let mut units = BTreeMap::new();
        units.insert("Infantry".to_string(), UnitStats {
            hit_value: 6,
            damage: 2,
            victory_damage: 2,
            draw_damage: 1,
            max_health: 6,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Mechanized Infantry".to_string(), UnitStats {
            hit_value: 6,
            damage: 2,
            victory_damage: 3,
            draw_damage: 1,
            max_health: 8,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Light Tank".to_string(), UnitStats {
            hit_value: 5,
            damage: 2,
            victory_damage: 2,
            draw_damage: 1,
            max_health: 6,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Tank".to_string(), UnitStats {
            hit_value: 5,
            damage: 3,
            victory_damage: 3,
            draw_damage: 2,
            max_health: 8,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Anti-Tank".to_string(), UnitStats {
            hit_value: 6,
            damage: 2,
            victory_damage: 2,
            draw_damage: 1,
            max_health: 5,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Artillery".to_string(), UnitStats {
            hit_value: 7,
            damage: 3,
            victory_damage: 2,
            draw_damage: 1,
            max_health: 5,
            special_forces: false,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Special Forces".to_string(), UnitStats {
            hit_value: 4,
            damage: 3,
            victory_damage: 3,
            draw_damage: 1,
            max_health: 6,
            special_forces: true,
            missile_defense: None,
            nuke_defense: None,
        });
        units.insert("Mobile Anti-Air".to_string(), UnitStats {
            hit_value: 7,
            damage: 1,
            victory_damage: 1,
            draw_damage: 1,
            max_health: 5,
            special_forces: false,
            missile_defense: Some(Defense {
                chance: 0.5,
                range: 2,
            }),
            nuke_defense: None,
        });

        let mut improvements = BTreeMap::new();
        improvements.insert("Capital".to_string(), ImprovementStats {
            max_health: 10,
            armor: 2,
            damage: 2,
            missile_defense: None,
            nuke_defense: None,
        });
        improvements.insert("Entrenchment".to_string(), ImprovementStats {
            max_health: 4,
            armor: 1,
            damage: 1,
            missile_defense: None,
            nuke_defense: None,
        });
        improvements.insert("Military Base".to_string(), ImprovementStats {
            max_health: 8,
            armor: 1,
            damage: 2,
            missile_defense: None,
            nuke_defense: None,
        });
        improvements.insert("Air Defense Battery".to_string(), ImprovementStats {
            max_health: 6,
            armor: 0,
            damage: 1,
            missile_defense: Some(Defense {
                chance: 0.65,
                range: 3,
            }),
            nuke_defense: None,
        });
        improvements.insert("Bunker Complex".to_string(), ImprovementStats {
            max_health: 8,
            armor: 2,
            damage: 1,
            missile_defense: None,
            nuke_defense: Some(Defense {
                chance: 0.25,
                range: 2,
            }),
        });
        improvements.insert("Radar Station".to_string(), ImprovementStats {
            max_health: NO_HEALTH_BAR,
            armor: 0,
            damage: 0,
            missile_defense: Some(Defense {
                chance: 0.35,
                range: 4,
            }),
            nuke_defense: Some(Defense {
                chance: 0.15,
                range: 4,
            }),
        });
        improvements.insert("Oil Derrick".to_string(), ImprovementStats {
            max_health: NO_HEALTH_BAR,
            armor: 0,
            damage: 0,
            missile_defense: None,
            nuke_defense: None,
        });
        improvements.insert("Factory".to_string(), ImprovementStats {
            max_health: NO_HEALTH_BAR,
            armor: 1,
            damage: 0,
            missile_defense: None,
            nuke_defense: None,
        });

        let mut missiles = BTreeMap::new();
        missiles.insert("Cruise Missile".to_string(), MissileStats {
            nuclear: false,
            improvement_accuracy: 0.3,
            unit_accuracy: 0.45,
            improvement_damage: 4,
            unit_damage: 3,
            cost_resource: "money".to_string(),
            cost: 300.0,
        });
        missiles.insert("Nuclear Missile".to_string(), MissileStats {
            nuclear: true,
            improvement_accuracy: 0.0,
            unit_accuracy: 0.0,
            improvement_damage: 0,
            unit_damage: 0,
            cost_resource: "money".to_string(),
            cost: 1500.0,
        });

        let mut justifications = BTreeMap::new();
        justifications.insert("Conquest".to_string(), JustificationStats {
            name_pattern: "%A Invasion of %D".to_string(),
            truce_length: 6,
            claim_limit: 3,
            winner_gains: BTreeMap::new(),
            loser_penalties: BTreeMap::new(),
            penalty_tag: None,
            puppets_loser: false,
            frees_puppets: false,
            grants_independence: false,
        });
        justifications.insert("Humiliation".to_string(), JustificationStats {
            name_pattern: "%A Humiliation of %D".to_string(),
            truce_length: 4,
            claim_limit: 0,
            winner_gains: BTreeMap::from([("money".to_string(), 500.0)]),
            loser_penalties: BTreeMap::from([("money".to_string(), 500.0)]),
            penalty_tag: Some(("Humiliated".to_string(), 8)),
            puppets_loser: false,
            frees_puppets: false,
            grants_independence: false,
        });
        justifications.insert("Liberation".to_string(), JustificationStats {
            name_pattern: "%A Liberation of %D".to_string(),
            truce_length: 5,
            claim_limit: 1,
            winner_gains: BTreeMap::new(),
            loser_penalties: BTreeMap::new(),
            penalty_tag: None,
            puppets_loser: false,
            frees_puppets: true,
            grants_independence: false,
        });
        justifications.insert("Subjugation".to_string(), JustificationStats {
            name_pattern: "%A Subjugation of %D".to_string(),
            truce_length: 8,
            claim_limit: 0,
            winner_gains: BTreeMap::new(),
            loser_penalties: BTreeMap::new(),
            penalty_tag: None,
            puppets_loser: true,
            frees_puppets: false,
            grants_independence: false,
        });
        justifications.insert("Independence".to_string(), JustificationStats {
            name_pattern: "%A War of Independence".to_string(),
            truce_length: 10,
            claim_limit: 0,
            winner_gains: BTreeMap::new(),
            loser_penalties: BTreeMap::new(),
            penalty_tag: None,
            puppets_loser: false,
            frees_puppets: false,
            grants_independence: true,
        });

        Self {
            units,
            improvements,
            missiles,
            justifications,
            offense_research: BTreeSet::from([
                "Combined Arms".to_string(),
                "Precision Ballistics".to_string(),
            ]),
            defense_research: BTreeSet::from([
                "Fortification".to_string(),
                "Defensive Doctrine".to_string(),
            ]),
            fallout_start: 5,
        }
    }
}
