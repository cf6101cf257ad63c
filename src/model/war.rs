use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder justification for combatants who have not yet chosen one.
pub const JUSTIFICATION_TBD: &str = "TBD";

/// A combatant's role within one specific war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarRole {
    MainAttacker,
    MainDefender,
    SecondaryAttacker,
    SecondaryDefender,
}

impl WarRole {
    pub fn side(self) -> Side {
        match self {
            WarRole::MainAttacker | WarRole::SecondaryAttacker => Side::Attacker,
            WarRole::MainDefender | WarRole::SecondaryDefender => Side::Defender,
        }
    }

    pub fn is_main(self) -> bool {
        matches!(self, WarRole::MainAttacker | WarRole::MainDefender)
    }
}

/// Projection of a war role onto one of the two sides of the war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarOutcome {
    Pending,
    AttackerVictory,
    DefenderVictory,
    WhitePeace,
}

/// The six war-score categories. Every award names one of these; the cached
/// total is recomputed from them once per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    Occupation,
    DecisiveBattle,
    UnitsDestroyed,
    ImprovementsDestroyed,
    Capture,
    NuclearStrike,
}

/// Per-side war score record. Field names are dictated by the external save
/// store and must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarScoreData {
    pub occupation: u32,
    pub decisive_battles: u32,
    pub enemy_units_destroyed: u32,
    pub enemy_improvements_destroyed: u32,
    pub captures: u32,
    pub nuclear_strikes: u32,
    /// Cached sum of the six counters, refreshed by `recompute_total`.
    pub total: u32,
}

impl WarScoreData {
    pub fn add(&mut self, category: ScoreCategory, amount: u32) {
        let counter = match category {
            ScoreCategory::Occupation => &mut self.occupation,
            ScoreCategory::DecisiveBattle => &mut self.decisive_battles,
            ScoreCategory::UnitsDestroyed => &mut self.enemy_units_destroyed,
            ScoreCategory::ImprovementsDestroyed => &mut self.enemy_improvements_destroyed,
            ScoreCategory::Capture => &mut self.captures,
            ScoreCategory::NuclearStrike => &mut self.nuclear_strikes,
        };
        *counter += amount;
    }

    /// Recompute the cached total from the six counters. Idempotent: the
    /// total is always replaced, never accumulated.
    pub fn recompute_total(&mut self) -> u32 {
        self.total = self.occupation
            + self.decisive_battles
            + self.enemy_units_destroyed
            + self.enemy_improvements_destroyed
            + self.captures
            + self.nuclear_strikes;
        self.total
    }
}

/// One nation's participation record within one war.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub nation: u64,
    pub role: WarRole,
    /// Key into the scenario's war-justification table; `"TBD"` until set.
    pub justification: String,
    /// The opposing nation this combatant entered the war against.
    pub target: u64,
    /// Claimed region id → the region's owner at claim time. Claims whose
    /// owner has since changed are dropped at resolution, not errored.
    pub claims: BTreeMap<u64, u64>,
    pub attacks_made: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub enemy_units_destroyed: u32,
    pub units_lost: u32,
    pub enemy_improvements_destroyed: u32,
    pub improvements_lost: u32,
    pub missiles_launched: u32,
    pub nukes_launched: u32,
}

impl Combatant {
    pub fn new(nation: u64, role: WarRole, target: u64) -> Self {
        Self {
            nation,
            role,
            justification: JUSTIFICATION_TBD.to_string(),
            target,
            claims: BTreeMap::new(),
            attacks_made: 0,
            battles_won: 0,
            battles_lost: 0,
            enemy_units_destroyed: 0,
            units_lost: 0,
            enemy_improvements_destroyed: 0,
            improvements_lost: 0,
            missiles_launched: 0,
            nukes_launched: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn has_justification(&self) -> bool {
        self.justification != JUSTIFICATION_TBD
    }
}

/// One line of a war's append-only combat log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: u64,
    /// Unique display name, also the war's identity for announcements.
    pub name: String,
    pub start_turn: u32,
    /// 0 while the war is ongoing.
    pub end_turn: u32,
    pub outcome: WarOutcome,
    pub log: Vec<LogEntry>,
    #[serde(rename = "attackerWarScore")]
    pub attacker_score: WarScoreData,
    #[serde(rename = "defenderWarScore")]
    pub defender_score: WarScoreData,
    pub combatants: BTreeMap<u64, Combatant>,
}

impl War {
    pub fn new(id: u64, name: impl Into<String>, start_turn: u32) -> Self {
        Self {
            id,
            name: name.into(),
            start_turn,
            end_turn: 0,
            outcome: WarOutcome::Pending,
            log: Vec::new(),
            attacker_score: WarScoreData::default(),
            defender_score: WarScoreData::default(),
            combatants: BTreeMap::new(),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.outcome == WarOutcome::Pending
    }

    /// # Panics
    /// Panics if `nation` is not on this war's roster — combatant lookups
    /// are only made for nations the caller already knows are enrolled.
    pub fn combatant(&self, nation: u64) -> &Combatant {
        self.combatants
            .get(&nation)
            .unwrap_or_else(|| panic!("war '{}': nation {nation} is not a combatant", self.name))
    }

    /// # Panics
    /// Panics if `nation` is not on this war's roster.
    pub fn combatant_mut(&mut self, nation: u64) -> &mut Combatant {
        let name = self.name.clone();
        self.combatants
            .get_mut(&nation)
            .unwrap_or_else(|| panic!("war '{name}': nation {nation} is not a combatant"))
    }

    pub fn side_of(&self, nation: u64) -> Side {
        self.combatant(nation).side()
    }

    /// The main combatant on the given side.
    ///
    /// # Panics
    /// Panics if the roster is missing its main combatant; every war is
    /// created with exactly one per side.
    pub fn main_on(&self, side: Side) -> &Combatant {
        self.combatants
            .values()
            .find(|c| c.role.is_main() && c.side() == side)
            .unwrap_or_else(|| panic!("war '{}': no main combatant on {side:?} side", self.name))
    }

    pub fn nations_on(&self, side: Side) -> Vec<u64> {
        self.combatants
            .values()
            .filter(|c| c.side() == side)
            .map(|c| c.nation)
            .collect()
    }

    pub fn score(&self, side: Side) -> &WarScoreData {
        match side {
            Side::Attacker => &self.attacker_score,
            Side::Defender => &self.defender_score,
        }
    }

    pub fn score_mut(&mut self, side: Side) -> &mut WarScoreData {
        match side {
            Side::Attacker => &mut self.attacker_score,
            Side::Defender => &mut self.defender_score,
        }
    }

    /// Append a line to the combat log. The log is narration, not a
    /// journal: nothing ever reads it back to reconstruct state.
    pub fn record(&mut self, turn: u32, message: impl Into<String>) {
        self.log.push(LogEntry {
            turn,
            message: message.into(),
        });
    }
}
