use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentType {
    Republic,
    Monarchy,
    MilitaryJunta,
    CrimeSyndicate,
}

/// A time-limited marker on a nation. Post-war penalties arrive as tags with
/// a duration; tags may also carry combat bonuses scoped to a single rival
/// nation, in which case the bonus applies only when fighting that rival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub turns_remaining: u32,
    #[serde(default)]
    pub rival: Option<u64>,
    #[serde(default)]
    pub roll_bonus: i32,
    #[serde(default)]
    pub damage_bonus: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nation {
    pub id: u64,
    pub name: String,
    pub government: GovernmentType,
    /// Completed research, by display name.
    pub research: BTreeSet<String>,
    pub tags: Vec<Tag>,
    /// Resource stockpiles by resource name. Never negative.
    pub stockpiles: BTreeMap<String, f64>,
    pub unit_count: u32,
    pub improvement_count: u32,
    /// Set while this nation is a puppet state of another.
    pub overlord: Option<u64>,
    pub status: String,
}

impl Nation {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            government: GovernmentType::Republic,
            research: BTreeSet::new(),
            tags: Vec::new(),
            stockpiles: BTreeMap::new(),
            unit_count: 0,
            improvement_count: 0,
            overlord: None,
            status: "Independent".to_string(),
        }
    }

    pub fn has_research(&self, name: &str) -> bool {
        self.research.contains(name)
    }

    pub fn has_any_research(&self, names: &BTreeSet<String>) -> bool {
        names.iter().any(|n| self.research.contains(n))
    }

    /// Sum of (roll, damage) bonuses from tags that apply against `opponent`.
    /// Unscoped tags apply against everyone; rival-scoped tags only against
    /// their rival.
    pub fn tag_bonus_against(&self, opponent: u64) -> (i32, i32) {
        self.tags
            .iter()
            .filter(|t| t.rival.is_none_or(|r| r == opponent))
            .fold((0, 0), |(roll, damage), t| {
                (roll + t.roll_bonus, damage + t.damage_bonus)
            })
    }

    /// Apply a stockpile delta, flooring at zero.
    pub fn adjust_stockpile(&mut self, resource: &str, delta: f64) {
        let entry = self.stockpiles.entry(resource.to_string()).or_insert(0.0);
        *entry = (*entry + delta).max(0.0);
    }

    pub fn stockpile(&self, resource: &str) -> f64 {
        self.stockpiles.get(resource).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_bonuses_respect_rival_scope() {
        let mut nation = Nation::new(1, "Arcadia");
        nation.tags.push(Tag {
            name: "Vendetta".to_string(),
            turns_remaining: 5,
            rival: Some(7),
            roll_bonus: 1,
            damage_bonus: 0,
        });
        nation.tags.push(Tag {
            name: "War Footing".to_string(),
            turns_remaining: 3,
            rival: None,
            roll_bonus: 0,
            damage_bonus: 1,
        });

        assert_eq!(nation.tag_bonus_against(7), (1, 1));
        assert_eq!(nation.tag_bonus_against(9), (0, 1));
    }

    #[test]
    fn stockpiles_floor_at_zero() {
        let mut nation = Nation::new(1, "Arcadia");
        nation.adjust_stockpile("money", 100.0);
        nation.adjust_stockpile("money", -250.0);
        assert_eq!(nation.stockpile("money"), 0.0);
    }
}
