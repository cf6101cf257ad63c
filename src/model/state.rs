use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::nation::Nation;
use super::region::Region;
use super::war::War;
use crate::id::IdGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceKind {
    DefensePact,
    TradeAgreement,
}

/// A standing pact between two nations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub a: u64,
    pub b: u64,
    pub kind: AllianceKind,
}

impl Alliance {
    pub fn involves(&self, x: u64, y: u64) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// A post-war non-aggression record. Expires once the current turn reaches
/// `until_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truce {
    pub a: u64,
    pub b: u64,
    pub until_turn: u32,
}

/// The whole mutable game world for one game. Created by the caller at the
/// start of turn processing and passed `&mut` into every engine entry point;
/// there are no process-wide registries. All cross-entity references are ids
/// resolved through these stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u32,
    pub nations: BTreeMap<u64, Nation>,
    pub regions: BTreeMap<u64, Region>,
    /// Static region adjacency graph, symmetric by construction.
    pub adjacency: BTreeMap<u64, Vec<u64>>,
    pub wars: BTreeMap<u64, War>,
    pub alliances: Vec<Alliance>,
    pub truces: Vec<Truce>,
    pub id_gen: IdGenerator,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: 1,
            nations: BTreeMap::new(),
            regions: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            wars: BTreeMap::new(),
            alliances: Vec::new(),
            truces: Vec::new(),
            id_gen: IdGenerator::new(),
        }
    }

    // --- Nations ---

    pub fn add_nation(&mut self, name: impl Into<String>) -> u64 {
        let id = self.id_gen.next_id();
        self.nations.insert(id, Nation::new(id, name));
        id
    }

    /// # Panics
    /// Panics if the nation does not exist. Lookups by id are only made
    /// with ids obtained from this store.
    pub fn nation(&self, id: u64) -> &Nation {
        self.nations
            .get(&id)
            .unwrap_or_else(|| panic!("nation {id} not found"))
    }

    /// # Panics
    /// Panics if the nation does not exist.
    pub fn nation_mut(&mut self, id: u64) -> &mut Nation {
        self.nations
            .get_mut(&id)
            .unwrap_or_else(|| panic!("nation {id} not found"))
    }

    pub fn nation_by_name(&self, name: &str) -> Option<&Nation> {
        self.nations.values().find(|n| n.name == name)
    }

    pub fn puppets_of(&self, overlord: u64) -> Vec<u64> {
        self.nations
            .values()
            .filter(|n| n.overlord == Some(overlord))
            .map(|n| n.id)
            .collect()
    }

    // --- Regions ---

    pub fn add_region(&mut self, name: impl Into<String>, owner: u64) -> u64 {
        let id = self.id_gen.next_id();
        self.regions.insert(id, Region::new(id, name, owner));
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// # Panics
    /// Panics if the region does not exist.
    pub fn region(&self, id: u64) -> &Region {
        self.regions
            .get(&id)
            .unwrap_or_else(|| panic!("region {id} not found"))
    }

    /// # Panics
    /// Panics if the region does not exist.
    pub fn region_mut(&mut self, id: u64) -> &mut Region {
        self.regions
            .get_mut(&id)
            .unwrap_or_else(|| panic!("region {id} not found"))
    }

    /// Connect two regions in the static adjacency graph (both directions).
    pub fn link_regions(&mut self, a: u64, b: u64) {
        assert!(a != b, "region {a} cannot border itself");
        let fwd = self.adjacency.entry(a).or_default();
        if !fwd.contains(&b) {
            fwd.push(b);
        }
        let back = self.adjacency.entry(b).or_default();
        if !back.contains(&a) {
            back.push(a);
        }
    }

    pub fn adjacent_regions(&self, id: u64) -> &[u64] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Regions owned by `nation`.
    pub fn regions_owned_by(&self, nation: u64) -> Vec<u64> {
        self.regions
            .values()
            .filter(|r| r.owner == nation)
            .map(|r| r.id)
            .collect()
    }

    // --- Wars ---

    /// # Panics
    /// Panics if the war does not exist.
    pub fn war(&self, id: u64) -> &War {
        self.wars
            .get(&id)
            .unwrap_or_else(|| panic!("war {id} not found"))
    }

    /// # Panics
    /// Panics if the war does not exist.
    pub fn war_mut(&mut self, id: u64) -> &mut War {
        self.wars
            .get_mut(&id)
            .unwrap_or_else(|| panic!("war {id} not found"))
    }

    pub fn war_by_name(&self, name: &str) -> Option<&War> {
        self.wars.values().find(|w| w.name == name)
    }

    /// The ongoing war in which `a` and `b` fight on opposite sides, if any.
    pub fn active_war_between(&self, a: u64, b: u64) -> Option<u64> {
        self.wars
            .values()
            .find(|w| {
                w.is_ongoing()
                    && match (w.combatants.get(&a), w.combatants.get(&b)) {
                        (Some(ca), Some(cb)) => ca.side() != cb.side(),
                        _ => false,
                    }
            })
            .map(|w| w.id)
    }

    pub fn at_war(&self, a: u64, b: u64) -> bool {
        self.active_war_between(a, b).is_some()
    }

    /// Ongoing wars in which `nation` is a combatant.
    pub fn wars_involving(&self, nation: u64) -> Vec<u64> {
        self.wars
            .values()
            .filter(|w| w.is_ongoing() && w.combatants.contains_key(&nation))
            .map(|w| w.id)
            .collect()
    }

    // --- Alliances & truces ---

    pub fn are_allied(&self, a: u64, b: u64) -> bool {
        self.alliances.iter().any(|al| al.involves(a, b))
    }

    pub fn defense_pact_allies(&self, nation: u64) -> Vec<u64> {
        self.alliances
            .iter()
            .filter(|al| al.kind == AllianceKind::DefensePact)
            .filter_map(|al| {
                if al.a == nation {
                    Some(al.b)
                } else if al.b == nation {
                    Some(al.a)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn are_truced(&self, a: u64, b: u64) -> bool {
        self.truces
            .iter()
            .any(|t| t.until_turn > self.turn && ((t.a == a && t.b == b) || (t.a == b && t.b == a)))
    }

    pub fn add_truce(&mut self, a: u64, b: u64, duration: u32) {
        self.truces.push(Truce {
            a,
            b,
            until_turn: self.turn + duration,
        });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
