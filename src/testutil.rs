//! Shared helpers for unit and integration tests: a seeded harness bundling
//! the state/scenario/RNG/notification pieces a `TurnContext` borrows, small
//! world-building shortcuts, and a scripted justification prompt.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::engine::{declare_war, JustificationChoice, JustificationPrompt, TurnContext};
use crate::model::{GameState, ImprovementSlot, Notification, UnitSlot, JUSTIFICATION_TBD};
use crate::scenario::Scenario;

/// Everything a `TurnContext` borrows, in one owned bundle. The RNG is
/// seeded so a test rerun replays identically.
pub struct Harness {
    pub state: GameState,
    pub scenario: Scenario,
    pub rng: SmallRng,
    pub notifications: Vec<Notification>,
}

impl Harness {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(),
            scenario: Scenario::standard(),
            rng: SmallRng::seed_from_u64(seed),
            notifications: Vec::new(),
        }
    }

    pub fn ctx(&mut self) -> TurnContext<'_> {
        TurnContext {
            state: &mut self.state,
            scenario: &self.scenario,
            rng: &mut self.rng,
            notifications: &mut self.notifications,
        }
    }

    /// A nation with one starting region.
    pub fn nation_with_region(&mut self, nation: &str, region: &str) -> (u64, u64) {
        let nation_id = self.state.add_nation(nation);
        let region_id = self.state.add_region(region, nation_id);
        (nation_id, region_id)
    }

    /// Place a fresh unit of `kind` in `region`, keeping the owner's unit
    /// count in step.
    pub fn place_unit(&mut self, region: u64, kind: &str, owner: u64) {
        let health = self.scenario.unit(kind).max_health;
        self.state.region_mut(region).unit = Some(UnitSlot {
            kind: kind.to_string(),
            owner,
            health,
        });
        self.state.nation_mut(owner).unit_count += 1;
    }

    /// Build a fresh improvement of `kind` in `region` for the region's
    /// owner.
    pub fn place_improvement(&mut self, region: u64, kind: &str) {
        let health = self.scenario.improvement(kind).max_health;
        let owner = self.state.region(region).owner;
        self.state.region_mut(region).improvement = Some(ImprovementSlot {
            kind: kind.to_string(),
            health,
        });
        self.state.nation_mut(owner).improvement_count += 1;
    }

    /// Declare a war through the engine entry point.
    pub fn declared_war(
        &mut self,
        attacker: u64,
        defender: u64,
        justification: Option<&str>,
    ) -> u64 {
        let mut ctx = self.ctx();
        declare_war(&mut ctx, attacker, defender, justification)
    }
}

/// Prompt fixture answering from a prepared table; nations without an entry
/// keep the placeholder and are skipped by justification resolution.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub choices: BTreeMap<u64, JustificationChoice>,
    pub calls: u32,
}

impl ScriptedPrompt {
    pub fn answering(nation: u64, justification: &str, claims: Vec<u64>) -> Self {
        let mut prompt = Self::default();
        prompt.choices.insert(
            nation,
            JustificationChoice {
                justification: justification.to_string(),
                claims,
            },
        );
        prompt
    }
}

impl JustificationPrompt for ScriptedPrompt {
    fn resolve(
        &mut self,
        _state: &GameState,
        _war: &crate::model::War,
        nation: u64,
    ) -> JustificationChoice {
        self.calls += 1;
        self.choices
            .get(&nation)
            .cloned()
            .unwrap_or(JustificationChoice {
                justification: JUSTIFICATION_TBD.to_string(),
                claims: Vec::new(),
            })
    }
}
