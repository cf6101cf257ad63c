use serde::{Deserialize, Serialize};

/// A unit standing in a region. Carries identity and current health; all
/// other stats are derived from the unit type's scenario table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSlot {
    pub kind: String,
    pub owner: u64,
    pub health: i32,
}

/// An improvement built in a region. Improvements belong to the region's
/// owner. Health `0` on a Capital means non-functional, not destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementSlot {
    pub kind: String,
    pub health: i32,
}

/// Name of the improvement that is never removed from the map. A destroyed
/// Capital is instead floored at 0 health and left in place.
pub const CAPITAL: &str = "Capital";

impl ImprovementSlot {
    pub fn is_capital(&self) -> bool {
        self.kind == CAPITAL
    }

    pub fn is_functional(&self) -> bool {
        self.health > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub name: String,
    pub owner: u64,
    /// During an active war, a hostile nation currently controlling the
    /// region. Cleared when the war ends.
    pub occupier: Option<u64>,
    /// Post-nuclear-strike penalty counter, decays one per turn.
    pub fallout: u32,
    pub unit: Option<UnitSlot>,
    pub improvement: Option<ImprovementSlot>,
}

impl Region {
    pub fn new(id: u64, name: impl Into<String>, owner: u64) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            occupier: None,
            fallout: 0,
            unit: None,
            improvement: None,
        }
    }

    /// The nation currently controlling the region: the occupier while one
    /// is present, otherwise the owner.
    pub fn controller(&self) -> u64 {
        self.occupier.unwrap_or(self.owner)
    }

    pub fn is_occupied(&self) -> bool {
        self.occupier.is_some()
    }
}
