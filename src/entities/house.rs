//! House entity: a player's empire (§3 House).

use crate::core::config::{TechField, ALL_TECH_FIELDS};
use crate::core::ids::HouseId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomaticStatus {
    War,
    Hostile,
    Neutral,
    NonAggression,
    Alliance,
}

impl DiplomaticStatus {
    /// War always triggers combat when fleets share a system; Hostile only
    /// does when at least one fleet is under an engaging stance (§4.3).
    pub fn always_triggers_combat(self) -> bool {
        self == DiplomaticStatus::War
    }

    pub fn can_trigger_combat(self) -> bool {
        matches!(self, DiplomaticStatus::War | DiplomaticStatus::Hostile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseStatus {
    Active,
    Eliminated,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechTree {
    pub level: HashMap<TechField, u8>,
    pub research_points: HashMap<TechField, u32>,
}

impl TechTree {
    pub fn level_of(&self, field: TechField) -> u8 {
        *self.level.get(&field).unwrap_or(&0)
    }

    pub fn new_baseline() -> Self {
        let mut level = HashMap::new();
        let mut research_points = HashMap::new();
        for &field in ALL_TECH_FIELDS.iter() {
            level.insert(field, 0);
            research_points.insert(field, 0);
        }
        Self { level, research_points }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub name: String,
    pub tech_tree: TechTree,
    pub espionage_budget: i32,
    pub diplomatic_relations: HashMap<HouseId, DiplomaticStatus>,
    pub prestige: i32,
    pub status: HouseStatus,
    /// Accumulated production points (§3/§4.4 step 8, E1 net PP accrual).
    pub treasury: i64,
    /// Consecutive turns this house's prestige moved net-negative; reset to
    /// zero the moment a turn closes flat or positive (§4.5).
    pub consecutive_negative_prestige_turns: u8,
}

impl House {
    pub fn new(id: HouseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tech_tree: TechTree::new_baseline(),
            espionage_budget: 0,
            diplomatic_relations: HashMap::new(),
            prestige: 0,
            status: HouseStatus::Active,
            treasury: 0,
            consecutive_negative_prestige_turns: 0,
        }
    }

    pub fn relation_with(&self, other: HouseId) -> DiplomaticStatus {
        self.diplomatic_relations
            .get(&other)
            .copied()
            .unwrap_or(DiplomaticStatus::Neutral)
    }

    pub fn is_active(&self) -> bool {
        self.status == HouseStatus::Active
    }
}
