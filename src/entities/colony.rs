//! Colony entity and its store (§3 Colony, P3). A colony's id is numerically
//! equal to the system it occupies, so the store is keyed directly by
//! `ColonyId` with no secondary index.

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{ColonyId, GroundUnitId, HouseId, KastraId, NeoriaId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A colony's souls floor (P3: `souls >= 1,000,000`). Below this a colony
/// can no longer support a population figure of at least one and is
/// considered lost rather than merely shrunk.
pub const MIN_SOULS: u64 = 1_000_000;

/// One soul-unit per population figure shown to players (P3:
/// `population == souls / 1_000_000`).
pub const SOULS_PER_POPULATION: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetClass {
    Terran,
    Oceanic,
    Arid,
    Tundra,
    Barren,
    GasGiant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub id: ColonyId,
    pub owner: HouseId,
    /// Raw population count; §P3 requires `souls >= MIN_SOULS` and
    /// `population() == souls / SOULS_PER_POPULATION`.
    pub souls: u64,
    pub planet_class: PlanetClass,
    pub infrastructure: i32,
    /// Percentage of gross colony output collected as treasury income.
    pub tax_rate: u8,
    /// Terraforming progress toward the next habitability tier (§4.7).
    pub terraform_level: u8,
    pub blockaded: bool,
    pub capacity_overage_turns: u8,
    pub neoria: Vec<NeoriaId>,
    pub kastra: Option<KastraId>,
    pub ground_units: Vec<GroundUnitId>,
}

impl Colony {
    /// Derived population figure shown to players (P3).
    pub fn population(&self) -> u64 {
        self.souls / SOULS_PER_POPULATION
    }

    pub fn check_invariants(&self) -> EngineResult<()> {
        if self.souls < MIN_SOULS {
            return Err(EngineError::invariant(format!(
                "{} has {} souls, below the {MIN_SOULS} floor",
                self.id, self.souls
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ColonyStore {
    colonies: HashMap<ColonyId, Colony>,
}

impl ColonyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, colony: Colony) {
        self.colonies.insert(colony.id, colony);
    }

    pub fn get(&self, id: ColonyId) -> EngineResult<&Colony> {
        self.colonies
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in colony store")))
    }

    pub fn get_mut(&mut self, id: ColonyId) -> EngineResult<&mut Colony> {
        self.colonies
            .get_mut(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in colony store")))
    }

    pub fn remove(&mut self, id: ColonyId) -> EngineResult<Colony> {
        self.colonies
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in colony store")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Colony> {
        self.colonies.values()
    }

    pub fn owned_by(&self, house: HouseId) -> impl Iterator<Item = &Colony> {
        self.colonies.values().filter(move |c| c.owner == house)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_is_souls_divided_by_a_million() {
        let colony = Colony {
            id: ColonyId(0),
            owner: HouseId(0),
            souls: 4_500_000,
            planet_class: PlanetClass::Terran,
            infrastructure: 10,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        };
        assert_eq!(colony.population(), 4);
    }

    #[test]
    fn below_the_souls_floor_is_an_invariant_violation() {
        let colony = Colony {
            id: ColonyId(0),
            owner: HouseId(0),
            souls: 999,
            planet_class: PlanetClass::Terran,
            infrastructure: 10,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        };
        assert!(colony.check_invariants().is_err());
    }
}
