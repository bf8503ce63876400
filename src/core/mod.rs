//! Engine core: ids, errors, config, RNG, the event bus, and the root
//! [`GameState`] aggregate (§3).

pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;

use crate::core::ids::{ColonyId, HouseId, IdCounters, ProposalId};
use crate::entities::colony::ColonyStore;
use crate::entities::construction::{ConstructionProject, PopulationTransfer, Proposal, RepairProject};
use crate::entities::facility::{KastraStore, NeoriaStore};
use crate::entities::fleet::FleetStore;
use crate::entities::ground_unit::GroundUnitStore;
use crate::entities::house::House;
use crate::entities::ongoing_effect::OngoingEffect;
use crate::entities::ship::ShipStore;
use crate::entities::squadron::SquadronStore;
use crate::entities::star_map::StarMap;
use crate::intel::IntelDatabase;
use error::EngineResult;
use event::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four ordered phases a turn passes through (§4 C7/C9/C10/C11, in that
/// order, after RNG initialization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Conflict,
    Income,
    Command,
    Production,
}

/// The entire authoritative game state. `resolve_turn` takes one of these
/// by value and returns a new one — nothing here is ever mutated from
/// outside the engine (§5 "GameState is the only thing the engine
/// mutates").
#[derive(Debug, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u64,
    pub phase: Phase,
    pub id_counters: IdCounters,
    pub houses: HashMap<HouseId, House>,
    pub star_map: StarMap,
    pub colonies: ColonyStore,
    pub fleets: FleetStore,
    pub ships: ShipStore,
    pub neoria: NeoriaStore,
    pub kastra: KastraStore,
    pub ground_units: GroundUnitStore,
    pub squadrons: SquadronStore,
    pub construction_projects: Vec<ConstructionProject>,
    pub repair_projects: Vec<RepairProject>,
    pub population_transfers: Vec<PopulationTransfer>,
    pub proposals: HashMap<ProposalId, Proposal>,
    pub ongoing_effects: Vec<OngoingEffect>,
    pub intel: HashMap<HouseId, IntelDatabase>,
    pub last_turn_events: Vec<Event>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: 0,
            phase: Phase::Conflict,
            id_counters: IdCounters::default(),
            houses: HashMap::new(),
            star_map: StarMap::new(),
            colonies: ColonyStore::new(),
            fleets: FleetStore::new(),
            ships: ShipStore::new(),
            neoria: NeoriaStore::new(),
            kastra: KastraStore::new(),
            ground_units: GroundUnitStore::new(),
            squadrons: SquadronStore::new(),
            construction_projects: Vec::new(),
            repair_projects: Vec::new(),
            population_transfers: Vec::new(),
            proposals: HashMap::new(),
            ongoing_effects: Vec::new(),
            intel: HashMap::new(),
            last_turn_events: Vec::new(),
        }
    }

    pub fn add_house(&mut self, house: House) {
        self.intel.insert(house.id, IntelDatabase::new());
        self.houses.insert(house.id, house);
    }

    pub fn active_houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values().filter(|h| h.is_active())
    }

    pub fn colony_owner(&self, colony: ColonyId) -> EngineResult<HouseId> {
        Ok(self.colonies.get(colony)?.owner)
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        crate::entities::validate_all(
            &self.ships,
            &self.fleets,
            &self.neoria,
            &self.kastra,
            &self.ground_units,
            &self.squadrons,
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_house_gets_an_intel_database() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "Atreides"));
        assert!(state.intel.contains_key(&HouseId(0)));
    }

    #[test]
    fn empty_state_has_no_active_houses() {
        let state = GameState::new();
        assert_eq!(state.active_houses().count(), 0);
    }
}
