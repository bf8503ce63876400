//! Fog-of-war intelligence (C12, §3 Intel).
//!
//! Each house keeps its own [`IntelDatabase`]. Point observations (what a
//! system/fleet/colony currently looks like) are overwritten by id every
//! time a fresher one arrives; encounter and blockade reports are
//! append-only, since they describe something that happened rather than a
//! standing fact.

use crate::core::ids::{ColonyId, FleetId, HouseId, KastraId, SquadronId, SystemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How good a house's view of something is. Better quality strictly
/// dominates worse quality and is never corrupted (§3 "Perfect intel is
/// never corrupted").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObservationQuality {
    Visual,
    Spy,
    Perfect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemObservation {
    pub system: SystemId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub owner: Option<HouseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetObservation {
    pub fleet: FleetId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub ship_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyObservation {
    pub colony: ColonyId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub population: u64,
    pub infrastructure: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalObservation {
    pub system: SystemId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub neoria_present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarbaseObservation {
    pub kastra: KastraId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub hull_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadronObservation {
    pub squadron: SquadronId,
    pub turn_observed: u64,
    pub quality: ObservationQuality,
    pub member_count: u32,
}

/// An append-only record of a scout meeting another house's fleet (§3
/// ScoutEncounterReport — never overwritten, only ever added to).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutEncounterReport {
    pub turn: u64,
    pub system: SystemId,
    pub encountered: HouseId,
    pub fleet_size_estimate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockadeReport {
    pub turn: u64,
    pub system: SystemId,
    pub blockading_house: HouseId,
}

/// A single house's accumulated view of the galaxy.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IntelDatabase {
    pub systems: HashMap<SystemId, SystemObservation>,
    pub fleets: HashMap<FleetId, FleetObservation>,
    pub colonies: HashMap<ColonyId, ColonyObservation>,
    pub orbitals: HashMap<SystemId, OrbitalObservation>,
    pub starbases: HashMap<KastraId, StarbaseObservation>,
    pub squadrons: HashMap<SquadronId, SquadronObservation>,
    pub scout_encounters: Vec<ScoutEncounterReport>,
    pub blockade_reports: Vec<BlockadeReport>,
}

impl IntelDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point observations overwrite by id regardless of the previous
    /// quality — a fresher, worse-quality look still reflects the system's
    /// current truth better than a stale, better-quality one (§3).
    pub fn observe_system(&mut self, observation: SystemObservation) {
        self.systems.insert(observation.system, observation);
    }

    pub fn observe_fleet(&mut self, observation: FleetObservation) {
        self.fleets.insert(observation.fleet, observation);
    }

    pub fn observe_colony(&mut self, observation: ColonyObservation) {
        self.colonies.insert(observation.colony, observation);
    }

    pub fn file_scout_encounter(&mut self, report: ScoutEncounterReport) {
        self.scout_encounters.push(report);
    }

    pub fn file_blockade_report(&mut self, report: BlockadeReport) {
        self.blockade_reports.push(report);
    }
}

/// Determine the best quality of intel `observer` can get on `system` this
/// turn, given what presence it has there (§4.x "visibility filter"). A
/// spy network gives `Spy` quality even with no fleet present; a house's
/// own colony or fleet in the system gives `Perfect`.
pub fn visibility_quality(
    observer_has_presence: bool,
    observer_has_spy_network: bool,
) -> Option<ObservationQuality> {
    if observer_has_presence {
        Some(ObservationQuality::Perfect)
    } else if observer_has_spy_network {
        Some(ObservationQuality::Spy)
    } else {
        None
    }
}

/// C12: refresh every house's view of the galaxy at the end of a turn. A
/// house sees `Perfect` quality for any system it holds a colony or fleet
/// in; elsewhere, a nonzero espionage budget buys `Spy` quality. Systems
/// with neither are left exactly as last observed (§3 "fog of war persists
/// until refreshed").
pub fn update_all(state: &mut crate::core::GameState) {
    let turn = state.turn;
    let mut systems: std::collections::BTreeSet<SystemId> =
        state.colonies.iter().map(|c| SystemId::from(c.id)).collect();
    systems.extend(state.fleets.iter().map(|f| f.system));

    let house_ids: Vec<_> = state.houses.keys().copied().collect();
    for observer in house_ids {
        let has_spy_network = match state.houses.get(&observer) {
            Some(house) => house.espionage_budget > 0,
            None => continue,
        };
        for &system in &systems {
            let fleets_here = state.fleets.fleets_at(system);
            let colony = state.colonies.get(ColonyId::from(system)).ok();
            let observer_has_presence = fleets_here
                .iter()
                .filter_map(|&fid| state.fleets.get(fid).ok())
                .any(|f| f.owner == observer)
                || colony.map(|c| c.owner == observer).unwrap_or(false);

            let Some(quality) = visibility_quality(observer_has_presence, has_spy_network) else { continue };
            let Some(db) = state.intel.get_mut(&observer) else { continue };

            let owner = colony.map(|c| c.owner);
            db.observe_system(SystemObservation { system, turn_observed: turn, quality, owner });

            if let Some(colony) = colony {
                db.observe_colony(ColonyObservation {
                    colony: colony.id,
                    turn_observed: turn,
                    quality,
                    population: colony.population(),
                    infrastructure: colony.infrastructure,
                });
            }

            for &fleet_id in fleets_here {
                if let Ok(fleet) = state.fleets.get(fleet_id) {
                    if fleet.owner == observer {
                        continue;
                    }
                    let ship_count = state.ships.ships_in_fleet(fleet_id).len() as u32;
                    db.observe_fleet(FleetObservation { fleet: fleet_id, turn_observed: turn, quality, ship_count });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_all_gives_a_colony_owner_perfect_intel_on_their_own_system() {
        let mut state = crate::core::GameState::new();
        state.add_house(crate::entities::house::House::new(HouseId(0), "A"));
        state.colonies.insert(crate::entities::colony::Colony {
            id: ColonyId(0),
            owner: HouseId(0),
            souls: 2_000_000,
            planet_class: crate::entities::colony::PlanetClass::Terran,
            infrastructure: 5,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        });
        update_all(&mut state);
        let db = &state.intel[&HouseId(0)];
        assert_eq!(db.systems[&SystemId(0)].quality, ObservationQuality::Perfect);
        assert_eq!(db.colonies[&ColonyId(0)].population, 2);
    }

    #[test]
    fn update_all_leaves_a_house_with_no_presence_or_spies_blind() {
        let mut state = crate::core::GameState::new();
        state.add_house(crate::entities::house::House::new(HouseId(0), "A"));
        state.add_house(crate::entities::house::House::new(HouseId(1), "B"));
        state.colonies.insert(crate::entities::colony::Colony {
            id: ColonyId(0),
            owner: HouseId(0),
            souls: 2_000_000,
            planet_class: crate::entities::colony::PlanetClass::Terran,
            infrastructure: 5,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        });
        update_all(&mut state);
        assert!(state.intel[&HouseId(1)].systems.is_empty());
    }

    #[test]
    fn presence_yields_perfect_quality() {
        assert_eq!(visibility_quality(true, false), Some(ObservationQuality::Perfect));
    }

    #[test]
    fn no_presence_and_no_spies_yields_no_intel() {
        assert_eq!(visibility_quality(false, false), None);
    }

    #[test]
    fn observations_overwrite_by_id() {
        let mut db = IntelDatabase::new();
        db.observe_system(SystemObservation {
            system: SystemId(0),
            turn_observed: 1,
            quality: ObservationQuality::Visual,
            owner: None,
        });
        db.observe_system(SystemObservation {
            system: SystemId(0),
            turn_observed: 2,
            quality: ObservationQuality::Perfect,
            owner: Some(HouseId(3)),
        });
        assert_eq!(db.systems[&SystemId(0)].owner, Some(HouseId(3)));
        assert_eq!(db.systems.len(), 1);
    }

    #[test]
    fn scout_encounters_are_append_only() {
        let mut db = IntelDatabase::new();
        db.file_scout_encounter(ScoutEncounterReport {
            turn: 1,
            system: SystemId(0),
            encountered: HouseId(1),
            fleet_size_estimate: 3,
        });
        db.file_scout_encounter(ScoutEncounterReport {
            turn: 2,
            system: SystemId(0),
            encountered: HouseId(1),
            fleet_size_estimate: 5,
        });
        assert_eq!(db.scout_encounters.len(), 2);
    }
}
