//! Ship entity and its store (§3 Ship, §4.1).

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{FleetId, HouseId, ShipId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The closed set of ship classes (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    Fighter,
    Scout,
    Raider,
    Corvette,
    Destroyer,
    Cruiser,
    Battlecruiser,
    Battleship,
    Dreadnought,
    Monitor,
    CommandShip,
    Carrier,
    Starbase,
    ETAC,
    TroopTransport,
    Freighter,
    PlanetBreaker,
}

impl ShipClass {
    /// Fighters live inside a squadron's fighter bay rather than free-flying
    /// in a fleet (§3 Squadron exclusivity invariant).
    pub fn is_fighter(self) -> bool {
        matches!(self, ShipClass::Fighter)
    }

    /// Capital-class hulls are barred from Restricted lanes (§3 StarMap,
    /// §4.x movement rules); the spaceport commission penalty is a
    /// facility-assignment question, not a hull-class one (§4.2, OQ2).
    pub fn is_capital(self) -> bool {
        matches!(
            self,
            ShipClass::Battlecruiser
                | ShipClass::Battleship
                | ShipClass::Dreadnought
                | ShipClass::Monitor
                | ShipClass::PlanetBreaker
                | ShipClass::CommandShip
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub class: ShipClass,
    pub owner: HouseId,
    pub fleet: Option<FleetId>,
    pub hull_points: i32,
    pub max_hull_points: i32,
    pub crippled: bool,
}

impl Ship {
    pub fn is_destroyed(&self) -> bool {
        self.hull_points <= 0
    }
}

/// Entity store for ships: primary `Vec` plus a secondary `fleet -> [ship]`
/// index. All mutation is funnelled through these methods so the index
/// never desyncs from the primary store (§3 "indices are maintained
/// exclusively by entity-ops").
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShipStore {
    ships: Vec<Ship>,
    index: HashMap<ShipId, usize>,
    by_fleet: HashMap<FleetId, Vec<ShipId>>,
}

impl ShipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ship: Ship) {
        let id = ship.id;
        if let Some(fleet) = ship.fleet {
            self.by_fleet.entry(fleet).or_default().push(id);
        }
        self.index.insert(id, self.ships.len());
        self.ships.push(ship);
    }

    pub fn get(&self, id: ShipId) -> EngineResult<&Ship> {
        let index = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ship store")))?;
        Ok(&self.ships[index])
    }

    pub fn get_mut(&mut self, id: ShipId) -> EngineResult<&mut Ship> {
        let index = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ship store")))?;
        Ok(&mut self.ships[index])
    }

    pub fn ships_in_fleet(&self, fleet: FleetId) -> &[ShipId] {
        self.by_fleet.get(&fleet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Move a ship to a different fleet, keeping `by_fleet` in sync.
    pub fn reassign_fleet(&mut self, id: ShipId, new_fleet: Option<FleetId>) -> EngineResult<()> {
        let old_fleet = self.get(id)?.fleet;
        if let Some(old) = old_fleet {
            if let Some(list) = self.by_fleet.get_mut(&old) {
                list.retain(|&s| s != id);
            }
        }
        if let Some(new) = new_fleet {
            self.by_fleet.entry(new).or_default().push(id);
        }
        self.get_mut(id)?.fleet = new_fleet;
        Ok(())
    }

    pub fn remove(&mut self, id: ShipId) -> EngineResult<Ship> {
        let index = self
            .index
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ship store")))?;
        let ship = self.ships.remove(index);
        if let Some(fleet) = ship.fleet {
            if let Some(list) = self.by_fleet.get_mut(&fleet) {
                list.retain(|&s| s != id);
            }
        }
        for (&id, idx) in self.index.iter_mut() {
            if *idx > index {
                *idx -= 1;
            }
            let _ = id;
        }
        Ok(ship)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, ship) in self.ships.iter().enumerate() {
            match self.index.get(&ship.id) {
                Some(&idx) if idx == i => {}
                _ => {
                    return Err(EngineError::invariant(format!(
                        "ship store index desync at {}",
                        ship.id
                    )))
                }
            }
        }
        for (&fleet, ids) in self.by_fleet.iter() {
            for &id in ids {
                let ship = self.get(id)?;
                if ship.fleet != Some(fleet) {
                    return Err(EngineError::invariant(format!(
                        "ship store by_fleet desync for {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(id: u32, fleet: u32) -> Ship {
        Ship {
            id: ShipId(id),
            class: ShipClass::Destroyer,
            owner: HouseId(1),
            fleet: Some(FleetId(fleet)),
            hull_points: 10,
            max_hull_points: 10,
            crippled: false,
        }
    }

    #[test]
    fn capital_hulls_are_closed_out_of_restricted_lanes() {
        assert!(ShipClass::Dreadnought.is_capital());
        assert!(!ShipClass::Scout.is_capital());
    }

    #[test]
    fn insert_and_get_round_trips() {
        let mut store = ShipStore::new();
        store.insert(ship(0, 1));
        assert_eq!(store.get(ShipId(0)).unwrap().fleet, Some(FleetId(1)));
    }

    #[test]
    fn reassign_fleet_moves_between_indices() {
        let mut store = ShipStore::new();
        store.insert(ship(0, 1));
        store.reassign_fleet(ShipId(0), Some(FleetId(2))).unwrap();
        assert!(store.ships_in_fleet(FleetId(1)).is_empty());
        assert_eq!(store.ships_in_fleet(FleetId(2)), &[ShipId(0)]);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut store = ShipStore::new();
        store.insert(ship(0, 1));
        store.insert(ship(1, 1));
        store.remove(ShipId(0)).unwrap();
        assert!(store.get(ShipId(1)).is_ok());
        store.validate_indices().unwrap();
    }
}
