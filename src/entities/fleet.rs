//! Fleet entity and its store (§3 Fleet, §4.1).

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{FleetId, HouseId, SystemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two-digit fleet command codes a `CommandPacket` may carry for a
/// fleet (§4.2, §6: codes 00-19).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetOrder {
    Hold,
    Move(SystemId),
    Seek(SystemId),
    Patrol(SystemId),
    GuardStarbase(SystemId),
    GuardColony(SystemId),
    Blockade(SystemId),
    Bombard(SystemId),
    Invade(SystemId),
    Blitz(SystemId),
    Colonize(SystemId),
    ScoutColony(SystemId),
    ScoutSystem(SystemId),
    HackStarbase(SystemId),
    JoinFleet(FleetId),
    Rendezvous(SystemId),
    Salvage(SystemId),
    Reserve,
    Mothball,
    View(SystemId),
}

/// The fleet-composition requirement a command gates on (§4.2 capability
/// table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCapability {
    None,
    /// At least one non-crippled ETAC squadron/ship.
    NonCrippledEtac,
    /// At least one combat squadron; no Intel squadrons aboard.
    CombatNoIntel,
    /// Every ship aboard is Scout-class (an Intel-only fleet).
    PureIntel,
}

impl FleetOrder {
    /// Posture this order leaves the fleet in for next turn's conflict
    /// phase (§4.3). Orders whose objective is inherently aggressive imply
    /// `Seek` for the turn they execute even though they target a specific
    /// objective rather than open combat.
    pub fn stance(self) -> FleetStance {
        match self {
            FleetOrder::Seek(_) => FleetStance::Seek,
            FleetOrder::Patrol(_) => FleetStance::Patrol,
            FleetOrder::GuardStarbase(_) | FleetOrder::GuardColony(_) => FleetStance::Guard,
            FleetOrder::Blitz(_)
            | FleetOrder::Bombard(_)
            | FleetOrder::Invade(_)
            | FleetOrder::HackStarbase(_)
            | FleetOrder::Blockade(_) => FleetStance::Seek,
            _ => FleetStance::Hold,
        }
    }

    /// The system this order is traveling toward, if any (§4.7 movement).
    pub fn destination(self) -> Option<SystemId> {
        match self {
            FleetOrder::Hold | FleetOrder::Reserve | FleetOrder::Mothball | FleetOrder::JoinFleet(_) => None,
            FleetOrder::Move(s)
            | FleetOrder::Seek(s)
            | FleetOrder::Patrol(s)
            | FleetOrder::GuardStarbase(s)
            | FleetOrder::GuardColony(s)
            | FleetOrder::Blockade(s)
            | FleetOrder::Bombard(s)
            | FleetOrder::Invade(s)
            | FleetOrder::Blitz(s)
            | FleetOrder::Colonize(s)
            | FleetOrder::ScoutColony(s)
            | FleetOrder::ScoutSystem(s)
            | FleetOrder::HackStarbase(s)
            | FleetOrder::Rendezvous(s)
            | FleetOrder::Salvage(s)
            | FleetOrder::View(s) => Some(s),
        }
    }

    /// Fleet-composition requirement this order is gated behind (§4.2).
    pub fn requires(self) -> OrderCapability {
        match self {
            FleetOrder::Colonize(_) => OrderCapability::NonCrippledEtac,
            FleetOrder::Bombard(_) | FleetOrder::Invade(_) | FleetOrder::Blitz(_) => OrderCapability::CombatNoIntel,
            FleetOrder::ScoutColony(_) | FleetOrder::ScoutSystem(_) | FleetOrder::HackStarbase(_) => {
                OrderCapability::PureIntel
            }
            _ => OrderCapability::None,
        }
    }
}

impl Default for FleetOrder {
    fn default() -> Self {
        FleetOrder::Hold
    }
}

/// A fleet's standing posture, set by production for the following turn's
/// conflict phase to read (§4.3: a Hostile relation only triggers combat
/// when at least one side is under an engaging stance; `Hold` never
/// engages). Orders that are inherently aggressive (Blitz, Bombard, Invade,
/// HackStarbase, Blockade) imply `Seek` for the turn they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetStance {
    Hold,
    Seek,
    Patrol,
    Guard,
}

impl FleetStance {
    /// Whether this stance engages a Hostile (not War) opponent sharing a
    /// system (§4.3).
    pub fn engages_hostile(self) -> bool {
        matches!(self, FleetStance::Seek | FleetStance::Patrol)
    }
}

impl Default for FleetStance {
    fn default() -> Self {
        FleetStance::Hold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub owner: HouseId,
    pub system: SystemId,
    pub destination: Option<SystemId>,
    pub stance: FleetStance,
    /// The standing order last issued to this fleet (§4.2); production
    /// consumes it each turn to advance movement and re-derives `stance`
    /// from it for next turn's conflict phase.
    pub order: FleetOrder,
}

/// Fleet store indexed by both owning house and current system, the two
/// axes the turn phases query on (scouting/combat group by system,
/// command validation groups by owner).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FleetStore {
    fleets: Vec<Fleet>,
    index: HashMap<FleetId, usize>,
    by_system: HashMap<SystemId, Vec<FleetId>>,
    by_owner: HashMap<HouseId, Vec<FleetId>>,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fleet: Fleet) {
        let id = fleet.id;
        self.by_system.entry(fleet.system).or_default().push(id);
        self.by_owner.entry(fleet.owner).or_default().push(id);
        self.index.insert(id, self.fleets.len());
        self.fleets.push(fleet);
    }

    pub fn get(&self, id: FleetId) -> EngineResult<&Fleet> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in fleet store")))?;
        Ok(&self.fleets[idx])
    }

    pub fn get_mut(&mut self, id: FleetId) -> EngineResult<&mut Fleet> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in fleet store")))?;
        Ok(&mut self.fleets[idx])
    }

    pub fn fleets_at(&self, system: SystemId) -> &[FleetId] {
        self.by_system.get(&system).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fleets_owned_by(&self, house: HouseId) -> &[FleetId] {
        self.by_owner.get(&house).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn relocate(&mut self, id: FleetId, new_system: SystemId) -> EngineResult<()> {
        let old_system = self.get(id)?.system;
        if let Some(list) = self.by_system.get_mut(&old_system) {
            list.retain(|&f| f != id);
        }
        self.by_system.entry(new_system).or_default().push(id);
        self.get_mut(id)?.system = new_system;
        Ok(())
    }

    pub fn remove(&mut self, id: FleetId) -> EngineResult<Fleet> {
        let idx = self
            .index
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in fleet store")))?;
        let fleet = self.fleets.remove(idx);
        if let Some(list) = self.by_system.get_mut(&fleet.system) {
            list.retain(|&f| f != id);
        }
        if let Some(list) = self.by_owner.get_mut(&fleet.owner) {
            list.retain(|&f| f != id);
        }
        for (_, i) in self.index.iter_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        Ok(fleet)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fleet> {
        self.fleets.iter()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, fleet) in self.fleets.iter().enumerate() {
            match self.index.get(&fleet.id) {
                Some(&idx) if idx == i => {}
                _ => return Err(EngineError::invariant(format!("fleet store index desync at {}", fleet.id))),
            }
        }
        for (&system, ids) in self.by_system.iter() {
            for &id in ids {
                if self.get(id)?.system != system {
                    return Err(EngineError::invariant(format!("fleet store by_system desync for {id}")));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_keeps_by_system_index_consistent() {
        let mut store = FleetStore::new();
        store.insert(Fleet { id: FleetId(0), owner: HouseId(0), system: SystemId(1), destination: None, stance: Default::default(), order: Default::default() });
        store.relocate(FleetId(0), SystemId(2)).unwrap();
        assert!(store.fleets_at(SystemId(1)).is_empty());
        assert_eq!(store.fleets_at(SystemId(2)), &[FleetId(0)]);
        store.validate_indices().unwrap();
    }
}
