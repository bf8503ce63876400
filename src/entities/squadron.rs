//! Squadron: a fighter bay's cargo, carried aboard a Carrier (§3 Squadron).
//!
//! A squadron holds exactly one kind of small craft at a time — mixing
//! fighters and assault craft in the same bay is an invariant violation,
//! not a validation-time rejection, because it can only happen from a bug
//! in the entity-ops layer (§3 "squadronType exclusivity").

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{FleetId, HouseId, ShipId, SquadronId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadronType {
    Fighter,
    Assault,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squadron {
    pub id: SquadronId,
    pub owner: HouseId,
    pub carrier: ShipId,
    pub fleet: FleetId,
    pub squadron_type: SquadronType,
    pub members: Vec<ShipId>,
}

impl Squadron {
    pub fn new(id: SquadronId, owner: HouseId, carrier: ShipId, fleet: FleetId, squadron_type: SquadronType) -> Self {
        Self { id, owner, carrier, fleet, squadron_type, members: Vec::new() }
    }

    /// Every member must match the squadron's declared type; the caller is
    /// expected to have checked this before calling `add`, so a mismatch
    /// here means entity-ops let two kinds mix (§3 exclusivity invariant).
    pub fn add(&mut self, ship: ShipId, ship_type: SquadronType) -> EngineResult<()> {
        if ship_type != self.squadron_type {
            return Err(EngineError::invariant(format!(
                "squadron {} mixes {:?} into a {:?} bay",
                self.id, ship_type, self.squadron_type
            )));
        }
        self.members.push(ship);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Entity store for squadrons, same `Vec` + index shape as `ShipStore`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SquadronStore {
    squadrons: Vec<Squadron>,
    index: HashMap<SquadronId, usize>,
}

impl SquadronStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, squadron: Squadron) {
        self.index.insert(squadron.id, self.squadrons.len());
        self.squadrons.push(squadron);
    }

    pub fn get(&self, id: SquadronId) -> EngineResult<&Squadron> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in squadron store")))?;
        Ok(&self.squadrons[idx])
    }

    pub fn get_mut(&mut self, id: SquadronId) -> EngineResult<&mut Squadron> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in squadron store")))?;
        Ok(&mut self.squadrons[idx])
    }

    pub fn in_fleet(&self, fleet: FleetId) -> impl Iterator<Item = &Squadron> {
        self.squadrons.iter().filter(move |s| s.fleet == fleet)
    }

    pub fn remove(&mut self, id: SquadronId) -> EngineResult<Squadron> {
        let idx = self
            .index
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in squadron store")))?;
        let squadron = self.squadrons.remove(idx);
        for (_, i) in self.index.iter_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        Ok(squadron)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Squadron> {
        self.squadrons.iter()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, s) in self.squadrons.iter().enumerate() {
            match self.index.get(&s.id) {
                Some(&idx) if idx == i => {}
                _ => return Err(EngineError::invariant(format!("squadron store index desync at {}", s.id))),
            }
        }
        Ok(())
    }
}
