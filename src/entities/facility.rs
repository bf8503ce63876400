//! Orbital facilities: Neoria (production docks) and Kastra (starbases),
//! §3 Neoria/Kastra.

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{ColonyId, KastraId, NeoriaId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeoriaKind {
    Spaceport,
    Shipyard,
    Drydock,
}

impl NeoriaKind {
    pub fn config_key(self) -> &'static str {
        match self {
            NeoriaKind::Spaceport => "Spaceport",
            NeoriaKind::Shipyard => "Shipyard",
            NeoriaKind::Drydock => "Drydock",
        }
    }

    /// Build-cost multiplier for a ship commissioned through this facility
    /// (§4.2, OQ2): a Spaceport lacks dedicated hull-fitting bays and pays
    /// the commission penalty; Shipyards and Drydocks don't.
    pub fn commission_multiplier(self, penalty: f32) -> f32 {
        match self {
            NeoriaKind::Spaceport => 1.0 + penalty,
            NeoriaKind::Shipyard | NeoriaKind::Drydock => 1.0,
        }
    }
}

/// A production facility in orbit of a colony (§3 Neoria).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neoria {
    pub id: NeoriaId,
    pub colony: ColonyId,
    pub kind: NeoriaKind,
    pub docks_in_use: u32,
}

/// The planetary defense station (§3 Kastra).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kastra {
    pub id: KastraId,
    pub colony: ColonyId,
    pub hull_points: i32,
    pub max_hull_points: i32,
}

impl Kastra {
    pub fn is_destroyed(&self) -> bool {
        self.hull_points <= 0
    }
}

/// Entity store for Neoria docks, same `Vec` + index shape as `ShipStore`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NeoriaStore {
    neoria: Vec<Neoria>,
    index: HashMap<NeoriaId, usize>,
}

impl NeoriaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, neoria: Neoria) {
        self.index.insert(neoria.id, self.neoria.len());
        self.neoria.push(neoria);
    }

    pub fn get(&self, id: NeoriaId) -> EngineResult<&Neoria> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in neoria store")))?;
        Ok(&self.neoria[idx])
    }

    pub fn get_mut(&mut self, id: NeoriaId) -> EngineResult<&mut Neoria> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in neoria store")))?;
        Ok(&mut self.neoria[idx])
    }

    pub fn at_colony(&self, colony: ColonyId) -> impl Iterator<Item = &Neoria> {
        self.neoria.iter().filter(move |n| n.colony == colony)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neoria> {
        self.neoria.iter()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, n) in self.neoria.iter().enumerate() {
            match self.index.get(&n.id) {
                Some(&idx) if idx == i => {}
                _ => return Err(EngineError::invariant(format!("neoria store index desync at {}", n.id))),
            }
        }
        Ok(())
    }
}

/// Entity store for Kastra planetary defense stations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KastraStore {
    kastra: Vec<Kastra>,
    index: HashMap<KastraId, usize>,
}

impl KastraStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kastra: Kastra) {
        self.index.insert(kastra.id, self.kastra.len());
        self.kastra.push(kastra);
    }

    pub fn get(&self, id: KastraId) -> EngineResult<&Kastra> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in kastra store")))?;
        Ok(&self.kastra[idx])
    }

    pub fn get_mut(&mut self, id: KastraId) -> EngineResult<&mut Kastra> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in kastra store")))?;
        Ok(&mut self.kastra[idx])
    }

    pub fn at_colony(&self, colony: ColonyId) -> Option<&Kastra> {
        self.kastra.iter().find(|k| k.colony == colony)
    }

    pub fn remove(&mut self, id: KastraId) -> EngineResult<Kastra> {
        let idx = self
            .index
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in kastra store")))?;
        let kastra = self.kastra.remove(idx);
        for (_, i) in self.index.iter_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        Ok(kastra)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kastra> {
        self.kastra.iter()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, k) in self.kastra.iter().enumerate() {
            match self.index.get(&k.id) {
                Some(&idx) if idx == i => {}
                _ => return Err(EngineError::invariant(format!("kastra store index desync at {}", k.id))),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neoria_store_finds_docks_at_a_colony() {
        let mut store = NeoriaStore::new();
        store.insert(Neoria { id: NeoriaId(0), colony: ColonyId(1), kind: NeoriaKind::Shipyard, docks_in_use: 0 });
        assert_eq!(store.at_colony(ColonyId(1)).count(), 1);
    }

    #[test]
    fn spaceport_pays_the_commission_penalty_shipyard_does_not() {
        assert!(NeoriaKind::Spaceport.commission_multiplier(1.0) > 1.0);
        assert_eq!(NeoriaKind::Shipyard.commission_multiplier(1.0), 1.0);
    }
}
