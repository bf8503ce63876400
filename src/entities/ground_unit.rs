//! Ground units garrisoning a colony (§3 GroundUnit).

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{ColonyId, GroundUnitId, HouseId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundUnit {
    pub id: GroundUnitId,
    pub colony: ColonyId,
    pub owner: HouseId,
    pub unit_type: String,
    pub strength: i32,
    pub max_strength: i32,
}

impl GroundUnit {
    pub fn is_destroyed(&self) -> bool {
        self.strength <= 0
    }
}

/// Entity store for ground units, same `Vec` + index shape as `ShipStore`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GroundUnitStore {
    units: Vec<GroundUnit>,
    index: HashMap<GroundUnitId, usize>,
}

impl GroundUnitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: GroundUnit) {
        self.index.insert(unit.id, self.units.len());
        self.units.push(unit);
    }

    pub fn get(&self, id: GroundUnitId) -> EngineResult<&GroundUnit> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ground unit store")))?;
        Ok(&self.units[idx])
    }

    pub fn get_mut(&mut self, id: GroundUnitId) -> EngineResult<&mut GroundUnit> {
        let idx = *self
            .index
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ground unit store")))?;
        Ok(&mut self.units[idx])
    }

    pub fn at_colony(&self, colony: ColonyId) -> impl Iterator<Item = &GroundUnit> {
        self.units.iter().filter(move |u| u.colony == colony)
    }

    pub fn remove(&mut self, id: GroundUnitId) -> EngineResult<GroundUnit> {
        let idx = self
            .index
            .remove(&id)
            .ok_or_else(|| EngineError::invariant(format!("{id} not found in ground unit store")))?;
        let unit = self.units.remove(idx);
        for (_, i) in self.index.iter_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
        Ok(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundUnit> {
        self.units.iter()
    }

    #[cfg(debug_assertions)]
    pub fn validate_indices(&self) -> EngineResult<()> {
        for (i, u) in self.units.iter().enumerate() {
            match self.index.get(&u.id) {
                Some(&idx) if idx == i => {}
                _ => return Err(EngineError::invariant(format!("ground unit store index desync at {}", u.id))),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_finds_units_garrisoning_a_colony() {
        let mut store = GroundUnitStore::new();
        store.insert(GroundUnit {
            id: GroundUnitId(0),
            colony: ColonyId(1),
            owner: HouseId(0),
            unit_type: "Militia".to_string(),
            strength: 10,
            max_strength: 10,
        });
        assert_eq!(store.at_colony(ColonyId(1)).count(), 1);
    }
}
