//! Typed entity identifiers.
//!
//! Every entity kind gets its own newtype over `u32` so the compiler
//! rejects passing a `FleetId` where a `ShipId` is expected. `ColonyId` is
//! numerically equal to its system's `SystemId` (a colony is identified by
//! the system it sits in, not by a separate counter).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(HouseId);
entity_id!(SystemId);
entity_id!(FleetId);
entity_id!(ShipId);
entity_id!(SquadronId);
entity_id!(NeoriaId);
entity_id!(KastraId);
entity_id!(GroundUnitId);
entity_id!(ConstructionProjectId);
entity_id!(RepairProjectId);
entity_id!(PopulationTransferId);
entity_id!(ProposalId);

/// A colony's id is numerically equal to the system it occupies (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColonyId(pub u32);

impl fmt::Display for ColonyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColonyId({})", self.0)
    }
}

impl From<SystemId> for ColonyId {
    fn from(system: SystemId) -> Self {
        ColonyId(system.0)
    }
}

impl From<ColonyId> for SystemId {
    fn from(colony: ColonyId) -> Self {
        SystemId(colony.0)
    }
}

/// Monotonic counters for every entity kind, bumped by the entity-ops layer
/// on every `create_*`. Must round-trip through persistence (§6) so ids stay
/// stable across save/load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdCounters {
    pub next_house: u32,
    pub next_fleet: u32,
    pub next_ship: u32,
    pub next_squadron: u32,
    pub next_neoria: u32,
    pub next_kastra: u32,
    pub next_ground_unit: u32,
    pub next_construction_project: u32,
    pub next_repair_project: u32,
    pub next_population_transfer: u32,
    pub next_proposal: u32,
}

macro_rules! counter_bump {
    ($self:ident, $field:ident, $id:ident) => {{
        let id = $id($self.$field);
        $self.$field += 1;
        id
    }};
}

impl IdCounters {
    pub fn bump_house(&mut self) -> HouseId {
        counter_bump!(self, next_house, HouseId)
    }
    pub fn bump_fleet(&mut self) -> FleetId {
        counter_bump!(self, next_fleet, FleetId)
    }
    pub fn bump_ship(&mut self) -> ShipId {
        counter_bump!(self, next_ship, ShipId)
    }
    pub fn bump_squadron(&mut self) -> SquadronId {
        counter_bump!(self, next_squadron, SquadronId)
    }
    pub fn bump_neoria(&mut self) -> NeoriaId {
        counter_bump!(self, next_neoria, NeoriaId)
    }
    pub fn bump_kastra(&mut self) -> KastraId {
        counter_bump!(self, next_kastra, KastraId)
    }
    pub fn bump_ground_unit(&mut self) -> GroundUnitId {
        counter_bump!(self, next_ground_unit, GroundUnitId)
    }
    pub fn bump_construction_project(&mut self) -> ConstructionProjectId {
        counter_bump!(self, next_construction_project, ConstructionProjectId)
    }
    pub fn bump_repair_project(&mut self) -> RepairProjectId {
        counter_bump!(self, next_repair_project, RepairProjectId)
    }
    pub fn bump_population_transfer(&mut self) -> PopulationTransferId {
        counter_bump!(self, next_population_transfer, PopulationTransferId)
    }
    pub fn bump_proposal(&mut self) -> ProposalId {
        counter_bump!(self, next_proposal, ProposalId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_monotonic_and_independent() {
        let mut counters = IdCounters::default();
        let a = counters.bump_fleet();
        let b = counters.bump_fleet();
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);

        let ship = counters.bump_ship();
        assert_eq!(ship.get(), 0, "ship counter is independent of fleet counter");
    }

    #[test]
    fn colony_id_round_trips_through_system_id() {
        let system = SystemId(7);
        let colony: ColonyId = system.into();
        assert_eq!(colony.0, 7);
        let back: SystemId = colony.into();
        assert_eq!(back, system);
    }
}
