//! Multi-turn colony projects: construction, repair, population transfer,
//! and pending diplomatic proposals (§3 ConstructionProject, RepairProject,
//! PopulationTransfer, Proposal; §4.7).

use crate::core::ids::{
    ColonyId, ConstructionProjectId, HouseId, KastraId, PopulationTransferId, ProposalId,
    RepairProjectId, ShipId,
};
use crate::entities::facility::NeoriaKind;
use crate::entities::house::DiplomaticStatus;
use crate::entities::ship::ShipClass;
use serde::{Deserialize, Serialize};

/// What a construction project produces once its queue empties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildItem {
    Ship(ShipClass),
    Facility(NeoriaKind),
    GroundUnit(String),
}

/// A colony's queued build, commissioned through a specific Neoria (§4.2,
/// OQ2: the commissioning facility, not the hull class, decides whether the
/// spaceport penalty applies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructionProject {
    pub id: ConstructionProjectId,
    pub colony: ColonyId,
    pub owner: HouseId,
    pub item: BuildItem,
    pub commissioned_through: NeoriaKind,
    pub remaining_ticks: u32,
    pub total_cost: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum RepairTarget {
    Ship(ShipId),
    Kastra(KastraId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairProject {
    pub id: RepairProjectId,
    pub colony: ColonyId,
    pub target: RepairTarget,
    pub remaining_ticks: u32,
}

/// Souls in transit between two colonies the same house owns (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationTransfer {
    pub id: PopulationTransferId,
    pub from: ColonyId,
    pub to: ColonyId,
    pub souls: u64,
    pub remaining_ticks: u32,
}

/// A diplomatic status change awaiting the target house's response (§4.7).
/// Proposals age each production phase and expire if never answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub from: HouseId,
    pub to: HouseId,
    pub proposed_status: DiplomaticStatus,
    pub turns_pending: u8,
}
