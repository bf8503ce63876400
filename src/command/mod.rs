//! Player commands: the wire shape (§4.2/§6) and their validator (C5).

pub mod validate;
pub mod zero_turn;

use crate::core::ids::{ColonyId, FleetId, HouseId, ShipId, SquadronId};
use crate::entities::construction::BuildItem;
use crate::entities::facility::NeoriaKind;
use crate::entities::fleet::FleetOrder;
use serde::{Deserialize, Serialize};

/// One house's worth of orders for a turn, submitted as a flat list and
/// validated/executed in submission order (§4.2 "commands execute in the
/// order submitted").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandPacket {
    pub house: HouseId,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Issue one of the 20 fleet order codes (§4.2, §6) to a fleet the
    /// house owns.
    IssueFleetOrder { fleet: FleetId, order: FleetOrder },
    TransferShips { ships: Vec<ShipId>, from: FleetId, to: FleetId },
    MergeFleets { absorbed: FleetId, into: FleetId },
    DetachFleet { source: FleetId, ships: Vec<ShipId> },
    TransferFighters { squadron: SquadronId, ships: Vec<ShipId>, to: FleetId },
    SetTaxRate { rate: u8 },
    SetResearchAllocation { field: crate::core::config::TechField, points: u32 },
    SetEspionageBudget { amount: i32 },
    ProposeDiplomacy { target: HouseId, status: crate::entities::house::DiplomaticStatus },
    /// Queue a build at a colony, commissioned through one of its Neoria
    /// (§4.2 cost preview, OQ2 commission penalty).
    QueueConstruction { colony: ColonyId, item: BuildItem, through: NeoriaKind },
    /// Advance a colony's terraforming progress by one step this production
    /// phase (§4.7).
    Terraform { colony: ColonyId },
}
