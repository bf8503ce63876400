//! Combat resolution (C7, §4.3).

pub mod kernel;

use crate::core::ids::{HouseId, ShipId, SystemId};
use serde::{Deserialize, Serialize};

/// Combat resolves in four ordered theaters per system per turn (§4.3
/// "Space -> Orbital -> Blockade -> Planetary"). Earlier theaters can
/// remove ships that would otherwise have fought in a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Theater {
    Space,
    Orbital,
    Blockade,
    Planetary,
}

pub const THEATER_ORDER: [Theater; 4] =
    [Theater::Space, Theater::Orbital, Theater::Blockade, Theater::Planetary];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheaterResult {
    pub theater: Theater,
    pub rounds_fought: u32,
    pub ships_destroyed: Vec<ShipId>,
    pub ships_crippled: Vec<ShipId>,
}

/// Filed once per system that saw combat this turn, fanned out through the
/// visibility filter the same way any other event is (§3 CombatReport).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatReport {
    pub system: SystemId,
    pub participants: Vec<HouseId>,
    pub theaters: Vec<TheaterResult>,
    pub victor: Option<HouseId>,
}
