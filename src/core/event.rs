//! Event bus (C13, §3 Event, §4.8).
//!
//! Events are appended to an ordered per-turn buffer with monotonically
//! increasing sequence numbers, then flushed to `state.last_turn_events`
//! and fanned out through the visibility filter (C12) to each house's
//! intel database at the end of every phase. The buffer is cleared at
//! turn start — grounded in the teacher's `EventBus`, generalised from a
//! single flat `queued_events` deque to a sequenced, phase-flushed one
//! because determinism requires a stable total order (§5).

use crate::core::config::TechField;
use crate::core::ids::*;
use crate::combat::{CombatReport, Theater};
use crate::entities::ship::ShipClass;
use crate::intel::ObservationQuality;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub sequence: u64,
    pub turn: u64,
    pub house_id: Option<HouseId>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::large_enum_variant)]
pub enum EventKind {
    FleetArrived { fleet: FleetId, system: SystemId },
    FleetDetached { source: FleetId, detached: FleetId },
    FleetTransferred { ships: Vec<ShipId>, from: FleetId, to: FleetId },
    FleetMerged { absorbed: FleetId, into: FleetId },
    CargoLoaded { fleet: FleetId, system: SystemId },
    CargoUnloaded { fleet: FleetId, system: SystemId },
    ColonyEstablished { colony: ColonyId, house: HouseId },
    ColonyConquered { colony: ColonyId, from: Option<HouseId>, to: HouseId },
    ScoutDetected { fleet: FleetId, system: SystemId },
    ScoutIntelGathered { fleet: FleetId, system: SystemId, quality: ObservationQuality },
    CombatPhaseCompleted { system: SystemId },
    ShipDestroyed { ship: ShipId, owner: HouseId, class: ShipClass, system: SystemId },
    WeaponFired { attacker: ShipId, theater: Theater },
    BlockadeEstablished { defender: HouseId, blockaders: Vec<HouseId>, system: SystemId },
    BlockadeLifted { defender: HouseId, system: SystemId },
    EspionageSuccess { actor: HouseId, target: HouseId, action: String },
    EspionageDetected { actor: HouseId, target: HouseId, action: String },
    TechAdvanced { house: HouseId, field: TechField, level: u8 },
    PrestigeChanged { house: HouseId, delta: i32 },
    HouseEliminated { house: HouseId },
    VictoryAchieved { house: HouseId },
    CommandAborted { fleet: FleetId, reason: String },
    SquadronScrapped { squadron: SquadronId, owner: HouseId },
    CombatReportFiled(CombatReport),
    ColonizationContested { system: SystemId, claimants: Vec<HouseId>, winner: Option<HouseId> },
    ColonyBombarded { colony: ColonyId, by: HouseId, souls_lost: u64 },
    ConstructionCompleted { colony: ColonyId, item: String },
    PopulationTransferCompleted { from: ColonyId, to: ColonyId, souls: u64 },
    TerraformAdvanced { colony: ColonyId, level: u8 },
    ProposalAccepted { from: HouseId, to: HouseId, status: crate::entities::house::DiplomaticStatus },
    ProposalExpired { from: HouseId, to: HouseId },
    DefensiveInstability { house: HouseId, penalty: i32 },
}

/// Per-turn ordered event buffer. Sequence numbers are monotonic for the
/// lifetime of the buffer (reset at turn start, §4.8).
#[derive(Debug, Default)]
pub struct EventBus {
    buffer: Vec<Event>,
    next_sequence: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self { buffer: Vec::new(), next_sequence: 0 }
    }

    pub fn emit(&mut self, turn: u64, house_id: Option<HouseId>, kind: EventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.buffer.push(Event { sequence, turn, house_id, kind });
    }

    /// Flush the buffer into an ordered, replayable turn log (§5 "the turn
    /// log is replayable"). Clears the buffer for the next turn.
    pub fn flush(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Non-destructive look at what's been emitted so far this turn, for
    /// phases that need to react to an earlier phase's events without
    /// waiting for the final flush (e.g. income's salvage from conflict's
    /// `ShipDestroyed`s).
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.buffer.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_monotonic() {
        let mut bus = EventBus::new();
        bus.emit(1, None, EventKind::HouseEliminated { house: HouseId(0) });
        bus.emit(1, None, EventKind::HouseEliminated { house: HouseId(1) });
        let events = bus.flush();
        assert_eq!(events[0].sequence, 0);
        assert_eq!(events[1].sequence, 1);
    }

    #[test]
    fn flush_clears_the_buffer() {
        let mut bus = EventBus::new();
        bus.emit(1, None, EventKind::HouseEliminated { house: HouseId(0) });
        assert_eq!(bus.len(), 1);
        let _ = bus.flush();
        assert!(bus.is_empty());
    }
}
