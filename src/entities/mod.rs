//! Entity definitions and their stores (§3).
//!
//! Every entity kind follows the same shape: a primary `Vec`/`HashMap`
//! store plus whatever secondary indices its phase logic needs, with all
//! mutation funnelled through the store's own methods so the indices can
//! never drift out of sync with the primary data.

pub mod colony;
pub mod construction;
pub mod facility;
pub mod fleet;
pub mod ground_unit;
pub mod house;
pub mod ongoing_effect;
pub mod ship;
pub mod squadron;
pub mod star_map;

use crate::core::error::EngineResult;

/// Debug-only cross-store invariant sweep (§3 `validate_indices`), called
/// at the boundaries between phases when built with debug assertions.
#[cfg(debug_assertions)]
#[allow(clippy::too_many_arguments)]
pub fn validate_all(
    ships: &ship::ShipStore,
    fleets: &fleet::FleetStore,
    neoria: &facility::NeoriaStore,
    kastra: &facility::KastraStore,
    ground_units: &ground_unit::GroundUnitStore,
    squadrons: &squadron::SquadronStore,
) -> EngineResult<()> {
    ships.validate_indices()?;
    fleets.validate_indices()?;
    neoria.validate_indices()?;
    kastra.validate_indices()?;
    ground_units.validate_indices()?;
    squadrons.validate_indices()?;
    Ok(())
}
